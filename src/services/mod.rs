pub mod engagement_service;
pub mod recommendation_service;
pub mod user_service;
pub mod video_service;
