use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Video Platform API",
        version = "1.0.0",
        description = "CRUD backend for a video-sharing platform.\n\n**Features:**\n- Video catalogue and metadata\n- Likes, dislikes, views and comments\n- User registration and privacy-filtered profiles\n- Tag-based video recommendations\n- Health monitoring and metrics"
    ),
    paths(
        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,

        // Videos
        crate::api::videos::list_videos,
        crate::api::videos::get_video,
        crate::api::videos::create_video,

        // Engagement
        crate::api::videos::record_view,
        crate::api::videos::like_video,
        crate::api::videos::dislike_video,
        crate::api::videos::list_comments,
        crate::api::videos::add_comment,

        // Users
        crate::api::users::register,
        crate::api::users::get_profile,
        crate::api::users::get_profile_by_username,
        crate::api::users::update_profile,
        crate::api::users::update_avatar,
        crate::api::users::record_watch,

        // Recommendations
        crate::api::recommendations::get_recommendations,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::models::VideoResponse,
            crate::models::CreateVideoRequest,
            crate::models::CommentResponse,
            crate::models::CommentWithAuthor,
            crate::models::AddCommentRequest,
            crate::models::PublicProfile,
            crate::models::RegisterUserRequest,
            crate::models::PersonalDetailsInput,
            crate::models::PrivacySettings,
            crate::models::UpdateProfileRequest,
            crate::models::PrivacySettingsUpdate,
            crate::models::UpdateAvatarRequest,
            crate::models::UserResponse,
            crate::models::ProfileView,
            crate::models::PersonalDetailsView,
            crate::models::ProfileResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check and request metrics for monitoring service status."),
        (name = "Videos", description = "Video catalogue: list, fetch and publish video metadata."),
        (name = "Engagement", description = "Views, likes, dislikes and comments on a video."),
        (name = "Users", description = "Registration, public profiles, profile updates and watch history."),
        (name = "Recommendations", description = "Unwatched videos sharing a tag with the user's watch history."),
    )
)]
pub struct ApiDoc;
