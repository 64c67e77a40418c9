pub mod user;
pub mod video;

pub use user::*;
pub use video::*;
