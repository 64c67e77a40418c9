use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::models::{Comment, Counter, ProfileChanges, User, Video};
use crate::utils::AppResult;

/// Persistence seam for the service layer.
///
/// Every fault is reported as `AppError::PersistenceFailed`; absence is
/// reported with `None`/`false`, never as an error. A write that breaks
/// username/email uniqueness is `AppError::Conflict`. Mutations of shared
/// counters and lists are single atomic store operations.
#[async_trait]
pub trait Store: Send + Sync {
    /// Round-trip to the backing database
    async fn ping(&self) -> AppResult<()>;

    async fn find_user_by_id(&self, id: &ObjectId) -> AppResult<Option<User>>;

    /// Users among `ids` that exist, in no particular order.
    async fn find_users_by_ids(&self, ids: &[ObjectId]) -> AppResult<Vec<User>>;

    async fn find_user_by_username_or_email(&self, username: &str, email: &str) -> AppResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Fails with `Conflict` when the username or email is already taken.
    async fn insert_user(&self, user: &User) -> AppResult<()>;

    /// Applies `changes` in one atomic write and returns the updated user,
    /// or `None` if the user does not exist.
    async fn update_profile(&self, user_id: &ObjectId, changes: &ProfileChanges) -> AppResult<Option<User>>;

    /// Appends to the watch history. Returns `false` if the user does not exist.
    async fn push_watched_video(&self, user_id: &ObjectId, video_id: &ObjectId) -> AppResult<bool>;

    async fn find_video_by_id(&self, id: &ObjectId) -> AppResult<Option<Video>>;

    /// Videos among `ids` that exist, in natural store order.
    async fn find_videos_by_ids(&self, ids: &[ObjectId]) -> AppResult<Vec<Video>>;

    async fn find_videos_by_owner(&self, owner: &ObjectId) -> AppResult<Vec<Video>>;

    async fn list_videos(&self) -> AppResult<Vec<Video>>;

    /// Videos carrying at least one of `tags` whose id is not in `excluded`,
    /// in natural store order, at most `limit` of them. An empty tag list
    /// matches nothing.
    async fn find_videos_by_tags_excluding(
        &self,
        tags: &[String],
        excluded: &[ObjectId],
        limit: i64,
    ) -> AppResult<Vec<Video>>;

    async fn insert_video(&self, video: &Video) -> AppResult<()>;

    /// Appends a comment. Returns `false` if the video does not exist.
    async fn push_comment(&self, video_id: &ObjectId, comment: &Comment) -> AppResult<bool>;

    /// Adds one to `counter` and returns the value after the increment,
    /// or `None` if the video does not exist.
    async fn increment_counter(&self, video_id: &ObjectId, counter: Counter) -> AppResult<Option<i64>>;
}
