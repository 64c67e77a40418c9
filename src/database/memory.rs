use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::Store;
use crate::models::{Comment, Counter, ProfileChanges, User, Video};
use crate::utils::{AppError, AppResult};

/// In-process store for tests. Insertion order is the natural order, and
/// every mutation happens under the collection lock.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    videos: Mutex<Vec<Video>>,
    failing: AtomicBool,
    failing_user_reads: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following call fail like an unreachable database
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Fails only the reads of the users collection
    pub fn set_failing_user_reads(&self, failing: bool) {
        self.failing_user_reads.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::PersistenceFailed("server selection timeout".into()));
        }
        Ok(())
    }

    fn check_user_read(&self) -> AppResult<()> {
        self.check()?;
        if self.failing_user_reads.load(Ordering::SeqCst) {
            return Err(AppError::PersistenceFailed("users: operation timed out".into()));
        }
        Ok(())
    }

    fn users(&self) -> std::sync::MutexGuard<'_, Vec<User>> {
        self.users.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn videos(&self) -> std::sync::MutexGuard<'_, Vec<Video>> {
        self.videos.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        self.check()
    }

    async fn find_user_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        self.check_user_read()?;
        Ok(self.users().iter().find(|u| &u.id == id).cloned())
    }

    async fn find_users_by_ids(&self, ids: &[ObjectId]) -> AppResult<Vec<User>> {
        self.check_user_read()?;
        Ok(self.users().iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }

    async fn find_user_by_username_or_email(&self, username: &str, email: &str) -> AppResult<Option<User>> {
        self.check_user_read()?;
        Ok(self
            .users()
            .iter()
            .find(|u| u.username == username || u.email == email)
            .cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.check_user_read()?;
        Ok(self.users().iter().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, user: &User) -> AppResult<()> {
        self.check()?;
        let mut users = self.users();
        // Mesmas restrições dos índices únicos do MongoDB
        if users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(AppError::Conflict("Username or email already registered".into()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update_profile(&self, user_id: &ObjectId, changes: &ProfileChanges) -> AppResult<Option<User>> {
        self.check()?;
        let mut users = self.users();
        Ok(users.iter_mut().find(|u| &u.id == user_id).map(|user| {
            changes.apply(user);
            user.clone()
        }))
    }

    async fn push_watched_video(&self, user_id: &ObjectId, video_id: &ObjectId) -> AppResult<bool> {
        self.check()?;
        let mut users = self.users();
        match users.iter_mut().find(|u| &u.id == user_id) {
            Some(user) => {
                user.watched_videos.push(*video_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_video_by_id(&self, id: &ObjectId) -> AppResult<Option<Video>> {
        self.check()?;
        Ok(self.videos().iter().find(|v| &v.id == id).cloned())
    }

    async fn find_videos_by_ids(&self, ids: &[ObjectId]) -> AppResult<Vec<Video>> {
        self.check()?;
        Ok(self.videos().iter().filter(|v| ids.contains(&v.id)).cloned().collect())
    }

    async fn find_videos_by_owner(&self, owner: &ObjectId) -> AppResult<Vec<Video>> {
        self.check()?;
        Ok(self.videos().iter().filter(|v| &v.owner == owner).cloned().collect())
    }

    async fn list_videos(&self) -> AppResult<Vec<Video>> {
        self.check()?;
        Ok(self.videos().clone())
    }

    async fn find_videos_by_tags_excluding(
        &self,
        tags: &[String],
        excluded: &[ObjectId],
        limit: i64,
    ) -> AppResult<Vec<Video>> {
        self.check()?;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .videos()
            .iter()
            .filter(|v| v.tags.iter().any(|t| tags.contains(t)))
            .filter(|v| !excluded.contains(&v.id))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn insert_video(&self, video: &Video) -> AppResult<()> {
        self.check()?;
        self.videos().push(video.clone());
        Ok(())
    }

    async fn push_comment(&self, video_id: &ObjectId, comment: &Comment) -> AppResult<bool> {
        self.check()?;
        let mut videos = self.videos();
        match videos.iter_mut().find(|v| &v.id == video_id) {
            Some(video) => {
                video.comments.push(comment.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn increment_counter(&self, video_id: &ObjectId, counter: Counter) -> AppResult<Option<i64>> {
        self.check()?;
        let mut videos = self.videos();
        Ok(videos.iter_mut().find(|v| &v.id == video_id).map(|video| {
            let slot = match counter {
                Counter::Likes => &mut video.likes,
                Counter::Dislikes => &mut video.dislikes,
                Counter::Views => &mut video.views,
            };
            *slot += 1;
            *slot
        }))
    }
}

pub fn sample_user(username: &str) -> User {
    User {
        id: ObjectId::new(),
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password_hash: "$2b$04$not-a-real-hash".to_string(),
        avatar: Some(format!("avatars/{}.png", username)),
        bio: Some(format!("{} bio", username)),
        personal_details: Default::default(),
        privacy_settings: Default::default(),
        watched_videos: vec![],
        role: crate::models::DEFAULT_ROLE.to_string(),
        created_at: None,
    }
}

pub fn sample_video(title: &str, tags: &[&str], owner: &ObjectId) -> Video {
    Video {
        id: ObjectId::new(),
        title: title.to_string(),
        description: None,
        category: None,
        video_path: format!("{}.mp4", title),
        thumbnail_path: None,
        upload_date: mongodb::bson::DateTime::now(),
        views: 0,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        likes: 0,
        dislikes: 0,
        comments: vec![],
        owner: *owner,
    }
}
