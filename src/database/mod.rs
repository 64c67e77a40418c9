pub mod store;

#[cfg(test)]
pub mod memory;

pub use store::Store;

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use std::error::Error;

use crate::models::{Comment, Counter, ProfileChanges, User, Video};
use crate::utils::{AppError, AppResult};

const USERS: &str = "users";
const VIDEOS: &str = "videos";
const DEFAULT_DB_NAME: &str = "videoplatform";
const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        let db_name = database_name(uri);
        let db = client.database(&db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates necessary indexes for optimal query performance
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        log::info!("🔧 Creating database indexes...");

        let unique = || IndexOptions::builder().unique(true).build();

        let users = self.collection::<mongodb::bson::Document>(USERS);

        for field in ["username", "email"] {
            let index = IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(unique())
                .build();

            match users.create_index(index).await {
                Ok(_) => log::info!("   ✅ Index created: users({}) unique", field),
                Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
            }
        }

        let videos = self.collection::<mongodb::bson::Document>(VIDEOS);

        // tags: tag-overlap recommendations; user: profile video listing
        for field in ["tags", "user"] {
            let index = IndexModel::builder().keys(doc! { field: 1 }).build();

            match videos.create_index(index).await {
                Ok(_) => log::info!("   ✅ Index created: videos({})", field),
                Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
            }
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    fn users(&self) -> Collection<User> {
        self.collection(USERS)
    }

    fn videos(&self) -> Collection<Video> {
        self.collection(VIDEOS)
    }
}

/// Extracts the database name from the URI path, falling back to the default
fn database_name(uri: &str) -> String {
    let without_scheme = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);

    without_scheme
        .split_once('/')
        .map(|(_, path)| path.split('?').next().unwrap_or_default())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_DB_NAME)
        .to_string()
}

/// E11000 from one of the unique indexes
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

/// `$set` body for a profile update, nested fields addressed by dotted path
fn profile_set_document(changes: &ProfileChanges) -> Document {
    let mut set = Document::new();

    if let Some(bio) = &changes.bio {
        set.insert("bio", bio.as_str());
    }
    if let Some(avatar) = &changes.avatar {
        set.insert("avatar", avatar.as_str());
    }
    if let Some(name) = &changes.name {
        set.insert("personal_details.name", name.as_str());
    }
    if let Some(date_of_birth) = changes.date_of_birth {
        set.insert("personal_details.date_of_birth", date_of_birth);
    }
    if let Some(show) = changes.show_email {
        set.insert("privacy_settings.show_email", show);
    }
    if let Some(show) = changes.show_bio {
        set.insert("privacy_settings.show_bio", show);
    }
    if let Some(show) = changes.show_personal_details {
        set.insert("privacy_settings.show_personal_details", show);
    }

    set
}

/// Counter read from a projected document; a missing field counts as zero
fn counter_value(document: &Document, field: &str) -> i64 {
    match document.get(field) {
        Some(Bson::Int64(value)) => *value,
        Some(Bson::Int32(value)) => i64::from(*value),
        Some(Bson::Double(value)) => *value as i64,
        _ => 0,
    }
}

#[async_trait]
impl Store for MongoDB {
    async fn ping(&self) -> AppResult<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn find_user_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        Ok(self.users().find_one(doc! { "_id": *id }).await?)
    }

    async fn find_users_by_ids(&self, ids: &[ObjectId]) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let cursor = self
            .users()
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find_user_by_username_or_email(&self, username: &str, email: &str) -> AppResult<Option<User>> {
        let filter = doc! {
            "$or": [
                { "username": username },
                { "email": email }
            ]
        };

        Ok(self.users().find_one(filter).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.users().find_one(doc! { "username": username }).await?)
    }

    async fn insert_user(&self, user: &User) -> AppResult<()> {
        match self.users().insert_one(user).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => {
                Err(AppError::Conflict("Username or email already registered".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_profile(&self, user_id: &ObjectId, changes: &ProfileChanges) -> AppResult<Option<User>> {
        let set = profile_set_document(changes);
        if set.is_empty() {
            return self.find_user_by_id(user_id).await;
        }

        let updated = self
            .users()
            .find_one_and_update(doc! { "_id": *user_id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated)
    }

    async fn push_watched_video(&self, user_id: &ObjectId, video_id: &ObjectId) -> AppResult<bool> {
        let result = self
            .users()
            .update_one(
                doc! { "_id": *user_id },
                doc! { "$push": { "watched_videos": *video_id } },
            )
            .await?;

        Ok(result.matched_count > 0)
    }

    async fn find_video_by_id(&self, id: &ObjectId) -> AppResult<Option<Video>> {
        Ok(self.videos().find_one(doc! { "_id": *id }).await?)
    }

    async fn find_videos_by_ids(&self, ids: &[ObjectId]) -> AppResult<Vec<Video>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let cursor = self
            .videos()
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find_videos_by_owner(&self, owner: &ObjectId) -> AppResult<Vec<Video>> {
        let cursor = self.videos().find(doc! { "user": *owner }).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn list_videos(&self) -> AppResult<Vec<Video>> {
        let cursor = self.videos().find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_videos_by_tags_excluding(
        &self,
        tags: &[String],
        excluded: &[ObjectId],
        limit: i64,
    ) -> AppResult<Vec<Video>> {
        if tags.is_empty() || limit <= 0 {
            return Ok(vec![]);
        }

        let filter = doc! {
            "tags": { "$in": tags.to_vec() },
            "_id": { "$nin": excluded.to_vec() },
        };

        let cursor = self.videos().find(filter).limit(limit).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_video(&self, video: &Video) -> AppResult<()> {
        self.videos().insert_one(video).await?;
        Ok(())
    }

    async fn push_comment(&self, video_id: &ObjectId, comment: &Comment) -> AppResult<bool> {
        let comment_bson = mongodb::bson::to_bson(comment)?;

        let result = self
            .videos()
            .update_one(
                doc! { "_id": *video_id },
                doc! { "$push": { "comments": comment_bson } },
            )
            .await?;

        Ok(result.matched_count > 0)
    }

    async fn increment_counter(&self, video_id: &ObjectId, counter: Counter) -> AppResult<Option<i64>> {
        let field = counter.field();

        // Só o contador volta do banco, sem os comentários embutidos
        let updated = self
            .collection::<Document>(VIDEOS)
            .find_one_and_update(
                doc! { "_id": *video_id },
                doc! { "$inc": { field: 1_i64 } },
            )
            .projection(doc! { field: 1 })
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated.map(|document| counter_value(&document, field)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_name_from_uri() {
        assert_eq!(database_name("mongodb://localhost:27017/videoplatform"), "videoplatform");
        assert_eq!(database_name("mongodb://localhost:27017/videos?retryWrites=true"), "videos");
        assert_eq!(database_name("mongodb://localhost:27017"), DEFAULT_DB_NAME);
        assert_eq!(database_name("mongodb://localhost:27017/"), DEFAULT_DB_NAME);
        assert_eq!(database_name("mongodb+srv://u:p@cluster.example.net/prod"), "prod");
    }

    #[test]
    fn test_counter_value_reads_any_numeric_type() {
        let document = doc! { "likes": 7_i64, "views": 3_i32, "dislikes": 2.0 };
        assert_eq!(counter_value(&document, "likes"), 7);
        assert_eq!(counter_value(&document, "views"), 3);
        assert_eq!(counter_value(&document, "dislikes"), 2);
        assert_eq!(counter_value(&doc! {}, "likes"), 0);
    }

    #[test]
    fn test_profile_set_document_uses_dotted_paths() {
        let changes = ProfileChanges {
            bio: Some("hi".into()),
            show_email: Some(false),
            ..Default::default()
        };
        let set = profile_set_document(&changes);
        assert_eq!(set, doc! { "bio": "hi", "privacy_settings.show_email": false });
        assert!(profile_set_document(&ProfileChanges::default()).is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/videoplatform_test".to_string());

        let db = MongoDB::new(&uri).await;
        assert!(db.is_ok());
    }
}
