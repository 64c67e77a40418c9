use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};

use super::user::PublicProfile;

/// Vídeo (armazenado no MongoDB, collection "videos")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category: Option<String>,

    pub video_path: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub thumbnail_path: Option<String>,

    pub upload_date: BsonDateTime,

    #[serde(default)]
    pub views: i64,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub likes: i64,

    #[serde(default)]
    pub dislikes: i64,

    /// Embedded comments in insertion order
    #[serde(default)]
    pub comments: Vec<Comment>,

    /// Owning user
    #[serde(rename = "user")]
    pub owner: ObjectId,
}

/// Comentário embutido no documento do vídeo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub text: String,
    /// Stored as given, not checked against the users collection
    pub user_id: ObjectId,
    pub date: BsonDateTime,
}

/// Engagement counters kept on a video document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Likes,
    Dislikes,
    Views,
}

impl Counter {
    pub fn field(&self) -> &'static str {
        match self {
            Counter::Likes => "likes",
            Counter::Dislikes => "dislikes",
            Counter::Views => "views",
        }
    }
}

pub(crate) fn to_utc(dt: BsonDateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}

/// Request para criar metadados de vídeo
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateVideoRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub video_path: String,
    pub thumbnail_path: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Owning user id
    pub user_id: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AddCommentRequest {
    pub user_id: String,
    pub text: String,
}

/// Response de vídeo
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct VideoResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub video_path: String,
    pub thumbnail_path: Option<String>,
    #[schema(value_type = String)]
    pub upload_date: DateTime<Utc>,
    pub views: i64,
    pub tags: Vec<String>,
    pub likes: i64,
    pub dislikes: i64,
    pub comment_count: usize,
    pub user_id: String,
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        VideoResponse {
            id: video.id.to_hex(),
            title: video.title,
            description: video.description,
            category: video.category,
            video_path: video.video_path,
            thumbnail_path: video.thumbnail_path,
            upload_date: to_utc(video.upload_date),
            views: video.views,
            tags: video.tags,
            likes: video.likes,
            dislikes: video.dislikes,
            comment_count: video.comments.len(),
            user_id: video.owner.to_hex(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CommentResponse {
    pub id: String,
    pub text: String,
    pub user_id: String,
    #[schema(value_type = String)]
    pub date: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        CommentResponse {
            id: comment.id.to_hex(),
            text: comment.text,
            user_id: comment.user_id.to_hex(),
            date: to_utc(comment.date),
        }
    }
}

/// Comentário com o perfil público do autor
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct CommentWithAuthor {
    pub id: String,
    pub text: String,
    #[schema(value_type = String)]
    pub date: DateTime<Utc>,
    pub author: PublicProfile,
}
