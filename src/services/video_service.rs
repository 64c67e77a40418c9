use crate::{
    database::Store,
    models::{CreateVideoRequest, Video},
    utils::{parse_id, AppError, AppResult},
};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use std::collections::HashSet;

pub async fn list_videos(store: &dyn Store) -> AppResult<Vec<Video>> {
    let videos = store.list_videos().await?;
    log::debug!("🎬 Listed {} videos", videos.len());
    Ok(videos)
}

pub async fn get_video(store: &dyn Store, video_id: &str) -> AppResult<Video> {
    let video_oid = parse_id(video_id, "Video")?;

    store
        .find_video_by_id(&video_oid)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
}

/// Stores metadata for a video whose file already lives at `video_path`.
pub async fn create_video(store: &dyn Store, request: CreateVideoRequest) -> AppResult<Video> {
    let title = request.title.trim();
    let video_path = request.video_path.trim();

    if title.is_empty() || video_path.is_empty() {
        return Err(AppError::ValidationFailed(
            "Title and video path are required".to_string(),
        ));
    }

    let owner = parse_id(&request.user_id, "User")?;
    if store.find_user_by_id(&owner).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let video = Video {
        id: ObjectId::new(),
        title: title.to_string(),
        description: non_blank(request.description),
        category: non_blank(request.category),
        video_path: video_path.to_string(),
        thumbnail_path: non_blank(request.thumbnail_path),
        upload_date: BsonDateTime::now(),
        views: 0,
        tags: normalize_tags(request.tags),
        likes: 0,
        dislikes: 0,
        comments: vec![],
        owner,
    };

    store.insert_video(&video).await?;

    log::info!("🎬 Video {} '{}' created by user {}", video.id, video.title, owner);

    Ok(video)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trims tags, drops empty ones and keeps the first of any duplicates
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
