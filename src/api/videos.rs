use actix_web::{web, HttpResponse};

use crate::database::Store;
use crate::models::{
    AddCommentRequest, CommentResponse, CommentWithAuthor, CreateVideoRequest, VideoResponse,
};
use crate::services::{engagement_service, video_service};
use crate::utils::AppError;

use super::log_failure;

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "Videos",
    responses(
        (status = 200, description = "All videos", body = [VideoResponse])
    )
)]
pub async fn list_videos(db: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    log::info!("🎬 GET /videos");

    let videos = video_service::list_videos(db.get_ref())
        .await
        .map_err(|e| log_failure("list videos", e))?;

    let videos: Vec<VideoResponse> = videos.into_iter().map(VideoResponse::from).collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "videos": videos,
        "total": videos.len()
    })))
}

#[utoipa::path(
    get,
    path = "/api/videos/{id}",
    tag = "Videos",
    params(("id" = String, Path, description = "Video id")),
    responses(
        (status = 200, description = "Video found", body = VideoResponse),
        (status = 404, description = "Video not found")
    )
)]
pub async fn get_video(
    db: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let video_id = path.into_inner();
    log::info!("🎬 GET /videos/{}", video_id);

    let video = video_service::get_video(db.get_ref(), &video_id)
        .await
        .map_err(|e| log_failure("fetch video", e))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "video": VideoResponse::from(video)
    })))
}

#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "Videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Video metadata stored", body = VideoResponse),
        (status = 400, description = "Title and video path are required"),
        (status = 404, description = "Owner not found")
    )
)]
pub async fn create_video(
    db: web::Data<dyn Store>,
    body: web::Json<CreateVideoRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🎬 POST /videos - title: {}", body.title);

    let video = video_service::create_video(db.get_ref(), body.into_inner())
        .await
        .map_err(|e| log_failure("create video", e))?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "video": VideoResponse::from(video)
    })))
}

#[utoipa::path(
    post,
    path = "/api/videos/{id}/view",
    tag = "Engagement",
    params(("id" = String, Path, description = "Video id")),
    responses(
        (status = 200, description = "View counted"),
        (status = 404, description = "Video not found")
    )
)]
pub async fn record_view(
    db: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let video_id = path.into_inner();

    let views = engagement_service::record_view(db.get_ref(), &video_id)
        .await
        .map_err(|e| log_failure("count view", e))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "views": views
    })))
}

#[utoipa::path(
    post,
    path = "/api/videos/{id}/like",
    tag = "Engagement",
    params(("id" = String, Path, description = "Video id")),
    responses(
        (status = 200, description = "Like counted, returns the new total"),
        (status = 404, description = "Video not found")
    )
)]
pub async fn like_video(
    db: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let video_id = path.into_inner();
    log::info!("👍 POST /videos/{}/like", video_id);

    let likes = engagement_service::like(db.get_ref(), &video_id)
        .await
        .map_err(|e| log_failure("like video", e))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "likes": likes
    })))
}

#[utoipa::path(
    post,
    path = "/api/videos/{id}/dislike",
    tag = "Engagement",
    params(("id" = String, Path, description = "Video id")),
    responses(
        (status = 200, description = "Dislike counted, returns the new total"),
        (status = 404, description = "Video not found")
    )
)]
pub async fn dislike_video(
    db: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let video_id = path.into_inner();
    log::info!("👎 POST /videos/{}/dislike", video_id);

    let dislikes = engagement_service::dislike(db.get_ref(), &video_id)
        .await
        .map_err(|e| log_failure("dislike video", e))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "dislikes": dislikes
    })))
}

#[utoipa::path(
    get,
    path = "/api/videos/{id}/comments",
    tag = "Engagement",
    params(("id" = String, Path, description = "Video id")),
    responses(
        (status = 200, description = "Comments, newest first", body = [CommentWithAuthor]),
        (status = 404, description = "Video not found")
    )
)]
pub async fn list_comments(
    db: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let video_id = path.into_inner();
    log::info!("💬 GET /videos/{}/comments", video_id);

    let comments = engagement_service::list_comments(db.get_ref(), &video_id)
        .await
        .map_err(|e| log_failure("list comments", e))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "comments": comments,
        "total": comments.len()
    })))
}

#[utoipa::path(
    post,
    path = "/api/videos/{id}/comments",
    tag = "Engagement",
    params(("id" = String, Path, description = "Video id")),
    request_body = AddCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Empty text or invalid user id"),
        (status = 404, description = "Video not found")
    )
)]
pub async fn add_comment(
    db: web::Data<dyn Store>,
    path: web::Path<String>,
    body: web::Json<AddCommentRequest>,
) -> Result<HttpResponse, AppError> {
    let video_id = path.into_inner();
    log::info!("💬 POST /videos/{}/comments - user: {}", video_id, body.user_id);

    let comment = engagement_service::add_comment(db.get_ref(), &video_id, &body.user_id, &body.text)
        .await
        .map_err(|e| log_failure("add comment", e))?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "comment": CommentResponse::from(comment)
    })))
}
