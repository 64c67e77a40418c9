use actix_web::{web, HttpResponse};

use crate::database::Store;
use crate::models::VideoResponse;
use crate::services::recommendation_service;
use crate::utils::AppError;

use super::log_failure;

#[utoipa::path(
    get,
    path = "/api/recommendations/{user_id}",
    tag = "Recommendations",
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Up to 10 unwatched videos sharing a tag with the watch history", body = [VideoResponse]),
        (status = 404, description = "User not found"),
        (status = 500, description = "Error recommending videos")
    )
)]
pub async fn get_recommendations(
    db: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    log::info!("🎯 GET /recommendations/{}", user_id);

    let videos = recommendation_service::recommend(db.get_ref(), &user_id)
        .await
        .map_err(|e| log_failure("recommend videos", e))?;

    let videos: Vec<VideoResponse> = videos.into_iter().map(VideoResponse::from).collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "videos": videos,
        "total": videos.len()
    })))
}
