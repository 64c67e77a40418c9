use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::config::Config;
use crate::database::Store;
use crate::models::{
    ProfileResponse, ProfileView, RegisterUserRequest, UpdateAvatarRequest, UpdateProfileRequest, User,
    UserResponse, Video, VideoResponse,
};
use crate::services::user_service;
use crate::utils::AppError;

use super::log_failure;

#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "Users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "Username or email already registered")
    )
)]
pub async fn register(
    db: web::Data<dyn Store>,
    config: web::Data<Config>,
    body: web::Json<RegisterUserRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /users/register - username: {}", body.username);

    let user = user_service::register(db.get_ref(), body.into_inner(), config.bcrypt_cost)
        .await
        .map_err(|e| log_failure("register user", e))?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "user": UserResponse::from(user)
    })))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/profile",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Public profile and owned videos", body = ProfileResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_profile(
    db: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    log::info!("👤 GET /users/{}/profile", user_id);

    let (user, videos) = user_service::get_profile(db.get_ref(), &user_id)
        .await
        .map_err(|e| log_failure("fetch profile", e))?;

    Ok(profile_response(user, videos))
}

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    pub username: String,
}

#[utoipa::path(
    get,
    path = "/api/users/profile",
    tag = "Users",
    params(("username" = String, Query, description = "Exact username")),
    responses(
        (status = 200, description = "Public profile and owned videos", body = ProfileResponse),
        (status = 400, description = "Missing username"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_profile_by_username(
    db: web::Data<dyn Store>,
    query: web::Query<ProfileQuery>,
) -> Result<HttpResponse, AppError> {
    log::info!("👤 GET /users/profile?username={}", query.username);

    let (user, videos) = user_service::get_profile_by_username(db.get_ref(), &query.username)
        .await
        .map_err(|e| log_failure("fetch profile", e))?;

    Ok(profile_response(user, videos))
}

fn profile_response(user: User, videos: Vec<Video>) -> HttpResponse {
    HttpResponse::Ok().json(ProfileResponse {
        success: true,
        user: ProfileView::from(&user),
        videos: videos.into_iter().map(VideoResponse::from).collect(),
    })
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/profile",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Invalid field value"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_profile(
    db: web::Data<dyn Store>,
    path: web::Path<String>,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    log::info!("✏️  PUT /users/{}/profile", user_id);

    let user = user_service::update_profile(db.get_ref(), &user_id, body.into_inner())
        .await
        .map_err(|e| log_failure("update profile", e))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "user": UserResponse::from(user)
    })))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/avatar",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateAvatarRequest,
    responses(
        (status = 200, description = "Avatar path stored", body = UserResponse),
        (status = 400, description = "Empty avatar path"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_avatar(
    db: web::Data<dyn Store>,
    path: web::Path<String>,
    body: web::Json<UpdateAvatarRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    log::info!("🖼️  POST /users/{}/avatar", user_id);

    let user = user_service::update_avatar(db.get_ref(), &user_id, &body.avatar)
        .await
        .map_err(|e| log_failure("update avatar", e))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "user": UserResponse::from(user)
    })))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/watch/{video_id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User id"),
        ("video_id" = String, Path, description = "Watched video id")
    ),
    responses(
        (status = 200, description = "Watch event recorded"),
        (status = 404, description = "User or video not found")
    )
)]
pub async fn record_watch(
    db: web::Data<dyn Store>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (user_id, video_id) = path.into_inner();
    log::info!("👀 POST /users/{}/watch/{}", user_id, video_id);

    user_service::record_watch(db.get_ref(), &user_id, &video_id)
        .await
        .map_err(|e| log_failure("record watch", e))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "user_id": user_id,
        "video_id": video_id
    })))
}
