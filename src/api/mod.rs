pub mod health;
pub mod metrics;
pub mod recommendations;
pub mod swagger;
pub mod users;
pub mod videos;

use actix_web::{error, web, HttpRequest, ResponseError};

use crate::utils::AppError;

/// Logs a failed operation at a level matching its status and hands the error back
pub(crate) fn log_failure(context: &str, err: AppError) -> AppError {
    if err.status_code().is_server_error() {
        log::error!("❌ Failed to {}: {}", context, err);
    } else {
        log::warn!("⚠️  Failed to {}: {}", context, err);
    }
    err
}

/// Bodies and query strings that fail to deserialize answer with the same
/// `{"success": false, "error": ...}` envelope as every other error
fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log_failure("parse request body", AppError::ValidationFailed(err.to_string())).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log_failure("parse query string", AppError::ValidationFailed(err.to_string())).into()
}

/// Registra todas as rotas HTTP do serviço
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error));

    cfg
        // Health check
        .route("/health", web::get().to(health::health_check))
        // Metrics
        .route("/metrics", web::get().to(metrics::get_metrics))
        // ==================== VIDEOS ====================
        .service(
            web::scope("/api/videos")
                .route("", web::get().to(videos::list_videos))
                .route("", web::post().to(videos::create_video))
                .route("/{id}", web::get().to(videos::get_video))
                .route("/{id}/view", web::post().to(videos::record_view))
                .route("/{id}/like", web::post().to(videos::like_video))
                .route("/{id}/dislike", web::post().to(videos::dislike_video))
                .route("/{id}/comments", web::get().to(videos::list_comments))
                .route("/{id}/comments", web::post().to(videos::add_comment)),
        )
        // ==================== USERS ====================
        .service(
            web::scope("/api/users")
                .route("/register", web::post().to(users::register))
                .route("/profile", web::get().to(users::get_profile_by_username))
                .route("/{id}/profile", web::get().to(users::get_profile))
                .route("/{id}/profile", web::put().to(users::update_profile))
                .route("/{id}/avatar", web::post().to(users::update_avatar))
                .route("/{id}/watch/{video_id}", web::post().to(users::record_watch)),
        )
        // ==================== RECOMMENDATIONS ====================
        .service(
            web::scope("/api/recommendations")
                .route("/{user_id}", web::get().to(recommendations::get_recommendations)),
        );
}
