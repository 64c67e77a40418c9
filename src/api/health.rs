use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::database::Store;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub database: String,
    pub timestamp: i64,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and database are reachable", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(db: web::Data<dyn Store>) -> HttpResponse {
    let (status, database) = match db.ping().await {
        Ok(()) => ("healthy", "up".to_string()),
        Err(e) => {
            log::error!("❌ Health check: database unreachable - {}", e);
            ("degraded", "down".to_string())
        }
    };

    let body = HealthResponse {
        status: status.to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        timestamp: chrono::Utc::now().timestamp(),
    };

    if status == "healthy" {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
