mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::database::Store;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load configuration (.env + environment)
    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("🚀 Starting Video Platform Service...");

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&config.database_url).await.map_err(|e| {
        log::error!("❌ Failed to connect to MongoDB: {}", e);
        io::Error::new(io::ErrorKind::Other, e.to_string())
    })?;

    log::info!("✅ MongoDB connected successfully");

    let store: Arc<dyn Store> = Arc::new(db);
    let db_data: web::Data<dyn Store> = web::Data::from(store);
    let config_data = web::Data::new(config.clone());

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", config.host, config.port);

    let cors_origin = config.cors_origin.clone();

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
                actix_web::http::header::CACHE_CONTROL,
            ])
            .expose_headers(vec![actix_web::http::header::CONTENT_TYPE])
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(config_data.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(middleware::RequestMetrics)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi),
            )
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
