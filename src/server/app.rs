use anyhow::{anyhow, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::runner::TaskRunner;
use crate::services::VersionService;

use super::handlers::{health, jobs, staging, versions};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub runner: TaskRunner,
    pub config: Config,
}

pub async fn create_app(
    db: DatabaseConnection,
    config: Config,
    cors_origin: Option<&str>,
) -> Result<Router> {
    let runner = TaskRunner::start(
        db.clone(),
        config.task_soft_timeout,
        config.task_hard_timeout,
    );

    // Periodic retention sweep for staging rows of MIGRATED versions
    {
        let sweep_service = VersionService::new(db.clone());
        let retention_days = config.promotion_retention_days;
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(24 * 60 * 60));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            // Skip the first immediate tick to avoid blocking startup
            interval.tick().await;

            loop {
                interval.tick().await;
                match sweep_service.sweep_migrated(retention_days).await {
                    Ok(0) => tracing::debug!("retention sweep: nothing to do"),
                    Ok(swept) => info!("retention sweep removed {} staging subtrees", swept),
                    Err(e) => tracing::error!("retention sweep failed: {}", e),
                }
            }
        });
    }

    let state = AppState {
        db,
        runner,
        config: config.clone(),
    };

    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<axum::http::HeaderValue>()
                    .map_err(|e| anyhow!("Invalid CORS origin: {}", e))?,
            )
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any),
    };

    let app = Router::new()
        // Health check endpoint
        .route("/health", get(health::health_check))
        // Version lifecycle
        .route(
            "/api/versions",
            post(versions::create_version).get(versions::list_versions),
        )
        .route(
            "/api/versions/:id",
            get(versions::get_version).delete(versions::delete_version),
        )
        .route("/api/versions/:id/upload", post(versions::upload_workbook))
        .route("/api/versions/:id/approve", post(versions::approve_version))
        .route("/api/versions/:id/reject", post(versions::reject_version))
        .route("/api/versions/:id/promote", post(versions::promote_version))
        // Staging reads and operator corrections
        .route(
            "/api/versions/:id/brands",
            get(staging::list_brands).post(staging::create_brand),
        )
        .route(
            "/api/versions/:id/brands/:brand_id/vehicle-lines",
            post(staging::create_vehicle_line),
        )
        .route(
            "/api/versions/:id/vehicle-lines/:line_id/models",
            post(staging::create_model),
        )
        .route(
            "/api/versions/:id/models/:model_id/trims",
            post(staging::create_trim),
        )
        .route(
            "/api/versions/:id/trims/:trim_id/options",
            post(staging::create_option),
        )
        .route(
            "/api/brands/:id",
            get(staging::get_brand)
                .put(staging::update_brand)
                .delete(staging::delete_brand),
        )
        .route(
            "/api/brands/:id/vehicle-lines",
            get(staging::list_vehicle_lines),
        )
        .route(
            "/api/vehicle-lines/:id",
            get(staging::get_vehicle_line)
                .put(staging::update_vehicle_line)
                .delete(staging::delete_vehicle_line),
        )
        .route("/api/vehicle-lines/:id/models", get(staging::list_models))
        .route(
            "/api/models/:id",
            get(staging::get_model)
                .put(staging::update_model)
                .delete(staging::delete_model),
        )
        .route("/api/models/:id/trims", get(staging::list_trims))
        .route(
            "/api/trims/:id",
            get(staging::get_trim)
                .put(staging::update_trim)
                .delete(staging::delete_trim),
        )
        .route("/api/trims/:id/options", get(staging::list_options))
        .route(
            "/api/options/:id",
            get(staging::get_option)
                .put(staging::update_option)
                .delete(staging::delete_option),
        )
        // Jobs
        .route("/api/jobs", get(jobs::list_jobs))
        .route("/api/jobs/:id", get(jobs::get_job))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}

/// Bind and serve until the process is stopped.
pub async fn serve(
    db: DatabaseConnection,
    config: Config,
    port: u16,
    cors_origin: Option<&str>,
) -> Result<()> {
    let app = create_app(db, config, cors_origin).await?;

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("showroom listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
