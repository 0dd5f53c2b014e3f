//! HTTP route handlers
//!
//! Four endpoints: liveness on `/`, the aggregate health record on
//! `/health`, Prometheus text exposition on `/metrics`, and the generation
//! pipeline on `/generate`.

use crate::core::generation::GenerationRequest;
use crate::core::health::SERVICE_NAME;
use crate::server::state::AppState;
use crate::utils::error::GatewayError;
use actix_web::{HttpResponse, web};
use tracing::{debug, info};

/// Configure all gateway routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root))
        .route("/health", web::get().to(health_check))
        .route("/metrics", web::get().to(metrics))
        .route("/generate", web::post().to(generate_text));
}

/// Liveness endpoint
async fn root() -> HttpResponse {
    info!("Health check endpoint accessed");
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": SERVICE_NAME,
    }))
}

/// Comprehensive health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    debug!("Health check endpoint accessed");
    HttpResponse::Ok().json(state.health.evaluate())
}

/// Prometheus metrics endpoint
async fn metrics(state: web::Data<AppState>) -> Result<HttpResponse, GatewayError> {
    debug!("Metrics endpoint accessed");
    let exposition = state.metrics.render()?;
    Ok(HttpResponse::Ok()
        .content_type(prometheus::TEXT_FORMAT)
        .body(exposition))
}

/// Generate text based on the provided prompt
async fn generate_text(
    state: web::Data<AppState>,
    request: web::Json<GenerationRequest>,
) -> Result<HttpResponse, GatewayError> {
    info!("Generate text endpoint accessed");
    let result = state.handler.generate(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}
