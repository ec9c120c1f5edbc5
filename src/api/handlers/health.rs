//! Health check endpoints for monitoring and orchestrator probes.
//!
//! The database is probed directly through the pool so that a broken
//! service layer cannot mask connectivity problems.

use std::collections::BTreeMap;
use std::time::Instant;

use axum::{Json, extract::State, http::StatusCode};
use diesel_async::RunQueryDsl;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{ComponentHealth, HealthResponse, HealthStatus};
use crate::state::AppState;

/// - `GET /health` full report
/// - `GET /health/ready` readiness probe
/// - `GET /health/live` liveness probe
pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .routes(routes!(readiness_check))
        .routes(routes!(liveness_check))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Healthy or degraded", body = HealthResponse),
        (status = 503, description = "A required dependency is down", body = HealthResponse)
    )
)]
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let mut checks = BTreeMap::new();
    checks.insert("database".to_string(), check_database(&state).await);
    checks.insert("storage".to_string(), check_storage(&state));

    let report = HealthResponse::from_checks(crate::pkg_version(), checks);
    (status_code(report.status), Json(report))
}

#[utoipa::path(
    get,
    path = "/health/ready",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Ready to serve traffic"),
        (status = 503, description = "Database unreachable")
    )
)]
async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match check_database(&state).await.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded | HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

#[utoipa::path(
    get,
    path = "/health/live",
    tag = HEALTH_TAG,
    responses((status = 200, description = "Process is alive"))
)]
async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

fn status_code(status: HealthStatus) -> StatusCode {
    match status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

async fn check_database(state: &AppState) -> ComponentHealth {
    let start = Instant::now();
    let health = match state.db_pool.get().await {
        Ok(mut conn) => match diesel::sql_query("SELECT 1").execute(&mut conn).await {
            Ok(_) => ComponentHealth::new(HealthStatus::Healthy, "Connected"),
            Err(e) => ComponentHealth::new(HealthStatus::Unhealthy, format!("Query failed: {}", e)),
        },
        Err(e) => {
            ComponentHealth::new(HealthStatus::Unhealthy, format!("Connection failed: {}", e))
        }
    };
    health.timed(start.elapsed().as_millis() as u64)
}

/// Uploads are optional, so a disabled backend only degrades the service.
fn check_storage(state: &AppState) -> ComponentHealth {
    let backend = state.storage.backend_name();
    if backend == "disabled" {
        ComponentHealth::new(HealthStatus::Degraded, "Image uploads are disabled")
    } else {
        ComponentHealth::new(HealthStatus::Healthy, backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness_check() {
        assert_eq!(liveness_check().await, StatusCode::OK);
    }

    #[test]
    fn test_only_unhealthy_is_unavailable() {
        assert_eq!(status_code(HealthStatus::Healthy), StatusCode::OK);
        assert_eq!(status_code(HealthStatus::Degraded), StatusCode::OK);
        assert_eq!(
            status_code(HealthStatus::Unhealthy),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
