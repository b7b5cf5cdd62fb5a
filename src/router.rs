use crate::handlers::{
    health::health_check,
    notifications::dispatch_daily_report,
    records::{get_daily_record, save_daily_record},
    reports::{export_range_report, get_dashboard_summary, get_range_report},
    session::get_session,
    users::{assign_role, list_users, remove_role},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Session introspection
        .route("/api/v1/session", get(get_session))
        // Daily record routes
        .route("/api/v1/records/:date", get(get_daily_record))
        .route("/api/v1/records/:date", put(save_daily_record))
        // Dashboard summary
        .route("/api/v1/dashboard", get(get_dashboard_summary))
        // Reporting routes
        .route("/api/v1/reports", get(get_range_report))
        .route("/api/v1/reports/export", get(export_range_report))
        .route("/api/v1/reports/dispatch", post(dispatch_daily_report))
        // User and role management routes
        .route("/api/v1/users", get(list_users))
        .route("/api/v1/users/:profile_id/role", put(assign_role))
        .route("/api/v1/users/:profile_id/role", delete(remove_role))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
