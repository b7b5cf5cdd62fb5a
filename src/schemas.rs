use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::handlers::notifications::{DispatchReportRequest, DispatchReportResponse};
use crate::handlers::records::{
    DailyRecordResponse, DayTotalsResponse, DriverEntryResponse, DriverRowRequest,
    ExpenseResponse, ExpenseRowRequest, SaveDailyRecordRequest,
};
use crate::handlers::reports::{
    DailyBreakdownResponse, DashboardQuery, DashboardSummaryResponse, DriverSummaryResponse,
    RangeReportResponse, ReportQuery,
};
use crate::handlers::session::{ProfileResponse, SessionResponse};
use crate::handlers::users::{
    AssignRoleRequest, RoleBindingResponse, UserListQuery, UserWithRoleResponse,
};
use crate::mailer::Mailer;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Cache for aggregated reports
    pub cache: Cache<String, CachedData>,
    /// Outbound email delivery
    pub mailer: Arc<dyn Mailer>,
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    Report(RangeReportResponse),
    Dashboard(DashboardSummaryResponse),
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::session::get_session,
        crate::handlers::records::get_daily_record,
        crate::handlers::records::save_daily_record,
        crate::handlers::reports::get_range_report,
        crate::handlers::reports::export_range_report,
        crate::handlers::reports::get_dashboard_summary,
        crate::handlers::users::list_users,
        crate::handlers::users::assign_role,
        crate::handlers::users::remove_role,
        crate::handlers::notifications::dispatch_daily_report,
    ),
    components(
        schemas(
            ApiResponse<DailyRecordResponse>,
            ApiResponse<RangeReportResponse>,
            ApiResponse<DashboardSummaryResponse>,
            ApiResponse<SessionResponse>,
            ApiResponse<Vec<UserWithRoleResponse>>,
            ApiResponse<RoleBindingResponse>,
            ApiResponse<DispatchReportResponse>,
            ApiResponse<String>,
            ErrorResponse,
            HealthResponse,
            DailyRecordResponse,
            DriverEntryResponse,
            ExpenseResponse,
            DayTotalsResponse,
            SaveDailyRecordRequest,
            DriverRowRequest,
            ExpenseRowRequest,
            RangeReportResponse,
            DailyBreakdownResponse,
            DriverSummaryResponse,
            DashboardSummaryResponse,
            ReportQuery,
            DashboardQuery,
            SessionResponse,
            ProfileResponse,
            UserWithRoleResponse,
            AssignRoleRequest,
            RoleBindingResponse,
            UserListQuery,
            DispatchReportRequest,
            DispatchReportResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "session", description = "Current session introspection"),
        (name = "records", description = "Daily delivery record endpoints"),
        (name = "reports", description = "Range reports and CSV export"),
        (name = "dashboard", description = "Month-to-date dashboard summary"),
        (name = "users", description = "User and role management endpoints"),
        (name = "notifications", description = "Daily report dispatch endpoints"),
    ),
    info(
        title = "Aquadesk API",
        description = "Bottled Water Delivery Back Office API - daily delivery records, role-gated reporting, and report dispatch",
        version = "0.1.0",
        contact(
            name = "Aquadesk Team",
            email = "contact@aquadesk.app"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
