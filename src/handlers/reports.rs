use crate::access::{require_page, AdminPage};
use crate::auth::Session;
use crate::handlers::records::DayTotalsResponse;
use crate::helpers::report::load_recorded_days;
use crate::schemas::{ApiResponse, AppState, CachedData, ErrorResponse};
use axum::{
    extract::{Query, State},
    http::{header, HeaderName, StatusCode},
    response::Json,
};
use chrono::{NaiveDate, Utc};
use ledger::{
    aggregate_range, delimited_table, export_filename, month_span, DateSpan, DriverTotals,
    RangeReport,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for range reports and exports
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ReportQuery {
    /// First day of the range, inclusive (YYYY-MM-DD)
    pub start_date: NaiveDate,
    /// Last day of the range, inclusive (YYYY-MM-DD)
    pub end_date: NaiveDate,
}

/// Query parameters for the dashboard summary
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct DashboardQuery {
    /// Date whose month to summarize; defaults to today
    pub as_of: Option<NaiveDate>,
}

/// Totals for one recorded day inside a range
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailyBreakdownResponse {
    pub date: NaiveDate,
    pub totals: DayTotalsResponse,
}

/// Per-driver totals across a range
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DriverSummaryResponse {
    pub driver_name: String,
    pub bags: i64,
    pub sales: Decimal,
    pub fuel: Decimal,
    /// Sales minus fuel for this driver
    pub net: Decimal,
}

impl From<DriverTotals> for DriverSummaryResponse {
    fn from(totals: DriverTotals) -> Self {
        let net = totals.net().normalize();
        Self {
            driver_name: totals.driver_name,
            bags: totals.bags,
            sales: totals.sales.normalize(),
            fuel: totals.fuel.normalize(),
            net,
        }
    }
}

/// Aggregated report over an inclusive date range
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RangeReportResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Number of days inside the range that have a record
    pub days_recorded: usize,
    pub totals: DayTotalsResponse,
    /// One row per recorded day, oldest first
    pub per_day: Vec<DailyBreakdownResponse>,
    /// Per-driver totals in order of first appearance
    pub drivers: Vec<DriverSummaryResponse>,
}

impl RangeReportResponse {
    fn from_parts(span: &DateSpan, report: RangeReport) -> Self {
        Self {
            start_date: span.start,
            end_date: span.end,
            days_recorded: report.days_recorded,
            totals: DayTotalsResponse::from(report.totals),
            per_day: report
                .per_day
                .into_iter()
                .map(|day| DailyBreakdownResponse {
                    date: day.date,
                    totals: DayTotalsResponse::from(day.totals),
                })
                .collect(),
            drivers: report
                .driver_summary
                .into_iter()
                .map(DriverSummaryResponse::from)
                .collect(),
        }
    }
}

/// Month-to-date dashboard summary
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardSummaryResponse {
    /// First day of the month under view
    pub month_start: NaiveDate,
    /// Last day of the month under view
    pub month_end: NaiveDate,
    pub days_recorded: usize,
    pub totals: DayTotalsResponse,
    /// Fuel plus other expenses
    pub total_expenses: Decimal,
}

fn invalid_date_range(
    start: NaiveDate,
    end: NaiveDate,
) -> (StatusCode, Json<ErrorResponse>) {
    warn!("Rejected report span from {} to {}", start, end);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: format!("Invalid date span: {} to {}", start, end),
            code: "INVALID_DATE_RANGE".to_string(),
            success: false,
        }),
    )
}

fn report_database_error() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Failed to build report".to_string(),
            code: "DATABASE_ERROR".to_string(),
            success: false,
        }),
    )
}

/// Get the aggregated report for a date range
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    tag = "reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Range report retrieved successfully", body = ApiResponse<RangeReportResponse>),
        (status = 400, description = "Invalid date range", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_range_report(
    session: Session,
    Query(query): Query<ReportQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RangeReportResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_range_report function");
    require_page(&session, AdminPage::Reports)?;
    debug!(
        "Building range report from {} to {}",
        query.start_date, query.end_date
    );

    let span = match DateSpan::new(query.start_date, query.end_date) {
        Ok(span) => span,
        Err(_) => return Err(invalid_date_range(query.start_date, query.end_date)),
    };

    // Check cache first
    let cache_key = format!("report_{}_{}", span.start, span.end);
    trace!("Checking cache for key: {}", cache_key);
    if let Some(CachedData::Report(cached)) = state.cache.get(&cache_key).await {
        debug!("Returning cached range report for key: {}", cache_key);
        return Ok(Json(ApiResponse {
            data: cached,
            message: "Range report retrieved successfully".to_string(),
            success: true,
        }));
    }

    let days = match load_recorded_days(&state.db, &span).await {
        Ok(days) => days,
        Err(db_error) => {
            error!(
                "Failed to load recorded days between {} and {}: {}",
                span.start, span.end, db_error
            );
            return Err(report_database_error());
        }
    };

    let report = aggregate_range(&days);
    let data = RangeReportResponse::from_parts(&span, report);

    trace!("Caching range report for key: {}", cache_key);
    state
        .cache
        .insert(cache_key, CachedData::Report(data.clone()))
        .await;

    let response = ApiResponse {
        data,
        message: "Range report retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Export the range report as a CSV download
#[utoipa::path(
    get,
    path = "/api/v1/reports/export",
    tag = "reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "CSV table with one row per recorded day and a final TOTAL row", body = String),
        (status = 400, description = "Invalid date range", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn export_range_report(
    session: Session,
    Query(query): Query<ReportQuery>,
    State(state): State<AppState>,
) -> Result<([(HeaderName, String); 2], String), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering export_range_report function");
    require_page(&session, AdminPage::Reports)?;
    debug!(
        "Exporting range report from {} to {}",
        query.start_date, query.end_date
    );

    let span = match DateSpan::new(query.start_date, query.end_date) {
        Ok(span) => span,
        Err(_) => return Err(invalid_date_range(query.start_date, query.end_date)),
    };

    let days = match load_recorded_days(&state.db, &span).await {
        Ok(days) => days,
        Err(db_error) => {
            error!(
                "Failed to load recorded days between {} and {}: {}",
                span.start, span.end, db_error
            );
            return Err(report_database_error());
        }
    };

    let report = aggregate_range(&days);
    let table = delimited_table(&report.per_day, &report.totals);
    let filename = export_filename(span.start, span.end);
    debug!("Prepared export {} with {} data row(s)", filename, report.per_day.len());

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/csv; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        table,
    ))
}

/// Get the dashboard summary for the month containing a date
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Dashboard summary retrieved successfully", body = ApiResponse<DashboardSummaryResponse>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_dashboard_summary(
    session: Session,
    Query(query): Query<DashboardQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardSummaryResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_dashboard_summary function");
    require_page(&session, AdminPage::Dashboard)?;

    // The clock only enters here; everything below works from the pinned date
    let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let span = month_span(as_of);
    debug!(
        "Building dashboard summary for {} (month {} to {})",
        as_of, span.start, span.end
    );

    // Check cache first
    let cache_key = format!("dashboard_{}", as_of);
    trace!("Checking cache for key: {}", cache_key);
    if let Some(CachedData::Dashboard(cached)) = state.cache.get(&cache_key).await {
        debug!("Returning cached dashboard summary for key: {}", cache_key);
        return Ok(Json(ApiResponse {
            data: cached,
            message: "Dashboard summary retrieved successfully".to_string(),
            success: true,
        }));
    }

    let days = match load_recorded_days(&state.db, &span).await {
        Ok(days) => days,
        Err(db_error) => {
            error!(
                "Failed to load recorded days between {} and {}: {}",
                span.start, span.end, db_error
            );
            return Err(report_database_error());
        }
    };

    let report = aggregate_range(&days);
    let total_expenses = (report.totals.fuel + report.totals.other_expenses).normalize();
    let data = DashboardSummaryResponse {
        month_start: span.start,
        month_end: span.end,
        days_recorded: report.days_recorded,
        totals: DayTotalsResponse::from(report.totals),
        total_expenses,
    };

    trace!("Caching dashboard summary for key: {}", cache_key);
    state
        .cache
        .insert(cache_key, CachedData::Dashboard(data.clone()))
        .await;

    let response = ApiResponse {
        data,
        message: "Dashboard summary retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
