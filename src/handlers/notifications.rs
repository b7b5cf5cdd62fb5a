use crate::access::{require_page, AdminPage};
use crate::auth::Session;
use crate::helpers::email::{daily_report_html, daily_report_subject};
use crate::helpers::report::load_day;
use crate::mailer::MailerError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{NaiveDate, Utc};
use ledger::aggregate_day;
use model::entities::{notification_log, profile, user_role, user_role::Role};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

pub const DAILY_REPORT_NOTIFICATION: &str = "daily_report_email";

/// Request body for dispatching a day's summary email
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DispatchReportRequest {
    /// Date of the record to dispatch (YYYY-MM-DD)
    pub record_date: NaiveDate,
}

/// Outcome of a dispatch request
#[derive(Debug, Serialize, ToSchema)]
pub struct DispatchReportResponse {
    pub record_date: NaiveDate,
    /// Whether an email actually went out
    pub sent: bool,
    /// Addresses the report went to, in the order they were found
    pub recipients: Vec<String>,
}

/// Looks up the current super admin emails. This always hits the database,
/// so a role granted a moment ago is already included.
async fn super_admin_emails(db: &sea_orm::DatabaseConnection) -> Result<Vec<String>, sea_orm::DbErr> {
    let bindings = user_role::Entity::find()
        .filter(user_role::Column::Role.eq(Role::SuperAdmin))
        .all(db)
        .await?;

    if bindings.is_empty() {
        return Ok(Vec::new());
    }

    let profile_ids: Vec<i32> = bindings.iter().map(|binding| binding.profile_id).collect();
    let profiles = profile::Entity::find()
        .filter(profile::Column::Id.is_in(profile_ids))
        .all(db)
        .await?;

    Ok(profiles.into_iter().map(|profile| profile.email).collect())
}

/// Email the daily summary for a recorded date to every super admin
#[utoipa::path(
    post,
    path = "/api/v1/reports/dispatch",
    tag = "notifications",
    request_body = DispatchReportRequest,
    responses(
        (status = 200, description = "Report dispatched, or skipped because no recipients exist", body = ApiResponse<DispatchReportResponse>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "No record for this date", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
        (status = 502, description = "Email delivery failed", body = ErrorResponse),
        (status = 503, description = "Mailer is not configured", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn dispatch_daily_report(
    session: Session,
    State(state): State<AppState>,
    Json(request): Json<DispatchReportRequest>,
) -> Result<Json<ApiResponse<DispatchReportResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering dispatch_daily_report function");
    require_page(&session, AdminPage::Dashboard)?;
    let date = request.record_date;
    debug!(
        "Dispatching daily report for {} on behalf of profile {}",
        date, session.profile.id
    );

    let day = match load_day(&state.db, date).await {
        Ok(Some(day)) => day,
        Ok(None) => {
            warn!("No record to dispatch for {}", date);
            let error_response = ErrorResponse {
                error: format!("No record exists for {}", date),
                code: "NO_RECORD".to_string(),
                success: false,
            };
            return Err((StatusCode::NOT_FOUND, Json(error_response)));
        }
        Err(db_error) => {
            error!("Failed to load record for {}: {}", date, db_error);
            let error_response = ErrorResponse {
                error: "Failed to dispatch daily report".to_string(),
                code: "DATABASE_ERROR".to_string(),
                success: false,
            };
            return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)));
        }
    };

    let recipients = match super_admin_emails(&state.db).await {
        Ok(recipients) => recipients,
        Err(db_error) => {
            error!("Failed to look up super admin recipients: {}", db_error);
            let error_response = ErrorResponse {
                error: "Failed to dispatch daily report".to_string(),
                code: "DATABASE_ERROR".to_string(),
                success: false,
            };
            return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)));
        }
    };

    // No recipients means no send attempt and no notification log entry
    if recipients.is_empty() {
        info!("No super admin recipients for {}; skipping dispatch", date);
        let response = ApiResponse {
            data: DispatchReportResponse {
                record_date: date,
                sent: false,
                recipients: Vec::new(),
            },
            message: "No super admin recipients configured".to_string(),
            success: true,
        };
        return Ok(Json(response));
    }

    let totals = aggregate_day(&day.entries, &day.expenses);
    let subject = daily_report_subject(date);
    let html = daily_report_html(date, &totals, &day.entries, &day.expenses);

    trace!(
        "Sending daily report for {} to {} recipient(s)",
        date,
        recipients.len()
    );
    if let Err(mail_error) = state.mailer.send(&recipients, &subject, &html).await {
        return Err(match mail_error {
            MailerError::NotConfigured(reason) => {
                warn!("Dispatch for {} skipped: {}", date, reason);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ErrorResponse {
                        error: format!("Mailer is not configured: {}", reason),
                        code: "EMAIL_NOT_CONFIGURED".to_string(),
                        success: false,
                    }),
                )
            }
            mail_error => {
                error!("Failed to deliver daily report for {}: {}", date, mail_error);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(ErrorResponse {
                        error: "Failed to deliver daily report email".to_string(),
                        code: "EMAIL_DELIVERY_FAILED".to_string(),
                        success: false,
                    }),
                )
            }
        });
    }

    // The send is confirmed, so the dispatch gets logged
    let log_entry = notification_log::ActiveModel {
        record_id: Set(day.record.id),
        notification_type: Set(DAILY_REPORT_NOTIFICATION.to_string()),
        recipients: Set(json!(recipients)),
        sent_by: Set(session.profile.id),
        sent_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    if let Err(db_error) = log_entry.insert(&state.db).await {
        error!(
            "Daily report for {} was sent but logging failed: {}",
            date, db_error
        );
        let error_response = ErrorResponse {
            error: "Report was sent but could not be logged".to_string(),
            code: "DATABASE_ERROR".to_string(),
            success: false,
        };
        return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)));
    }

    info!(
        "Daily report for {} sent to {} recipient(s)",
        date,
        recipients.len()
    );
    let response = ApiResponse {
        data: DispatchReportResponse {
            record_date: date,
            sent: true,
            recipients,
        },
        message: "Daily report sent successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
