use crate::access::{require_page, AdminPage};
use crate::auth::Session;
use crate::helpers::report::{load_day, DayRecord};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use ledger::{aggregate_day, DayTotals};
use model::entities::{daily_record, driver_entry, expense};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Request body for saving one day's ledger. Saving replaces the whole day.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SaveDailyRecordRequest {
    /// Driver rows for the day; rows without a driver name are dropped
    pub drivers: Vec<DriverRowRequest>,
    /// Day-level expenses; rows without a description or a positive amount are dropped
    pub expenses: Vec<ExpenseRowRequest>,
}

/// One driver's row in a save request
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DriverRowRequest {
    /// Driver name as typed; reports group by exact spelling
    pub driver_name: String,
    /// Bags of water delivered
    pub bags_delivered: i32,
    /// Gross sales amount
    pub sales_amount: Decimal,
    /// Fuel cost for the route
    pub fuel_cost: Decimal,
}

/// One expense row in a save request
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ExpenseRowRequest {
    /// What the money was spent on
    pub description: String,
    /// Amount spent
    pub amount: Decimal,
}

/// Driver entry response model
#[derive(Debug, Serialize, ToSchema)]
pub struct DriverEntryResponse {
    pub id: i32,
    pub driver_name: String,
    pub bags_delivered: i32,
    pub sales_amount: Decimal,
    pub fuel_cost: Decimal,
}

impl From<driver_entry::Model> for DriverEntryResponse {
    fn from(model: driver_entry::Model) -> Self {
        Self {
            id: model.id,
            driver_name: model.driver_name,
            bags_delivered: model.bags_delivered,
            sales_amount: model.sales_amount.normalize(),
            fuel_cost: model.fuel_cost.normalize(),
        }
    }
}

/// Expense response model
#[derive(Debug, Serialize, ToSchema)]
pub struct ExpenseResponse {
    pub id: i32,
    pub description: String,
    pub amount: Decimal,
}

impl From<expense::Model> for ExpenseResponse {
    fn from(model: expense::Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
            amount: model.amount.normalize(),
        }
    }
}

/// Derived totals for one day
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DayTotalsResponse {
    pub bags: i64,
    pub sales: Decimal,
    pub fuel: Decimal,
    pub other_expenses: Decimal,
    /// Sales minus fuel minus other expenses
    pub net: Decimal,
}

impl From<DayTotals> for DayTotalsResponse {
    fn from(totals: DayTotals) -> Self {
        Self {
            bags: totals.bags,
            sales: totals.sales.normalize(),
            fuel: totals.fuel.normalize(),
            other_expenses: totals.other_expenses.normalize(),
            net: totals.net.normalize(),
        }
    }
}

/// A stored day with its rows and derived totals
#[derive(Debug, Serialize, ToSchema)]
pub struct DailyRecordResponse {
    pub id: i32,
    /// Calendar date the record covers (YYYY-MM-DD)
    pub record_date: NaiveDate,
    pub drivers: Vec<DriverEntryResponse>,
    pub expenses: Vec<ExpenseResponse>,
    pub totals: DayTotalsResponse,
}

impl DailyRecordResponse {
    fn from_parts(day: DayRecord, totals: DayTotals) -> Self {
        Self {
            id: day.record.id,
            record_date: day.record.record_date,
            drivers: day
                .entries
                .into_iter()
                .map(DriverEntryResponse::from)
                .collect(),
            expenses: day
                .expenses
                .into_iter()
                .map(ExpenseResponse::from)
                .collect(),
            totals: DayTotalsResponse::from(totals),
        }
    }
}

/// Get the record for a calendar date
#[utoipa::path(
    get,
    path = "/api/v1/records/{date}",
    tag = "records",
    responses(
        (status = 200, description = "Daily record retrieved successfully", body = ApiResponse<DailyRecordResponse>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 404, description = "No record for this date", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_daily_record(
    session: Session,
    Path(date): Path<NaiveDate>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DailyRecordResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_daily_record function");
    require_page(&session, AdminPage::SalesEntry)?;
    debug!("Loading daily record for {}", date);

    match load_day(&state.db, date).await {
        Ok(Some(day)) => {
            debug!(
                "Daily record for {} has {} driver row(s) and {} expense row(s)",
                date,
                day.entries.len(),
                day.expenses.len()
            );
            let totals = aggregate_day(&day.entries, &day.expenses);
            let response = ApiResponse {
                data: DailyRecordResponse::from_parts(day, totals),
                message: "Daily record retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            debug!("No daily record exists for {}", date);
            let error_response = ErrorResponse {
                error: format!("No record exists for {}", date),
                code: "NO_RECORD".to_string(),
                success: false,
            };
            Err((StatusCode::NOT_FOUND, Json(error_response)))
        }
        Err(db_error) => {
            error!("Failed to load daily record for {}: {}", date, db_error);
            let error_response = ErrorResponse {
                error: "Failed to load daily record".to_string(),
                code: "DATABASE_ERROR".to_string(),
                success: false,
            };
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)))
        }
    }
}

/// Save the record for a calendar date, replacing any previous rows
#[utoipa::path(
    put,
    path = "/api/v1/records/{date}",
    tag = "records",
    request_body = SaveDailyRecordRequest,
    responses(
        (status = 200, description = "Daily record saved successfully", body = ApiResponse<DailyRecordResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Access denied", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn save_daily_record(
    session: Session,
    Path(date): Path<NaiveDate>,
    State(state): State<AppState>,
    Json(request): Json<SaveDailyRecordRequest>,
) -> Result<Json<ApiResponse<DailyRecordResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering save_daily_record function");
    require_page(&session, AdminPage::SalesEntry)?;
    debug!(
        "Saving daily record for {} with {} driver row(s) and {} expense row(s)",
        date,
        request.drivers.len(),
        request.expenses.len()
    );

    // Drop blank rows before anything touches the database
    let drivers: Vec<DriverRowRequest> = request
        .drivers
        .into_iter()
        .filter(|row| !row.driver_name.trim().is_empty())
        .collect();
    let expenses: Vec<ExpenseRowRequest> = request
        .expenses
        .into_iter()
        .filter(|row| !row.description.trim().is_empty() && row.amount > Decimal::ZERO)
        .collect();

    if drivers.is_empty() {
        warn!(
            "Rejected save for {}: no driver entries left after dropping blank rows",
            date
        );
        let error_response = ErrorResponse {
            error: "At least one driver entry with a driver name is required".to_string(),
            code: "NO_DRIVER_ENTRIES".to_string(),
            success: false,
        };
        return Err((StatusCode::BAD_REQUEST, Json(error_response)));
    }

    for row in &drivers {
        if row.bags_delivered < 0
            || row.sales_amount < Decimal::ZERO
            || row.fuel_cost < Decimal::ZERO
        {
            warn!(
                "Rejected save for {}: negative amount in row for driver '{}'",
                date, row.driver_name
            );
            let error_response = ErrorResponse {
                error: format!("Driver row '{}' contains a negative amount", row.driver_name),
                code: "NEGATIVE_AMOUNT".to_string(),
                success: false,
            };
            return Err((StatusCode::BAD_REQUEST, Json(error_response)));
        }
    }

    // The whole day replaces atomically or not at all
    trace!("Beginning save transaction for {}", date);
    let txn = match state.db.begin().await {
        Ok(txn) => txn,
        Err(db_error) => {
            error!("Failed to open save transaction for {}: {}", date, db_error);
            let error_response = ErrorResponse {
                error: "Failed to save daily record".to_string(),
                code: "DATABASE_ERROR".to_string(),
                success: false,
            };
            return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)));
        }
    };

    let existing = match daily_record::Entity::find()
        .filter(daily_record::Column::RecordDate.eq(date))
        .one(&txn)
        .await
    {
        Ok(existing) => existing,
        Err(db_error) => {
            error!("Failed to look up record for {}: {}", date, db_error);
            let error_response = ErrorResponse {
                error: "Failed to save daily record".to_string(),
                code: "DATABASE_ERROR".to_string(),
                success: false,
            };
            return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)));
        }
    };

    let record = match existing {
        Some(record) => {
            debug!(
                "Replacing existing record {} for {} on behalf of profile {}",
                record.id, date, session.profile.id
            );

            // Clear the previous rows, then stamp the editor
            if let Err(db_error) = driver_entry::Entity::delete_many()
                .filter(driver_entry::Column::RecordId.eq(record.id))
                .exec(&txn)
                .await
            {
                error!(
                    "Failed to clear driver entries for record {}: {}",
                    record.id, db_error
                );
                let error_response = ErrorResponse {
                    error: "Failed to save daily record".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                };
                return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)));
            }
            if let Err(db_error) = expense::Entity::delete_many()
                .filter(expense::Column::RecordId.eq(record.id))
                .exec(&txn)
                .await
            {
                error!(
                    "Failed to clear expenses for record {}: {}",
                    record.id, db_error
                );
                let error_response = ErrorResponse {
                    error: "Failed to save daily record".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                };
                return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)));
            }

            let mut updated: daily_record::ActiveModel = record.into();
            updated.updated_by = Set(Some(session.profile.id));
            match updated.update(&txn).await {
                Ok(record) => record,
                Err(db_error) => {
                    error!("Failed to update record for {}: {}", date, db_error);
                    let error_response = ErrorResponse {
                        error: "Failed to save daily record".to_string(),
                        code: "DATABASE_ERROR".to_string(),
                        success: false,
                    };
                    return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)));
                }
            }
        }
        None => {
            debug!(
                "Creating record for {} on behalf of profile {}",
                date, session.profile.id
            );
            let fresh = daily_record::ActiveModel {
                record_date: Set(date),
                created_by: Set(session.profile.id),
                ..Default::default()
            };
            match fresh.insert(&txn).await {
                Ok(record) => record,
                Err(db_error) => {
                    error!("Failed to create record for {}: {}", date, db_error);
                    let error_response = ErrorResponse {
                        error: "Failed to save daily record".to_string(),
                        code: "DATABASE_ERROR".to_string(),
                        success: false,
                    };
                    return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)));
                }
            }
        }
    };

    let driver_models: Vec<driver_entry::ActiveModel> = drivers
        .into_iter()
        .map(|row| driver_entry::ActiveModel {
            record_id: Set(record.id),
            driver_name: Set(row.driver_name.trim().to_string()),
            bags_delivered: Set(row.bags_delivered),
            sales_amount: Set(row.sales_amount),
            fuel_cost: Set(row.fuel_cost),
            ..Default::default()
        })
        .collect();

    if let Err(db_error) = driver_entry::Entity::insert_many(driver_models)
        .exec(&txn)
        .await
    {
        error!(
            "Failed to insert driver entries for record {}: {}",
            record.id, db_error
        );
        let error_response = ErrorResponse {
            error: "Failed to save daily record".to_string(),
            code: "DATABASE_ERROR".to_string(),
            success: false,
        };
        return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)));
    }

    if !expenses.is_empty() {
        let expense_models: Vec<expense::ActiveModel> = expenses
            .into_iter()
            .map(|row| expense::ActiveModel {
                record_id: Set(record.id),
                description: Set(row.description.trim().to_string()),
                amount: Set(row.amount),
                ..Default::default()
            })
            .collect();

        if let Err(db_error) = expense::Entity::insert_many(expense_models).exec(&txn).await {
            error!(
                "Failed to insert expenses for record {}: {}",
                record.id, db_error
            );
            let error_response = ErrorResponse {
                error: "Failed to save daily record".to_string(),
                code: "DATABASE_ERROR".to_string(),
                success: false,
            };
            return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)));
        }
    }

    trace!("Committing save transaction for {}", date);
    if let Err(db_error) = txn.commit().await {
        error!("Failed to commit save transaction for {}: {}", date, db_error);
        let error_response = ErrorResponse {
            error: "Failed to save daily record".to_string(),
            code: "DATABASE_ERROR".to_string(),
            success: false,
        };
        return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)));
    }

    // Any cached report or dashboard may now be stale
    state.cache.invalidate_all();
    info!("Daily record for {} saved as record {}", date, record.id);

    match load_day(&state.db, date).await {
        Ok(Some(day)) => {
            let totals = aggregate_day(&day.entries, &day.expenses);
            let response = ApiResponse {
                data: DailyRecordResponse::from_parts(day, totals),
                message: "Daily record saved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            error!("Record for {} disappeared between commit and reload", date);
            let error_response = ErrorResponse {
                error: "Failed to reload saved record".to_string(),
                code: "DATABASE_ERROR".to_string(),
                success: false,
            };
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)))
        }
        Err(db_error) => {
            error!("Failed to reload saved record for {}: {}", date, db_error);
            let error_response = ErrorResponse {
                error: "Failed to reload saved record".to_string(),
                code: "DATABASE_ERROR".to_string(),
                success: false,
            };
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)))
        }
    }
}
