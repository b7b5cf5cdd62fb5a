use chrono::NaiveDate;
use ledger::{DateSpan, RecordedDay};
use model::entities::{daily_record, driver_entry, expense};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;
use tracing::debug;

/// One persisted day with its child rows, as stored.
#[derive(Debug, Clone)]
pub struct DayRecord {
    pub record: daily_record::Model,
    pub entries: Vec<driver_entry::Model>,
    pub expenses: Vec<expense::Model>,
}

/// Loads the record for a single calendar date, with driver entries and
/// expenses in insertion order. Returns `None` when no record exists.
pub async fn load_day(
    db: &DatabaseConnection,
    date: NaiveDate,
) -> Result<Option<DayRecord>, DbErr> {
    let Some(record) = daily_record::Entity::find()
        .filter(daily_record::Column::RecordDate.eq(date))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let entries = driver_entry::Entity::find()
        .filter(driver_entry::Column::RecordId.eq(record.id))
        .order_by_asc(driver_entry::Column::Id)
        .all(db)
        .await?;

    let expenses = expense::Entity::find()
        .filter(expense::Column::RecordId.eq(record.id))
        .order_by_asc(expense::Column::Id)
        .all(db)
        .await?;

    Ok(Some(DayRecord {
        record,
        entries,
        expenses,
    }))
}

/// Loads every recorded day inside a span, oldest first, with child rows
/// batch-loaded in two queries rather than one pair per day.
pub async fn load_recorded_days(
    db: &DatabaseConnection,
    span: &DateSpan,
) -> Result<Vec<RecordedDay>, DbErr> {
    let records = daily_record::Entity::find()
        .filter(daily_record::Column::RecordDate.between(span.start, span.end))
        .order_by_asc(daily_record::Column::RecordDate)
        .all(db)
        .await?;

    if records.is_empty() {
        return Ok(Vec::new());
    }

    let record_ids: Vec<i32> = records.iter().map(|record| record.id).collect();

    let mut entries_by_record: HashMap<i32, Vec<driver_entry::Model>> = HashMap::new();
    for entry in driver_entry::Entity::find()
        .filter(driver_entry::Column::RecordId.is_in(record_ids.clone()))
        .order_by_asc(driver_entry::Column::Id)
        .all(db)
        .await?
    {
        entries_by_record.entry(entry.record_id).or_default().push(entry);
    }

    let mut expenses_by_record: HashMap<i32, Vec<expense::Model>> = HashMap::new();
    for row in expense::Entity::find()
        .filter(expense::Column::RecordId.is_in(record_ids))
        .order_by_asc(expense::Column::Id)
        .all(db)
        .await?
    {
        expenses_by_record.entry(row.record_id).or_default().push(row);
    }

    let days: Vec<RecordedDay> = records
        .into_iter()
        .map(|record| RecordedDay {
            date: record.record_date,
            entries: entries_by_record.remove(&record.id).unwrap_or_default(),
            expenses: expenses_by_record.remove(&record.id).unwrap_or_default(),
        })
        .collect();

    debug!(
        "Loaded {} recorded day(s) between {} and {}",
        days.len(),
        span.start,
        span.end
    );
    Ok(days)
}
