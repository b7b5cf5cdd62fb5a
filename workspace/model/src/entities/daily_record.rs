use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use super::profile;

/// One ledger record per calendar day. Driver entries and expenses hang off
/// this row and are replaced wholesale whenever the day is saved again.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "daily_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The day this record covers. At most one record exists per date.
    #[sea_orm(unique)]
    pub record_date: NaiveDate,
    pub created_by: i32,
    /// Set on every subsequent save of the same day.
    pub updated_by: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "profile::Entity",
        from = "Column::CreatedBy",
        to = "profile::Column::Id",
        on_delete = "Cascade"
    )]
    CreatedByProfile,
    #[sea_orm(
        belongs_to = "profile::Entity",
        from = "Column::UpdatedBy",
        to = "profile::Column::Id",
        on_delete = "SetNull"
    )]
    UpdatedByProfile,
    #[sea_orm(has_many = "super::driver_entry::Entity")]
    DriverEntry,
    #[sea_orm(has_many = "super::expense::Entity")]
    Expense,
    #[sea_orm(has_many = "super::notification_log::Entity")]
    NotificationLog,
}

impl Related<super::driver_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DriverEntry.def()
    }
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expense.def()
    }
}

impl Related<super::notification_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NotificationLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
