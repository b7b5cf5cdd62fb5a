use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;

use super::{daily_record, profile};

/// Audit row for an outbound notification. Written only after the delivery
/// collaborator confirmed the send.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notification_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub record_id: i32,
    /// Kind of notification, currently always `daily_report_email`.
    pub notification_type: String,
    /// JSON array of recipient email addresses.
    pub recipients: Json,
    pub sent_by: i32,
    pub sent_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "daily_record::Entity",
        from = "Column::RecordId",
        to = "daily_record::Column::Id",
        on_delete = "Cascade"
    )]
    DailyRecord,
    #[sea_orm(
        belongs_to = "profile::Entity",
        from = "Column::SentBy",
        to = "profile::Column::Id",
        on_delete = "Cascade"
    )]
    SentByProfile,
}

impl Related<daily_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyRecord.def()
    }
}

impl Related<profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SentByProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
