use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::daily_record;

/// A day-level expense outside of driver fuel, e.g. repairs or levies.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub record_id: i32,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
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
}

impl Related<daily_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
