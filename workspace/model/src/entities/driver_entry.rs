use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::daily_record;

/// One driver's deliveries for a day: bags dropped off, the sales they
/// brought in, and the fuel they burned. Net is derived downstream as
/// sales minus fuel and is never stored.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "driver_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub record_id: i32,
    pub driver_name: String,
    pub bags_delivered: i32,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub sales_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub fuel_cost: Decimal,
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
