//! `SeaORM` Entity for warehouse_fees table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::WarehouseFeeStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "warehouse_fees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub year_month: String,
    pub total_fee: Decimal,
    pub status: WarehouseFeeStatus,
    pub distributed_at: Option<DateTimeWithTimeZone>,
    pub total_value_at_distribution: Option<Decimal>,
    pub lot_count_at_distribution: Option<i32>,
    pub memo: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::warehouse_fee_distributions::Entity")]
    WarehouseFeeDistributions,
}

impl Related<super::warehouse_fee_distributions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WarehouseFeeDistributions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
