//! `SeaORM` Entity for warehouse_fee_distributions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "warehouse_fee_distributions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub warehouse_fee_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub lot_id: Uuid,
    pub quantity_at_time: Decimal,
    pub value_at_time: Decimal,
    pub value_ratio: Decimal,
    pub distributed_fee: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::warehouse_fees::Entity",
        from = "Column::WarehouseFeeId",
        to = "super::warehouse_fees::Column::Id"
    )]
    WarehouseFees,
    #[sea_orm(
        belongs_to = "super::lots::Entity",
        from = "Column::LotId",
        to = "super::lots::Column::Id"
    )]
    Lots,
}

impl Related<super::warehouse_fees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WarehouseFees.def()
    }
}

impl Related<super::lots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
