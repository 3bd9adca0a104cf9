//! `SeaORM` Entity for lots table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::StorageLocation;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "lots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    pub lot_code: Option<String>,
    pub source_transaction_id: Option<Uuid>,
    pub received_date: Date,
    pub quantity_received: Decimal,
    pub quantity_remaining: Decimal,
    pub goods_amount: Decimal,
    pub duty_amount: Decimal,
    pub domestic_freight: Decimal,
    pub other_cost: Decimal,
    pub unit_cost: Decimal,
    pub accumulated_warehouse_fee: Decimal,
    pub storage_location: StorageLocation,
    pub memo: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
    #[sea_orm(has_many = "super::warehouse_fee_distributions::Entity")]
    WarehouseFeeDistributions,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::warehouse_fee_distributions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WarehouseFeeDistributions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
