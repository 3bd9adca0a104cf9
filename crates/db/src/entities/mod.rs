//! `SeaORM` entity definitions.

pub mod lots;
pub mod products;
pub mod sea_orm_active_enums;
pub mod warehouse_fee_distributions;
pub mod warehouse_fees;
