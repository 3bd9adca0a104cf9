//! Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `storage_location` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "storage_location")]
pub enum StorageLocation {
    #[sea_orm(string_value = "warehouse")]
    Warehouse,
    #[sea_orm(string_value = "office")]
    Office,
    #[sea_orm(string_value = "direct_delivery")]
    DirectDelivery,
    #[sea_orm(string_value = "other")]
    Other,
}

/// `warehouse_fee_status` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "warehouse_fee_status")]
pub enum WarehouseFeeStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "distributed")]
    Distributed,
}

impl From<stockwise_core::lot::StorageLocation> for StorageLocation {
    fn from(location: stockwise_core::lot::StorageLocation) -> Self {
        use stockwise_core::lot::StorageLocation as Core;
        match location {
            Core::Warehouse => Self::Warehouse,
            Core::Office => Self::Office,
            Core::DirectDelivery => Self::DirectDelivery,
            Core::Other => Self::Other,
        }
    }
}

impl From<StorageLocation> for stockwise_core::lot::StorageLocation {
    fn from(location: StorageLocation) -> Self {
        match location {
            StorageLocation::Warehouse => Self::Warehouse,
            StorageLocation::Office => Self::Office,
            StorageLocation::DirectDelivery => Self::DirectDelivery,
            StorageLocation::Other => Self::Other,
        }
    }
}

impl From<stockwise_core::fee::FeeStatus> for WarehouseFeeStatus {
    fn from(status: stockwise_core::fee::FeeStatus) -> Self {
        match status {
            stockwise_core::fee::FeeStatus::Pending => Self::Pending,
            stockwise_core::fee::FeeStatus::Distributed => Self::Distributed,
        }
    }
}
