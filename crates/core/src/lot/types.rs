//! Lot domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use stockwise_shared::types::{LotId, ProductId, SourceTransactionId};

/// Where the physical stock of a lot is held.
///
/// Storage location is metadata only: it never changes costing, and lots
/// in every location accrue warehouse fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorageLocation {
    /// Bonded or rented warehouse.
    Warehouse,
    /// Held at the office.
    Office,
    /// Shipped straight to the customer on arrival.
    DirectDelivery,
    /// Anywhere else.
    Other,
}

impl StorageLocation {
    /// Returns the string representation of the location.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warehouse => "WAREHOUSE",
            Self::Office => "OFFICE",
            Self::DirectDelivery => "DIRECT_DELIVERY",
            Self::Other => "OTHER",
        }
    }

    /// Parses a location from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "WAREHOUSE" => Some(Self::Warehouse),
            "OFFICE" => Some(Self::Office),
            "DIRECT_DELIVERY" => Some(Self::DirectDelivery),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Acquisition cost components of a receipt, in the base currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandedCost {
    /// Price paid for the goods.
    pub goods_amount: Decimal,
    /// Customs duty.
    pub duty_amount: Decimal,
    /// Inland freight from port to storage.
    pub domestic_freight: Decimal,
    /// Any other acquisition cost (insurance, handling, brokerage).
    pub other_cost: Decimal,
}

impl LandedCost {
    /// Sum of all cost components, `None` if it exceeds the decimal range.
    #[must_use]
    pub fn total(&self) -> Option<Decimal> {
        self.goods_amount
            .checked_add(self.duty_amount)?
            .checked_add(self.domestic_freight)?
            .checked_add(self.other_cost)
    }
}

/// A single receipt of a product with its own landed unit cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    /// Lot ID.
    pub id: LotId,
    /// Product the lot belongs to.
    pub product_id: ProductId,
    /// Optional human label (BL number, container number).
    pub lot_code: Option<String>,
    /// Import/export record the lot was registered from.
    pub source_transaction_id: Option<SourceTransactionId>,
    /// Date the goods were received.
    pub received_date: NaiveDate,
    /// Quantity received (immutable).
    pub quantity_received: Decimal,
    /// Quantity still on hand.
    pub quantity_remaining: Decimal,
    /// Cost components (immutable).
    pub costs: LandedCost,
    /// Landed unit cost fixed at creation.
    pub unit_cost: Decimal,
    /// Sum of every warehouse fee distributed to this lot.
    pub accumulated_warehouse_fee: Decimal,
    /// Where the stock is held.
    pub storage_location: StorageLocation,
    /// Free-text memo.
    pub memo: Option<String>,
}

impl Lot {
    /// Landed value of the remaining stock (fees excluded).
    #[must_use]
    pub fn landed_value(&self) -> Decimal {
        self.quantity_remaining * self.unit_cost
    }

    /// Unit cost including absorbed warehouse fees.
    ///
    /// Falls back to the landed unit cost once nothing remains.
    #[must_use]
    pub fn current_unit_cost(&self) -> Decimal {
        if self.quantity_remaining > Decimal::ZERO {
            self.unit_cost + self.accumulated_warehouse_fee / self.quantity_remaining
        } else {
            self.unit_cost
        }
    }

    /// Returns true while stock remains.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.quantity_remaining > Decimal::ZERO
    }

    /// Key of the FIFO consumption order: received date, then id.
    #[must_use]
    pub fn fifo_key(&self) -> (NaiveDate, LotId) {
        (self.received_date, self.id)
    }
}

/// Input for registering a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLotInput {
    /// Product received.
    pub product_id: ProductId,
    /// Optional human label.
    #[serde(default)]
    pub lot_code: Option<String>,
    /// Originating import/export record.
    #[serde(default)]
    pub source_transaction_id: Option<SourceTransactionId>,
    /// Receipt date.
    pub received_date: NaiveDate,
    /// Quantity received, must be positive.
    pub quantity_received: Decimal,
    /// Cost components.
    pub costs: LandedCost,
    /// Where the stock goes.
    pub storage_location: StorageLocation,
    /// Free-text memo.
    #[serde(default)]
    pub memo: Option<String>,
}

/// Filter options for listing lots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LotFilter {
    /// Only lots of this product.
    pub product_id: Option<ProductId>,
    /// Received on or after this date.
    pub received_from: Option<NaiveDate>,
    /// Received on or before this date.
    pub received_to: Option<NaiveDate>,
    /// Only lots held here.
    pub storage_location: Option<StorageLocation>,
    /// Only lots registered from this import/export record.
    pub source_transaction_id: Option<SourceTransactionId>,
    /// Only lots with stock remaining.
    pub open_only: bool,
}

impl LotFilter {
    /// Returns true if the lot passes every set criterion.
    #[must_use]
    pub fn matches(&self, lot: &Lot) -> bool {
        self.product_id.is_none_or(|p| lot.product_id == p)
            && self.received_from.is_none_or(|d| lot.received_date >= d)
            && self.received_to.is_none_or(|d| lot.received_date <= d)
            && self.storage_location.is_none_or(|s| lot.storage_location == s)
            && self
                .source_transaction_id
                .is_none_or(|t| lot.source_transaction_id == Some(t))
            && (!self.open_only || lot.is_open())
    }
}
