//! Warehouse fee domain types.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use stockwise_shared::types::{LotId, WarehouseFeeId};

use super::error::FeeError;

/// A calendar month, the unique key of a warehouse fee.
///
/// Serialized as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a year-month, validating the month and year range.
    ///
    /// # Errors
    ///
    /// Returns `FeeError::InvalidYearMonth` if the month is outside 1..=12
    /// or the year is outside 1..=9999.
    pub fn new(year: i32, month: u32) -> Result<Self, FeeError> {
        if !(1..=12).contains(&month) || !(1..=9999).contains(&year) {
            return Err(FeeError::InvalidYearMonth(format!("{year}-{month}")));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month (1-12).
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = FeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FeeError::InvalidYearMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let digits = |part: &str, len: usize| {
            part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !digits(year, 4) || !digits(month, 2) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for YearMonth {
    type Error = FeeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

/// Persisted status of a warehouse fee.
///
/// The only transition is Pending → Distributed; it is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    /// Declared, may still be edited or deleted.
    Pending,
    /// Allocated to lots, immutable.
    Distributed,
}

impl FeeStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Distributed => "distributed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "distributed" => Some(Self::Distributed),
            _ => None,
        }
    }
}

impl fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Totals captured at the moment a fee was distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionSnapshot {
    /// When the distribution committed.
    pub distributed_at: DateTime<Utc>,
    /// Sum of the value basis of every eligible lot.
    pub total_value: Decimal,
    /// Number of eligible lots.
    pub lot_count: u32,
}

/// Lifecycle state of a warehouse fee.
///
/// Distribution data only exists in the `Distributed` state, so there is
/// no way to represent a half-distributed fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FeeState {
    /// Not yet distributed.
    Pending,
    /// Distributed once and for all.
    Distributed(DistributionSnapshot),
}

impl FeeState {
    /// The flat status of this state.
    #[must_use]
    pub fn status(&self) -> FeeStatus {
        match self {
            Self::Pending => FeeStatus::Pending,
            Self::Distributed(_) => FeeStatus::Distributed,
        }
    }

    /// Returns true while the fee may be edited, deleted or distributed.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Snapshot of the distribution, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<&DistributionSnapshot> {
        match self {
            Self::Pending => None,
            Self::Distributed(snapshot) => Some(snapshot),
        }
    }
}

/// A monthly warehouse fee declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseFee {
    /// Fee ID.
    pub id: WarehouseFeeId,
    /// Month the fee covers.
    pub year_month: YearMonth,
    /// Total fee to distribute.
    pub total_fee: Decimal,
    /// Lifecycle state.
    pub state: FeeState,
    /// Free-text memo.
    pub memo: Option<String>,
}

/// Input for declaring a monthly fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFeeInput {
    /// Month the fee covers.
    pub year_month: YearMonth,
    /// Total fee, non-negative.
    pub total_fee: Decimal,
    /// Free-text memo.
    #[serde(default)]
    pub memo: Option<String>,
}

/// Changes to a pending fee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateFeeInput {
    /// New total fee.
    #[serde(default)]
    pub total_fee: Option<Decimal>,
    /// New memo (`Some(None)` clears it).
    #[serde(default)]
    pub memo: Option<Option<String>>,
}

/// The slice of a lot the distributor needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributionCandidate {
    /// Lot ID.
    pub lot_id: LotId,
    /// Receipt date (tie-break for residual assignment).
    pub received_date: NaiveDate,
    /// Quantity on hand at distribution time.
    pub quantity_remaining: Decimal,
    /// Landed unit cost.
    pub unit_cost: Decimal,
}

impl DistributionCandidate {
    /// Value basis: remaining quantity at landed cost, fees excluded.
    ///
    /// `None` if the product leaves the decimal range.
    #[must_use]
    pub fn value(&self) -> Option<Decimal> {
        self.quantity_remaining.checked_mul(self.unit_cost)
    }
}

impl From<&crate::lot::Lot> for DistributionCandidate {
    fn from(lot: &crate::lot::Lot) -> Self {
        Self {
            lot_id: lot.id,
            received_date: lot.received_date,
            quantity_remaining: lot.quantity_remaining,
            unit_cost: lot.unit_cost,
        }
    }
}

/// One allocation line of a distribution run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionLine {
    /// Lot receiving the allocation.
    pub lot_id: LotId,
    /// Lot quantity at distribution time.
    pub quantity_at_time: Decimal,
    /// `quantity_at_time × unit_cost`.
    pub value_at_time: Decimal,
    /// Share of total value, in percent.
    pub value_ratio: Decimal,
    /// Fee allocated to the lot.
    pub distributed_fee: Decimal,
}

/// The complete, reconciled outcome of distributing one month's fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionPlan {
    /// Month distributed.
    pub year_month: YearMonth,
    /// Fee distributed.
    pub total_fee: Decimal,
    /// Sum of every line's value.
    pub total_value: Decimal,
    /// One line per eligible lot, FIFO order.
    pub lines: Vec<DistributionLine>,
    /// Rounding residual added to the largest-value lot.
    pub residual: Decimal,
    /// Lot that absorbed the residual.
    pub residual_lot_id: LotId,
}

impl DistributionPlan {
    /// Number of lots allocated to.
    #[must_use]
    pub fn lot_count(&self) -> u32 {
        u32::try_from(self.lines.len()).unwrap_or(u32::MAX)
    }

    /// Sum of distributed fees (equals `total_fee`).
    #[must_use]
    pub fn distributed_total(&self) -> Decimal {
        self.lines.iter().map(|l| l.distributed_fee).sum()
    }
}
