//! Monthly warehouse fees and their value-weighted distribution over lots.

pub mod allocation;
pub mod distributor;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod distributor_props;

pub use allocation::{AllocationError, AllocationUtil, WeightedAllocation};
pub use distributor::{FeeDistributor, VALUE_RATIO_DECIMAL_PLACES};
pub use error::FeeError;
pub use service::FeeService;
pub use types::{
    CreateFeeInput, DistributionCandidate, DistributionLine, DistributionPlan,
    DistributionSnapshot, FeeState, FeeStatus, UpdateFeeInput, WarehouseFee, YearMonth,
};
