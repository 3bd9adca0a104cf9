//! Lot ledger error types.

use rust_decimal::Decimal;
use stockwise_shared::AppError;
use stockwise_shared::types::{LotId, ProductId};
use thiserror::Error;

/// Errors raised by lot registration, consumption and deletion.
#[derive(Debug, Error)]
pub enum LotError {
    /// Received or consumed quantity is zero or negative.
    #[error("Quantity must be positive, got {0}")]
    NonPositiveQuantity(Decimal),

    /// A cost component is negative.
    #[error("Cost component {component} cannot be negative, got {amount}")]
    NegativeCost {
        /// Name of the offending component.
        component: &'static str,
        /// The rejected amount.
        amount: Decimal,
    },

    /// An amount derived from the input exceeds the decimal range.
    #[error("Amount out of range while computing {0}")]
    AmountOutOfRange(&'static str),

    /// The referenced product does not exist.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The referenced lot does not exist.
    #[error("Lot not found: {0}")]
    LotNotFound(LotId),

    /// Not enough stock to satisfy a consumption.
    #[error("Insufficient quantity: requested {requested}, available {available}")]
    InsufficientQuantity {
        /// Quantity requested.
        requested: Decimal,
        /// Quantity available across the eligible lots.
        available: Decimal,
    },

    /// The lot has absorbed warehouse fees and cannot be removed.
    #[error("Lot {lot_id} has {distributions} warehouse fee distribution(s) and cannot be deleted")]
    HasDistributions {
        /// The lot.
        lot_id: LotId,
        /// Number of distribution rows referencing it.
        distributions: u64,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LotError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NonPositiveQuantity(_)
            | Self::NegativeCost { .. }
            | Self::AmountOutOfRange(_)
            | Self::ProductNotFound(_) => 400,
            Self::LotNotFound(_) => 404,
            Self::HasDistributions { .. } => 409,
            Self::InsufficientQuantity { .. } => 422,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveQuantity(_) => "NON_POSITIVE_QUANTITY",
            Self::NegativeCost { .. } => "NEGATIVE_COST",
            Self::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::LotNotFound(_) => "LOT_NOT_FOUND",
            Self::InsufficientQuantity { .. } => "INSUFFICIENT_QUANTITY",
            Self::HasDistributions { .. } => "CONFLICT_ON_DELETE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<LotError> for AppError {
    fn from(err: LotError) -> Self {
        let message = err.to_string();
        match err {
            LotError::NonPositiveQuantity(_)
            | LotError::NegativeCost { .. }
            | LotError::AmountOutOfRange(_)
            | LotError::ProductNotFound(_) => Self::Validation(message),
            LotError::LotNotFound(_) => Self::NotFound(message),
            LotError::InsufficientQuantity { .. } => Self::BusinessRule(message),
            LotError::HasDistributions { .. } => Self::Conflict(message),
            LotError::Database(_) => Self::Database(message),
        }
    }
}
