//! Warehouse fee error types.

use rust_decimal::Decimal;
use stockwise_shared::AppError;
use thiserror::Error;

use super::types::YearMonth;

/// Errors raised by the warehouse fee lifecycle and distribution.
#[derive(Debug, Error)]
pub enum FeeError {
    /// No fee declared for the month.
    #[error("No warehouse fee declared for {0}")]
    NotFound(YearMonth),

    /// The fee was already distributed; it can no longer change.
    #[error("Warehouse fee for {0} has already been distributed")]
    AlreadyDistributed(YearMonth),

    /// Nothing in stock carries value to absorb the fee.
    #[error("No inventory with value to absorb the warehouse fee for {0}")]
    NoEligibleInventory(YearMonth),

    /// A fee for the month already exists.
    #[error("A warehouse fee for {0} already exists")]
    DuplicateYearMonth(YearMonth),

    /// Fee amount is negative.
    #[error("Warehouse fee cannot be negative, got {0}")]
    NegativeFee(Decimal),

    /// Fee or lot values exceed the decimal range during distribution.
    #[error("Amounts for {0} exceed the supported range")]
    AmountOutOfRange(YearMonth),

    /// Malformed year-month.
    #[error("Invalid year-month '{0}', expected YYYY-MM")]
    InvalidYearMonth(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl FeeError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NegativeFee(_) | Self::InvalidYearMonth(_) | Self::AmountOutOfRange(_) => 400,
            Self::NotFound(_) => 404,
            Self::AlreadyDistributed(_) | Self::DuplicateYearMonth(_) => 409,
            Self::NoEligibleInventory(_) => 422,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "FEE_NOT_FOUND",
            Self::AlreadyDistributed(_) => "ALREADY_DISTRIBUTED",
            Self::NoEligibleInventory(_) => "NO_ELIGIBLE_INVENTORY",
            Self::DuplicateYearMonth(_) => "DUPLICATE_YEAR_MONTH",
            Self::NegativeFee(_) => "NEGATIVE_FEE",
            Self::InvalidYearMonth(_) => "INVALID_YEAR_MONTH",
            Self::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<FeeError> for AppError {
    fn from(err: FeeError) -> Self {
        let message = err.to_string();
        match err {
            FeeError::NegativeFee(_)
            | FeeError::InvalidYearMonth(_)
            | FeeError::AmountOutOfRange(_) => Self::Validation(message),
            FeeError::NotFound(_) => Self::NotFound(message),
            FeeError::AlreadyDistributed(_) | FeeError::DuplicateYearMonth(_) => {
                Self::Conflict(message)
            }
            FeeError::NoEligibleInventory(_) => Self::BusinessRule(message),
            FeeError::Database(_) => Self::Database(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn march() -> YearMonth {
        YearMonth::new(2024, 3).unwrap()
    }

    #[rstest]
    #[case(FeeError::NotFound(march()), 404, "FEE_NOT_FOUND")]
    #[case(FeeError::AlreadyDistributed(march()), 409, "ALREADY_DISTRIBUTED")]
    #[case(FeeError::NoEligibleInventory(march()), 422, "NO_ELIGIBLE_INVENTORY")]
    #[case(FeeError::DuplicateYearMonth(march()), 409, "DUPLICATE_YEAR_MONTH")]
    #[case(FeeError::NegativeFee(Decimal::NEGATIVE_ONE), 400, "NEGATIVE_FEE")]
    #[case(FeeError::InvalidYearMonth("x".into()), 400, "INVALID_YEAR_MONTH")]
    #[case(FeeError::AmountOutOfRange(march()), 400, "AMOUNT_OUT_OF_RANGE")]
    #[case(FeeError::Database("x".into()), 500, "DATABASE_ERROR")]
    fn test_status_and_code(#[case] err: FeeError, #[case] status: u16, #[case] code: &str) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_messages_name_the_month() {
        assert_eq!(
            FeeError::AlreadyDistributed(march()).to_string(),
            "Warehouse fee for 2024-03 has already been distributed"
        );
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = FeeError::AlreadyDistributed(march()).into();
        assert_eq!(app.status_code(), 409);
    }
}
