//! Warehouse fee repository: fee lifecycle and distribution runs.
//!
//! `distribute` executes in one database transaction. It locks the fee row
//! and every eligible lot, writes the distribution rows, raises each lot's
//! accumulated fee, and flips the fee to distributed with a status-guarded
//! update. Any failure rolls the whole run back and the fee stays pending.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, SqlErr, TransactionTrait,
};
use serde::Serialize;
use stockwise_core::fee::{
    CreateFeeInput, DistributionCandidate, DistributionLine, DistributionPlan,
    DistributionSnapshot, FeeDistributor, FeeError, FeeService, FeeState, FeeStatus,
    UpdateFeeInput, WarehouseFee, YearMonth,
};
use stockwise_shared::types::{LotId, WarehouseFeeId};
use tracing::{info, warn};

use crate::entities::{
    lots, sea_orm_active_enums::WarehouseFeeStatus, warehouse_fee_distributions, warehouse_fees,
};

impl TryFrom<warehouse_fees::Model> for WarehouseFee {
    type Error = FeeError;

    fn try_from(model: warehouse_fees::Model) -> Result<Self, Self::Error> {
        let year_month: YearMonth = model.year_month.parse()?;

        let state = match model.status {
            WarehouseFeeStatus::Pending => FeeState::Pending,
            WarehouseFeeStatus::Distributed => {
                let distributed_at = model.distributed_at.ok_or_else(|| {
                    FeeError::Database(format!(
                        "Warehouse fee {year_month} is distributed without a timestamp"
                    ))
                })?;
                FeeState::Distributed(DistributionSnapshot {
                    distributed_at: distributed_at.with_timezone(&Utc),
                    total_value: model.total_value_at_distribution.unwrap_or_default(),
                    lot_count: model
                        .lot_count_at_distribution
                        .and_then(|n| u32::try_from(n).ok())
                        .unwrap_or_default(),
                })
            }
        };

        Ok(Self {
            id: WarehouseFeeId::from_uuid(model.id),
            year_month,
            total_fee: model.total_fee,
            state,
            memo: model.memo,
        })
    }
}

impl From<warehouse_fee_distributions::Model> for DistributionLine {
    fn from(model: warehouse_fee_distributions::Model) -> Self {
        Self {
            lot_id: LotId::from_uuid(model.lot_id),
            quantity_at_time: model.quantity_at_time,
            value_at_time: model.value_at_time,
            value_ratio: model.value_ratio,
            distributed_fee: model.distributed_fee,
        }
    }
}

/// Outcome of a committed distribution run.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionResult {
    /// The fee, now distributed.
    pub fee: WarehouseFee,
    /// The allocation that was persisted.
    pub plan: DistributionPlan,
}

/// Warehouse fee repository.
#[derive(Debug, Clone)]
pub struct WarehouseFeeRepository {
    db: DatabaseConnection,
}

impl WarehouseFeeRepository {
    /// Creates a new warehouse fee repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Declares the fee of a month.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A fee for the month already exists
    /// - The total is negative
    /// - Database operation fails
    pub async fn create_fee(&self, input: CreateFeeInput) -> Result<WarehouseFee, FeeError> {
        let year_month = input.year_month;

        let existing = warehouse_fees::Entity::find()
            .filter(warehouse_fees::Column::YearMonth.eq(year_month.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| FeeError::Database(e.to_string()))?;
        if existing.is_some() {
            return Err(FeeError::DuplicateYearMonth(year_month));
        }

        let fee = FeeService::build_fee(WarehouseFeeId::new(), input)?;
        let now = Utc::now().into();

        let model = warehouse_fees::ActiveModel {
            id: Set(fee.id.into_inner()),
            year_month: Set(year_month.to_string()),
            total_fee: Set(fee.total_fee),
            status: Set(WarehouseFeeStatus::Pending),
            distributed_at: Set(None),
            total_value_at_distribution: Set(None),
            lot_count_at_distribution: Set(None),
            memo: Set(fee.memo.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // The unique index settles concurrent creates for the same month.
        model.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => FeeError::DuplicateYearMonth(year_month),
            _ => FeeError::Database(e.to_string()),
        })?;

        info!(year_month = %year_month, total_fee = %fee.total_fee, "Warehouse fee declared");
        Ok(fee)
    }

    /// Finds the fee of a month.
    ///
    /// # Errors
    ///
    /// Returns `FeeError::NotFound` if no fee was declared for the month.
    pub async fn find_fee(&self, year_month: YearMonth) -> Result<WarehouseFee, FeeError> {
        warehouse_fees::Entity::find()
            .filter(warehouse_fees::Column::YearMonth.eq(year_month.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| FeeError::Database(e.to_string()))?
            .ok_or(FeeError::NotFound(year_month))?
            .try_into()
    }

    /// Lists fees, newest month first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_fees(&self, status: Option<FeeStatus>) -> Result<Vec<WarehouseFee>, FeeError> {
        let mut query = warehouse_fees::Entity::find();
        if let Some(status) = status {
            query = query.filter(warehouse_fees::Column::Status.eq(WarehouseFeeStatus::from(status)));
        }

        query
            .order_by_desc(warehouse_fees::Column::YearMonth)
            .all(&self.db)
            .await
            .map_err(|e| FeeError::Database(e.to_string()))?
            .into_iter()
            .map(WarehouseFee::try_from)
            .collect()
    }

    /// Changes the total or memo of a pending fee.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The fee does not exist
    /// - The fee is already distributed
    /// - The new total is negative
    pub async fn update_fee(
        &self,
        year_month: YearMonth,
        input: UpdateFeeInput,
    ) -> Result<WarehouseFee, FeeError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| FeeError::Database(e.to_string()))?;

        let current: WarehouseFee = warehouse_fees::Entity::find()
            .filter(warehouse_fees::Column::YearMonth.eq(year_month.to_string()))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| FeeError::Database(e.to_string()))?
            .ok_or(FeeError::NotFound(year_month))?
            .try_into()?;

        let updated = FeeService::apply_update(current, input)?;

        let result = warehouse_fees::Entity::update_many()
            .col_expr(warehouse_fees::Column::TotalFee, Expr::value(updated.total_fee))
            .col_expr(warehouse_fees::Column::Memo, Expr::value(updated.memo.clone()))
            .col_expr(warehouse_fees::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(warehouse_fees::Column::Id.eq(updated.id.into_inner()))
            .filter(warehouse_fees::Column::Status.eq(WarehouseFeeStatus::Pending))
            .exec(&txn)
            .await
            .map_err(|e| FeeError::Database(e.to_string()))?;

        if result.rows_affected != 1 {
            return Err(FeeError::AlreadyDistributed(year_month));
        }

        txn.commit()
            .await
            .map_err(|e| FeeError::Database(e.to_string()))?;

        info!(year_month = %year_month, total_fee = %updated.total_fee, "Warehouse fee updated");
        Ok(updated)
    }

    /// Deletes a pending fee.
    ///
    /// # Errors
    ///
    /// Returns an error if the fee does not exist or is already distributed.
    pub async fn delete_fee(&self, year_month: YearMonth) -> Result<(), FeeError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| FeeError::Database(e.to_string()))?;

        let fee: WarehouseFee = warehouse_fees::Entity::find()
            .filter(warehouse_fees::Column::YearMonth.eq(year_month.to_string()))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| FeeError::Database(e.to_string()))?
            .ok_or(FeeError::NotFound(year_month))?
            .try_into()?;

        FeeService::ensure_pending(&fee)?;

        let result = warehouse_fees::Entity::delete_many()
            .filter(warehouse_fees::Column::Id.eq(fee.id.into_inner()))
            .filter(warehouse_fees::Column::Status.eq(WarehouseFeeStatus::Pending))
            .exec(&txn)
            .await
            .map_err(|e| FeeError::Database(e.to_string()))?;

        if result.rows_affected != 1 {
            return Err(FeeError::AlreadyDistributed(year_month));
        }

        txn.commit()
            .await
            .map_err(|e| FeeError::Database(e.to_string()))?;

        info!(year_month = %year_month, "Warehouse fee deleted");
        Ok(())
    }

    /// Lists the distribution rows of a month in FIFO order of their lots.
    ///
    /// A pending fee has no rows.
    ///
    /// # Errors
    ///
    /// Returns `FeeError::NotFound` if no fee was declared for the month.
    pub async fn list_distributions(
        &self,
        year_month: YearMonth,
    ) -> Result<Vec<DistributionLine>, FeeError> {
        let fee = self.find_fee(year_month).await?;

        let rows = warehouse_fee_distributions::Entity::find()
            .join(
                JoinType::InnerJoin,
                warehouse_fee_distributions::Relation::Lots.def(),
            )
            .filter(warehouse_fee_distributions::Column::WarehouseFeeId.eq(fee.id.into_inner()))
            .order_by_asc(lots::Column::ReceivedDate)
            .order_by_asc(warehouse_fee_distributions::Column::LotId)
            .all(&self.db)
            .await
            .map_err(|e| FeeError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(DistributionLine::from).collect())
    }

    /// Distributes the fee of a month over every lot with stock.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The fee does not exist
    /// - The fee is already distributed (including a concurrent run that
    ///   committed first)
    /// - No lot carries value
    /// - Database operation fails (nothing is written)
    pub async fn distribute(
        &self,
        year_month: YearMonth,
        fee_decimal_places: u32,
    ) -> Result<DistributionResult, FeeError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| FeeError::Database(e.to_string()))?;

        // Step 1: the fee row lock serializes runs for the month.
        let fee: WarehouseFee = warehouse_fees::Entity::find()
            .filter(warehouse_fees::Column::YearMonth.eq(year_month.to_string()))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| FeeError::Database(e.to_string()))?
            .ok_or(FeeError::NotFound(year_month))?
            .try_into()?;

        if let Err(e) = FeeService::ensure_pending(&fee) {
            warn!(year_month = %year_month, "Distribution rejected: fee already distributed");
            return Err(e);
        }

        // Steps 2-3: eligible lots, locked against concurrent drawdown.
        let candidates: Vec<DistributionCandidate> = lots::Entity::find()
            .filter(lots::Column::QuantityRemaining.gt(Decimal::ZERO))
            .order_by_asc(lots::Column::ReceivedDate)
            .order_by_asc(lots::Column::Id)
            .lock_exclusive()
            .all(&txn)
            .await
            .map_err(|e| FeeError::Database(e.to_string()))?
            .into_iter()
            .map(|lot| DistributionCandidate {
                lot_id: LotId::from_uuid(lot.id),
                received_date: lot.received_date,
                quantity_remaining: lot.quantity_remaining,
                unit_cost: lot.unit_cost,
            })
            .collect();

        // Steps 4-7.
        let plan = FeeDistributor::plan(&fee, &candidates, fee_decimal_places)?;
        let now = Utc::now();

        // Step 8: persist rows, raise accumulated fees, transition the fee.
        let rows = plan
            .lines
            .iter()
            .map(|line| warehouse_fee_distributions::ActiveModel {
                warehouse_fee_id: Set(fee.id.into_inner()),
                lot_id: Set(line.lot_id.into_inner()),
                quantity_at_time: Set(line.quantity_at_time),
                value_at_time: Set(line.value_at_time),
                value_ratio: Set(line.value_ratio),
                distributed_fee: Set(line.distributed_fee),
                created_at: Set(now.into()),
            })
            .collect::<Vec<_>>();

        warehouse_fee_distributions::Entity::insert_many(rows)
            .exec_without_returning(&txn)
            .await
            .map_err(|e| FeeError::Database(e.to_string()))?;

        for line in &plan.lines {
            lots::Entity::update_many()
                .col_expr(
                    lots::Column::AccumulatedWarehouseFee,
                    Expr::col(lots::Column::AccumulatedWarehouseFee).add(line.distributed_fee),
                )
                .col_expr(lots::Column::UpdatedAt, Expr::value(now))
                .filter(lots::Column::Id.eq(line.lot_id.into_inner()))
                .exec(&txn)
                .await
                .map_err(|e| FeeError::Database(e.to_string()))?;
        }

        let distributed = FeeService::mark_distributed(fee, &plan, now)?;
        let lot_count = i32::try_from(plan.lot_count()).unwrap_or(i32::MAX);

        let result = warehouse_fees::Entity::update_many()
            .col_expr(
                warehouse_fees::Column::Status,
                WarehouseFeeStatus::Distributed.as_enum(),
            )
            .col_expr(warehouse_fees::Column::DistributedAt, Expr::value(now))
            .col_expr(
                warehouse_fees::Column::TotalValueAtDistribution,
                Expr::value(plan.total_value),
            )
            .col_expr(
                warehouse_fees::Column::LotCountAtDistribution,
                Expr::value(lot_count),
            )
            .col_expr(warehouse_fees::Column::UpdatedAt, Expr::value(now))
            .filter(warehouse_fees::Column::Id.eq(distributed.id.into_inner()))
            .filter(warehouse_fees::Column::Status.eq(WarehouseFeeStatus::Pending))
            .exec(&txn)
            .await
            .map_err(|e| FeeError::Database(e.to_string()))?;

        // First committer wins; dropping the transaction rolls back.
        if result.rows_affected != 1 {
            warn!(year_month = %year_month, "Distribution lost the race to a concurrent run");
            return Err(FeeError::AlreadyDistributed(year_month));
        }

        // Step 9.
        txn.commit()
            .await
            .map_err(|e| FeeError::Database(e.to_string()))?;

        info!(
            year_month = %year_month,
            total_fee = %plan.total_fee,
            total_value = %plan.total_value,
            lots = plan.lot_count(),
            residual = %plan.residual,
            "Warehouse fee distributed"
        );

        Ok(DistributionResult {
            fee: distributed,
            plan,
        })
    }
}
