//! Lot repository: receipts, FIFO drawdown and deletion.
//!
//! Every mutation of `quantity_remaining` runs inside a database
//! transaction holding `FOR UPDATE` locks on the affected rows and applies a
//! guarded decrement, so concurrent drawdowns can never overdraw a lot.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use stockwise_core::lot::{
    ConsumptionPlan, CreateLotInput, LandedCost, Lot, LotError, LotFilter, LotService,
    StorageLocation, plan_fifo, plan_single,
};
use stockwise_shared::types::{
    LotId, PageRequest, PageResponse, ProductId, SourceTransactionId,
};
use tracing::{info, warn};

use crate::entities::{lots, products, warehouse_fee_distributions};

impl From<lots::Model> for Lot {
    fn from(model: lots::Model) -> Self {
        Self {
            id: LotId::from_uuid(model.id),
            product_id: ProductId::from_uuid(model.product_id),
            lot_code: model.lot_code,
            source_transaction_id: model.source_transaction_id.map(SourceTransactionId::from_uuid),
            received_date: model.received_date,
            quantity_received: model.quantity_received,
            quantity_remaining: model.quantity_remaining,
            costs: LandedCost {
                goods_amount: model.goods_amount,
                duty_amount: model.duty_amount,
                domestic_freight: model.domestic_freight,
                other_cost: model.other_cost,
            },
            unit_cost: model.unit_cost,
            accumulated_warehouse_fee: model.accumulated_warehouse_fee,
            storage_location: model.storage_location.into(),
            memo: model.memo,
        }
    }
}

/// Lot repository for ledger operations.
#[derive(Debug, Clone)]
pub struct LotRepository {
    db: DatabaseConnection,
}

impl LotRepository {
    /// Creates a new lot repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a receipt as a new lot.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The product does not exist
    /// - Quantity is not positive or a cost component is negative
    /// - Database operation fails
    pub async fn create_lot(&self, input: CreateLotInput) -> Result<Lot, LotError> {
        create_lot_in(&self.db, input).await
    }

    /// Finds a lot by ID.
    ///
    /// # Errors
    ///
    /// Returns `LotError::LotNotFound` if the lot does not exist.
    pub async fn find_lot(&self, lot_id: LotId) -> Result<Lot, LotError> {
        lots::Entity::find_by_id(lot_id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| LotError::Database(e.to_string()))?
            .map(Lot::from)
            .ok_or(LotError::LotNotFound(lot_id))
    }

    /// Lists lots matching a filter in FIFO order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_lots(
        &self,
        filter: &LotFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Lot>, LotError> {
        let page = page.normalized();
        let mut query = lots::Entity::find();

        if let Some(product_id) = filter.product_id {
            query = query.filter(lots::Column::ProductId.eq(product_id.into_inner()));
        }
        if let Some(from) = filter.received_from {
            query = query.filter(lots::Column::ReceivedDate.gte(from));
        }
        if let Some(to) = filter.received_to {
            query = query.filter(lots::Column::ReceivedDate.lte(to));
        }
        if let Some(location) = filter.storage_location {
            query = query.filter(
                lots::Column::StorageLocation
                    .eq(crate::entities::sea_orm_active_enums::StorageLocation::from(location)),
            );
        }
        if let Some(source) = filter.source_transaction_id {
            query = query.filter(lots::Column::SourceTransactionId.eq(source.into_inner()));
        }
        if filter.open_only {
            query = query.filter(lots::Column::QuantityRemaining.gt(Decimal::ZERO));
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| LotError::Database(e.to_string()))?;

        let models = query
            .order_by_asc(lots::Column::ReceivedDate)
            .order_by_asc(lots::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(|e| LotError::Database(e.to_string()))?;

        Ok(PageResponse::new(
            models.into_iter().map(Lot::from).collect(),
            page,
            total,
        ))
    }

    /// Loads every lot of a product, exhausted ones included, in FIFO order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn lots_for_product(&self, product_id: ProductId) -> Result<Vec<Lot>, LotError> {
        let models = lots::Entity::find()
            .filter(lots::Column::ProductId.eq(product_id.into_inner()))
            .order_by_asc(lots::Column::ReceivedDate)
            .order_by_asc(lots::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LotError::Database(e.to_string()))?;

        Ok(models.into_iter().map(Lot::from).collect())
    }

    /// Draws `quantity` from one specific lot.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The lot does not exist
    /// - Quantity is not positive
    /// - The lot holds less than `quantity` (the lot is left unchanged)
    pub async fn consume_lot(
        &self,
        lot_id: LotId,
        quantity: Decimal,
    ) -> Result<ConsumptionPlan, LotError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LotError::Database(e.to_string()))?;

        let plan = consume_lot_in(&txn, lot_id, quantity).await?;

        txn.commit()
            .await
            .map_err(|e| LotError::Database(e.to_string()))?;

        Ok(plan)
    }

    /// Draws `quantity` of a product across its lots, FIFO.
    ///
    /// All-or-nothing: if the open lots together hold less than `quantity`,
    /// no lot changes.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The product does not exist
    /// - Quantity is not positive
    /// - Available stock is insufficient
    pub async fn consume_product(
        &self,
        product_id: ProductId,
        quantity: Decimal,
    ) -> Result<ConsumptionPlan, LotError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LotError::Database(e.to_string()))?;

        let plan = consume_product_in(&txn, product_id, quantity).await?;

        txn.commit()
            .await
            .map_err(|e| LotError::Database(e.to_string()))?;

        Ok(plan)
    }

    /// Deletes a lot that never absorbed a warehouse fee.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The lot does not exist
    /// - Any distribution references the lot
    pub async fn delete_lot(&self, lot_id: LotId) -> Result<(), LotError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LotError::Database(e.to_string()))?;

        lots::Entity::find_by_id(lot_id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| LotError::Database(e.to_string()))?
            .ok_or(LotError::LotNotFound(lot_id))?;

        let distributions = warehouse_fee_distributions::Entity::find()
            .filter(warehouse_fee_distributions::Column::LotId.eq(lot_id.into_inner()))
            .count(&txn)
            .await
            .map_err(|e| LotError::Database(e.to_string()))?;

        LotService::ensure_deletable(lot_id, distributions)?;

        lots::Entity::delete_by_id(lot_id.into_inner())
            .exec(&txn)
            .await
            .map_err(|e| LotError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| LotError::Database(e.to_string()))?;

        info!(lot_id = %lot_id, "Lot deleted");
        Ok(())
    }

    /// Moves a lot to another storage location. Costing is unaffected.
    ///
    /// # Errors
    ///
    /// Returns `LotError::LotNotFound` if the lot does not exist.
    pub async fn change_storage_location(
        &self,
        lot_id: LotId,
        location: StorageLocation,
    ) -> Result<Lot, LotError> {
        let model = lots::Entity::find_by_id(lot_id.into_inner())
            .one(&self.db)
            .await
            .map_err(|e| LotError::Database(e.to_string()))?
            .ok_or(LotError::LotNotFound(lot_id))?;

        let mut active: lots::ActiveModel = model.into();
        active.storage_location = Set(location.into());
        active.updated_at = Set(Utc::now().into());

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| LotError::Database(e.to_string()))?;

        Ok(updated.into())
    }
}

/// Inserts a new lot on any connection or transaction.
pub(crate) async fn create_lot_in<C: ConnectionTrait>(
    conn: &C,
    input: CreateLotInput,
) -> Result<Lot, LotError> {
    let product = products::Entity::find_by_id(input.product_id.into_inner())
        .one(conn)
        .await
        .map_err(|e| LotError::Database(e.to_string()))?;
    if product.is_none() {
        return Err(LotError::ProductNotFound(input.product_id));
    }

    let lot = LotService::build_lot(LotId::new(), input)?;
    let now = Utc::now().into();

    let model = lots::ActiveModel {
        id: Set(lot.id.into_inner()),
        product_id: Set(lot.product_id.into_inner()),
        lot_code: Set(lot.lot_code.clone()),
        source_transaction_id: Set(lot.source_transaction_id.map(SourceTransactionId::into_inner)),
        received_date: Set(lot.received_date),
        quantity_received: Set(lot.quantity_received),
        quantity_remaining: Set(lot.quantity_remaining),
        goods_amount: Set(lot.costs.goods_amount),
        duty_amount: Set(lot.costs.duty_amount),
        domestic_freight: Set(lot.costs.domestic_freight),
        other_cost: Set(lot.costs.other_cost),
        unit_cost: Set(lot.unit_cost),
        accumulated_warehouse_fee: Set(lot.accumulated_warehouse_fee),
        storage_location: Set(lot.storage_location.into()),
        memo: Set(lot.memo.clone()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    model
        .insert(conn)
        .await
        .map_err(|e| LotError::Database(e.to_string()))?;

    info!(
        lot_id = %lot.id,
        product_id = %lot.product_id,
        quantity = %lot.quantity_received,
        unit_cost = %lot.unit_cost,
        "Lot received"
    );
    Ok(lot)
}

/// Locks one lot and draws from it. Must run inside a transaction.
pub(crate) async fn consume_lot_in<C: ConnectionTrait>(
    conn: &C,
    lot_id: LotId,
    quantity: Decimal,
) -> Result<ConsumptionPlan, LotError> {
    let lot: Lot = lots::Entity::find_by_id(lot_id.into_inner())
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(|e| LotError::Database(e.to_string()))?
        .ok_or(LotError::LotNotFound(lot_id))?
        .into();

    let plan = plan_single(&lot, quantity)?;
    apply_draws(conn, &plan).await?;

    info!(lot_id = %lot_id, quantity = %quantity, "Lot consumed");
    Ok(plan)
}

/// Locks a product's open lots and draws FIFO. Must run inside a transaction.
pub(crate) async fn consume_product_in<C: ConnectionTrait>(
    conn: &C,
    product_id: ProductId,
    quantity: Decimal,
) -> Result<ConsumptionPlan, LotError> {
    let product = products::Entity::find_by_id(product_id.into_inner())
        .one(conn)
        .await
        .map_err(|e| LotError::Database(e.to_string()))?;
    if product.is_none() {
        return Err(LotError::ProductNotFound(product_id));
    }

    let open: Vec<Lot> = lots::Entity::find()
        .filter(lots::Column::ProductId.eq(product_id.into_inner()))
        .filter(lots::Column::QuantityRemaining.gt(Decimal::ZERO))
        .order_by_asc(lots::Column::ReceivedDate)
        .order_by_asc(lots::Column::Id)
        .lock_exclusive()
        .all(conn)
        .await
        .map_err(|e| LotError::Database(e.to_string()))?
        .into_iter()
        .map(Lot::from)
        .collect();

    let plan = match plan_fifo(&open, quantity) {
        Ok(plan) => plan,
        Err(e) => {
            warn!(product_id = %product_id, quantity = %quantity, error = %e, "FIFO consumption rejected");
            return Err(e);
        }
    };
    apply_draws(conn, &plan).await?;

    info!(
        product_id = %product_id,
        quantity = %quantity,
        lots = plan.draws.len(),
        "Product consumed FIFO"
    );
    Ok(plan)
}

/// Applies each draw as a compare-and-decrement.
///
/// The `quantity_remaining >= q` guard makes a stale plan fail instead of
/// driving a lot negative.
async fn apply_draws<C: ConnectionTrait>(conn: &C, plan: &ConsumptionPlan) -> Result<(), LotError> {
    let now = Utc::now();

    for draw in &plan.draws {
        let result = lots::Entity::update_many()
            .col_expr(
                lots::Column::QuantityRemaining,
                Expr::col(lots::Column::QuantityRemaining).sub(draw.quantity),
            )
            .col_expr(lots::Column::UpdatedAt, Expr::value(now))
            .filter(lots::Column::Id.eq(draw.lot_id.into_inner()))
            .filter(lots::Column::QuantityRemaining.gte(draw.quantity))
            .exec(conn)
            .await
            .map_err(|e| LotError::Database(e.to_string()))?;

        if result.rows_affected != 1 {
            return Err(LotError::InsufficientQuantity {
                requested: draw.quantity,
                available: draw.remaining_before,
            });
        }
    }

    Ok(())
}
