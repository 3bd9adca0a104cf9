//! Inventory repository: read-only rollups over committed lots.
//!
//! Nothing is cached. Every call reads the lots as currently committed and
//! hands them to the aggregator.

use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use stockwise_core::inventory::{InventoryAggregator, LotDetail, ProductSummary};
use stockwise_core::lot::{Lot, LotError};
use stockwise_shared::types::ProductId;

use super::lot::LotRepository;
use super::product::ProductRepository;
use crate::entities::lots;

/// Inventory query repository.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    db: DatabaseConnection,
    lots: LotRepository,
    products: ProductRepository,
}

impl InventoryRepository {
    /// Creates a new inventory repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            lots: LotRepository::new(db.clone()),
            products: ProductRepository::new(db.clone()),
            db,
        }
    }

    /// Stock position and valuation of one product.
    ///
    /// # Errors
    ///
    /// Returns `LotError::ProductNotFound` if the product does not exist.
    pub async fn product_summary(&self, product_id: ProductId) -> Result<ProductSummary, LotError> {
        self.ensure_product(product_id).await?;
        let lots = self.lots.lots_for_product(product_id).await?;
        Ok(InventoryAggregator::product_summary(product_id, &lots))
    }

    /// Every lot of a product in FIFO order with fee-inclusive unit cost.
    ///
    /// # Errors
    ///
    /// Returns `LotError::ProductNotFound` if the product does not exist.
    pub async fn lot_detail(&self, product_id: ProductId) -> Result<Vec<LotDetail>, LotError> {
        self.ensure_product(product_id).await?;
        let lots = self.lots.lots_for_product(product_id).await?;
        Ok(InventoryAggregator::lot_detail(product_id, &lots))
    }

    /// One summary per product that has lots.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn overview(&self) -> Result<Vec<ProductSummary>, LotError> {
        let lots: Vec<Lot> = lots::Entity::find()
            .order_by_asc(lots::Column::ProductId)
            .all(&self.db)
            .await
            .map_err(|e| LotError::Database(e.to_string()))?
            .into_iter()
            .map(Lot::from)
            .collect();

        Ok(InventoryAggregator::overview(&lots))
    }

    async fn ensure_product(&self, product_id: ProductId) -> Result<(), LotError> {
        self.products
            .find_by_id(product_id)
            .await
            .map_err(|e| LotError::Database(e.to_string()))?
            .map(|_| ())
            .ok_or(LotError::ProductNotFound(product_id))
    }
}
