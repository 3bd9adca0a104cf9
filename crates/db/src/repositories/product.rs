//! Product repository.
//!
//! The catalog owns products; the costing engine reads them to validate
//! receipts and only writes them when seeding.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use stockwise_shared::types::ProductId;

use crate::entities::products;

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    /// Unique product code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Unit of measure.
    pub unit: String,
    /// Optional category.
    pub category: Option<String>,
}

/// Product repository.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is taken or the insert fails.
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<products::Model, DbErr> {
        let now = Utc::now().into();
        let product = products::ActiveModel {
            id: Set(ProductId::new().into_inner()),
            code: Set(input.code),
            name: Set(input.name),
            unit: Set(input.unit),
            category: Set(input.category),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        product.insert(&self.db).await
    }

    /// Finds a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: ProductId) -> Result<Option<products::Model>, DbErr> {
        products::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
    }

    /// Finds a product by its code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<products::Model>, DbErr> {
        products::Entity::find()
            .filter(products::Column::Code.eq(code))
            .one(&self.db)
            .await
    }

    /// Lists products ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_products(&self, active_only: bool) -> Result<Vec<products::Model>, DbErr> {
        let mut query = products::Entity::find();
        if active_only {
            query = query.filter(products::Column::IsActive.eq(true));
        }
        query
            .order_by_asc(products::Column::Code)
            .all(&self.db)
            .await
    }
}
