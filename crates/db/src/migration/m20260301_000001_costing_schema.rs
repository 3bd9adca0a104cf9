//! Costing schema migration.
//!
//! Creates products, lots, warehouse fees and their distributions, together
//! with the constraints and triggers that back the ledger invariants.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CATALOG & LOT LEDGER
        // ============================================================
        db.execute_unprepared(PRODUCTS_SQL).await?;
        db.execute_unprepared(LOTS_SQL).await?;

        // ============================================================
        // PART 3: WAREHOUSE FEES
        // ============================================================
        db.execute_unprepared(WAREHOUSE_FEES_SQL).await?;
        db.execute_unprepared(WAREHOUSE_FEE_DISTRIBUTIONS_SQL).await?;

        // ============================================================
        // PART 4: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Where a lot is physically held
CREATE TYPE storage_location AS ENUM ('warehouse', 'office', 'direct_delivery', 'other');

-- Warehouse fee lifecycle
CREATE TYPE warehouse_fee_status AS ENUM ('pending', 'distributed');
";

const PRODUCTS_SQL: &str = r"
CREATE TABLE products (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(50) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    unit VARCHAR(20) NOT NULL DEFAULT 'pcs',
    category VARCHAR(100),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const LOTS_SQL: &str = r"
CREATE TABLE lots (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    product_id UUID NOT NULL REFERENCES products(id) ON DELETE RESTRICT,
    lot_code VARCHAR(100),
    source_transaction_id UUID,
    received_date DATE NOT NULL,
    quantity_received NUMERIC NOT NULL,
    quantity_remaining NUMERIC NOT NULL,
    goods_amount NUMERIC NOT NULL DEFAULT 0,
    duty_amount NUMERIC NOT NULL DEFAULT 0,
    domestic_freight NUMERIC NOT NULL DEFAULT 0,
    other_cost NUMERIC NOT NULL DEFAULT 0,
    unit_cost NUMERIC NOT NULL,
    accumulated_warehouse_fee NUMERIC NOT NULL DEFAULT 0,
    storage_location storage_location NOT NULL DEFAULT 'warehouse',
    memo TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_lot_quantity_received CHECK (quantity_received > 0),
    CONSTRAINT chk_lot_quantity_remaining CHECK (
        quantity_remaining >= 0 AND quantity_remaining <= quantity_received
    ),
    CONSTRAINT chk_lot_costs_non_negative CHECK (
        goods_amount >= 0 AND duty_amount >= 0 AND domestic_freight >= 0 AND other_cost >= 0
    ),
    CONSTRAINT chk_lot_fee_non_negative CHECK (accumulated_warehouse_fee >= 0)
);

-- FIFO drawdown: open lots of a product by receipt date, then id
CREATE INDEX idx_lots_fifo ON lots(product_id, received_date, id) WHERE quantity_remaining > 0;

-- Lookup by originating import/export record
CREATE INDEX idx_lots_source_transaction ON lots(source_transaction_id)
    WHERE source_transaction_id IS NOT NULL;
";

const WAREHOUSE_FEES_SQL: &str = r"
CREATE TABLE warehouse_fees (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    year_month CHAR(7) NOT NULL UNIQUE,
    total_fee NUMERIC NOT NULL,
    status warehouse_fee_status NOT NULL DEFAULT 'pending',
    distributed_at TIMESTAMPTZ,
    total_value_at_distribution NUMERIC,
    lot_count_at_distribution INTEGER,
    memo TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_fee_year_month CHECK (year_month ~ '^[0-9]{4}-(0[1-9]|1[0-2])$'),
    CONSTRAINT chk_fee_non_negative CHECK (total_fee >= 0),
    CONSTRAINT chk_fee_distribution_snapshot CHECK (
        (status = 'pending'
            AND distributed_at IS NULL
            AND total_value_at_distribution IS NULL
            AND lot_count_at_distribution IS NULL)
        OR
        (status = 'distributed'
            AND distributed_at IS NOT NULL
            AND total_value_at_distribution IS NOT NULL
            AND lot_count_at_distribution IS NOT NULL)
    )
);
";

const WAREHOUSE_FEE_DISTRIBUTIONS_SQL: &str = r"
CREATE TABLE warehouse_fee_distributions (
    warehouse_fee_id UUID NOT NULL REFERENCES warehouse_fees(id) ON DELETE RESTRICT,
    lot_id UUID NOT NULL REFERENCES lots(id) ON DELETE RESTRICT,
    quantity_at_time NUMERIC NOT NULL,
    value_at_time NUMERIC NOT NULL,
    value_ratio NUMERIC(9, 4) NOT NULL,
    distributed_fee NUMERIC NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    PRIMARY KEY (warehouse_fee_id, lot_id),
    CONSTRAINT chk_distribution_quantity CHECK (quantity_at_time > 0),
    CONSTRAINT chk_distribution_fee CHECK (distributed_fee >= 0)
);

-- Deletion guard and per-lot history
CREATE INDEX idx_distributions_lot ON warehouse_fee_distributions(lot_id);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: prevent_distributed_fee_modification
-- A distributed fee is frozen: no edit, no delete
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_distributed_fee_modification()
RETURNS TRIGGER AS $$
BEGIN
    IF OLD.status = 'distributed' THEN
        RAISE EXCEPTION 'Warehouse fee % has already been distributed', OLD.year_month;
    END IF;

    IF TG_OP = 'DELETE' THEN
        RETURN OLD;
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_distributed_fee_mod
BEFORE UPDATE OR DELETE ON warehouse_fees
FOR EACH ROW
EXECUTE FUNCTION prevent_distributed_fee_modification();

-- ============================================================
-- FUNCTION: prevent_lot_cost_modification
-- Receipt quantities and cost components never change after creation
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_lot_cost_modification()
RETURNS TRIGGER AS $$
BEGIN
    IF NEW.quantity_received <> OLD.quantity_received
        OR NEW.goods_amount <> OLD.goods_amount
        OR NEW.duty_amount <> OLD.duty_amount
        OR NEW.domestic_freight <> OLD.domestic_freight
        OR NEW.other_cost <> OLD.other_cost
        OR NEW.unit_cost <> OLD.unit_cost THEN
        RAISE EXCEPTION 'Lot % receipt and cost fields are immutable', OLD.id;
    END IF;

    IF NEW.accumulated_warehouse_fee < OLD.accumulated_warehouse_fee THEN
        RAISE EXCEPTION 'Lot % accumulated warehouse fee cannot decrease', OLD.id;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_lot_cost_mod
BEFORE UPDATE ON lots
FOR EACH ROW
EXECUTE FUNCTION prevent_lot_cost_modification();
";

const DROP_ALL_SQL: &str = r"
DROP TRIGGER IF EXISTS trg_prevent_lot_cost_mod ON lots;
DROP TRIGGER IF EXISTS trg_prevent_distributed_fee_mod ON warehouse_fees;
DROP FUNCTION IF EXISTS prevent_lot_cost_modification();
DROP FUNCTION IF EXISTS prevent_distributed_fee_modification();
DROP TABLE IF EXISTS warehouse_fee_distributions CASCADE;
DROP TABLE IF EXISTS warehouse_fees CASCADE;
DROP TABLE IF EXISTS lots CASCADE;
DROP TABLE IF EXISTS products CASCADE;
DROP TYPE IF EXISTS warehouse_fee_status;
DROP TYPE IF EXISTS storage_location;
";
