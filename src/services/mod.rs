// Core cost accounting
pub mod costing;
pub mod stock;

// Document lifecycles
pub mod invoices;
pub mod transfers;

// Analytics and reporting
pub mod reports;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::config::AppConfig;
use crate::entities::{customer, location, product, vendor};
use crate::errors::ServiceError;

/// Ambient per-call context for lifecycle operations.
///
/// Carries the acting user, the configured tax rate and the operation
/// timestamp explicitly, so the core stays testable without any global
/// application state.
#[derive(Debug, Clone, Copy)]
pub struct OperationContext {
    /// Acting user id for audit fields; `None` for system-initiated calls
    pub actor_id: Option<i64>,
    /// Company tax rate in percent, applied to invoice totals
    pub tax_rate_percent: Decimal,
    /// Timestamp stamped on every row written by the operation
    pub now: DateTime<Utc>,
}

impl OperationContext {
    pub fn new(actor_id: Option<i64>, tax_rate_percent: Decimal) -> Self {
        Self {
            actor_id,
            tax_rate_percent,
            now: Utc::now(),
        }
    }

    /// Build a context from the loaded application configuration.
    pub fn from_config(cfg: &AppConfig, actor_id: Option<i64>) -> Self {
        let tax_rate = Decimal::from_f64(cfg.tax_rate_percent).unwrap_or(Decimal::ZERO);
        Self::new(actor_id, tax_rate)
    }

    /// Override the operation timestamp.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

pub(crate) async fn find_live_product<C: ConnectionTrait>(
    conn: &C,
    product_id: i64,
) -> Result<product::Model, ServiceError> {
    product::Entity::find_by_id(product_id)
        .filter(product::Column::DeletedAt.is_null())
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))
}

pub(crate) async fn find_location<C: ConnectionTrait>(
    conn: &C,
    location_id: i64,
) -> Result<location::Model, ServiceError> {
    location::Entity::find_by_id(location_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Location {} not found", location_id)))
}

pub(crate) async fn find_live_customer<C: ConnectionTrait>(
    conn: &C,
    customer_id: i64,
) -> Result<customer::Model, ServiceError> {
    customer::Entity::find_by_id(customer_id)
        .filter(customer::Column::DeletedAt.is_null())
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Customer {} not found", customer_id)))
}

pub(crate) async fn find_live_vendor<C: ConnectionTrait>(
    conn: &C,
    vendor_id: i64,
) -> Result<vendor::Model, ServiceError> {
    vendor::Entity::find_by_id(vendor_id)
        .filter(vendor::Column::DeletedAt.is_null())
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Vendor {} not found", vendor_id)))
}
