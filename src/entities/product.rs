use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product master record.
///
/// Identity (`sku`, optional `barcode`) is immutable once created;
/// pricing and metadata are mutable. Products are soft-deleted so that
/// ledger history keeps resolving.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Stock keeping unit, unique
    pub sku: String,

    /// Scan code, unique when present
    pub barcode: Option<String>,

    pub name: String,
    pub description: Option<String>,

    /// Default cost used when no stock position exists yet
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub cost_price: Decimal,

    /// Default selling price for new invoice lines
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub sell_price: Decimal,

    /// Low-stock threshold, compared against per-location quantity
    #[sea_orm(column_type = "Decimal(Some((19, 3)))")]
    pub reorder_level: Decimal,

    pub is_active: bool,
    pub deleted_at: Option<DateTimeUtc>,
    pub created_by: Option<i64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stock_item::Entity")]
    StockItem,
    #[sea_orm(has_many = "super::stock_ledger::Entity")]
    StockLedger,
    #[sea_orm(has_many = "super::invoice_line::Entity")]
    InvoiceLine,
}

impl Related<super::stock_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockItem.def()
    }
}

impl Related<super::stock_ledger::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockLedger.def()
    }
}

impl Related<super::invoice_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceLine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Visible to lifecycle operations: not tombstoned.
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }
}
