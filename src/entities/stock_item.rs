use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Current stock position for one (product, location) pair.
///
/// A denormalized projection of the stock ledger: `qty` always equals the
/// sum of the ledger deltas attributed to the pair, and is never negative
/// after a committed operation. Created lazily on the first movement into
/// the pair. `version` guards the read-modify-write of `qty`/`wac`
/// against concurrent writers.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub product_id: i64,
    pub location_id: i64,

    /// On-hand quantity, 3 decimal places
    #[sea_orm(column_type = "Decimal(Some((19, 3)))")]
    pub qty: Decimal,

    /// Weighted average cost, 2 decimal places
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub wac: Decimal,

    pub version: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id"
    )]
    Location,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Value of the position at current cost.
    pub fn stock_value(&self) -> Decimal {
        self.qty * self.wac
    }
}
