use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Why a stock movement happened.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum MovementReason {
    #[sea_orm(string_value = "purchase")]
    Purchase,
    #[sea_orm(string_value = "sale")]
    Sale,
    #[sea_orm(string_value = "transfer_in")]
    TransferIn,
    #[sea_orm(string_value = "transfer_out")]
    TransferOut,
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}

/// One immutable stock movement.
///
/// Append-only audit trail and the authoritative quantity history: rows
/// are never updated or deleted, and replaying them in `moved_at` order
/// reconstructs every stock position. Negative deltas attribute to
/// `from_location_id`, positive deltas to `to_location_id`; transfer rows
/// carry both ends so the paired legs stay traceable.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_ledgers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub product_id: i64,
    pub from_location_id: Option<i64>,
    pub to_location_id: Option<i64>,

    /// Signed quantity delta: positive = increase, negative = decrease
    #[sea_orm(column_type = "Decimal(Some((19, 3)))")]
    pub qty: Decimal,

    #[sea_orm(column_type = "Decimal(Some((19, 2)))", nullable)]
    pub unit_cost: Option<Decimal>,

    #[sea_orm(column_type = "Decimal(Some((19, 2)))", nullable)]
    pub unit_price: Option<Decimal>,

    pub reason: MovementReason,

    /// Polymorphic reference to the originating document
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,

    pub moved_at: DateTimeUtc,
    pub note: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// True when this entry attributes its delta to the given location.
    pub fn touches_location(&self, location_id: i64) -> bool {
        if self.qty.is_sign_negative() {
            self.from_location_id == Some(location_id)
        } else {
            self.to_location_id == Some(location_id)
        }
    }
}
