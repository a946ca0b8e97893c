use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One product line of an invoice.
///
/// `line_total` is derived (`qty × unit_price`, money-rounded) and the
/// parent invoice's monetary fields are recomputed on every line
/// mutation. `unit_cost` is the supplier cost on purchase lines and the
/// position WAC snapshot on sale lines (re-captured at confirmation).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub invoice_id: i64,
    pub product_id: i64,

    #[sea_orm(column_type = "Decimal(Some((19, 3)))")]
    pub qty: Decimal,

    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub unit_price: Decimal,

    #[sea_orm(column_type = "Decimal(Some((19, 2)))", nullable)]
    pub unit_cost: Option<Decimal>,

    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub line_total: Decimal,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invoice::Entity",
        from = "Column::InvoiceId",
        to = "super::invoice::Column::Id"
    )]
    Invoice,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Margin earned on this line against its captured cost.
    pub fn profit(&self) -> Decimal {
        let cost = self.unit_cost.unwrap_or(Decimal::ZERO);
        (self.unit_price - cost) * self.qty
    }
}
