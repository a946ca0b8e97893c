use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Invoice document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum InvoiceType {
    #[sea_orm(string_value = "sale")]
    Sale,
    #[sea_orm(string_value = "purchase")]
    Purchase,
}

impl InvoiceType {
    /// Prefix used in generated invoice codes.
    pub fn code_prefix(&self) -> &'static str {
        match self {
            Self::Sale => "SAL",
            Self::Purchase => "PUR",
        }
    }
}

/// Invoice lifecycle status.
///
/// Draft invoices are editable and deletable; `confirm` moves stock and
/// freezes the document; full payment flips confirmed to paid. Void is a
/// terminal parking state reachable only from draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum InvoiceStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "void")]
    Void,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Generated human-readable code, unique, date-sequenced
    pub code: String,

    #[sea_orm(column_name = "type")]
    pub invoice_type: InvoiceType,

    pub status: InvoiceStatus,
    pub location_id: i64,

    /// Set for sale invoices
    pub customer_id: Option<i64>,
    /// Set for purchase invoices
    pub vendor_id: Option<i64>,

    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub sub_total: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub discount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub tax: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub total: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub paid: Decimal,

    /// Set once, on the draft -> confirmed transition
    pub confirmed_at: Option<DateTimeUtc>,

    pub notes: Option<String>,
    pub created_by: Option<i64>,
    pub deleted_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id"
    )]
    Location,
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::vendor::Entity",
        from = "Column::VendorId",
        to = "super::vendor::Column::Id"
    )]
    Vendor,
    #[sea_orm(has_many = "super::invoice_line::Entity")]
    InvoiceLine,
    #[sea_orm(has_many = "super::payment::Entity")]
    Payment,
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::vendor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl Related<super::invoice_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceLine.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Outstanding amount to pay.
    pub fn balance(&self) -> Decimal {
        self.total - self.paid
    }

    /// Lines and discount may only change while the invoice is a draft.
    pub fn is_editable(&self) -> bool {
        self.status == InvoiceStatus::Draft
    }

    /// Cost of goods sold over the given lines; zero for purchases.
    pub fn cogs(&self, lines: &[super::invoice_line::Model]) -> Decimal {
        if self.invoice_type != InvoiceType::Sale {
            return Decimal::ZERO;
        }
        lines
            .iter()
            .map(|line| line.qty * line.unit_cost.unwrap_or(Decimal::ZERO))
            .sum()
    }

    /// Revenue minus cost over the given lines; zero for purchases.
    pub fn gross_profit(&self, lines: &[super::invoice_line::Model]) -> Decimal {
        if self.invoice_type != InvoiceType::Sale {
            return Decimal::ZERO;
        }
        self.total - self.cogs(lines)
    }
}
