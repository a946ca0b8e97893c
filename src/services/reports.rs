use crate::{
    db::DbPool,
    entities::{
        invoice::{self, Entity as Invoice, InvoiceStatus, InvoiceType},
        invoice_line,
        product::{self, Entity as Product},
        stock_item::{self, Entity as StockItem},
        stock_ledger::{self, Entity as StockLedger, MovementReason},
    },
    errors::ServiceError,
    services::costing,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;

/// Inclusive reporting window.
#[derive(Debug, Clone, Copy)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Aggregate over confirmed invoices of one type.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceSummary {
    pub invoice_count: u64,
    pub sub_total: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub paid: Decimal,
}

/// One row of the top-selling-products report.
#[derive(Debug, Clone, Serialize)]
pub struct TopProduct {
    pub product_id: i64,
    pub sku: String,
    pub name: String,
    pub quantity: Decimal,
    pub revenue: Decimal,
}

/// Profit and loss over a reporting window.
#[derive(Debug, Clone, Serialize)]
pub struct ProfitAndLoss {
    pub revenue: Decimal,
    pub discounts: Decimal,
    pub net_revenue: Decimal,
    pub cogs: Decimal,
    pub gross_profit: Decimal,
    pub gross_margin_percent: Decimal,
    pub tax_collected: Decimal,
    pub total_purchases: Decimal,
}

/// Read-only analytics over the invoice records and the movement ledger.
///
/// Never writes; safe to run concurrently with lifecycle operations.
/// Results are a point-in-time snapshot with no isolation guarantee
/// beyond what the underlying store provides.
#[derive(Clone)]
pub struct ReportService {
    db: Arc<DbPool>,
}

impl ReportService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Totals and count over confirmed sale invoices in the window.
    #[instrument(skip(self))]
    pub async fn sales_summary(
        &self,
        range: DateRange,
        location_id: Option<i64>,
    ) -> Result<InvoiceSummary, ServiceError> {
        self.invoice_summary(InvoiceType::Sale, range, location_id)
            .await
    }

    /// Totals and count over confirmed purchase invoices in the window.
    #[instrument(skip(self))]
    pub async fn purchase_summary(
        &self,
        range: DateRange,
        location_id: Option<i64>,
    ) -> Result<InvoiceSummary, ServiceError> {
        self.invoice_summary(InvoiceType::Purchase, range, location_id)
            .await
    }

    async fn invoice_summary(
        &self,
        invoice_type: InvoiceType,
        range: DateRange,
        location_id: Option<i64>,
    ) -> Result<InvoiceSummary, ServiceError> {
        let invoices = self
            .confirmed_invoices(invoice_type, range, location_id)
            .await?;

        let mut summary = InvoiceSummary {
            invoice_count: invoices.len() as u64,
            sub_total: Decimal::ZERO,
            discount: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: Decimal::ZERO,
            paid: Decimal::ZERO,
        };
        for inv in &invoices {
            summary.sub_total += inv.sub_total;
            summary.discount += inv.discount;
            summary.tax += inv.tax;
            summary.total += inv.total;
            summary.paid += inv.paid;
        }

        Ok(summary)
    }

    /// Best-selling products by absolute sold quantity over `sale` ledger
    /// entries in the window, ties broken by product id.
    #[instrument(skip(self))]
    pub async fn top_products(
        &self,
        range: DateRange,
        location_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<TopProduct>, ServiceError> {
        let db = self.db.as_ref();

        let mut select = StockLedger::find()
            .filter(stock_ledger::Column::Reason.eq(MovementReason::Sale))
            .filter(stock_ledger::Column::MovedAt.gte(range.from))
            .filter(stock_ledger::Column::MovedAt.lte(range.to));
        if let Some(location_id) = location_id {
            select = select.filter(stock_ledger::Column::FromLocationId.eq(location_id));
        }
        let entries = select.all(db).await?;

        // (quantity, revenue) per product; BTreeMap keeps ties in
        // product-id order.
        let mut per_product: BTreeMap<i64, (Decimal, Decimal)> = BTreeMap::new();
        for entry in &entries {
            let sold_qty = entry.qty.abs();
            let revenue = sold_qty * entry.unit_price.unwrap_or(Decimal::ZERO);
            let slot = per_product
                .entry(entry.product_id)
                .or_insert((Decimal::ZERO, Decimal::ZERO));
            slot.0 += sold_qty;
            slot.1 += revenue;
        }

        let mut ranked: Vec<(i64, Decimal, Decimal)> = per_product
            .into_iter()
            .map(|(product_id, (quantity, revenue))| (product_id, quantity, revenue))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(limit);

        let product_ids: Vec<i64> = ranked.iter().map(|row| row.0).collect();
        let products: BTreeMap<i64, product::Model> = Product::find()
            .filter(product::Column::Id.is_in(product_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(ranked
            .into_iter()
            .map(|(product_id, quantity, revenue)| {
                let (sku, name) = products
                    .get(&product_id)
                    .map(|p| (p.sku.clone(), p.name.clone()))
                    .unwrap_or_default();
                TopProduct {
                    product_id,
                    sku,
                    name,
                    quantity,
                    revenue: costing::round_money(revenue),
                }
            })
            .collect())
    }

    /// Profit and loss derived from confirmed invoices and their lines.
    ///
    /// Gross margin is zero when net revenue is zero.
    #[instrument(skip(self))]
    pub async fn profit_and_loss(
        &self,
        range: DateRange,
        location_id: Option<i64>,
    ) -> Result<ProfitAndLoss, ServiceError> {
        let db = self.db.as_ref();

        let mut sales_select = Invoice::find()
            .filter(invoice::Column::InvoiceType.eq(InvoiceType::Sale))
            .filter(
                invoice::Column::Status
                    .is_in([InvoiceStatus::Confirmed, InvoiceStatus::Paid]),
            )
            .filter(invoice::Column::DeletedAt.is_null())
            .filter(invoice::Column::ConfirmedAt.gte(range.from))
            .filter(invoice::Column::ConfirmedAt.lte(range.to));
        if let Some(location_id) = location_id {
            sales_select = sales_select.filter(invoice::Column::LocationId.eq(location_id));
        }
        let sales = sales_select
            .find_with_related(invoice_line::Entity)
            .all(db)
            .await?;

        let mut revenue = Decimal::ZERO;
        let mut discounts = Decimal::ZERO;
        let mut tax_collected = Decimal::ZERO;
        let mut cogs = Decimal::ZERO;
        for (inv, lines) in &sales {
            revenue += inv.sub_total;
            discounts += inv.discount;
            tax_collected += inv.tax;
            for line in lines {
                cogs += line.qty * line.unit_cost.unwrap_or(Decimal::ZERO);
            }
        }
        let cogs = costing::round_money(cogs);

        let purchases = self
            .confirmed_invoices(InvoiceType::Purchase, range, location_id)
            .await?;
        let total_purchases = purchases.iter().map(|inv| inv.total).sum();

        let net_revenue = revenue - discounts;
        let gross_profit = net_revenue - cogs;
        let gross_margin_percent = if net_revenue.is_zero() {
            Decimal::ZERO
        } else {
            costing::round_money(gross_profit / net_revenue * Decimal::ONE_HUNDRED)
        };

        Ok(ProfitAndLoss {
            revenue,
            discounts,
            net_revenue,
            cogs,
            gross_profit,
            gross_margin_percent,
            tax_collected,
            total_purchases,
        })
    }

    /// Total value of stock on hand (`qty × wac` over positions),
    /// optionally scoped to one location.
    #[instrument(skip(self))]
    pub async fn inventory_valuation(
        &self,
        location_id: Option<i64>,
    ) -> Result<Decimal, ServiceError> {
        let mut select = StockItem::find();
        if let Some(location_id) = location_id {
            select = select.filter(stock_item::Column::LocationId.eq(location_id));
        }
        let positions = select.all(self.db.as_ref()).await?;

        Ok(costing::round_money(
            positions.iter().map(|p| p.stock_value()).sum(),
        ))
    }

    /// Confirmed (or since-paid) invoices of one type within the window.
    async fn confirmed_invoices(
        &self,
        invoice_type: InvoiceType,
        range: DateRange,
        location_id: Option<i64>,
    ) -> Result<Vec<invoice::Model>, ServiceError> {
        let mut select = Invoice::find()
            .filter(invoice::Column::InvoiceType.eq(invoice_type))
            .filter(
                invoice::Column::Status
                    .is_in([InvoiceStatus::Confirmed, InvoiceStatus::Paid]),
            )
            .filter(invoice::Column::DeletedAt.is_null())
            .filter(invoice::Column::ConfirmedAt.gte(range.from))
            .filter(invoice::Column::ConfirmedAt.lte(range.to));
        if let Some(location_id) = location_id {
            select = select.filter(invoice::Column::LocationId.eq(location_id));
        }

        select
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }
}
