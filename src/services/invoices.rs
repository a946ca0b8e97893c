use crate::{
    db::DbPool,
    entities::{
        invoice::{self, Entity as Invoice, InvoiceStatus, InvoiceType},
        invoice_line::{self, Entity as InvoiceLine},
        payment::{self, Entity as Payment, PaymentMethod},
        stock_item,
        stock_ledger::MovementReason,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        costing, find_live_customer, find_live_product, find_live_vendor, find_location,
        stock::{apply_movement, record_movement, NewMovement},
        OperationContext,
    },
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Input for one invoice line.
#[derive(Debug, Clone)]
pub struct NewInvoiceLine {
    pub product_id: i64,
    pub qty: Decimal,
    /// Defaults to the product's sell price
    pub unit_price: Option<Decimal>,
    /// Required for purchase lines; derived from the position WAC (or the
    /// product's cost price) for sale lines when absent
    pub unit_cost: Option<Decimal>,
}

/// Input for creating a draft invoice.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub invoice_type: InvoiceType,
    pub location_id: i64,
    /// Required for sale invoices
    pub customer_id: Option<i64>,
    /// Required for purchase invoices
    pub vendor_id: Option<i64>,
    pub discount: Decimal,
    pub notes: Option<String>,
    pub lines: Vec<NewInvoiceLine>,
}

/// Draft-only edits; absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateInvoice {
    pub discount: Option<Decimal>,
    pub notes: Option<String>,
    /// Replaces the whole line set when present
    pub lines: Option<Vec<NewInvoiceLine>>,
}

/// Input for recording a payment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

/// Listing filter.
#[derive(Debug, Clone, Default)]
pub struct InvoiceQuery {
    pub invoice_type: Option<InvoiceType>,
    pub status: Option<InvoiceStatus>,
    pub location_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub vendor_id: Option<i64>,
    pub confirmed_from: Option<DateTime<Utc>>,
    pub confirmed_to: Option<DateTime<Utc>>,
}

/// An invoice with its owned rows.
#[derive(Debug, Clone)]
pub struct InvoiceDetail {
    pub invoice: invoice::Model,
    pub lines: Vec<invoice_line::Model>,
    pub payments: Vec<payment::Model>,
}

/// Lifecycle manager for sale and purchase invoices.
///
/// Owns the draft -> confirmed -> paid state machine and drives all stock
/// and ledger side effects transactionally on confirmation.
#[derive(Clone)]
pub struct InvoiceService {
    db: Arc<DbPool>,
    events: Arc<EventSender>,
}

impl InvoiceService {
    pub fn new(db: Arc<DbPool>, events: Arc<EventSender>) -> Self {
        Self { db, events }
    }

    /// Creates a draft invoice with its lines and computed totals. No
    /// stock or ledger effect until [`confirm`](Self::confirm).
    #[instrument(skip(self, ctx, new_invoice))]
    pub async fn create(
        &self,
        ctx: OperationContext,
        new_invoice: NewInvoice,
    ) -> Result<InvoiceDetail, ServiceError> {
        let discount = costing::round_money(new_invoice.discount);
        if discount < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Discount cannot be negative".to_string(),
            ));
        }
        match new_invoice.invoice_type {
            InvoiceType::Sale => {
                if new_invoice.customer_id.is_none() || new_invoice.vendor_id.is_some() {
                    return Err(ServiceError::ValidationError(
                        "Sale invoices require a customer and no vendor".to_string(),
                    ));
                }
            }
            InvoiceType::Purchase => {
                if new_invoice.vendor_id.is_none() || new_invoice.customer_id.is_some() {
                    return Err(ServiceError::ValidationError(
                        "Purchase invoices require a vendor and no customer".to_string(),
                    ));
                }
            }
        }

        let db = self.db.as_ref();
        let detail = db
            .transaction::<_, InvoiceDetail, ServiceError>(move |txn| {
                Box::pin(async move {
                    find_location(txn, new_invoice.location_id).await?;
                    if let Some(customer_id) = new_invoice.customer_id {
                        find_live_customer(txn, customer_id).await?;
                    }
                    if let Some(vendor_id) = new_invoice.vendor_id {
                        find_live_vendor(txn, vendor_id).await?;
                    }

                    let code = next_code(txn, new_invoice.invoice_type, ctx.now).await?;
                    let draft = invoice::ActiveModel {
                        code: Set(code),
                        invoice_type: Set(new_invoice.invoice_type),
                        status: Set(InvoiceStatus::Draft),
                        location_id: Set(new_invoice.location_id),
                        customer_id: Set(new_invoice.customer_id),
                        vendor_id: Set(new_invoice.vendor_id),
                        sub_total: Set(Decimal::ZERO),
                        discount: Set(discount),
                        tax: Set(Decimal::ZERO),
                        total: Set(Decimal::ZERO),
                        paid: Set(Decimal::ZERO),
                        notes: Set(new_invoice.notes),
                        created_by: Set(ctx.actor_id),
                        created_at: Set(ctx.now),
                        updated_at: Set(ctx.now),
                        ..Default::default()
                    };
                    let draft = draft.insert(txn).await?;

                    persist_lines(txn, &draft, new_invoice.lines, ctx.now).await?;
                    let invoice = recalculate_totals(txn, draft, ctx).await?;
                    load_detail(txn, invoice).await
                })
            })
            .await
            .map_err(ServiceError::from)?;

        info!(
            invoice_id = detail.invoice.id,
            code = %detail.invoice.code,
            "invoice created"
        );
        self.events
            .send(Event::InvoiceCreated {
                invoice_id: detail.invoice.id,
                code: detail.invoice.code.clone(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(detail)
    }

    /// Edits a draft invoice; replaces the line set when one is given and
    /// recomputes totals either way.
    #[instrument(skip(self, ctx, changes))]
    pub async fn update(
        &self,
        ctx: OperationContext,
        invoice_id: i64,
        changes: UpdateInvoice,
    ) -> Result<InvoiceDetail, ServiceError> {
        let db = self.db.as_ref();
        let detail = db
            .transaction::<_, InvoiceDetail, ServiceError>(move |txn| {
                Box::pin(async move {
                    let invoice = find_live_invoice(txn, invoice_id).await?;
                    if !invoice.is_editable() {
                        return Err(ServiceError::InvalidState(format!(
                            "Invoice {} cannot be edited in its current status",
                            invoice.code
                        )));
                    }

                    let mut active: invoice::ActiveModel = invoice.clone().into();
                    if let Some(discount) = changes.discount {
                        let discount = costing::round_money(discount);
                        if discount < Decimal::ZERO {
                            return Err(ServiceError::ValidationError(
                                "Discount cannot be negative".to_string(),
                            ));
                        }
                        active.discount = Set(discount);
                    }
                    if let Some(notes) = changes.notes {
                        active.notes = Set(Some(notes));
                    }
                    active.updated_at = Set(ctx.now);
                    let invoice = active.update(txn).await?;

                    if let Some(lines) = changes.lines {
                        InvoiceLine::delete_many()
                            .filter(invoice_line::Column::InvoiceId.eq(invoice.id))
                            .exec(txn)
                            .await?;
                        persist_lines(txn, &invoice, lines, ctx.now).await?;
                    }

                    let invoice = recalculate_totals(txn, invoice, ctx).await?;
                    load_detail(txn, invoice).await
                })
            })
            .await
            .map_err(ServiceError::from)?;

        Ok(detail)
    }

    /// Confirms a draft invoice, applying every line's stock effect and
    /// ledger entry in one transaction. Purchase lines increase stock and
    /// rebase WAC; sale lines decrease stock and capture the current WAC
    /// as their cost. Any failure rolls the whole confirmation back.
    #[instrument(skip(self, ctx))]
    pub async fn confirm(
        &self,
        ctx: OperationContext,
        invoice_id: i64,
    ) -> Result<invoice::Model, ServiceError> {
        let db = self.db.as_ref();
        let confirmed = db
            .transaction::<_, invoice::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let invoice = find_live_invoice(txn, invoice_id).await?;
                    if invoice.status != InvoiceStatus::Draft {
                        return Err(ServiceError::InvalidState(format!(
                            "Only draft invoices can be confirmed, {} is {:?}",
                            invoice.code, invoice.status
                        )));
                    }

                    let lines = InvoiceLine::find()
                        .filter(invoice_line::Column::InvoiceId.eq(invoice.id))
                        .all(txn)
                        .await?;
                    if lines.is_empty() {
                        return Err(ServiceError::ValidationError(
                            "Invoice must have at least one line item".to_string(),
                        ));
                    }

                    for line in lines {
                        confirm_line(txn, &invoice, line, ctx).await?;
                    }

                    let mut active: invoice::ActiveModel = invoice.into();
                    active.status = Set(InvoiceStatus::Confirmed);
                    active.confirmed_at = Set(Some(ctx.now));
                    active.updated_at = Set(ctx.now);
                    active.update(txn).await.map_err(ServiceError::DatabaseError)
                })
            })
            .await
            .map_err(ServiceError::from)?;

        info!(
            invoice_id = confirmed.id,
            code = %confirmed.code,
            total = %confirmed.total,
            "invoice confirmed"
        );
        self.events
            .send(Event::InvoiceConfirmed {
                invoice_id: confirmed.id,
                code: confirmed.code.clone(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(confirmed)
    }

    /// Records a payment against a confirmed invoice. The amount must not
    /// exceed the outstanding balance; reaching the total flips the
    /// invoice to paid. This is the only transition into `paid`.
    #[instrument(skip(self, ctx, new_payment))]
    pub async fn add_payment(
        &self,
        ctx: OperationContext,
        invoice_id: i64,
        new_payment: NewPayment,
    ) -> Result<(invoice::Model, payment::Model), ServiceError> {
        let db = self.db.as_ref();
        let (invoice, payment) = db
            .transaction::<_, (invoice::Model, payment::Model), ServiceError>(move |txn| {
                Box::pin(async move {
                    let invoice = find_live_invoice(txn, invoice_id).await?;
                    if !matches!(
                        invoice.status,
                        InvoiceStatus::Confirmed | InvoiceStatus::Paid
                    ) {
                        return Err(ServiceError::InvalidState(format!(
                            "Only confirmed invoices can receive payments, {} is {:?}",
                            invoice.code, invoice.status
                        )));
                    }

                    let amount = costing::round_money(new_payment.amount);
                    if amount <= Decimal::ZERO {
                        return Err(ServiceError::ValidationError(
                            "Payment amount must be positive".to_string(),
                        ));
                    }
                    let balance = invoice.balance();
                    if amount > balance {
                        return Err(ServiceError::ValidationError(format!(
                            "Payment amount exceeds outstanding balance of {}",
                            balance
                        )));
                    }

                    let payment = payment::ActiveModel {
                        invoice_id: Set(invoice.id),
                        amount: Set(amount),
                        method: Set(new_payment.method),
                        paid_at: Set(ctx.now),
                        reference: Set(new_payment.reference),
                        notes: Set(new_payment.notes),
                        created_by: Set(ctx.actor_id),
                        created_at: Set(ctx.now),
                        ..Default::default()
                    };
                    let payment = payment.insert(txn).await?;

                    let new_paid = invoice.paid + amount;
                    let total = invoice.total;
                    let mut active: invoice::ActiveModel = invoice.into();
                    active.paid = Set(new_paid);
                    if new_paid >= total {
                        active.status = Set(InvoiceStatus::Paid);
                    }
                    active.updated_at = Set(ctx.now);
                    let invoice = active.update(txn).await?;

                    Ok((invoice, payment))
                })
            })
            .await
            .map_err(ServiceError::from)?;

        info!(
            invoice_id = invoice.id,
            amount = %payment.amount,
            paid = %invoice.paid,
            "payment recorded"
        );
        self.events
            .send(Event::PaymentRecorded {
                invoice_id: invoice.id,
                payment_id: payment.id,
                amount: payment.amount,
            })
            .await
            .map_err(ServiceError::EventError)?;
        if invoice.status == InvoiceStatus::Paid {
            self.events
                .send(Event::InvoicePaid {
                    invoice_id: invoice.id,
                })
                .await
                .map_err(ServiceError::EventError)?;
        }

        Ok((invoice, payment))
    }

    /// Voids a draft invoice. Terminal; no stock effect, since drafts
    /// never touched stock.
    #[instrument(skip(self, ctx))]
    pub async fn void(
        &self,
        ctx: OperationContext,
        invoice_id: i64,
    ) -> Result<invoice::Model, ServiceError> {
        let db = self.db.as_ref();
        let voided = db
            .transaction::<_, invoice::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let invoice = find_live_invoice(txn, invoice_id).await?;
                    if invoice.status != InvoiceStatus::Draft {
                        return Err(ServiceError::InvalidState(format!(
                            "Only draft invoices can be voided, {} is {:?}",
                            invoice.code, invoice.status
                        )));
                    }

                    let mut active: invoice::ActiveModel = invoice.into();
                    active.status = Set(InvoiceStatus::Void);
                    active.updated_at = Set(ctx.now);
                    active.update(txn).await.map_err(ServiceError::DatabaseError)
                })
            })
            .await
            .map_err(ServiceError::from)?;

        self.events
            .send(Event::InvoiceVoided {
                invoice_id: voided.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(voided)
    }

    /// Soft-deletes a draft invoice. Confirmed invoices are never
    /// deletable through this path.
    #[instrument(skip(self, ctx))]
    pub async fn delete(&self, ctx: OperationContext, invoice_id: i64) -> Result<(), ServiceError> {
        let db = self.db.as_ref();
        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                let invoice = find_live_invoice(txn, invoice_id).await?;
                if invoice.status != InvoiceStatus::Draft {
                    return Err(ServiceError::InvalidState(format!(
                        "Invoice {} cannot be deleted in its current status",
                        invoice.code
                    )));
                }

                let mut active: invoice::ActiveModel = invoice.into();
                active.deleted_at = Set(Some(ctx.now));
                active.updated_at = Set(ctx.now);
                active.update(txn).await?;
                Ok(())
            })
        })
        .await
        .map_err(ServiceError::from)
    }

    /// Fetches a live invoice.
    pub async fn get(&self, invoice_id: i64) -> Result<invoice::Model, ServiceError> {
        find_live_invoice(self.db.as_ref(), invoice_id).await
    }

    /// Fetches a live invoice with its lines and payments.
    pub async fn get_with_lines(&self, invoice_id: i64) -> Result<InvoiceDetail, ServiceError> {
        let db = self.db.as_ref();
        let invoice = find_live_invoice(db, invoice_id).await?;
        load_detail(db, invoice).await
    }

    /// Lists live invoices matching the filter, newest first.
    pub async fn list(&self, query: InvoiceQuery) -> Result<Vec<invoice::Model>, ServiceError> {
        let mut select = Invoice::find().filter(invoice::Column::DeletedAt.is_null());
        if let Some(invoice_type) = query.invoice_type {
            select = select.filter(invoice::Column::InvoiceType.eq(invoice_type));
        }
        if let Some(status) = query.status {
            select = select.filter(invoice::Column::Status.eq(status));
        }
        if let Some(location_id) = query.location_id {
            select = select.filter(invoice::Column::LocationId.eq(location_id));
        }
        if let Some(customer_id) = query.customer_id {
            select = select.filter(invoice::Column::CustomerId.eq(customer_id));
        }
        if let Some(vendor_id) = query.vendor_id {
            select = select.filter(invoice::Column::VendorId.eq(vendor_id));
        }
        if let Some(confirmed_from) = query.confirmed_from {
            select = select.filter(invoice::Column::ConfirmedAt.gte(confirmed_from));
        }
        if let Some(confirmed_to) = query.confirmed_to {
            select = select.filter(invoice::Column::ConfirmedAt.lte(confirmed_to));
        }

        select
            .order_by_desc(invoice::Column::CreatedAt)
            .order_by_desc(invoice::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Cost of goods sold for a sale invoice; zero for purchases.
    pub async fn cogs(&self, invoice_id: i64) -> Result<Decimal, ServiceError> {
        let detail = self.get_with_lines(invoice_id).await?;
        Ok(detail.invoice.cogs(&detail.lines))
    }

    /// Gross profit for a sale invoice; zero for purchases.
    pub async fn gross_profit(&self, invoice_id: i64) -> Result<Decimal, ServiceError> {
        let detail = self.get_with_lines(invoice_id).await?;
        Ok(detail.invoice.gross_profit(&detail.lines))
    }
}

/// Applies one line's stock effect and writes its ledger entry.
async fn confirm_line<C: ConnectionTrait>(
    conn: &C,
    invoice: &invoice::Model,
    line: invoice_line::Model,
    ctx: OperationContext,
) -> Result<(), ServiceError> {
    match invoice.invoice_type {
        InvoiceType::Purchase => {
            let unit_cost = line.unit_cost.ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "Purchase line {} is missing a unit cost",
                    line.id
                ))
            })?;
            apply_movement(
                conn,
                line.product_id,
                invoice.location_id,
                line.qty,
                Some(unit_cost),
                ctx.now,
            )
            .await?;
            record_movement(
                conn,
                NewMovement {
                    product_id: line.product_id,
                    from_location_id: None,
                    to_location_id: Some(invoice.location_id),
                    qty: line.qty,
                    unit_cost: Some(unit_cost),
                    unit_price: None,
                    reason: MovementReason::Purchase,
                    reference_type: Some("invoice".to_string()),
                    reference_id: Some(invoice.id),
                    moved_at: ctx.now,
                    note: Some(format!("Purchase invoice: {}", invoice.code)),
                    created_by: ctx.actor_id,
                },
            )
            .await?;
        }
        InvoiceType::Sale => {
            let position = apply_movement(
                conn,
                line.product_id,
                invoice.location_id,
                -line.qty,
                None,
                ctx.now,
            )
            .await?;
            let wac = position.wac;

            // The sold cost basis is the WAC at confirmation time, not
            // whatever snapshot the draft carried.
            let qty = line.qty;
            let unit_price = line.unit_price;
            let mut active: invoice_line::ActiveModel = line.into();
            active.unit_cost = Set(Some(wac));
            active.updated_at = Set(ctx.now);
            active.update(conn).await?;

            record_movement(
                conn,
                NewMovement {
                    product_id: position.product_id,
                    from_location_id: Some(invoice.location_id),
                    to_location_id: None,
                    qty: -qty,
                    unit_cost: Some(wac),
                    unit_price: Some(unit_price),
                    reason: MovementReason::Sale,
                    reference_type: Some("invoice".to_string()),
                    reference_id: Some(invoice.id),
                    moved_at: ctx.now,
                    note: Some(format!("Sales invoice: {}", invoice.code)),
                    created_by: ctx.actor_id,
                },
            )
            .await?;
        }
    }
    Ok(())
}

async fn find_live_invoice<C: ConnectionTrait>(
    conn: &C,
    invoice_id: i64,
) -> Result<invoice::Model, ServiceError> {
    Invoice::find_by_id(invoice_id)
        .filter(invoice::Column::DeletedAt.is_null())
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Invoice {} not found", invoice_id)))
}

/// Next date-sequenced code for the given type, e.g. `SAL202406150007`.
async fn next_code<C: ConnectionTrait>(
    conn: &C,
    invoice_type: InvoiceType,
    now: DateTime<Utc>,
) -> Result<String, ServiceError> {
    let prefix = invoice_type.code_prefix();
    let stamp = now.format("%Y%m%d").to_string();
    let pattern = format!("{}{}%", prefix, stamp);

    let last = Invoice::find()
        .filter(invoice::Column::Code.like(pattern.as_str()))
        .order_by_desc(invoice::Column::Code)
        .one(conn)
        .await?;

    let sequence = last
        .and_then(|existing| {
            existing
                .code
                .get(prefix.len() + stamp.len()..)
                .and_then(|tail| tail.parse::<u32>().ok())
        })
        .map_or(1, |last_seq| last_seq + 1);

    Ok(format!("{}{}{:04}", prefix, stamp, sequence))
}

/// Validates and inserts the given lines for a draft invoice.
async fn persist_lines<C: ConnectionTrait>(
    conn: &C,
    invoice: &invoice::Model,
    lines: Vec<NewInvoiceLine>,
    now: DateTime<Utc>,
) -> Result<(), ServiceError> {
    for line in lines {
        let qty = costing::round_qty(line.qty);
        if qty <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Line quantity must be positive".to_string(),
            ));
        }

        let product = find_live_product(conn, line.product_id).await?;
        let unit_price = costing::round_money(line.unit_price.unwrap_or(product.sell_price));
        if unit_price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Line unit price cannot be negative".to_string(),
            ));
        }

        let unit_cost = match (invoice.invoice_type, line.unit_cost) {
            (InvoiceType::Purchase, None) => {
                return Err(ServiceError::ValidationError(format!(
                    "Unit cost is required for purchase lines (product {})",
                    product.sku
                )));
            }
            (_, Some(cost)) if cost < Decimal::ZERO => {
                return Err(ServiceError::ValidationError(
                    "Line unit cost cannot be negative".to_string(),
                ));
            }
            (_, Some(cost)) => Some(costing::round_money(cost)),
            // Sale lines default to the current position WAC, falling
            // back to the product's cost price before any stock exists.
            (InvoiceType::Sale, None) => {
                let position = stock_item::Entity::find()
                    .filter(stock_item::Column::ProductId.eq(product.id))
                    .filter(stock_item::Column::LocationId.eq(invoice.location_id))
                    .one(conn)
                    .await?;
                Some(position.map_or(product.cost_price, |p| p.wac))
            }
        };

        let row = invoice_line::ActiveModel {
            invoice_id: Set(invoice.id),
            product_id: Set(product.id),
            qty: Set(qty),
            unit_price: Set(unit_price),
            unit_cost: Set(unit_cost),
            line_total: Set(costing::line_total(qty, unit_price)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        row.insert(conn).await?;
    }

    Ok(())
}

/// Recomputes the derived monetary fields from the current line set.
///
/// The single source of truth for `total`: runs after every line
/// mutation and before every save of the invoice's monetary fields.
async fn recalculate_totals<C: ConnectionTrait>(
    conn: &C,
    invoice: invoice::Model,
    ctx: OperationContext,
) -> Result<invoice::Model, ServiceError> {
    let lines = InvoiceLine::find()
        .filter(invoice_line::Column::InvoiceId.eq(invoice.id))
        .all(conn)
        .await?;

    let sub_total = costing::round_money(lines.iter().map(|line| line.line_total).sum());
    if invoice.discount > sub_total {
        return Err(ServiceError::ValidationError(format!(
            "Discount {} exceeds invoice sub-total {}",
            invoice.discount, sub_total
        )));
    }
    let tax = costing::tax_amount(sub_total, invoice.discount, ctx.tax_rate_percent);
    let total = sub_total - invoice.discount + tax;

    let mut active: invoice::ActiveModel = invoice.into();
    active.sub_total = Set(sub_total);
    active.tax = Set(tax);
    active.total = Set(total);
    active.updated_at = Set(ctx.now);
    active.update(conn).await.map_err(ServiceError::DatabaseError)
}

async fn load_detail<C: ConnectionTrait>(
    conn: &C,
    invoice: invoice::Model,
) -> Result<InvoiceDetail, ServiceError> {
    let lines = InvoiceLine::find()
        .filter(invoice_line::Column::InvoiceId.eq(invoice.id))
        .order_by_asc(invoice_line::Column::Id)
        .all(conn)
        .await?;
    let payments = Payment::find()
        .filter(payment::Column::InvoiceId.eq(invoice.id))
        .order_by_asc(payment::Column::Id)
        .all(conn)
        .await?;

    Ok(InvoiceDetail {
        invoice,
        lines,
        payments,
    })
}
