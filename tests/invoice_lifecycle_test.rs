mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use stockbook::entities::invoice::{InvoiceStatus, InvoiceType};
use stockbook::entities::payment::PaymentMethod;
use stockbook::entities::stock_ledger::MovementReason;
use stockbook::services::invoices::{
    InvoiceService, NewInvoice, NewInvoiceLine, NewPayment, UpdateInvoice,
};
use stockbook::services::stock::{LedgerQuery, StockService};
use stockbook::ServiceError;

use common::{create_customer, create_location, create_product, create_vendor, ctx, setup};

fn purchase_line(product_id: i64, qty: rust_decimal::Decimal, cost: rust_decimal::Decimal) -> NewInvoiceLine {
    NewInvoiceLine {
        product_id,
        qty,
        unit_price: Some(cost),
        unit_cost: Some(cost),
    }
}

fn sale_line(product_id: i64, qty: rust_decimal::Decimal, price: rust_decimal::Decimal) -> NewInvoiceLine {
    NewInvoiceLine {
        product_id,
        qty,
        unit_price: Some(price),
        unit_cost: None,
    }
}

#[tokio::test]
async fn purchase_confirmations_build_weighted_average_cost() {
    let app = setup().await;
    let invoices = InvoiceService::new(app.db.clone(), app.events.clone());
    let stock = StockService::new(app.db.clone(), app.events.clone());

    let product = create_product(&app.db, "WIDGET-1", dec!(4.00), dec!(15.00)).await;
    let warehouse = create_location(&app.db, "Main Warehouse").await;
    let vendor = create_vendor(&app.db, "Acme Supply").await;
    let ctx = ctx(dec!(0));

    // First purchase into an empty position: 10 @ 5.00
    let first = invoices
        .create(
            ctx,
            NewInvoice {
                invoice_type: InvoiceType::Purchase,
                location_id: warehouse.id,
                customer_id: None,
                vendor_id: Some(vendor.id),
                discount: dec!(0),
                notes: None,
                lines: vec![purchase_line(product.id, dec!(10), dec!(5.00))],
            },
        )
        .await
        .expect("Failed to create purchase invoice");
    invoices
        .confirm(ctx, first.invoice.id)
        .await
        .expect("Failed to confirm purchase invoice");

    let position = stock
        .position(product.id, warehouse.id)
        .await
        .unwrap()
        .expect("Position should exist after purchase");
    assert_eq!(position.qty, dec!(10));
    assert_eq!(position.wac, dec!(5.00));

    let entries = stock
        .ledger(LedgerQuery {
            product_id: Some(product.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].reason, MovementReason::Purchase);
    assert_eq!(entries[0].qty, dec!(10));
    assert_eq!(entries[0].unit_cost, Some(dec!(5.00)));

    // Second purchase rebases WAC: (10*5 + 10*7) / 20 = 6.00
    let second = invoices
        .create(
            ctx,
            NewInvoice {
                invoice_type: InvoiceType::Purchase,
                location_id: warehouse.id,
                customer_id: None,
                vendor_id: Some(vendor.id),
                discount: dec!(0),
                notes: None,
                lines: vec![purchase_line(product.id, dec!(10), dec!(7.00))],
            },
        )
        .await
        .unwrap();
    invoices.confirm(ctx, second.invoice.id).await.unwrap();

    let position = stock
        .position(product.id, warehouse.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(position.qty, dec!(20));
    assert_eq!(position.wac, dec!(6.00));
}

#[tokio::test]
async fn sale_confirmation_captures_cogs_at_current_wac() {
    let app = setup().await;
    let invoices = InvoiceService::new(app.db.clone(), app.events.clone());
    let stock = StockService::new(app.db.clone(), app.events.clone());

    let product = create_product(&app.db, "WIDGET-2", dec!(4.00), dec!(15.00)).await;
    let warehouse = create_location(&app.db, "Main Warehouse").await;
    let vendor = create_vendor(&app.db, "Acme Supply").await;
    let customer = create_customer(&app.db, "Walk-in Customer").await;
    let ctx = ctx(dec!(0));

    // Seed 20 units at WAC 6.00 through two purchases
    for cost in [dec!(5.00), dec!(7.00)] {
        let purchase = invoices
            .create(
                ctx,
                NewInvoice {
                    invoice_type: InvoiceType::Purchase,
                    location_id: warehouse.id,
                    customer_id: None,
                    vendor_id: Some(vendor.id),
                    discount: dec!(0),
                    notes: None,
                    lines: vec![purchase_line(product.id, dec!(10), cost)],
                },
            )
            .await
            .unwrap();
        invoices.confirm(ctx, purchase.invoice.id).await.unwrap();
    }

    let sale = invoices
        .create(
            ctx,
            NewInvoice {
                invoice_type: InvoiceType::Sale,
                location_id: warehouse.id,
                customer_id: Some(customer.id),
                vendor_id: None,
                discount: dec!(0),
                notes: None,
                lines: vec![sale_line(product.id, dec!(5), dec!(15.00))],
            },
        )
        .await
        .unwrap();
    let confirmed = invoices.confirm(ctx, sale.invoice.id).await.unwrap();
    assert_eq!(confirmed.status, InvoiceStatus::Confirmed);
    assert!(confirmed.confirmed_at.is_some());

    // Sale decreases quantity but leaves WAC untouched
    let position = stock
        .position(product.id, warehouse.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(position.qty, dec!(15));
    assert_eq!(position.wac, dec!(6.00));

    // COGS = 5 * 6.00, gross profit = 75.00 - 30.00
    assert_eq!(invoices.cogs(sale.invoice.id).await.unwrap(), dec!(30.00));
    assert_eq!(
        invoices.gross_profit(sale.invoice.id).await.unwrap(),
        dec!(45.00)
    );

    // The sale ledger entry carries the WAC it consumed
    let entries = stock
        .ledger(LedgerQuery {
            product_id: Some(product.id),
            reason: Some(MovementReason::Sale),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].qty, dec!(-5));
    assert_eq!(entries[0].unit_cost, Some(dec!(6.00)));
    assert_eq!(entries[0].unit_price, Some(dec!(15.00)));
}

#[tokio::test]
async fn overselling_aborts_with_available_quantity_and_no_side_effects() {
    let app = setup().await;
    let invoices = InvoiceService::new(app.db.clone(), app.events.clone());
    let stock = StockService::new(app.db.clone(), app.events.clone());

    let product = create_product(&app.db, "WIDGET-3", dec!(4.00), dec!(15.00)).await;
    let warehouse = create_location(&app.db, "Main Warehouse").await;
    let vendor = create_vendor(&app.db, "Acme Supply").await;
    let customer = create_customer(&app.db, "Walk-in Customer").await;
    let ctx = ctx(dec!(0));

    let purchase = invoices
        .create(
            ctx,
            NewInvoice {
                invoice_type: InvoiceType::Purchase,
                location_id: warehouse.id,
                customer_id: None,
                vendor_id: Some(vendor.id),
                discount: dec!(0),
                notes: None,
                lines: vec![purchase_line(product.id, dec!(15), dec!(6.00))],
            },
        )
        .await
        .unwrap();
    invoices.confirm(ctx, purchase.invoice.id).await.unwrap();

    let sale = invoices
        .create(
            ctx,
            NewInvoice {
                invoice_type: InvoiceType::Sale,
                location_id: warehouse.id,
                customer_id: Some(customer.id),
                vendor_id: None,
                discount: dec!(0),
                notes: None,
                lines: vec![sale_line(product.id, dec!(1000), dec!(15.00))],
            },
        )
        .await
        .unwrap();

    let err = invoices.confirm(ctx, sale.invoice.id).await.unwrap_err();
    assert_matches!(
        err,
        ServiceError::InsufficientStock { available } if available == dec!(15)
    );

    // Nothing committed: position unchanged, no sale ledger row, invoice
    // still a draft.
    let position = stock
        .position(product.id, warehouse.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(position.qty, dec!(15));

    let sale_entries = stock
        .ledger(LedgerQuery {
            product_id: Some(product.id),
            reason: Some(MovementReason::Sale),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(sale_entries.is_empty());

    let reloaded = invoices.get(sale.invoice.id).await.unwrap();
    assert_eq!(reloaded.status, InvoiceStatus::Draft);
}

#[tokio::test]
async fn totals_follow_lines_discount_and_tax() {
    let app = setup().await;
    let invoices = InvoiceService::new(app.db.clone(), app.events.clone());

    let p1 = create_product(&app.db, "WIDGET-4", dec!(4.00), dec!(50.00)).await;
    let p2 = create_product(&app.db, "WIDGET-5", dec!(4.00), dec!(100.00)).await;
    let warehouse = create_location(&app.db, "Main Warehouse").await;
    let customer = create_customer(&app.db, "Walk-in Customer").await;
    let ctx = ctx(dec!(10));

    let detail = invoices
        .create(
            ctx,
            NewInvoice {
                invoice_type: InvoiceType::Sale,
                location_id: warehouse.id,
                customer_id: Some(customer.id),
                vendor_id: None,
                discount: dec!(20.00),
                notes: None,
                lines: vec![
                    sale_line(p1.id, dec!(2), dec!(50.00)),
                    sale_line(p2.id, dec!(1), dec!(100.00)),
                ],
            },
        )
        .await
        .unwrap();

    // sub_total 200, discount 20, tax (200-20)*10% = 18, total 198
    assert_eq!(detail.invoice.sub_total, dec!(200.00));
    assert_eq!(detail.invoice.discount, dec!(20.00));
    assert_eq!(detail.invoice.tax, dec!(18.00));
    assert_eq!(detail.invoice.total, dec!(198.00));
    assert_eq!(
        detail.invoice.total,
        detail.invoice.sub_total - detail.invoice.discount + detail.invoice.tax
    );

    // Replacing the line set recomputes everything
    let updated = invoices
        .update(
            ctx,
            detail.invoice.id,
            UpdateInvoice {
                discount: Some(dec!(0)),
                notes: None,
                lines: Some(vec![sale_line(p1.id, dec!(1), dec!(50.00))]),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.invoice.sub_total, dec!(50.00));
    assert_eq!(updated.invoice.tax, dec!(5.00));
    assert_eq!(updated.invoice.total, dec!(55.00));
    assert_eq!(updated.lines.len(), 1);

    // A discount larger than the sub-total is rejected
    let err = invoices
        .update(
            ctx,
            detail.invoice.id,
            UpdateInvoice {
                discount: Some(dec!(60.00)),
                notes: None,
                lines: None,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn counterparty_must_match_invoice_type() {
    let app = setup().await;
    let invoices = InvoiceService::new(app.db.clone(), app.events.clone());

    let product = create_product(&app.db, "WIDGET-6", dec!(4.00), dec!(15.00)).await;
    let warehouse = create_location(&app.db, "Main Warehouse").await;
    let vendor = create_vendor(&app.db, "Acme Supply").await;
    let ctx = ctx(dec!(0));

    // Sale without a customer
    let err = invoices
        .create(
            ctx,
            NewInvoice {
                invoice_type: InvoiceType::Sale,
                location_id: warehouse.id,
                customer_id: None,
                vendor_id: None,
                discount: dec!(0),
                notes: None,
                lines: vec![sale_line(product.id, dec!(1), dec!(15.00))],
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));

    // Sale with a vendor attached
    let err = invoices
        .create(
            ctx,
            NewInvoice {
                invoice_type: InvoiceType::Sale,
                location_id: warehouse.id,
                customer_id: None,
                vendor_id: Some(vendor.id),
                discount: dec!(0),
                notes: None,
                lines: vec![],
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));

    // Purchase without a vendor
    let err = invoices
        .create(
            ctx,
            NewInvoice {
                invoice_type: InvoiceType::Purchase,
                location_id: warehouse.id,
                customer_id: None,
                vendor_id: None,
                discount: dec!(0),
                notes: None,
                lines: vec![],
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn codes_are_date_sequenced_per_prefix() {
    let app = setup().await;
    let invoices = InvoiceService::new(app.db.clone(), app.events.clone());

    let warehouse = create_location(&app.db, "Main Warehouse").await;
    let customer = create_customer(&app.db, "Walk-in Customer").await;
    let vendor = create_vendor(&app.db, "Acme Supply").await;
    let ctx = ctx(dec!(0));

    let stamp = ctx.now.format("%Y%m%d").to_string();

    let first = invoices
        .create(
            ctx,
            NewInvoice {
                invoice_type: InvoiceType::Sale,
                location_id: warehouse.id,
                customer_id: Some(customer.id),
                vendor_id: None,
                discount: dec!(0),
                notes: None,
                lines: vec![],
            },
        )
        .await
        .unwrap();
    let second = invoices
        .create(
            ctx,
            NewInvoice {
                invoice_type: InvoiceType::Sale,
                location_id: warehouse.id,
                customer_id: Some(customer.id),
                vendor_id: None,
                discount: dec!(0),
                notes: None,
                lines: vec![],
            },
        )
        .await
        .unwrap();
    let purchase = invoices
        .create(
            ctx,
            NewInvoice {
                invoice_type: InvoiceType::Purchase,
                location_id: warehouse.id,
                customer_id: None,
                vendor_id: Some(vendor.id),
                discount: dec!(0),
                notes: None,
                lines: vec![],
            },
        )
        .await
        .unwrap();

    assert_eq!(first.invoice.code, format!("SAL{}0001", stamp));
    assert_eq!(second.invoice.code, format!("SAL{}0002", stamp));
    // Purchase sequence is independent of the sale sequence
    assert_eq!(purchase.invoice.code, format!("PUR{}0001", stamp));
}

#[tokio::test]
async fn confirm_is_rejected_outside_draft_and_writes_no_duplicates() {
    let app = setup().await;
    let invoices = InvoiceService::new(app.db.clone(), app.events.clone());
    let stock = StockService::new(app.db.clone(), app.events.clone());

    let product = create_product(&app.db, "WIDGET-7", dec!(4.00), dec!(15.00)).await;
    let warehouse = create_location(&app.db, "Main Warehouse").await;
    let vendor = create_vendor(&app.db, "Acme Supply").await;
    let ctx = ctx(dec!(0));

    let purchase = invoices
        .create(
            ctx,
            NewInvoice {
                invoice_type: InvoiceType::Purchase,
                location_id: warehouse.id,
                customer_id: None,
                vendor_id: Some(vendor.id),
                discount: dec!(0),
                notes: None,
                lines: vec![purchase_line(product.id, dec!(10), dec!(5.00))],
            },
        )
        .await
        .unwrap();
    invoices.confirm(ctx, purchase.invoice.id).await.unwrap();

    let err = invoices.confirm(ctx, purchase.invoice.id).await.unwrap_err();
    assert_matches!(err, ServiceError::InvalidState(_));

    let entries = stock
        .ledger(LedgerQuery {
            product_id: Some(product.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(entries.len(), 1, "second confirm must not duplicate entries");

    let position = stock
        .position(product.id, warehouse.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(position.qty, dec!(10));
}

#[tokio::test]
async fn confirming_an_empty_invoice_is_rejected() {
    let app = setup().await;
    let invoices = InvoiceService::new(app.db.clone(), app.events.clone());

    let warehouse = create_location(&app.db, "Main Warehouse").await;
    let customer = create_customer(&app.db, "Walk-in Customer").await;
    let ctx = ctx(dec!(0));

    let empty = invoices
        .create(
            ctx,
            NewInvoice {
                invoice_type: InvoiceType::Sale,
                location_id: warehouse.id,
                customer_id: Some(customer.id),
                vendor_id: None,
                discount: dec!(0),
                notes: None,
                lines: vec![],
            },
        )
        .await
        .unwrap();

    let err = invoices.confirm(ctx, empty.invoice.id).await.unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn payments_accumulate_and_flip_status_to_paid() {
    let app = setup().await;
    let invoices = InvoiceService::new(app.db.clone(), app.events.clone());

    let product = create_product(&app.db, "WIDGET-8", dec!(4.00), dec!(23.00)).await;
    let warehouse = create_location(&app.db, "Main Warehouse").await;
    let vendor = create_vendor(&app.db, "Acme Supply").await;
    let ctx = ctx(dec!(0));

    // total = 2 * 23.00 = 46.00
    let purchase = invoices
        .create(
            ctx,
            NewInvoice {
                invoice_type: InvoiceType::Purchase,
                location_id: warehouse.id,
                customer_id: None,
                vendor_id: Some(vendor.id),
                discount: dec!(0),
                notes: None,
                lines: vec![purchase_line(product.id, dec!(2), dec!(23.00))],
            },
        )
        .await
        .unwrap();
    let invoice_id = purchase.invoice.id;

    // Paying a draft is a state error
    let err = invoices
        .add_payment(
            ctx,
            invoice_id,
            NewPayment {
                amount: dec!(10.00),
                method: PaymentMethod::Cash,
                reference: None,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidState(_));

    invoices.confirm(ctx, invoice_id).await.unwrap();

    let (partial, _) = invoices
        .add_payment(
            ctx,
            invoice_id,
            NewPayment {
                amount: dec!(20.00),
                method: PaymentMethod::Cash,
                reference: None,
                notes: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(partial.paid, dec!(20.00));
    assert_eq!(partial.balance(), dec!(26.00));
    assert_eq!(partial.status, InvoiceStatus::Confirmed);

    // Over the outstanding balance: rejected before any write
    let err = invoices
        .add_payment(
            ctx,
            invoice_id,
            NewPayment {
                amount: dec!(30.00),
                method: PaymentMethod::Card,
                reference: None,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));

    let (paid, _) = invoices
        .add_payment(
            ctx,
            invoice_id,
            NewPayment {
                amount: dec!(26.00),
                method: PaymentMethod::Transfer,
                reference: Some("SLIP-77".to_string()),
                notes: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(paid.paid, dec!(46.00));
    assert_eq!(paid.balance(), dec!(0.00));
    assert_eq!(paid.status, InvoiceStatus::Paid);

    // Fully paid: any further positive amount exceeds the zero balance
    let err = invoices
        .add_payment(
            ctx,
            invoice_id,
            NewPayment {
                amount: dec!(0.01),
                method: PaymentMethod::Cash,
                reference: None,
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));

    let detail = invoices.get_with_lines(invoice_id).await.unwrap();
    assert_eq!(detail.payments.len(), 2);
}

#[tokio::test]
async fn drafts_can_be_voided_or_deleted_but_confirmed_cannot() {
    let app = setup().await;
    let invoices = InvoiceService::new(app.db.clone(), app.events.clone());

    let product = create_product(&app.db, "WIDGET-9", dec!(4.00), dec!(15.00)).await;
    let warehouse = create_location(&app.db, "Main Warehouse").await;
    let vendor = create_vendor(&app.db, "Acme Supply").await;
    let customer = create_customer(&app.db, "Walk-in Customer").await;
    let ctx = ctx(dec!(0));

    let draft = invoices
        .create(
            ctx,
            NewInvoice {
                invoice_type: InvoiceType::Sale,
                location_id: warehouse.id,
                customer_id: Some(customer.id),
                vendor_id: None,
                discount: dec!(0),
                notes: None,
                lines: vec![],
            },
        )
        .await
        .unwrap();
    invoices.delete(ctx, draft.invoice.id).await.unwrap();
    let err = invoices.get(draft.invoice.id).await.unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));

    let voidable = invoices
        .create(
            ctx,
            NewInvoice {
                invoice_type: InvoiceType::Sale,
                location_id: warehouse.id,
                customer_id: Some(customer.id),
                vendor_id: None,
                discount: dec!(0),
                notes: None,
                lines: vec![],
            },
        )
        .await
        .unwrap();
    let voided = invoices.void(ctx, voidable.invoice.id).await.unwrap();
    assert_eq!(voided.status, InvoiceStatus::Void);

    let confirmed = invoices
        .create(
            ctx,
            NewInvoice {
                invoice_type: InvoiceType::Purchase,
                location_id: warehouse.id,
                customer_id: None,
                vendor_id: Some(vendor.id),
                discount: dec!(0),
                notes: None,
                lines: vec![purchase_line(product.id, dec!(1), dec!(5.00))],
            },
        )
        .await
        .unwrap();
    invoices.confirm(ctx, confirmed.invoice.id).await.unwrap();

    let err = invoices.delete(ctx, confirmed.invoice.id).await.unwrap_err();
    assert_matches!(err, ServiceError::InvalidState(_));
    let err = invoices.void(ctx, confirmed.invoice.id).await.unwrap_err();
    assert_matches!(err, ServiceError::InvalidState(_));
}

#[tokio::test]
async fn sale_line_cost_falls_back_to_product_cost_before_any_stock() {
    let app = setup().await;
    let invoices = InvoiceService::new(app.db.clone(), app.events.clone());

    let product = create_product(&app.db, "WIDGET-10", dec!(4.00), dec!(15.00)).await;
    let warehouse = create_location(&app.db, "Main Warehouse").await;
    let customer = create_customer(&app.db, "Walk-in Customer").await;
    let ctx = ctx(dec!(0));

    let detail = invoices
        .create(
            ctx,
            NewInvoice {
                invoice_type: InvoiceType::Sale,
                location_id: warehouse.id,
                customer_id: Some(customer.id),
                vendor_id: None,
                discount: dec!(0),
                notes: None,
                lines: vec![sale_line(product.id, dec!(1), dec!(15.00))],
            },
        )
        .await
        .unwrap();

    assert_eq!(detail.lines[0].unit_cost, Some(dec!(4.00)));
}

#[tokio::test]
async fn purchase_line_requires_unit_cost() {
    let app = setup().await;
    let invoices = InvoiceService::new(app.db.clone(), app.events.clone());

    let product = create_product(&app.db, "WIDGET-11", dec!(4.00), dec!(15.00)).await;
    let warehouse = create_location(&app.db, "Main Warehouse").await;
    let vendor = create_vendor(&app.db, "Acme Supply").await;
    let ctx = ctx(dec!(0));

    let err = invoices
        .create(
            ctx,
            NewInvoice {
                invoice_type: InvoiceType::Purchase,
                location_id: warehouse.id,
                customer_id: None,
                vendor_id: Some(vendor.id),
                discount: dec!(0),
                notes: None,
                lines: vec![NewInvoiceLine {
                    product_id: product.id,
                    qty: dec!(5),
                    unit_price: Some(dec!(5.00)),
                    unit_cost: None,
                }],
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}
