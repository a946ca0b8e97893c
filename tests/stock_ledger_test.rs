mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use stockbook::entities::invoice::InvoiceType;
use stockbook::entities::stock_ledger::MovementReason;
use stockbook::services::invoices::{InvoiceService, NewInvoice, NewInvoiceLine};
use stockbook::services::stock::{AdjustStock, LedgerQuery, StockService};
use stockbook::services::transfers::{NewTransfer, NewTransferLine, TransferService};
use stockbook::ServiceError;

use common::{
    create_customer, create_location, create_product, create_product_with_reorder, create_vendor,
    ctx, setup,
};

#[tokio::test]
async fn adjustments_write_position_and_ledger_atomically() {
    let app = setup().await;
    let stock = StockService::new(app.db.clone(), app.events.clone());

    let product = create_product(&app.db, "BOLT-1", dec!(1.00), dec!(2.00)).await;
    let warehouse = create_location(&app.db, "Main Warehouse").await;
    let ctx = ctx(dec!(0));

    let position = stock
        .adjust(
            ctx,
            AdjustStock {
                product_id: product.id,
                location_id: warehouse.id,
                qty_delta: dec!(10),
                note: Some("Initial count".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(position.qty, dec!(10));
    assert_eq!(position.wac, dec!(0));

    let entries = stock
        .ledger(LedgerQuery {
            product_id: Some(product.id),
            reason: Some(MovementReason::Adjustment),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].qty, dec!(10));
    // Positive corrections attribute to the receiving side
    assert_eq!(entries[0].to_location_id, Some(warehouse.id));
    assert_eq!(entries[0].from_location_id, None);

    let position = stock
        .adjust(
            ctx,
            AdjustStock {
                product_id: product.id,
                location_id: warehouse.id,
                qty_delta: dec!(-4),
                note: Some("Damaged units".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(position.qty, dec!(6));

    let entries = stock
        .ledger(LedgerQuery {
            product_id: Some(product.id),
            reason: Some(MovementReason::Adjustment),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
    // Negative corrections attribute to the issuing side
    let negative = entries.iter().find(|e| e.qty == dec!(-4)).unwrap();
    assert_eq!(negative.from_location_id, Some(warehouse.id));
    assert_eq!(negative.to_location_id, None);
}

#[tokio::test]
async fn adjustment_guards_zero_and_negative_results() {
    let app = setup().await;
    let stock = StockService::new(app.db.clone(), app.events.clone());

    let product = create_product(&app.db, "BOLT-2", dec!(1.00), dec!(2.00)).await;
    let warehouse = create_location(&app.db, "Main Warehouse").await;
    let ctx = ctx(dec!(0));

    let err = stock
        .adjust(
            ctx,
            AdjustStock {
                product_id: product.id,
                location_id: warehouse.id,
                qty_delta: dec!(0),
                note: None,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));

    // No position yet: any decrease is an oversell with zero available
    let err = stock
        .adjust(
            ctx,
            AdjustStock {
                product_id: product.id,
                location_id: warehouse.id,
                qty_delta: dec!(-1),
                note: None,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(
        err,
        ServiceError::InsufficientStock { available } if available == dec!(0)
    );

    let err = stock
        .adjust(
            ctx,
            AdjustStock {
                product_id: 9999,
                location_id: warehouse.id,
                qty_delta: dec!(1),
                note: None,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn ledger_replay_reproduces_every_position() {
    let app = setup().await;
    let stock = StockService::new(app.db.clone(), app.events.clone());
    let invoices = InvoiceService::new(app.db.clone(), app.events.clone());
    let transfers = TransferService::new(app.db.clone(), app.events.clone());

    let product = create_product(&app.db, "BOLT-3", dec!(1.00), dec!(9.00)).await;
    let warehouse = create_location(&app.db, "Main Warehouse").await;
    let van = create_location(&app.db, "Van 1").await;
    let vendor = create_vendor(&app.db, "Acme Supply").await;
    let customer = create_customer(&app.db, "Walk-in Customer").await;
    let ctx = ctx(dec!(0));

    // A mixed history: adjustment, purchase, sale, transfer
    stock
        .adjust(
            ctx,
            AdjustStock {
                product_id: product.id,
                location_id: warehouse.id,
                qty_delta: dec!(5),
                note: Some("Opening balance".to_string()),
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
                lines: vec![NewInvoiceLine {
                    product_id: product.id,
                    qty: dec!(10),
                    unit_price: Some(dec!(5.00)),
                    unit_cost: Some(dec!(5.00)),
                }],
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
                lines: vec![NewInvoiceLine {
                    product_id: product.id,
                    qty: dec!(4),
                    unit_price: Some(dec!(9.00)),
                    unit_cost: None,
                }],
            },
        )
        .await
        .unwrap();
    invoices.confirm(ctx, sale.invoice.id).await.unwrap();

    let transfer = transfers
        .create(
            ctx,
            NewTransfer {
                from_location_id: warehouse.id,
                to_location_id: van.id,
                notes: None,
                lines: vec![NewTransferLine {
                    product_id: product.id,
                    qty: dec!(3),
                }],
            },
        )
        .await
        .unwrap();
    transfers.confirm(ctx, transfer.transfer.id).await.unwrap();

    // 5 + 10 - 4 - 3 = 8 at the warehouse, 3 in the van
    let at_warehouse = stock
        .position(product.id, warehouse.id)
        .await
        .unwrap()
        .unwrap();
    let at_van = stock.position(product.id, van.id).await.unwrap().unwrap();
    assert_eq!(at_warehouse.qty, dec!(8));
    assert_eq!(at_van.qty, dec!(3));

    // Replaying the ledger reproduces both cached quantities exactly
    assert_eq!(
        stock
            .ledger_quantity(product.id, warehouse.id)
            .await
            .unwrap(),
        at_warehouse.qty
    );
    assert_eq!(
        stock.ledger_quantity(product.id, van.id).await.unwrap(),
        at_van.qty
    );
}

#[tokio::test]
async fn low_stock_reports_positions_at_or_below_reorder_level() {
    let app = setup().await;
    let stock = StockService::new(app.db.clone(), app.events.clone());

    let scarce =
        create_product_with_reorder(&app.db, "BOLT-4", dec!(1.00), dec!(2.00), dec!(5)).await;
    let plentiful =
        create_product_with_reorder(&app.db, "BOLT-5", dec!(1.00), dec!(2.00), dec!(5)).await;
    let warehouse = create_location(&app.db, "Main Warehouse").await;
    let ctx = ctx(dec!(0));

    stock
        .adjust(
            ctx,
            AdjustStock {
                product_id: scarce.id,
                location_id: warehouse.id,
                qty_delta: dec!(3),
                note: None,
            },
        )
        .await
        .unwrap();
    stock
        .adjust(
            ctx,
            AdjustStock {
                product_id: plentiful.id,
                location_id: warehouse.id,
                qty_delta: dec!(50),
                note: None,
            },
        )
        .await
        .unwrap();

    let low = stock.low_stock(Some(warehouse.id)).await.unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].product.id, scarce.id);
    assert_eq!(low[0].position.qty, dec!(3));
}

#[tokio::test]
async fn position_is_absent_until_first_movement() {
    let app = setup().await;
    let stock = StockService::new(app.db.clone(), app.events.clone());

    let product = create_product(&app.db, "BOLT-6", dec!(1.00), dec!(2.00)).await;
    let warehouse = create_location(&app.db, "Main Warehouse").await;

    assert!(stock
        .position(product.id, warehouse.id)
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        stock
            .ledger_quantity(product.id, warehouse.id)
            .await
            .unwrap(),
        dec!(0)
    );
}
