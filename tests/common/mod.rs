#![allow(dead_code)]

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use std::sync::Arc;
use tokio::sync::mpsc;

use stockbook::db::{self, DbConfig};
use stockbook::entities::{
    customer, location,
    location::LocationKind,
    product, vendor,
};
use stockbook::events::{Event, EventSender};
use stockbook::OperationContext;

pub struct TestApp {
    pub db: Arc<DatabaseConnection>,
    pub events: Arc<EventSender>,
    // Held so event sends never hit a closed channel mid-test.
    pub event_rx: mpsc::Receiver<Event>,
}

pub async fn setup() -> TestApp {
    let cfg = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    let db = db::establish_connection_with_config(&cfg)
        .await
        .expect("Failed to create DB pool");
    db::run_migrations(&db)
        .await
        .expect("Failed to run migrations");

    let (tx, rx) = mpsc::channel(256);
    TestApp {
        db: Arc::new(db),
        events: Arc::new(EventSender::new(tx)),
        event_rx: rx,
    }
}

pub fn ctx(tax_rate_percent: Decimal) -> OperationContext {
    OperationContext::new(Some(1), tax_rate_percent)
}

pub async fn create_product(
    db: &DatabaseConnection,
    sku: &str,
    cost_price: Decimal,
    sell_price: Decimal,
) -> product::Model {
    create_product_with_reorder(db, sku, cost_price, sell_price, dec!(0)).await
}

pub async fn create_product_with_reorder(
    db: &DatabaseConnection,
    sku: &str,
    cost_price: Decimal,
    sell_price: Decimal,
    reorder_level: Decimal,
) -> product::Model {
    let now = Utc::now();
    let model = product::ActiveModel {
        sku: Set(sku.to_string()),
        barcode: Set(None),
        name: Set(format!("Product {}", sku)),
        description: Set(None),
        cost_price: Set(cost_price),
        sell_price: Set(sell_price),
        reorder_level: Set(reorder_level),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await.expect("Failed to create product")
}

pub async fn create_location(db: &DatabaseConnection, name: &str) -> location::Model {
    let now = Utc::now();
    let model = location::ActiveModel {
        name: Set(name.to_string()),
        kind: Set(LocationKind::Warehouse),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await.expect("Failed to create location")
}

pub async fn create_customer(db: &DatabaseConnection, name: &str) -> customer::Model {
    let now = Utc::now();
    let model = customer::ActiveModel {
        name: Set(name.to_string()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await.expect("Failed to create customer")
}

pub async fn create_vendor(db: &DatabaseConnection, name: &str) -> vendor::Model {
    let now = Utc::now();
    let model = vendor::ActiveModel {
        name: Set(name.to_string()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await.expect("Failed to create vendor")
}
