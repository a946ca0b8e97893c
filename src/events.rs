use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

/// Domain events emitted by the lifecycle services after a successful
/// commit. Consumers (notification fan-out, projections, audit sinks)
/// subscribe via the receiving end of the channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    InvoiceCreated {
        invoice_id: i64,
        code: String,
    },
    InvoiceConfirmed {
        invoice_id: i64,
        code: String,
    },
    InvoiceVoided {
        invoice_id: i64,
    },
    InvoicePaid {
        invoice_id: i64,
    },
    PaymentRecorded {
        invoice_id: i64,
        payment_id: i64,
        amount: Decimal,
    },
    TransferCreated {
        transfer_id: i64,
        code: String,
    },
    TransferConfirmed {
        transfer_id: i64,
        code: String,
    },
    StockAdjusted {
        product_id: i64,
        location_id: i64,
        qty_delta: Decimal,
        new_qty: Decimal,
        correlation_id: Uuid,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel, logging each event. Spawn this once at
/// startup; richer consumers can replace it with their own loop.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        info!("Received event: {:?}", event);
    }

    info!("Event channel closed, stopping event processing loop");
}
