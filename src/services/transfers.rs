use crate::{
    db::DbPool,
    entities::{
        stock_ledger::MovementReason,
        transfer::{self, Entity as Transfer, TransferStatus},
        transfer_line::{self, Entity as TransferLine},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        costing, find_live_product, find_location,
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

const CODE_PREFIX: &str = "TRF";

/// Input for one transfer line.
#[derive(Debug, Clone)]
pub struct NewTransferLine {
    pub product_id: i64,
    pub qty: Decimal,
}

/// Input for creating a draft transfer.
#[derive(Debug, Clone)]
pub struct NewTransfer {
    pub from_location_id: i64,
    pub to_location_id: i64,
    pub notes: Option<String>,
    pub lines: Vec<NewTransferLine>,
}

/// Draft-only edits; absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransfer {
    pub notes: Option<String>,
    /// Replaces the whole line set when present
    pub lines: Option<Vec<NewTransferLine>>,
}

/// Listing filter.
#[derive(Debug, Clone, Default)]
pub struct TransferQuery {
    pub status: Option<TransferStatus>,
    pub from_location_id: Option<i64>,
    pub to_location_id: Option<i64>,
}

/// A transfer with its lines.
#[derive(Debug, Clone)]
pub struct TransferDetail {
    pub transfer: transfer::Model,
    pub lines: Vec<transfer_line::Model>,
}

/// Lifecycle manager for inter-location stock moves.
///
/// Confirmation writes a paired transfer-out/transfer-in ledger entry per
/// line and moves the quantities at source cost, all in one transaction.
#[derive(Clone)]
pub struct TransferService {
    db: Arc<DbPool>,
    events: Arc<EventSender>,
}

impl TransferService {
    pub fn new(db: Arc<DbPool>, events: Arc<EventSender>) -> Self {
        Self { db, events }
    }

    /// Creates a draft transfer with its lines. No stock effect until
    /// [`confirm`](Self::confirm).
    #[instrument(skip(self, ctx, new_transfer))]
    pub async fn create(
        &self,
        ctx: OperationContext,
        new_transfer: NewTransfer,
    ) -> Result<TransferDetail, ServiceError> {
        if new_transfer.from_location_id == new_transfer.to_location_id {
            return Err(ServiceError::ValidationError(
                "Transfer source and destination locations must differ".to_string(),
            ));
        }

        let db = self.db.as_ref();
        let detail = db
            .transaction::<_, TransferDetail, ServiceError>(move |txn| {
                Box::pin(async move {
                    find_location(txn, new_transfer.from_location_id).await?;
                    find_location(txn, new_transfer.to_location_id).await?;

                    let code = next_code(txn, ctx.now).await?;
                    let draft = transfer::ActiveModel {
                        code: Set(code),
                        status: Set(TransferStatus::Draft),
                        from_location_id: Set(new_transfer.from_location_id),
                        to_location_id: Set(new_transfer.to_location_id),
                        notes: Set(new_transfer.notes),
                        created_by: Set(ctx.actor_id),
                        created_at: Set(ctx.now),
                        updated_at: Set(ctx.now),
                        ..Default::default()
                    };
                    let draft = draft.insert(txn).await?;

                    persist_lines(txn, draft.id, new_transfer.lines, ctx.now).await?;
                    load_detail(txn, draft).await
                })
            })
            .await
            .map_err(ServiceError::from)?;

        info!(
            transfer_id = detail.transfer.id,
            code = %detail.transfer.code,
            "transfer created"
        );
        self.events
            .send(Event::TransferCreated {
                transfer_id: detail.transfer.id,
                code: detail.transfer.code.clone(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(detail)
    }

    /// Edits a draft transfer; replaces the line set when one is given.
    #[instrument(skip(self, ctx, changes))]
    pub async fn update(
        &self,
        ctx: OperationContext,
        transfer_id: i64,
        changes: UpdateTransfer,
    ) -> Result<TransferDetail, ServiceError> {
        let db = self.db.as_ref();
        let detail = db
            .transaction::<_, TransferDetail, ServiceError>(move |txn| {
                Box::pin(async move {
                    let transfer = find_live_transfer(txn, transfer_id).await?;
                    if !transfer.is_editable() {
                        return Err(ServiceError::InvalidState(format!(
                            "Transfer {} cannot be edited in its current status",
                            transfer.code
                        )));
                    }

                    let mut active: transfer::ActiveModel = transfer.clone().into();
                    if let Some(notes) = changes.notes {
                        active.notes = Set(Some(notes));
                    }
                    active.updated_at = Set(ctx.now);
                    let transfer = active.update(txn).await?;

                    if let Some(lines) = changes.lines {
                        TransferLine::delete_many()
                            .filter(transfer_line::Column::TransferId.eq(transfer.id))
                            .exec(txn)
                            .await?;
                        persist_lines(txn, transfer.id, lines, ctx.now).await?;
                    }

                    load_detail(txn, transfer).await
                })
            })
            .await
            .map_err(ServiceError::from)?;

        Ok(detail)
    }

    /// Confirms a draft transfer: per line, decreases the source position
    /// and increases the destination at the source's WAC, recording the
    /// paired ledger entries. One-way; either every leg commits or none.
    #[instrument(skip(self, ctx))]
    pub async fn confirm(
        &self,
        ctx: OperationContext,
        transfer_id: i64,
    ) -> Result<transfer::Model, ServiceError> {
        let db = self.db.as_ref();
        let confirmed = db
            .transaction::<_, transfer::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let transfer = find_live_transfer(txn, transfer_id).await?;
                    if transfer.status != TransferStatus::Draft {
                        return Err(ServiceError::InvalidState(format!(
                            "Only draft transfers can be confirmed, {} is {:?}",
                            transfer.code, transfer.status
                        )));
                    }

                    let lines = TransferLine::find()
                        .filter(transfer_line::Column::TransferId.eq(transfer.id))
                        .all(txn)
                        .await?;
                    if lines.is_empty() {
                        return Err(ServiceError::ValidationError(
                            "Transfer must have at least one line item".to_string(),
                        ));
                    }

                    for line in lines {
                        move_line(txn, &transfer, &line, ctx).await?;
                    }

                    let mut active: transfer::ActiveModel = transfer.into();
                    active.status = Set(TransferStatus::Confirmed);
                    active.confirmed_at = Set(Some(ctx.now));
                    active.updated_at = Set(ctx.now);
                    active.update(txn).await.map_err(ServiceError::DatabaseError)
                })
            })
            .await
            .map_err(ServiceError::from)?;

        info!(
            transfer_id = confirmed.id,
            code = %confirmed.code,
            "transfer confirmed, stock moved"
        );
        self.events
            .send(Event::TransferConfirmed {
                transfer_id: confirmed.id,
                code: confirmed.code.clone(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(confirmed)
    }

    /// Soft-deletes a draft transfer.
    #[instrument(skip(self, ctx))]
    pub async fn delete(
        &self,
        ctx: OperationContext,
        transfer_id: i64,
    ) -> Result<(), ServiceError> {
        let db = self.db.as_ref();
        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                let transfer = find_live_transfer(txn, transfer_id).await?;
                if transfer.status == TransferStatus::Confirmed {
                    return Err(ServiceError::InvalidState(format!(
                        "Cannot delete confirmed transfer {}",
                        transfer.code
                    )));
                }

                let mut active: transfer::ActiveModel = transfer.into();
                active.deleted_at = Set(Some(ctx.now));
                active.updated_at = Set(ctx.now);
                active.update(txn).await?;
                Ok(())
            })
        })
        .await
        .map_err(ServiceError::from)
    }

    /// Fetches a live transfer with its lines.
    pub async fn get_with_lines(&self, transfer_id: i64) -> Result<TransferDetail, ServiceError> {
        let db = self.db.as_ref();
        let transfer = find_live_transfer(db, transfer_id).await?;
        load_detail(db, transfer).await
    }

    /// Lists live transfers matching the filter, newest first.
    pub async fn list(&self, query: TransferQuery) -> Result<Vec<transfer::Model>, ServiceError> {
        let mut select = Transfer::find().filter(transfer::Column::DeletedAt.is_null());
        if let Some(status) = query.status {
            select = select.filter(transfer::Column::Status.eq(status));
        }
        if let Some(from_location_id) = query.from_location_id {
            select = select.filter(transfer::Column::FromLocationId.eq(from_location_id));
        }
        if let Some(to_location_id) = query.to_location_id {
            select = select.filter(transfer::Column::ToLocationId.eq(to_location_id));
        }

        select
            .order_by_desc(transfer::Column::CreatedAt)
            .order_by_desc(transfer::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }
}

/// Moves one line's quantity between the two positions and records the
/// paired ledger legs, both referencing the owning transfer.
async fn move_line<C: ConnectionTrait>(
    conn: &C,
    transfer: &transfer::Model,
    line: &transfer_line::Model,
    ctx: OperationContext,
) -> Result<(), ServiceError> {
    let source = apply_movement(
        conn,
        line.product_id,
        transfer.from_location_id,
        -line.qty,
        None,
        ctx.now,
    )
    .await?;
    let carried_cost = source.wac;

    // Destination receives at the source's cost: the incoming quantity
    // re-averages into whatever the destination already holds.
    apply_movement(
        conn,
        line.product_id,
        transfer.to_location_id,
        line.qty,
        Some(carried_cost),
        ctx.now,
    )
    .await?;

    let note = Some(format!("Transfer: {}", transfer.code));
    record_movement(
        conn,
        NewMovement {
            product_id: line.product_id,
            from_location_id: Some(transfer.from_location_id),
            to_location_id: Some(transfer.to_location_id),
            qty: -line.qty,
            unit_cost: Some(carried_cost),
            unit_price: None,
            reason: MovementReason::TransferOut,
            reference_type: Some("transfer".to_string()),
            reference_id: Some(transfer.id),
            moved_at: ctx.now,
            note: note.clone(),
            created_by: ctx.actor_id,
        },
    )
    .await?;
    record_movement(
        conn,
        NewMovement {
            product_id: line.product_id,
            from_location_id: Some(transfer.from_location_id),
            to_location_id: Some(transfer.to_location_id),
            qty: line.qty,
            unit_cost: Some(carried_cost),
            unit_price: None,
            reason: MovementReason::TransferIn,
            reference_type: Some("transfer".to_string()),
            reference_id: Some(transfer.id),
            moved_at: ctx.now,
            note,
            created_by: ctx.actor_id,
        },
    )
    .await?;

    Ok(())
}

async fn find_live_transfer<C: ConnectionTrait>(
    conn: &C,
    transfer_id: i64,
) -> Result<transfer::Model, ServiceError> {
    Transfer::find_by_id(transfer_id)
        .filter(transfer::Column::DeletedAt.is_null())
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Transfer {} not found", transfer_id)))
}

/// Next date-sequenced transfer code, e.g. `TRF202406150003`.
async fn next_code<C: ConnectionTrait>(
    conn: &C,
    now: DateTime<Utc>,
) -> Result<String, ServiceError> {
    let stamp = now.format("%Y%m%d").to_string();
    let pattern = format!("{}{}%", CODE_PREFIX, stamp);

    let last = Transfer::find()
        .filter(transfer::Column::Code.like(pattern.as_str()))
        .order_by_desc(transfer::Column::Code)
        .one(conn)
        .await?;

    let sequence = last
        .and_then(|existing| {
            existing
                .code
                .get(CODE_PREFIX.len() + stamp.len()..)
                .and_then(|tail| tail.parse::<u32>().ok())
        })
        .map_or(1, |last_seq| last_seq + 1);

    Ok(format!("{}{}{:04}", CODE_PREFIX, stamp, sequence))
}

async fn persist_lines<C: ConnectionTrait>(
    conn: &C,
    transfer_id: i64,
    lines: Vec<NewTransferLine>,
    now: DateTime<Utc>,
) -> Result<(), ServiceError> {
    for line in lines {
        let qty = costing::round_qty(line.qty);
        if qty <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Line quantity must be positive".to_string(),
            ));
        }
        find_live_product(conn, line.product_id).await?;

        let row = transfer_line::ActiveModel {
            transfer_id: Set(transfer_id),
            product_id: Set(line.product_id),
            qty: Set(qty),
            created_at: Set(now),
            ..Default::default()
        };
        row.insert(conn).await?;
    }

    Ok(())
}

async fn load_detail<C: ConnectionTrait>(
    conn: &C,
    transfer: transfer::Model,
) -> Result<TransferDetail, ServiceError> {
    let lines = TransferLine::find()
        .filter(transfer_line::Column::TransferId.eq(transfer.id))
        .order_by_asc(transfer_line::Column::Id)
        .all(conn)
        .await?;

    Ok(TransferDetail { transfer, lines })
}
