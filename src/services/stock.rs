use crate::{
    db::DbPool,
    entities::{
        product,
        stock_item::{self, Entity as StockItem},
        stock_ledger::{self, Entity as StockLedger, MovementReason},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{costing, find_live_product, find_location, OperationContext},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// A stock movement to append to the ledger.
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub product_id: i64,
    pub from_location_id: Option<i64>,
    pub to_location_id: Option<i64>,
    /// Signed delta: positive = increase, negative = decrease
    pub qty: Decimal,
    pub unit_cost: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub reason: MovementReason,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub moved_at: DateTime<Utc>,
    pub note: Option<String>,
    pub created_by: Option<i64>,
}

/// Appends one immutable ledger entry.
///
/// Does not touch the position cache; callers pair it with
/// [`apply_movement`] inside their own transaction so ledger and cache
/// stay consistent.
pub async fn record_movement<C: ConnectionTrait>(
    conn: &C,
    movement: NewMovement,
) -> Result<stock_ledger::Model, ServiceError> {
    let entry = stock_ledger::ActiveModel {
        product_id: Set(movement.product_id),
        from_location_id: Set(movement.from_location_id),
        to_location_id: Set(movement.to_location_id),
        qty: Set(movement.qty),
        unit_cost: Set(movement.unit_cost),
        unit_price: Set(movement.unit_price),
        reason: Set(movement.reason),
        reference_type: Set(movement.reference_type),
        reference_id: Set(movement.reference_id),
        moved_at: Set(movement.moved_at),
        note: Set(movement.note),
        created_by: Set(movement.created_by),
        created_at: Set(movement.moved_at),
        ..Default::default()
    };

    entry.insert(conn).await.map_err(ServiceError::DatabaseError)
}

/// Applies a quantity delta to the (product, location) position.
///
/// The core cost-accounting primitive: fetches or lazily creates the
/// position, recomputes the weighted average cost when an incoming cost
/// is supplied with a positive delta, and rejects any delta that would
/// drive the quantity negative before anything is written. The update is
/// guarded by the position's `version`, so two writers racing on the same
/// row cannot both pass the stock check; the loser gets
/// `ConcurrentModification` and its surrounding transaction rolls back.
pub async fn apply_movement<C: ConnectionTrait>(
    conn: &C,
    product_id: i64,
    location_id: i64,
    qty_delta: Decimal,
    incoming_unit_cost: Option<Decimal>,
    now: DateTime<Utc>,
) -> Result<stock_item::Model, ServiceError> {
    let existing = StockItem::find()
        .filter(stock_item::Column::ProductId.eq(product_id))
        .filter(stock_item::Column::LocationId.eq(location_id))
        .one(conn)
        .await?;

    match existing {
        Some(position) => {
            let new_wac = match incoming_unit_cost {
                Some(unit_cost) if qty_delta > Decimal::ZERO => costing::weighted_average_cost(
                    position.qty,
                    position.wac,
                    qty_delta,
                    unit_cost,
                ),
                _ => position.wac,
            };
            let new_qty = position.qty + qty_delta;
            if new_qty < Decimal::ZERO {
                return Err(ServiceError::InsufficientStock {
                    available: position.qty,
                });
            }

            let update = StockItem::update_many()
                .col_expr(stock_item::Column::Qty, Expr::value(new_qty))
                .col_expr(stock_item::Column::Wac, Expr::value(new_wac))
                .col_expr(stock_item::Column::Version, Expr::value(position.version + 1))
                .col_expr(stock_item::Column::UpdatedAt, Expr::value(now))
                .filter(stock_item::Column::Id.eq(position.id))
                .filter(stock_item::Column::Version.eq(position.version))
                .exec(conn)
                .await?;

            if update.rows_affected == 0 {
                return Err(ServiceError::ConcurrentModification(position.id));
            }

            Ok(stock_item::Model {
                qty: new_qty,
                wac: new_wac,
                version: position.version + 1,
                updated_at: now,
                ..position
            })
        }
        None => {
            if qty_delta < Decimal::ZERO {
                return Err(ServiceError::InsufficientStock {
                    available: Decimal::ZERO,
                });
            }

            let wac = match incoming_unit_cost {
                Some(unit_cost) if qty_delta > Decimal::ZERO => costing::round_money(unit_cost),
                _ => Decimal::ZERO,
            };
            let position = stock_item::ActiveModel {
                product_id: Set(product_id),
                location_id: Set(location_id),
                qty: Set(qty_delta),
                wac: Set(wac),
                version: Set(1),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };

            position
                .insert(conn)
                .await
                .map_err(ServiceError::DatabaseError)
        }
    }
}

/// Manual stock adjustment request.
#[derive(Debug, Clone)]
pub struct AdjustStock {
    pub product_id: i64,
    pub location_id: i64,
    /// Signed correction, non-zero
    pub qty_delta: Decimal,
    pub note: Option<String>,
}

/// Filter for ledger history queries.
#[derive(Debug, Clone, Default)]
pub struct LedgerQuery {
    pub product_id: Option<i64>,
    pub location_id: Option<i64>,
    pub reason: Option<MovementReason>,
    pub moved_from: Option<DateTime<Utc>>,
    pub moved_to: Option<DateTime<Utc>>,
}

/// A position at or below its product's reorder level.
#[derive(Debug, Clone)]
pub struct LowStockItem {
    pub position: stock_item::Model,
    pub product: product::Model,
}

/// Ledger store and stock position cache.
#[derive(Clone)]
pub struct StockService {
    db: Arc<DbPool>,
    events: Arc<EventSender>,
}

impl StockService {
    pub fn new(db: Arc<DbPool>, events: Arc<EventSender>) -> Self {
        Self { db, events }
    }

    /// Manually corrects a stock position, writing the paired ledger
    /// entry atomically. WAC is left untouched; adjustments carry no
    /// cost information.
    #[instrument(skip(self, ctx, request))]
    pub async fn adjust(
        &self,
        ctx: OperationContext,
        request: AdjustStock,
    ) -> Result<stock_item::Model, ServiceError> {
        let qty_delta = costing::round_qty(request.qty_delta);
        if qty_delta.is_zero() {
            return Err(ServiceError::ValidationError(
                "Adjustment quantity must be non-zero".to_string(),
            ));
        }

        let product_id = request.product_id;
        let location_id = request.location_id;
        let note = request.note;

        let db = self.db.as_ref();
        let position = db
            .transaction::<_, stock_item::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let product = find_live_product(txn, product_id).await?;
                    find_location(txn, location_id).await?;

                    let position =
                        apply_movement(txn, product.id, location_id, qty_delta, None, ctx.now)
                            .await?;

                    let (from_location_id, to_location_id) = if qty_delta.is_sign_negative() {
                        (Some(location_id), None)
                    } else {
                        (None, Some(location_id))
                    };
                    record_movement(
                        txn,
                        NewMovement {
                            product_id: product.id,
                            from_location_id,
                            to_location_id,
                            qty: qty_delta,
                            unit_cost: None,
                            unit_price: None,
                            reason: MovementReason::Adjustment,
                            reference_type: Some("adjustment".to_string()),
                            reference_id: None,
                            moved_at: ctx.now,
                            note,
                            created_by: ctx.actor_id,
                        },
                    )
                    .await?;

                    Ok(position)
                })
            })
            .await
            .map_err(ServiceError::from)?;

        info!(
            product_id,
            location_id,
            %qty_delta,
            new_qty = %position.qty,
            "stock adjusted"
        );
        self.events
            .send(Event::StockAdjusted {
                product_id,
                location_id,
                qty_delta,
                new_qty: position.qty,
                correlation_id: Uuid::new_v4(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(position)
    }

    /// Current position for one (product, location) pair, if any movement
    /// ever created it.
    pub async fn position(
        &self,
        product_id: i64,
        location_id: i64,
    ) -> Result<Option<stock_item::Model>, ServiceError> {
        StockItem::find()
            .filter(stock_item::Column::ProductId.eq(product_id))
            .filter(stock_item::Column::LocationId.eq(location_id))
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// All positions held at a location.
    pub async fn positions_for_location(
        &self,
        location_id: i64,
    ) -> Result<Vec<stock_item::Model>, ServiceError> {
        StockItem::find()
            .filter(stock_item::Column::LocationId.eq(location_id))
            .order_by_asc(stock_item::Column::ProductId)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Positions at or below their product's reorder level.
    #[instrument(skip(self))]
    pub async fn low_stock(
        &self,
        location_id: Option<i64>,
    ) -> Result<Vec<LowStockItem>, ServiceError> {
        let mut query = StockItem::find().find_also_related(product::Entity);
        if let Some(location_id) = location_id {
            query = query.filter(stock_item::Column::LocationId.eq(location_id));
        }
        let rows = query.all(self.db.as_ref()).await?;

        Ok(rows
            .into_iter()
            .filter_map(|(position, related)| {
                let product = related?;
                let low = product.is_active
                    && product.is_live()
                    && position.qty <= product.reorder_level;
                low.then_some(LowStockItem { position, product })
            })
            .collect())
    }

    /// Movement history, newest first.
    pub async fn ledger(
        &self,
        query: LedgerQuery,
    ) -> Result<Vec<stock_ledger::Model>, ServiceError> {
        let mut select = StockLedger::find();
        if let Some(product_id) = query.product_id {
            select = select.filter(stock_ledger::Column::ProductId.eq(product_id));
        }
        if let Some(location_id) = query.location_id {
            select = select.filter(
                Condition::any()
                    .add(stock_ledger::Column::FromLocationId.eq(location_id))
                    .add(stock_ledger::Column::ToLocationId.eq(location_id)),
            );
        }
        if let Some(reason) = query.reason {
            select = select.filter(stock_ledger::Column::Reason.eq(reason));
        }
        if let Some(moved_from) = query.moved_from {
            select = select.filter(stock_ledger::Column::MovedAt.gte(moved_from));
        }
        if let Some(moved_to) = query.moved_to {
            select = select.filter(stock_ledger::Column::MovedAt.lte(moved_to));
        }

        select
            .order_by_desc(stock_ledger::Column::MovedAt)
            .order_by_desc(stock_ledger::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Replays the ledger for one (product, location) pair and returns
    /// the summed quantity. Equals the cached position quantity after any
    /// committed operation; useful for audits and consistency checks.
    pub async fn ledger_quantity(
        &self,
        product_id: i64,
        location_id: i64,
    ) -> Result<Decimal, ServiceError> {
        let entries = StockLedger::find()
            .filter(stock_ledger::Column::ProductId.eq(product_id))
            .filter(
                Condition::any()
                    .add(stock_ledger::Column::FromLocationId.eq(location_id))
                    .add(stock_ledger::Column::ToLocationId.eq(location_id)),
            )
            .order_by_asc(stock_ledger::Column::MovedAt)
            .all(self.db.as_ref())
            .await?;

        Ok(entries
            .iter()
            .filter(|entry| entry.touches_location(location_id))
            .map(|entry| entry.qty)
            .sum())
    }
}
