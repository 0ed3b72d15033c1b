//! Event business logic - Conventions and trade shows that sales are recorded against.
//!
//! An event scopes every order and sold line item. There is no engine-enforced cascade:
//! deleting an event removes its line items and orders explicitly, inside one store
//! transaction.

use crate::{
    entities::{Event, Order, SoldProduct, event, order, sold_product},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Formats a creation timestamp the way event rows store it (`MM-DD-YYYY`).
#[must_use]
pub fn format_created_at(at: DateTime<Utc>) -> String {
    at.format("%m-%d-%Y").to_string()
}

/// Creates a new event stamped with today's date.
///
/// # Errors
/// Returns an error if the name is empty or whitespace-only, or if the insert fails.
#[instrument(skip(db))]
pub async fn create_event(db: &DatabaseConnection, name: &str) -> Result<event::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Event name cannot be empty".to_string(),
        });
    }

    let created = event::ActiveModel {
        name: Set(name.to_string()),
        created_at: Set(format_created_at(Utc::now())),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| Error::store_write("event", e))?;

    info!("Created event {} ({})", created.name, created.id);
    Ok(created)
}

/// Retrieves every event in creation order.
pub async fn get_all_events(db: &DatabaseConnection) -> Result<Vec<event::Model>> {
    Event::find()
        .order_by_asc(event::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an event by its unique ID.
pub async fn get_event_by_id(
    db: &DatabaseConnection,
    event_id: i64,
) -> Result<Option<event::Model>> {
    Event::find_by_id(event_id).one(db).await.map_err(Into::into)
}

/// Deletes an event with all of its sold line items and orders.
///
/// # Errors
/// Returns [`Error::EventNotFound`] if no such event exists. Any failed delete rolls
/// back the whole operation.
#[instrument(skip(db))]
pub async fn delete_event(db: &DatabaseConnection, event_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let event = Event::find_by_id(event_id)
        .one(&txn)
        .await?
        .ok_or(Error::EventNotFound { id: event_id })?;

    let lines = SoldProduct::delete_many()
        .filter(sold_product::Column::EventId.eq(event_id))
        .exec(&txn)
        .await
        .map_err(|e| Error::store_write("sold products", e))?;

    let orders = Order::delete_many()
        .filter(order::Column::EventId.eq(event_id))
        .exec(&txn)
        .await
        .map_err(|e| Error::store_write("orders", e))?;

    event
        .delete(&txn)
        .await
        .map_err(|e| Error::store_write("event", e))?;

    txn.commit().await?;
    info!(
        "Deleted event {event_id} with {} order(s) and {} line item(s)",
        orders.rows_affected, lines.rows_affected
    );
    Ok(())
}
