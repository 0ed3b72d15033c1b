//! Order business logic - Submitting the cart and browsing order history.
//!
//! Submission writes one order row followed by one sold line item per cart line. Line
//! items are written one at a time in cart order; a line that fails to write is logged
//! and reported in the receipt while the rest of the batch carries on. Orders are never
//! updated afterwards, only deleted.

use crate::{
    config::settings::SaleDefaults,
    core::cart::Cart,
    entities::{Event, Order, SoldProduct, order, sold_product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{error, info, instrument};

const NOT_PROVIDED: &str = "N/A";

/// Buyer details and sale labels stamped on an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyerInfo {
    /// Sale category label (e.g., "Convention Sale")
    pub order_type: String,
    /// Buyer name
    pub name: String,
    /// Address or email
    pub email: String,
    /// Buyer phone number
    pub phone: String,
    /// How the order was paid (e.g., "Cash")
    pub payment_type: String,
}

impl BuyerInfo {
    /// An anonymous walk-up buyer, with the configured sale labels.
    #[must_use]
    pub fn walk_up(defaults: &SaleDefaults) -> Self {
        Self {
            order_type: defaults.order_type.clone(),
            name: NOT_PROVIDED.to_string(),
            email: NOT_PROVIDED.to_string(),
            phone: NOT_PROVIDED.to_string(),
            payment_type: defaults.payment_type.clone(),
        }
    }
}

impl Default for BuyerInfo {
    fn default() -> Self {
        Self::walk_up(&SaleDefaults::default())
    }
}

/// Outcome of a submission whose order row was written.
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    /// The order row as stored
    pub order: order::Model,
    /// Line items that were written, in cart order
    pub saved_lines: Vec<sold_product::Model>,
    /// Composite names of cart lines whose line item could not be written
    pub failed_lines: Vec<String>,
}

impl SubmissionReceipt {
    /// Whether every cart line made it into the store.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed_lines.is_empty()
    }
}

/// An order together with its line items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    /// The stored order row
    pub order: order::Model,
    /// Its line items, in insertion order
    pub lines: Vec<sold_product::Model>,
}

/// Submits the cart as an order taken at `event_id`.
///
/// The event has to be passed in explicitly; `None` means no event is open. Once the
/// order row is stored the cart is cleared, even if some line items failed to write.
///
/// # Errors
/// Returns an error, leaving the cart untouched and nothing written, if:
/// - No event is selected ([`Error::NoEventSelected`])
/// - The event does not exist ([`Error::EventNotFound`])
/// - The cart is empty ([`Error::EmptyCart`])
/// - The order row cannot be written ([`Error::StoreWriteFailure`])
#[instrument(skip(db, cart, buyer), fields(lines = cart.lines().len()))]
pub async fn submit_order(
    db: &DatabaseConnection,
    cart: &mut Cart,
    event_id: Option<i64>,
    buyer: &BuyerInfo,
) -> Result<SubmissionReceipt> {
    let event_id = event_id.ok_or(Error::NoEventSelected)?;

    if Event::find_by_id(event_id).one(db).await?.is_none() {
        return Err(Error::EventNotFound { id: event_id });
    }

    if cart.is_empty() {
        return Err(Error::EmptyCart);
    }

    let order = order::ActiveModel {
        order_type: Set(buyer.order_type.clone()),
        buyer_name: Set(buyer.name.clone()),
        buyer_email: Set(buyer.email.clone()),
        price: Set(cart.total().to_string()),
        buyer_phone: Set(buyer.phone.clone()),
        event_id: Set(event_id),
        payment_type: Set(buyer.payment_type.clone()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| Error::store_write("order", e))?;

    let mut saved_lines = Vec::with_capacity(cart.lines().len());
    let mut failed_lines = Vec::new();

    for line in cart.lines() {
        let Ok(count) = i32::try_from(line.quantity) else {
            error!("Quantity {} of {} does not fit a line item", line.quantity, line.composite_name);
            failed_lines.push(line.composite_name.clone());
            continue;
        };

        let item = sold_product::ActiveModel {
            order_id: Set(order.id),
            product: Set(line.composite_name.clone()),
            count: Set(count),
            event_id: Set(event_id),
            ..Default::default()
        };

        match item.insert(db).await {
            Ok(saved) => saved_lines.push(saved),
            Err(e) => {
                error!(
                    "Failed to save line item {} for order {}: {e}",
                    line.composite_name, order.id
                );
                failed_lines.push(line.composite_name.clone());
            }
        }
    }

    cart.clear();
    info!(
        "Order {} saved for event {event_id}: total {}, {} line(s), {} failed",
        order.id,
        order.price,
        saved_lines.len(),
        failed_lines.len()
    );

    Ok(SubmissionReceipt {
        order,
        saved_lines,
        failed_lines,
    })
}

/// Retrieves all orders taken at an event, oldest first.
pub async fn get_orders_for_event(
    db: &DatabaseConnection,
    event_id: i64,
) -> Result<Vec<order::Model>> {
    Order::find()
        .filter(order::Column::EventId.eq(event_id))
        .order_by_asc(order::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific order by its unique ID.
pub async fn get_order_by_id(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Option<order::Model>> {
    Order::find_by_id(order_id).one(db).await.map_err(Into::into)
}

/// Retrieves an order with its line items.
///
/// # Errors
/// Returns [`Error::OrderNotFound`] if no such order exists.
pub async fn get_order_details(db: &DatabaseConnection, order_id: i64) -> Result<OrderDetails> {
    let order = get_order_by_id(db, order_id)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    let lines = SoldProduct::find()
        .filter(sold_product::Column::OrderId.eq(order_id))
        .order_by_asc(sold_product::Column::Id)
        .all(db)
        .await?;

    Ok(OrderDetails { order, lines })
}

/// Deletes an order and its line items.
///
/// # Errors
/// Returns [`Error::OrderNotFound`] if no such order exists; a failed delete rolls back
/// both steps.
#[instrument(skip(db))]
pub async fn delete_order(db: &DatabaseConnection, order_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let order = Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    SoldProduct::delete_many()
        .filter(sold_product::Column::OrderId.eq(order_id))
        .exec(&txn)
        .await
        .map_err(|e| Error::store_write("sold products", e))?;

    order
        .delete(&txn)
        .await
        .map_err(|e| Error::store_write("order", e))?;

    txn.commit().await?;
    info!("Deleted order {order_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::cart::Selection;
    use crate::test_utils::*;
    use rust_decimal::Decimal;
    use sea_orm::PaginatorTrait;

    async fn count_rows(db: &DatabaseConnection) -> Result<(u64, u64)> {
        let orders = Order::find().count(db).await?;
        let lines = SoldProduct::find().count(db).await?;
        Ok((orders, lines))
    }

    #[tokio::test]
    async fn test_submit_without_event_writes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_product(&db, "A", "5.00", false).await?;
        let mut cart = Cart::new();
        cart.add_selection(&a, None);
        let before = cart.clone();

        let result = submit_order(&db, &mut cart, None, &BuyerInfo::default()).await;

        assert!(matches!(result, Err(Error::NoEventSelected)));
        assert_eq!(cart, before);
        assert_eq!(count_rows(&db).await?, (0, 0));
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_unknown_event_writes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let a = create_test_product(&db, "A", "5.00", false).await?;
        let mut cart = Cart::new();
        cart.add_selection(&a, None);

        let result = submit_order(&db, &mut cart, Some(77), &BuyerInfo::default()).await;

        assert!(matches!(result, Err(Error::EventNotFound { id: 77 })));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(count_rows(&db).await?, (0, 0));
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_empty_cart() -> Result<()> {
        let (db, event) = setup_with_event().await?;
        let mut cart = Cart::new();

        let result = submit_order(&db, &mut cart, Some(event.id), &BuyerInfo::default()).await;

        assert!(matches!(result, Err(Error::EmptyCart)));
        assert_eq!(count_rows(&db).await?, (0, 0));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_order_write_leaves_cart_untouched() -> Result<()> {
        let (db, event) = setup_with_event().await?;
        let a = create_test_product(&db, "A", "5.00", false).await?;

        db.execute_unprepared(
            "CREATE TRIGGER reject_orders BEFORE INSERT ON orders
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .await?;

        let mut cart = Cart::new();
        cart.add_selection(&a, None);
        let before = cart.clone();

        let result = submit_order(&db, &mut cart, Some(event.id), &BuyerInfo::default()).await;

        assert!(matches!(result, Err(Error::StoreWriteFailure { .. })));
        assert_eq!(cart, before);
        assert_eq!(count_rows(&db).await?, (0, 0));
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_writes_order_and_lines() -> Result<()> {
        let (db, event) = setup_with_event().await?;
        let a = create_test_product(&db, "A", "5.00", false).await?;
        let b = create_test_product(&db, "B", "3.50", true).await?;

        let mut cart = Cart::new();
        let selections = [Selection::plain(&a), Selection::with_option(&b, "Spicy")];
        cart.add_selections(&selections);
        cart.add_selections(&selections);

        let receipt = submit_order(&db, &mut cart, Some(event.id), &BuyerInfo::default()).await?;

        assert!(receipt.is_complete());
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);

        let order = &receipt.order;
        assert_eq!(order.price.parse::<Decimal>().unwrap(), Decimal::new(1700, 2));
        assert_eq!(order.order_type, "Convention Sale");
        assert_eq!(order.buyer_name, "N/A");
        assert_eq!(order.payment_type, "Cash");
        assert_eq!(order.event_id, event.id);

        let details = get_order_details(&db, order.id).await?;
        assert_eq!(details.order, receipt.order);
        assert_eq!(details.lines, receipt.saved_lines);
        let lines: Vec<(&str, i32)> = details
            .lines
            .iter()
            .map(|l| (l.product.as_str(), l.count))
            .collect();
        assert_eq!(lines, vec![("A", 2), ("B Spicy", 2)]);
        assert!(details.lines.iter().all(|l| l.event_id == event.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_uses_buyer_info() -> Result<()> {
        let (db, event) = setup_with_event().await?;
        let a = create_test_product(&db, "A", "5.00", false).await?;
        let mut cart = Cart::new();
        cart.add_selection(&a, None);

        let buyer = BuyerInfo {
            order_type: "Commission".to_string(),
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            phone: "555-0100".to_string(),
            payment_type: "Card".to_string(),
        };
        let receipt = submit_order(&db, &mut cart, Some(event.id), &buyer).await?;

        let stored = get_order_by_id(&db, receipt.order.id).await?.unwrap();
        assert_eq!(stored.order_type, "Commission");
        assert_eq!(stored.buyer_name, "Sam");
        assert_eq!(stored.buyer_email, "sam@example.com");
        assert_eq!(stored.buyer_phone, "555-0100");
        assert_eq!(stored.payment_type, "Card");
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_line_is_skipped_and_cart_cleared() -> Result<()> {
        let (db, event) = setup_with_event().await?;
        let a = create_test_product(&db, "A", "5.00", false).await?;
        let broken = create_test_product(&db, "Broken", "1.00", false).await?;
        let c = create_test_product(&db, "C", "2.00", false).await?;

        db.execute_unprepared(
            "CREATE TRIGGER reject_broken BEFORE INSERT ON sold_products
             WHEN NEW.product = 'Broken'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .await?;

        let mut cart = Cart::new();
        cart.add_selections(&[
            Selection::plain(&a),
            Selection::plain(&broken),
            Selection::plain(&c),
        ]);

        let receipt = submit_order(&db, &mut cart, Some(event.id), &BuyerInfo::default()).await?;

        assert!(!receipt.is_complete());
        assert_eq!(receipt.failed_lines, vec!["Broken"]);
        let saved: Vec<&str> = receipt.saved_lines.iter().map(|l| l.product.as_str()).collect();
        assert_eq!(saved, vec!["A", "C"]);
        assert!(cart.is_empty());

        // The order keeps the full cart total even though one line is missing
        assert_eq!(
            receipt.order.price.parse::<Decimal>().unwrap(),
            Decimal::new(800, 2)
        );
        assert_eq!(count_rows(&db).await?, (1, 2));
        Ok(())
    }

    #[tokio::test]
    async fn test_order_history_and_delete() -> Result<()> {
        let (db, event) = setup_with_event().await?;
        let a = create_test_product(&db, "A", "5.00", false).await?;

        let mut ids = Vec::new();
        for _ in 0..3 {
            let mut cart = Cart::new();
            cart.add_selection(&a, None);
            let receipt =
                submit_order(&db, &mut cart, Some(event.id), &BuyerInfo::default()).await?;
            ids.push(receipt.order.id);
        }

        let orders = get_orders_for_event(&db, event.id).await?;
        assert_eq!(orders.iter().map(|o| o.id).collect::<Vec<_>>(), ids);

        delete_order(&db, ids[1]).await?;
        assert!(get_order_by_id(&db, ids[1]).await?.is_none());
        assert!(matches!(
            get_order_details(&db, ids[1]).await,
            Err(Error::OrderNotFound { id: _ })
        ));
        assert_eq!(count_rows(&db).await?, (2, 2));

        assert!(matches!(
            delete_order(&db, ids[1]).await,
            Err(Error::OrderNotFound { id: _ })
        ));
        Ok(())
    }
}
