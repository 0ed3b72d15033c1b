//! Report generation business logic.
//!
//! Summarizes what sold at an event: number of orders, gross total and units per
//! product. Functions return structured data; [`format_event_report`] renders it as text.

use crate::{
    core::{event::get_event_by_id, order::get_orders_for_event, product::parse_price},
    entities::{SoldProduct, event, sold_product},
    errors::{Error, Result},
};
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::prelude::*;
use std::collections::HashMap;

/// Units sold of one composite product name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductTotal {
    /// Composite product name as sold
    pub product: String,
    /// Units sold across all orders
    pub units: i64,
}

/// Sales summary for one event.
#[derive(Debug, Clone)]
pub struct EventReport {
    /// The event being reported on
    pub event: event::Model,
    /// Number of orders taken
    pub order_count: usize,
    /// Sum of order totals
    pub gross_total: Decimal,
    /// Units per product, best sellers first
    pub product_totals: Vec<ProductTotal>,
}

/// Generates the sales report for an event.
///
/// # Errors
/// Returns [`Error::EventNotFound`] if the event does not exist, or
/// [`Error::InvalidPrice`] if a stored order total does not parse.
pub async fn generate_event_report(db: &DatabaseConnection, event_id: i64) -> Result<EventReport> {
    let event = get_event_by_id(db, event_id)
        .await?
        .ok_or(Error::EventNotFound { id: event_id })?;

    let orders = get_orders_for_event(db, event_id).await?;
    let gross_total = orders
        .iter()
        .map(|o| parse_price(&o.price))
        .sum::<Result<Decimal>>()?;

    let lines = SoldProduct::find()
        .filter(sold_product::Column::EventId.eq(event_id))
        .all(db)
        .await?;

    Ok(EventReport {
        event,
        order_count: orders.len(),
        gross_total,
        product_totals: tally_units(&lines),
    })
}

/// Sums units per product name, sorted by units descending then name.
#[must_use]
pub fn tally_units(lines: &[sold_product::Model]) -> Vec<ProductTotal> {
    let mut units: HashMap<&str, i64> = HashMap::new();
    for line in lines {
        *units.entry(line.product.as_str()).or_default() += i64::from(line.count);
    }

    let mut totals: Vec<ProductTotal> = units
        .into_iter()
        .map(|(product, units)| ProductTotal {
            product: product.to_string(),
            units,
        })
        .collect();
    totals.sort_by(|a, b| b.units.cmp(&a.units).then_with(|| a.product.cmp(&b.product)));
    totals
}

/// Formats an amount as dollars with two decimals, e.g. `$8.50`.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    format!("${rounded}")
}

/// Renders a report as plain text.
#[must_use]
pub fn format_event_report(report: &EventReport) -> String {
    let header = format!(
        "{} (created {})\nOrders: {}\nGross: {}\n",
        report.event.name,
        report.event.created_at,
        report.order_count,
        format_money(report.gross_total)
    );
    let lines: String = report
        .product_totals
        .iter()
        .map(|total| format!("  {:>4}x {}\n", total.units, total.product))
        .collect();
    header + &lines
}
