//! Cart engine - The in-progress order at the booth.
//!
//! The cart holds one [`CartLine`] per distinct composite name (product name plus the
//! chosen option label) and a running total. The total is adjusted by one unit price on
//! every add and every single-unit removal instead of being recomputed from the list,
//! so both updates happen inside the same `&mut self` call.

use crate::core::product::CatalogProduct;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

/// One distinct product and option combination pending in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    /// Display and dedup key: product name, optionally followed by `" " + option`
    pub composite_name: String,
    /// Price of one unit
    pub unit_price: Decimal,
    /// Units of this line, always at least 1 while the line is in the cart
    pub quantity: u32,
    /// Catalog product this line was created from
    pub source_product_id: i64,
}

impl CartLine {
    /// `unit_price × quantity`
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A product picked on the selection screen, with the option chosen for it (if any).
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    /// The picked catalog product
    pub product: &'a CatalogProduct,
    /// Chosen option label
    pub option: Option<&'a str>,
}

impl<'a> Selection<'a> {
    /// A selection without an option label.
    #[must_use]
    pub const fn plain(product: &'a CatalogProduct) -> Self {
        Self {
            product,
            option: None,
        }
    }

    /// A selection carrying an option label.
    #[must_use]
    pub const fn with_option(product: &'a CatalogProduct, option: &'a str) -> Self {
        Self {
            product,
            option: Some(option),
        }
    }
}

/// Builds the composite name for a product and an optional option label.
///
/// The label is only appended when the product declares options; a label given for a
/// product without options is dropped.
#[must_use]
pub fn composite_name(product: &CatalogProduct, option: Option<&str>) -> String {
    match option {
        Some(label) if product.has_options && !label.is_empty() => {
            format!("{} {label}", product.name)
        }
        _ => product.name.clone(),
    }
}

/// The in-progress order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    total: Decimal,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Running total of the cart.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Looks up a line by composite name.
    #[must_use]
    pub fn line(&self, composite_name: &str) -> Option<&CartLine> {
        self.lines
            .iter()
            .find(|line| line.composite_name == composite_name)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Adds one unit of each selection, in order.
    ///
    /// A selection whose composite name matches an existing line bumps that line's
    /// quantity and adds that line's unit price to the total; otherwise a new line with
    /// quantity 1 is appended at the product's price.
    pub fn add_selections(&mut self, selections: &[Selection<'_>]) {
        for selection in selections {
            self.add_selection(selection.product, selection.option);
        }
    }

    /// Adds one unit of a single product.
    pub fn add_selection(&mut self, product: &CatalogProduct, option: Option<&str>) {
        if option.is_some_and(|label| !label.is_empty()) && !product.has_options {
            warn!(
                "Ignoring option {option:?} for product {} which has no options",
                product.name
            );
        }

        let name = composite_name(product, option);
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.composite_name == name)
        {
            // A merged unit is priced like the rest of its line
            line.quantity += 1;
            self.total += line.unit_price;
            debug!("Cart line {name} now x{}", line.quantity);
        } else {
            debug!("Cart line {name} added");
            self.lines.push(CartLine {
                composite_name: name,
                unit_price: product.unit_price,
                quantity: 1,
                source_product_id: product.id,
            });
            self.total += product.unit_price;
        }
    }

    /// Removes one unit from the named line, dropping the line when it reaches zero.
    ///
    /// Returns `false` without touching the total if no line has this name.
    pub fn remove_one_unit(&mut self, composite_name: &str) -> bool {
        let Some(index) = self
            .lines
            .iter()
            .position(|line| line.composite_name == composite_name)
        else {
            debug!("No cart line named {composite_name}, nothing to remove");
            return false;
        };

        let line = &mut self.lines[index];
        line.quantity -= 1;
        self.total -= line.unit_price;
        if line.quantity == 0 {
            self.lines.remove(index);
            debug!("Cart line {composite_name} removed");
        }
        true
    }

    /// Empties the cart and zeroes the total.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.total = Decimal::ZERO;
    }
}
