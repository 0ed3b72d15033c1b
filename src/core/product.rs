//! Product catalog business logic - Handles all product and product-option operations.
//!
//! Products are stored with their unit price as text. This module is the boundary where
//! that text becomes a [`Decimal`]: everything above it works with [`CatalogProduct`].
//! Option rows are written here too, so the option editor and the seeding path share
//! one set of store operations.

use crate::{
    config::settings::ProductSeed,
    entities::{Product, ProductOption, product, product_option},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// A product with its price decoded, as the cart sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogProduct {
    /// Store-assigned product ID
    pub id: i64,
    /// Display name
    pub name: String,
    /// Price of one unit
    pub unit_price: Decimal,
    /// Whether a sale of this product carries an option label
    pub has_options: bool,
}

impl TryFrom<product::Model> for CatalogProduct {
    type Error = Error;

    fn try_from(model: product::Model) -> Result<Self> {
        Ok(Self {
            unit_price: parse_price(&model.price)?,
            id: model.id,
            name: model.name,
            has_options: model.has_options,
        })
    }
}

/// Parses price text into a non-negative decimal.
///
/// # Errors
/// Returns [`Error::InvalidPrice`] if the text is not a decimal number or is negative.
pub fn parse_price(value: &str) -> Result<Decimal> {
    let price = value
        .trim()
        .parse::<Decimal>()
        .map_err(|_| Error::InvalidPrice {
            value: value.to_string(),
        })?;

    if price < Decimal::ZERO {
        return Err(Error::InvalidPrice {
            value: value.to_string(),
        });
    }

    Ok(price)
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: "Product name cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Retrieves every product, ordered alphabetically by name.
pub async fn get_all_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every product with prices decoded, ordered alphabetically by name.
///
/// # Errors
/// Returns an error if the query fails or any stored price does not parse.
pub async fn get_catalog(db: &DatabaseConnection) -> Result<Vec<CatalogProduct>> {
    get_all_products(db)
        .await?
        .into_iter()
        .map(CatalogProduct::try_from)
        .collect()
}

/// Retrieves a specific product by its unique ID.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a product by its exact name.
pub async fn get_product_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<product::Model>> {
    Product::find()
        .filter(product::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads a product ready to be put in the cart.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] if no product has this ID, or
/// [`Error::InvalidPrice`] if its stored price does not parse.
pub async fn get_catalog_product(db: &DatabaseConnection, product_id: i64) -> Result<CatalogProduct> {
    get_product_by_id(db, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })
        .and_then(CatalogProduct::try_from)
}

/// Creates a new product, performing input validation.
///
/// The name is trimmed and the price is stored in its parsed decimal form.
///
/// # Errors
/// Returns an error if:
/// - The product name is empty or whitespace-only
/// - The price is not a non-negative decimal
/// - The insert fails
#[instrument(skip(db))]
pub async fn create_product(
    db: &DatabaseConnection,
    name: &str,
    price: &str,
    has_options: bool,
) -> Result<product::Model> {
    let name = validate_name(name)?;
    let price = parse_price(price)?;

    let product = product::ActiveModel {
        name: Set(name),
        price: Set(price.to_string()),
        count: Set(0),
        has_options: Set(has_options),
        ..Default::default()
    };
    let created = product
        .insert(db)
        .await
        .map_err(|e| Error::store_write("product", e))?;

    info!("Created product {} ({})", created.name, created.id);
    Ok(created)
}

/// Updates an existing product's name, price and option flag.
///
/// # Errors
/// Returns an error if validation fails, the product does not exist, or the update fails.
#[instrument(skip(db))]
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    new_name: &str,
    new_price: &str,
    has_options: bool,
) -> Result<product::Model> {
    let new_name = validate_name(new_name)?;
    let new_price = parse_price(new_price)?;

    let mut product: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?
        .into();

    product.name = Set(new_name);
    product.price = Set(new_price.to_string());
    product.has_options = Set(has_options);

    product
        .update(db)
        .await
        .map_err(|e| Error::store_write("product", e))
}

/// Deletes a product together with all of its options.
///
/// # Errors
/// Returns an error if the product does not exist or any delete fails; in that case
/// nothing is deleted.
#[instrument(skip(db))]
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let product = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    let options = ProductOption::delete_many()
        .filter(product_option::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await
        .map_err(|e| Error::store_write("product options", e))?;

    product
        .delete(&txn)
        .await
        .map_err(|e| Error::store_write("product", e))?;

    txn.commit().await?;
    info!(
        "Deleted product {product_id} and {} option(s)",
        options.rows_affected
    );
    Ok(())
}

/// Lists the option labels stored for a product, in the order they were added.
pub async fn get_product_options<C>(db: &C, product_id: i64) -> Result<Vec<String>>
where
    C: ConnectionTrait,
{
    let options = ProductOption::find()
        .filter(product_option::Column::ProductId.eq(product_id))
        .order_by_asc(product_option::Column::Id)
        .all(db)
        .await?;

    Ok(options.into_iter().map(|o| o.label).collect())
}

/// Whether any option rows exist for the product. The selection screen uses this to
/// decide whether picking the product opens the option picker.
pub async fn product_has_options_in_store(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<bool> {
    let count = ProductOption::find()
        .filter(product_option::Column::ProductId.eq(product_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Inserts one option label for a product.
pub async fn insert_option<C>(db: &C, product_id: i64, label: &str) -> Result<product_option::Model>
where
    C: ConnectionTrait,
{
    product_option::ActiveModel {
        product_id: Set(product_id),
        label: Set(label.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| Error::store_write(format!("option {label:?}"), e))
}

/// Deletes one option label from a product. Returns whether a row was removed.
pub async fn delete_option<C>(db: &C, product_id: i64, label: &str) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = ProductOption::delete_many()
        .filter(product_option::Column::ProductId.eq(product_id))
        .filter(product_option::Column::Label.eq(label))
        .exec(db)
        .await
        .map_err(|e| Error::store_write(format!("option {label:?}"), e))?;
    Ok(result.rows_affected > 0)
}

/// Seeds configured products that are not in the catalog yet (matched by name).
///
/// Existing products are left untouched, options included. Returns the number of
/// products created.
///
/// # Errors
/// Returns an error if a seed entry is invalid or a write fails.
#[instrument(skip_all, fields(seeds = seeds.len()))]
pub async fn seed_products(db: &DatabaseConnection, seeds: &[ProductSeed]) -> Result<usize> {
    let mut created = 0;

    for seed in seeds {
        if get_product_by_name(db, seed.name.trim()).await?.is_some() {
            debug!("Product {} already in catalog, skipping seed", seed.name);
            continue;
        }

        let product = create_product(db, &seed.name, &seed.price, seed.has_options).await?;
        let mut seen: Vec<&str> = Vec::new();
        for label in seed.options.iter().map(|l| l.trim()) {
            if label.is_empty() || seen.contains(&label) {
                warn!("Skipping empty or repeated option {label:?} for {}", product.name);
                continue;
            }
            insert_option(db, product.id, label).await?;
            seen.push(label);
        }
        created += 1;
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("3.50").unwrap(), Decimal::new(350, 2));
        assert_eq!(parse_price(" 5 ").unwrap(), Decimal::from(5));
        assert_eq!(parse_price("0").unwrap(), Decimal::ZERO);
        assert!(matches!(parse_price("abc"), Err(Error::InvalidPrice { value: _ })));
        assert!(matches!(parse_price(""), Err(Error::InvalidPrice { value: _ })));
        assert!(matches!(parse_price("-1.00"), Err(Error::InvalidPrice { value: _ })));
    }

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_product(&db, "", "5.00", false).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        let result = create_product(&db, "   ", "5.00", false).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        let result = create_product(&db, "Sticker", "five", false).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidPrice { value: _ }));

        let result = create_product(&db, "Sticker", "-2", false).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidPrice { value: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let product = create_product(&db, "  Print A4 ", "15.50", true).await?;
        assert_eq!(product.name, "Print A4");
        assert_eq!(product.price, "15.50");
        assert_eq!(product.count, 0);
        assert!(product.has_options);

        let catalog = get_catalog_product(&db, product.id).await?;
        assert_eq!(catalog.unit_price, Decimal::new(1550, 2));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_catalog_ordered_by_name() -> Result<()> {
        let db = setup_test_db().await?;
        create_product(&db, "Zine", "8", false).await?;
        create_product(&db, "Button", "2", false).await?;

        let catalog = get_catalog(&db).await?;
        let names: Vec<&str> = catalog.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Button", "Zine"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_catalog_product_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = get_catalog_product(&db, 999).await;
        assert!(matches!(result, Err(Error::ProductNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_integration() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_product(&db, "Original", "10", false).await?;

        let updated = update_product(&db, product.id, "Updated", "12.25", true).await?;
        assert_eq!(updated.name, "Updated");
        assert_eq!(updated.price, "12.25");
        assert!(updated.has_options);

        let retrieved = get_product_by_id(&db, product.id).await?.unwrap();
        assert_eq!(retrieved, updated);

        let missing = update_product(&db, 999, "Nope", "1", false).await;
        assert!(matches!(missing, Err(Error::ProductNotFound { id: 999 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product_removes_options() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_product(&db, "Keychain", "12", true).await?;
        let other = create_product(&db, "Charm", "6", true).await?;
        insert_option(&db, product.id, "Cat").await?;
        insert_option(&db, product.id, "Dog").await?;
        insert_option(&db, other.id, "Cat").await?;

        delete_product(&db, product.id).await?;

        assert!(get_product_by_id(&db, product.id).await?.is_none());
        assert!(get_product_options(&db, product.id).await?.is_empty());
        assert_eq!(get_product_options(&db, other.id).await?, vec!["Cat"]);

        let missing = delete_product(&db, product.id).await;
        assert!(matches!(missing, Err(Error::ProductNotFound { id: _ })));
        Ok(())
    }

    #[tokio::test]
    async fn test_option_store_operations() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_product(&db, "Keychain", "12", true).await?;
        assert!(!product_has_options_in_store(&db, product.id).await?);

        insert_option(&db, product.id, "Cat").await?;
        insert_option(&db, product.id, "Dog").await?;
        assert!(product_has_options_in_store(&db, product.id).await?);
        assert_eq!(get_product_options(&db, product.id).await?, vec!["Cat", "Dog"]);

        let duplicate = insert_option(&db, product.id, "Cat").await;
        assert!(matches!(duplicate, Err(Error::StoreWriteFailure { .. })));

        assert!(delete_option(&db, product.id, "Cat").await?);
        assert!(!delete_option(&db, product.id, "Cat").await?);
        assert_eq!(get_product_options(&db, product.id).await?, vec!["Dog"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_products_skips_existing() -> Result<()> {
        let db = setup_test_db().await?;
        create_product(&db, "Sticker", "3", false).await?;

        let seeds = vec![
            ProductSeed {
                name: "Sticker".to_string(),
                price: "99".to_string(),
                has_options: false,
                options: vec![],
            },
            ProductSeed {
                name: "Keychain".to_string(),
                price: "12.50".to_string(),
                has_options: true,
                options: vec!["Cat".to_string(), " ".to_string(), "Cat".to_string(), "Dog".to_string()],
            },
        ];

        assert_eq!(seed_products(&db, &seeds).await?, 1);
        assert_eq!(seed_products(&db, &seeds).await?, 0);

        let sticker = get_product_by_name(&db, "Sticker").await?.unwrap();
        assert_eq!(sticker.price, "3");

        let keychain = get_product_by_name(&db, "Keychain").await?.unwrap();
        assert_eq!(get_product_options(&db, keychain.id).await?, vec!["Cat", "Dog"]);
        Ok(())
    }
}
