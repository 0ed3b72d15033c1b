//! Database configuration module for the convention register.
//!
//! This module handles the `SQLite` connection and the schema migration. Tables are
//! generated from the entity definitions with `SeaORM`'s `Schema::create_table_from_entity`,
//! so the on-disk layout always matches the Rust models. Whether the migration has
//! already run is recorded in the store itself (`system_state.schema_version`), which
//! makes opening the same store any number of times safe.

use crate::entities::{Event, Order, Product, ProductOption, SoldProduct, SystemState, system_state};
use crate::errors::{Error, Result};
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema, Set, prelude::*,
};
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// Schema version written by this build.
pub const SCHEMA_VERSION: i32 = 1;

const SCHEMA_VERSION_KEY: &str = "schema_version";
const DEFAULT_DATABASE_URL: &str = "sqlite://data/convention_sales.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, falling back to
/// a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Extracts the file path from a `sqlite://` URL. Returns `None` for in-memory stores
/// and non-`SQLite` URLs.
#[must_use]
pub fn sqlite_file_path(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(PathBuf::from(path))
}

/// Opens a connection to the store at `database_url`, creating the parent directory of
/// a file-backed `SQLite` store when needed.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(parent) = sqlite_file_path(database_url)
        .as_deref()
        .and_then(std::path::Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent).map_err(|e| Error::Config {
            message: format!("Failed to create database directory {}: {e}", parent.display()),
        })?;
    }

    debug!("Connecting to {database_url}");
    Database::connect(database_url).await.map_err(Into::into)
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(builder.build(&table)).await?;
    Ok(())
}

/// Creates every table the register uses, plus the per-product option label index.
/// Safe to call on a store where some or all tables already exist.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, Event).await?;
    create_table(db, &schema, Product).await?;
    create_table(db, &schema, ProductOption).await?;
    create_table(db, &schema, Order).await?;
    create_table(db, &schema, SoldProduct).await?;
    create_table(db, &schema, SystemState).await?;

    db.execute_unprepared(
        r#"CREATE UNIQUE INDEX IF NOT EXISTS idx_extra_options_product_label
            ON extra_options(user_id, "option")"#,
    )
    .await?;

    Ok(())
}

/// Reads the schema version recorded in the store, if any.
pub async fn get_schema_version(db: &DatabaseConnection) -> Result<Option<i32>> {
    let state = SystemState::find()
        .filter(system_state::Column::Key.eq(SCHEMA_VERSION_KEY))
        .one(db)
        .await?;

    state
        .map(|s| {
            s.value.parse::<i32>().map_err(|e| Error::Config {
                message: format!("Stored schema version {:?} is not a number: {e}", s.value),
            })
        })
        .transpose()
}

async fn set_schema_version(db: &DatabaseConnection, version: i32) -> Result<()> {
    let now = chrono::Utc::now().naive_utc();
    let existing = SystemState::find()
        .filter(system_state::Column::Key.eq(SCHEMA_VERSION_KEY))
        .one(db)
        .await?;

    if let Some(state) = existing {
        let mut active_model: system_state::ActiveModel = state.into();
        active_model.value = Set(version.to_string());
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_state = system_state::ActiveModel {
            key: Set(SCHEMA_VERSION_KEY.to_string()),
            value: Set(version.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };
        new_state.insert(db).await?;
    }

    Ok(())
}

/// Brings the store up to [`SCHEMA_VERSION`].
///
/// Returns `Ok(true)` when tables were created, `Ok(false)` when the store was already
/// current.
///
/// # Errors
/// Returns an error if the store records a newer schema version than this build
/// understands, or if any statement fails.
#[instrument(skip(db))]
pub async fn migrate(db: &DatabaseConnection) -> Result<bool> {
    // The version lives in system_state, so that table has to exist before the check
    let schema = Schema::new(db.get_database_backend());
    create_table(db, &schema, SystemState).await?;

    match get_schema_version(db).await? {
        Some(version) if version > SCHEMA_VERSION => Err(Error::Config {
            message: format!(
                "Store schema version {version} is newer than supported version {SCHEMA_VERSION}"
            ),
        }),
        Some(version) if version == SCHEMA_VERSION => {
            debug!("Schema already at version {version}, nothing to do");
            Ok(false)
        }
        previous => {
            info!("Migrating schema from {previous:?} to version {SCHEMA_VERSION}");
            create_tables(db).await?;
            set_schema_version(db, SCHEMA_VERSION).await?;
            Ok(true)
        }
    }
}
