//! Event entity - One convention or trade show.
//!
//! Events are stored in the `databases` table for compatibility with stores created
//! before events were called events. Every order and sold line item belongs to exactly
//! one event.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Event database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "databases")]
pub struct Model {
    /// Unique identifier for the event
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the event (e.g., "Anime Expo 2026")
    pub name: String,
    /// Creation date as `MM-DD-YYYY`
    #[sea_orm(column_name = "createdAt")]
    pub created_at: String,
}

/// Defines relationships between Event and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One event has many orders
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
    /// One event has many sold line items
    #[sea_orm(has_many = "super::sold_product::Entity")]
    SoldProducts,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::sold_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SoldProducts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
