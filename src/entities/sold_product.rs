//! Sold product entity - One line item of a finalized order.
//!
//! The product name is denormalized (composite name including any option suffix),
//! so later catalog edits never rewrite sales history.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sold line item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sold_products")]
pub struct Model {
    /// Unique identifier for the line item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the order this line belongs to
    #[sea_orm(column_name = "user_id")]
    pub order_id: i64,
    /// Composite product name at the time of sale
    pub product: String,
    /// Units sold
    pub count: i32,
    /// ID of the event the order was taken at
    #[sea_orm(column_name = "db_id")]
    pub event_id: i64,
}

/// Defines relationships between a sold line item and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line item belongs to one order
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
    /// Each line item belongs to one event
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id"
    )]
    Event,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
