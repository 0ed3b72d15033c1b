//! Order entity - One finalized sale.
//!
//! Orders are written once at submission and never updated. The total is kept as
//! decimal text in `price`; buyer details default to `"N/A"` for walk-up sales.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Sale category label (e.g., "Convention Sale")
    #[sea_orm(column_name = "type")]
    pub order_type: String,
    /// Buyer name
    #[sea_orm(column_name = "name")]
    pub buyer_name: String,
    /// Buyer address or email
    #[sea_orm(column_name = "email")]
    pub buyer_email: String,
    /// Order total as decimal text
    pub price: String,
    /// Buyer phone number
    #[sea_orm(column_name = "phone")]
    pub buyer_phone: String,
    /// ID of the event this order was taken at
    #[sea_orm(column_name = "db_id")]
    pub event_id: i64,
    /// How the buyer paid (e.g., "Cash", "Card")
    #[sea_orm(column_name = "paymentType")]
    pub payment_type: String,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order belongs to one event
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id"
    )]
    Event,
    /// One order has many sold line items
    #[sea_orm(has_many = "super::sold_product::Entity")]
    SoldProducts,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::sold_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SoldProducts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
