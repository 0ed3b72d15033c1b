//! Product entity - Represents a catalog item sold at the booth.
//!
//! Products live in the `users` table and keep their unit price as text in the
//! `email` column. The text is decoded into a decimal by `core::product`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the product (e.g., "Sticker", "Print A4")
    pub name: String,
    /// Unit price as decimal text
    #[sea_orm(column_name = "email")]
    pub price: String,
    /// Legacy per-product counter; always written as 0
    pub count: i32,
    /// Whether a sale of this product carries a variant option
    #[sea_orm(column_name = "hasOptions")]
    pub has_options: bool,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product has many variant options
    #[sea_orm(has_many = "super::product_option::Entity")]
    Options,
}

impl Related<super::product_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Options.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
