//! Product option entity - A named variant of a product (size, flavor, ...).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product option database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "extra_options")]
pub struct Model {
    /// Unique identifier for the option
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the owning product
    #[sea_orm(column_name = "user_id")]
    pub product_id: i64,
    /// Option label, unique per product
    #[sea_orm(column_name = "option")]
    pub label: String,
}

/// Defines relationships between ProductOption and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each option belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
