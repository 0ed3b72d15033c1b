//! Entity module - Contains all SeaORM entity definitions for the register's store.
//! Table and column names match the layout existing on-device stores already use,
//! so several Rust field names differ from the column they map to.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod event;
pub mod order;
pub mod product;
pub mod product_option;
pub mod sold_product;
pub mod system_state;

// Re-export specific types to avoid conflicts
pub use event::{Column as EventColumn, Entity as Event, Model as EventModel};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use product_option::{
    Column as ProductOptionColumn, Entity as ProductOption, Model as ProductOptionModel,
};
pub use sold_product::{
    Column as SoldProductColumn, Entity as SoldProduct, Model as SoldProductModel,
};
pub use system_state::{
    Column as SystemStateColumn, Entity as SystemState, Model as SystemStateModel,
};
