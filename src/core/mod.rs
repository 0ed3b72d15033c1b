//! Core business logic - framework-agnostic cart, option editing, order and catalog
//! operations. The UI layer calls into these directly.

pub mod cart;
pub mod event;
pub mod option_editor;
pub mod order;
pub mod product;
pub mod report;
