//! Aggregates module
pub mod cart;

pub use cart::{Cart, LineItem, NewLineItem};
