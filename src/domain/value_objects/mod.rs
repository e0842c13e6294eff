//! Value Objects for the cart domain

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A purchasable configuration of a product (e.g. color/size).
///
/// Only `id` participates in cart-row identity; `name` and `attributes` are
/// display metadata snapshotted when the row is created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: String,
    pub name: String,
    pub attributes: HashMap<String, String>,
}

impl Variant {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), attributes: HashMap::new() }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}
