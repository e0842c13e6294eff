//! Cart Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::Variant;

/// Candidate for [`Cart::add_item`]: everything a cart row carries except
/// the quantity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewLineItem {
    pub product_id: u64,
    pub document_id: String,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub variant: Option<Variant>,
}

/// One distinct purchasable unit in the cart.
///
/// Name, slug, price and image are snapshots taken when the row was first
/// added; later changes to the underlying product do not touch them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: u64,
    /// Content-store handle. Informational only; never part of row identity.
    pub document_id: String,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    /// Always >= 1; a row whose quantity reaches 0 is removed instead.
    pub quantity: u32,
    pub image: Option<String>,
    pub variant: Option<Variant>,
}

impl LineItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    fn variant_id(&self) -> Option<&str> {
        self.variant.as_ref().map(|v| v.id.as_str())
    }

    /// Row identity: `product_id` plus variant id. `None` matches only rows
    /// without a variant.
    fn matches(&self, product_id: u64, variant_id: Option<&str>) -> bool {
        self.product_id == product_id && self.variant_id() == variant_id
    }
}

/// The cart aggregate: ordered line items plus derived totals.
///
/// `total` and `item_count` are recomputed from the rows after every
/// mutation; they are never updated incrementally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    id: String,
    items: Vec<LineItem>,
    total: Decimal,
    item_count: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Cart {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            items: vec![],
            total: Decimal::ZERO,
            item_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn items(&self) -> &[LineItem] { &self.items }
    pub fn total(&self) -> Decimal { self.total }
    pub fn item_count(&self) -> u64 { self.item_count }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    /// Add `quantity` units of `item` to the cart.
    ///
    /// If a row with the same identity (`product_id` + variant id) already
    /// exists, only its quantity grows; the existing row's name, price and
    /// image are kept and the candidate's metadata is ignored. Otherwise a
    /// new row is appended at the end.
    ///
    /// A `quantity` of 0 is treated as "unspecified" and becomes 1; callers
    /// wanting a no-op must not call. A negative candidate price is clamped
    /// to zero.
    pub fn add_item(&mut self, item: NewLineItem, quantity: u32) {
        let quantity = quantity.max(1);
        let variant_id = item.variant.as_ref().map(|v| v.id.clone());

        match self
            .items
            .iter_mut()
            .find(|row| row.matches(item.product_id, variant_id.as_deref()))
        {
            Some(row) => row.quantity = row.quantity.saturating_add(quantity),
            None => self.items.push(LineItem {
                product_id: item.product_id,
                document_id: item.document_id,
                name: item.name,
                slug: item.slug,
                price: item.price.max(Decimal::ZERO),
                quantity,
                image: item.image,
                variant: item.variant,
            }),
        }

        self.recalculate();
    }

    /// Remove the row matching the identity exactly. Silent no-op when no
    /// row matches; `None` removes only a variant-less row.
    pub fn remove_item(&mut self, product_id: u64, variant_id: Option<&str>) {
        self.items.retain(|row| !row.matches(product_id, variant_id));
        self.recalculate();
    }

    /// Set the matching row's quantity to `max(0, quantity)`; a resulting 0
    /// removes the row entirely. Silent no-op when no row matches.
    pub fn update_quantity(&mut self, product_id: u64, quantity: i64, variant_id: Option<&str>) {
        let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);

        if let Some(row) = self
            .items
            .iter_mut()
            .find(|row| row.matches(product_id, variant_id))
        {
            row.quantity = quantity;
        }

        self.items.retain(|row| row.quantity > 0);
        self.recalculate();
    }

    /// Reset the cart to empty.
    pub fn clear(&mut self) {
        self.items.clear();
        self.recalculate();
    }

    /// Quantity of the matching row, or 0 when absent. Pure read.
    pub fn item_quantity(&self, product_id: u64, variant_id: Option<&str>) -> u32 {
        self.items
            .iter()
            .find(|row| row.matches(product_id, variant_id))
            .map_or(0, |row| row.quantity)
    }

    // Full fold over the rows, never an incremental update, so the stored
    // aggregates cannot drift from the items. O(n) per mutation is an
    // intentional tradeoff for cart-sized collections.
    fn recalculate(&mut self) {
        self.total = self
            .items
            .iter()
            .fold(Decimal::ZERO, |acc, row| acc + row.line_total());
        self.item_count = self.items.iter().map(|row| u64::from(row.quantity)).sum();
        self.updated_at = Utc::now();
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}
