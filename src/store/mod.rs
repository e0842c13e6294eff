//! Persistent cart store
//!
//! [`CartStore`] is the mutation entry point UI surfaces talk to: it owns
//! the [`Cart`] aggregate, forwards each command to it, then writes the full
//! snapshot to the storage collaborator. The aggregate stays free of I/O and
//! the in-memory cart remains the source of truth for the session: a failed
//! persist is logged, never propagated and never rolled back.

use rust_decimal::Decimal;
use tracing::warn;

use crate::domain::aggregates::cart::{Cart, LineItem, NewLineItem};
use crate::storage::{CartStorage, CART_STORAGE_KEY};

/// Cart aggregate plus its durable-storage decorator.
///
/// Create one per session with [`CartStore::open`]; drop it (or call
/// [`CartStore::into_storage`]) at session end. The last persisted snapshot
/// is restored on the next open.
pub struct CartStore<S: CartStorage> {
    cart: Cart,
    storage: S,
    key: String,
}

impl<S: CartStorage> CartStore<S> {
    /// Open the store under the default storage name, restoring the last
    /// persisted cart if one exists.
    pub fn open(storage: S) -> Self {
        Self::open_with_key(storage, CART_STORAGE_KEY)
    }

    /// Open the store under a caller-chosen storage name.
    ///
    /// Restore never fails: a missing snapshot, an unreadable backend or a
    /// snapshot that does not parse all yield an empty cart (the latter two
    /// are logged).
    pub fn open_with_key(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();

        let cart = match storage.load(&key) {
            Ok(Some(snapshot)) => match serde_json::from_str::<Cart>(&snapshot) {
                Ok(cart) => cart,
                Err(err) => {
                    warn!(key = %key, error = %err, "discarding unreadable cart snapshot");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(err) => {
                warn!(key = %key, error = %err, "cart storage unavailable, starting empty");
                Cart::new()
            }
        };

        Self { cart, storage, key }
    }

    /// See [`Cart::add_item`]. Persists the new snapshot.
    pub fn add_item(&mut self, item: NewLineItem, quantity: u32) {
        self.cart.add_item(item, quantity);
        self.persist();
    }

    /// See [`Cart::remove_item`]. Persists the new snapshot.
    pub fn remove_item(&mut self, product_id: u64, variant_id: Option<&str>) {
        self.cart.remove_item(product_id, variant_id);
        self.persist();
    }

    /// See [`Cart::update_quantity`]. Persists the new snapshot.
    pub fn update_quantity(&mut self, product_id: u64, quantity: i64, variant_id: Option<&str>) {
        self.cart.update_quantity(product_id, quantity, variant_id);
        self.persist();
    }

    /// See [`Cart::clear`]. Persists the new snapshot.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist();
    }

    /// See [`Cart::item_quantity`]. Pure read, nothing is persisted.
    pub fn item_quantity(&self, product_id: u64, variant_id: Option<&str>) -> u32 {
        self.cart.item_quantity(product_id, variant_id)
    }

    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    pub fn total(&self) -> Decimal {
        self.cart.total()
    }

    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// The current cart state, for checkout and other read-only consumers.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Tear down the store, handing the storage collaborator back.
    pub fn into_storage(self) -> S {
        self.storage
    }

    // Fire-and-forget whole-snapshot write. Runs after every mutation; the
    // in-memory cart is authoritative whether or not the write lands.
    fn persist(&self) {
        let snapshot = match serde_json::to_string(&self.cart) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(cart_id = %self.cart.id(), error = %err, "failed to serialize cart snapshot");
                return;
            }
        };

        if let Err(err) = self.storage.save(&self.key, &snapshot) {
            warn!(cart_id = %self.cart.id(), key = %self.key, error = %err, "failed to persist cart snapshot");
        }
    }
}
