//! Storefront Cart Core
//!
//! In-memory shopping cart for a headless storefront: line items keyed by
//! product + variant, merge-on-add, clamped quantity updates, and derived
//! totals recomputed on every mutation. A persistence decorator snapshots
//! the cart to a key-value blob slot after each change so a session survives
//! process restarts.
//!
//! ## Features
//! - Line-item identity by `(product_id, variant id)` with display metadata
//!   snapshotted at add-time
//! - Derived `total` and `item_count`, recomputed from the rows after every
//!   mutation
//! - Whole-snapshot JSON persistence with restore-on-open
//! - Pluggable storage backends (in-memory, file-per-key)
//!
//! ## Behavior on bad input
//!
//! Every cart operation is total; out-of-range input is normalized rather
//! than rejected. Zero add-quantities become 1, negative quantity updates
//! clamp to 0 (removing the row), negative prices clamp to zero, and
//! remove/update calls for an identity not in the cart are silent no-ops.
//! An unreadable persisted snapshot is discarded in favor of an empty cart,
//! and a failed persist is logged without touching the in-memory state.

pub mod domain;
pub mod storage;
pub mod store;

pub use domain::aggregates::cart::{Cart, LineItem, NewLineItem};
pub use domain::value_objects::Variant;
pub use storage::{CartStorage, InMemoryStorage, JsonFileStorage, StorageError, CART_STORAGE_KEY};
pub use store::CartStore;
