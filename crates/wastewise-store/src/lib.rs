//! WasteWise Store
//!
//! Contracts for the hosted services the client talks to, plus in-process
//! implementations used by the CLI and the test suites:
//! - `DocumentStore`: collection/document CRUD and live snapshot subscriptions
//! - `IdentityService`: sign-in, sign-up, sign-out, current principal
//! - `StoreConfig`: fail-fast connection parameters from the environment
//!
//! # Example
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use wastewise_store::{DocumentStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! let mut subscription = store.subscribe("GarbagePlaces").await?;
//! while let Some(snapshot) = subscription.next().await {
//!     println!("{} places", snapshot?.len());
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod config;
pub mod document_store;
pub mod error;
pub mod identity;
pub mod memory;
pub mod typed;

// Re-exports for convenience
pub use config::StoreConfig;
pub use document_store::{DocumentStore, SnapshotEvent, Subscription, SubscriptionId};
pub use error::{ConfigError, IdentityError, StoreError};
pub use identity::{IdentityService, MemoryIdentity, Principal};
pub use memory::{MemoryStore, StoreOp};
pub use typed::EntityStoreExt;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
