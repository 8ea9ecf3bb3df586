//! WasteWise Live
//!
//! Live collection views for list screens:
//! - `LiveCollectionView`: subscription lifecycle, snapshot mirror, optimistic writes
//! - `Debouncer`: one quiet-period callback shared by every search box
//! - `SearchQuery`: AND-of-terms, OR-of-fields substring filter
//! - `ViewPhase` lifecycle with validated transitions
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wastewise_live::{LiveCollectionView, ViewConfig};
//! use wastewise_model::GarbagePlace;
//! use wastewise_store::MemoryStore;
//!
//! let view = LiveCollectionView::<GarbagePlace>::new(Arc::new(MemoryStore::new()), ViewConfig::default());
//! view.open().await?;
//! view.set_filter_text("park")?;
//! // ... after the quiet period
//! let places = view.visible();
//! view.close();
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod debounce;
pub mod error;
pub mod filter;
pub mod state;
pub mod view;

// Re-exports for convenience
pub use debounce::Debouncer;
pub use error::ViewError;
pub use filter::{filter_records, SearchQuery};
pub use state::{allowed_transitions, validate_transition, ViewPhase};
pub use view::{
    LiveCollectionView, OptimisticMutation, RefreshOutcome, SubscriptionHandle, ViewConfig, ViewSnapshot,
    ViewStats, DEFAULT_DEBOUNCE_MS,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
