//! WasteWise Core
//!
//! Services used by the list and form screens, on top of the live view and
//! store crates:
//! - `RecordWriter`: write-through creates/updates/deletes with notices
//! - `PlaceService`, `ComplaintService`, `DriverScheduleService`
//! - `SessionContext` and `ProfileDirectory`: explicit signed-in state
//! - `PlaceReport`: totals and plain-text report
//! - `AppConfig`: fail-fast startup configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wastewise_core::{PlaceService, RecordWriter, TracingNotifier};
//! use wastewise_store::MemoryStore;
//!
//! let store = Arc::new(MemoryStore::new());
//! let writer = RecordWriter::new(store, Arc::new(TracingNotifier), "location");
//! let places = PlaceService::new(writer);
//! let place = places.add(&form).await?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod complaints;
pub mod config;
pub mod drivers;
pub mod error;
pub mod notify;
pub mod places;
pub mod profile;
pub mod report;
pub mod seed;
pub mod session;
pub mod write_through;

// Re-exports for convenience
pub use complaints::ComplaintService;
pub use config::AppConfig;
pub use drivers::DriverScheduleService;
pub use error::CoreError;
pub use notify::{Notice, NoticeLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use places::PlaceService;
pub use profile::ProfileDirectory;
pub use report::PlaceReport;
pub use seed::{load_records, parse_records, seed_store};
pub use session::{Landing, Session, SessionContext};
pub use write_through::RecordWriter;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
