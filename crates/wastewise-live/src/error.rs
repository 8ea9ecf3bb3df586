//! Live view errors

use crate::state::ViewPhase;
use wastewise_store::StoreError;

/// Failures of live view operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// The view was closed and accepts no further operations
    #[error("view is closed")]
    Closed,

    /// `open` called on a view that already opened
    #[error("view is already open")]
    AlreadyOpen,

    /// Phase change not permitted by the lifecycle
    #[error("illegal phase transition {from} -> {to}")]
    IllegalTransition { from: ViewPhase, to: ViewPhase },

    /// The store refused the subscription
    #[error("subscription failed: {0}")]
    Subscribe(#[from] StoreError),
}
