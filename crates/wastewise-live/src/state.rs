//! View lifecycle
//!
//! `Idle -> Loading -> Ready`, `Ready -> Ready` on every later snapshot,
//! `Error` from any live phase, `Error -> Loading` on manual retry, and
//! `Closed` from anywhere. `Closed` is terminal.

use crate::error::ViewError;
use std::fmt;

/// Lifecycle phase of a live view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewPhase {
    /// Created, not yet opened
    Idle,
    /// Subscribed, waiting for the first snapshot
    Loading,
    /// At least one snapshot applied
    Ready,
    /// Subscription failed; waiting for a manual retry
    Error,
    /// Released; terminal
    Closed,
}

impl ViewPhase {
    /// Every phase, in lifecycle order
    pub const ALL: [ViewPhase; 5] = [Self::Idle, Self::Loading, Self::Ready, Self::Error, Self::Closed];

    /// Whether the phase accepts no further transitions
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Closed
    }
}

impl fmt::Display for ViewPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "Idle",
            Self::Loading => "Loading",
            Self::Ready => "Ready",
            Self::Error => "Error",
            Self::Closed => "Closed",
        };
        f.write_str(name)
    }
}

/// Validates a phase transition.
///
/// # Errors
/// `ViewError::IllegalTransition` if `to` is not reachable from `from`
pub fn validate_transition(from: ViewPhase, to: ViewPhase) -> Result<(), ViewError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(ViewError::IllegalTransition { from, to })
    }
}

/// Phases reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: ViewPhase) -> Vec<ViewPhase> {
    use ViewPhase::*;
    match from {
        Idle => vec![Loading, Error, Closed],
        Loading => vec![Ready, Error, Closed],
        Ready => vec![Ready, Error, Closed],
        Error => vec![Loading, Closed],
        Closed => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn happy_path() {
        assert!(validate_transition(ViewPhase::Idle, ViewPhase::Loading).is_ok());
        assert!(validate_transition(ViewPhase::Loading, ViewPhase::Ready).is_ok());
        assert!(validate_transition(ViewPhase::Ready, ViewPhase::Ready).is_ok());
    }

    #[test]
    fn retry_only_from_error() {
        assert!(validate_transition(ViewPhase::Error, ViewPhase::Loading).is_ok());
        assert!(validate_transition(ViewPhase::Error, ViewPhase::Ready).is_err());
        assert!(validate_transition(ViewPhase::Idle, ViewPhase::Ready).is_err());
    }

    #[test]
    fn closed_is_terminal() {
        for to in ViewPhase::ALL {
            assert_eq!(
                validate_transition(ViewPhase::Closed, to),
                Err(ViewError::IllegalTransition { from: ViewPhase::Closed, to })
            );
        }
        assert!(ViewPhase::Closed.is_terminal());
    }

    #[test]
    fn every_live_phase_can_close() {
        for from in ViewPhase::ALL.into_iter().filter(|p| !p.is_terminal()) {
            assert!(validate_transition(from, ViewPhase::Closed).is_ok(), "{from} cannot close");
        }
    }

    proptest! {
        #[test]
        fn prop_validation_matches_allowed(
            from in proptest::sample::select(ViewPhase::ALL.to_vec()),
            to in proptest::sample::select(ViewPhase::ALL.to_vec()),
        ) {
            let allowed = allowed_transitions(from);
            prop_assert_eq!(validate_transition(from, to).is_ok(), allowed.contains(&to));
        }
    }
}
