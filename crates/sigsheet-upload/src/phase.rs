use crate::error::UploadError;

/// Phase of an upload session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadPhase {
    /// No upload in progress
    Idle,
    /// Slot accepted, waiting for a file
    AwaitingFileSelection,
    /// File supplied, being checked and decoded
    Validating,
    /// Decoded payload ready to be written
    Committing,
}

/// Phases reachable from `from` in one step.
///
/// Every non-idle phase can fall back to `Idle` on rejection or cancel.
#[must_use]
pub fn allowed_transitions(from: UploadPhase) -> Vec<UploadPhase> {
    match from {
        UploadPhase::Idle => vec![UploadPhase::AwaitingFileSelection],
        UploadPhase::AwaitingFileSelection => vec![UploadPhase::Validating, UploadPhase::Idle],
        UploadPhase::Validating => vec![UploadPhase::Committing, UploadPhase::Idle],
        UploadPhase::Committing => vec![UploadPhase::Idle],
    }
}

/// Validates a phase transition.
///
/// # Errors
/// [`UploadError::IllegalTransition`] if `to` is not reachable from `from`
pub fn validate_transition(from: UploadPhase, to: UploadPhase) -> Result<(), UploadError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(UploadError::IllegalTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_phase() -> impl Strategy<Value = UploadPhase> {
        prop_oneof![
            Just(UploadPhase::Idle),
            Just(UploadPhase::AwaitingFileSelection),
            Just(UploadPhase::Validating),
            Just(UploadPhase::Committing),
        ]
    }

    #[test]
    fn happy_path_is_allowed() {
        assert!(validate_transition(UploadPhase::Idle, UploadPhase::AwaitingFileSelection).is_ok());
        assert!(validate_transition(UploadPhase::AwaitingFileSelection, UploadPhase::Validating).is_ok());
        assert!(validate_transition(UploadPhase::Validating, UploadPhase::Committing).is_ok());
        assert!(validate_transition(UploadPhase::Committing, UploadPhase::Idle).is_ok());
    }

    #[test]
    fn skipping_phases_is_rejected() {
        assert!(validate_transition(UploadPhase::Idle, UploadPhase::Committing).is_err());
        assert!(validate_transition(UploadPhase::AwaitingFileSelection, UploadPhase::Committing).is_err());
        assert!(validate_transition(UploadPhase::Committing, UploadPhase::Validating).is_err());
        assert!(validate_transition(UploadPhase::Idle, UploadPhase::Idle).is_err());
    }

    proptest! {
        #[test]
        fn prop_validation_matches_table(from in any_phase(), to in any_phase()) {
            let allowed = allowed_transitions(from);
            prop_assert_eq!(validate_transition(from, to).is_ok(), allowed.contains(&to));
        }

        #[test]
        fn prop_idle_reachable_from_any_active_phase(from in any_phase()) {
            prop_assume!(from != UploadPhase::Idle);
            prop_assert!(validate_transition(from, UploadPhase::Idle).is_ok());
        }
    }
}
