//! Submission lifecycle shared by the entity forms
//!
//! A submit attempt walks `Idle → Validating → Submitting` and returns
//! to `Idle` once the close has been requested. Submit events arriving
//! while the phase is busy are dropped by the caller.

use super::registry::FieldRegistry;
use super::schema::{ValidationResult, ValidationSchema};

/// Where the active form currently is in its submit lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
}

impl SubmitPhase {
    /// True while a submission is in flight; a second submit event must
    /// be ignored in that window
    pub fn is_busy(&self) -> bool {
        !matches!(self, SubmitPhase::Idle)
    }
}

/// Run the validation pipeline for a form and apply the outcome to its
/// fields: reported fields get their message, unreported fields get
/// their stale errors cleared. Returns true when submission may
/// proceed. No network call happens on the false path.
pub fn apply_validation(registry: &mut FieldRegistry, schema: &ValidationSchema) -> bool {
    let snapshot = registry.snapshot();
    registry.clear_errors();

    match schema.validate(&snapshot) {
        ValidationResult::Valid => true,
        ValidationResult::Invalid(errors) => {
            for error in errors {
                registry.set_error(&error.field, Some(error.message));
            }
            false
        }
    }
}
