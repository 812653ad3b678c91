//! Form domain layer
//!
//! Field registry, validation pipeline and submission lifecycle shared
//! by the patient and surgery forms.

mod field;
mod form_state;
mod registry;
mod schema;
mod submit;

pub use field::{FieldValue, FormField};
pub use form_state::{
    Form, FormState, PatientForm, ProcedureQueryAction, SurgeryForm, PROCEDURE_QUERY_MIN_LEN,
};
pub use registry::{FieldRegistry, FormSnapshot};
pub use schema::{FieldError, ValidationResult, ValidationRule, ValidationSchema};
pub use submit::{apply_validation, SubmitPhase};
