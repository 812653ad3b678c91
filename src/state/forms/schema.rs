//! Declarative per-field validation schemas
//!
//! A schema is an ordered list of rules per field name. Validation is
//! side-effect free: it turns a form snapshot into a result without
//! touching the registry. All fields are checked even after one fails,
//! but a single field stops at its first failing rule.

use super::field::FieldValue;
use super::registry::FormSnapshot;
use crate::dates;

/// A single validation rule: predicate plus failure message
#[derive(Debug, Clone)]
pub enum ValidationRule {
    /// Fails on a missing value, an empty string or an empty selection
    Required { message: String },
    /// Fails when a non-empty value does not parse to a real calendar
    /// date; emptiness is left to `Required`
    CalendarDate { message: String },
}

impl ValidationRule {
    pub fn required(message: &str) -> Self {
        ValidationRule::Required {
            message: message.to_string(),
        }
    }

    pub fn calendar_date(message: &str) -> Self {
        ValidationRule::CalendarDate {
            message: message.to_string(),
        }
    }

    /// Check a rule against a field's snapshot value (`None` when the
    /// field is absent from the snapshot). Returns the failure message.
    fn check(&self, value: Option<&FieldValue>) -> Option<&str> {
        match self {
            ValidationRule::Required { message } => match value {
                None => Some(message),
                Some(v) if v.is_empty() => Some(message),
                Some(_) => None,
            },
            ValidationRule::CalendarDate { message } => match value {
                None => None,
                Some(v) if v.is_empty() => None,
                Some(v) => {
                    if dates::parse_entry(v.as_text()).is_some() {
                        None
                    } else {
                        Some(message)
                    }
                }
            },
        }
    }
}

/// One failing field with its first failing rule's message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Outcome of validating a snapshot against a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    /// At most one message per field, in schema declaration order
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    #[allow(dead_code)]
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Ordered mapping from field name to its validation rules
#[derive(Debug, Clone, Default)]
pub struct ValidationSchema {
    rules: Vec<(String, Vec<ValidationRule>)>,
}

impl ValidationSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field's rule list (builder style)
    pub fn field(mut self, name: &str, rules: Vec<ValidationRule>) -> Self {
        self.rules.push((name.to_string(), rules));
        self
    }

    /// Validate every schema field against the snapshot. Fields present
    /// in the snapshot but absent from the schema pass through
    /// untouched.
    pub fn validate(&self, snapshot: &FormSnapshot) -> ValidationResult {
        let mut errors = Vec::new();

        for (name, rules) in &self.rules {
            let value = snapshot
                .iter()
                .find(|(field_name, _)| field_name == name)
                .map(|(_, value)| value);

            for rule in rules {
                if let Some(message) = rule.check(value) {
                    errors.push(FieldError {
                        field: name.clone(),
                        message: message.to_string(),
                    });
                    break;
                }
            }
        }

        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn schema() -> ValidationSchema {
        ValidationSchema::new()
            .field(
                "name",
                vec![ValidationRule::required("Informe o nome do paciente")],
            )
            .field(
                "birthday",
                vec![
                    ValidationRule::required("Informe a data de nascimento"),
                    ValidationRule::calendar_date("Informe uma data de nascimento valida"),
                ],
            )
    }

    fn snapshot(name: &str, birthday: &str) -> FormSnapshot {
        vec![
            ("name".to_string(), FieldValue::Text(name.to_string())),
            ("birthday".to_string(), FieldValue::Date(birthday.to_string())),
        ]
    }

    #[test]
    fn test_valid_snapshot() {
        assert_eq!(
            schema().validate(&snapshot("Ana", "2020-01-01")),
            ValidationResult::Valid
        );
    }

    #[test]
    fn test_missing_required_field_reports_configured_message() {
        let result = schema().validate(&snapshot("", "2020-01-01"));
        assert_eq!(
            result,
            ValidationResult::Invalid(vec![FieldError {
                field: "name".to_string(),
                message: "Informe o nome do paciente".to_string(),
            }])
        );
    }

    #[test]
    fn test_all_fields_checked_after_first_failure() {
        let result = schema().validate(&snapshot("", ""));
        match result {
            ValidationResult::Invalid(errors) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].field, "name");
                assert_eq!(errors[1].field, "birthday");
            }
            ValidationResult::Valid => panic!("expected invalid result"),
        }
    }

    #[test]
    fn test_single_field_stops_at_first_failing_rule() {
        // Empty birthday fails Required; CalendarDate is not evaluated
        let result = schema().validate(&snapshot("Ana", ""));
        assert_eq!(
            result,
            ValidationResult::Invalid(vec![FieldError {
                field: "birthday".to_string(),
                message: "Informe a data de nascimento".to_string(),
            }])
        );
    }

    #[test]
    fn test_unparseable_date_fails_calendar_rule() {
        let result = schema().validate(&snapshot("Ana", "2020-13-45"));
        assert_eq!(
            result,
            ValidationResult::Invalid(vec![FieldError {
                field: "birthday".to_string(),
                message: "Informe uma data de nascimento valida".to_string(),
            }])
        );
    }

    #[test]
    fn test_field_absent_from_snapshot_fails_required() {
        let result = schema().validate(&vec![(
            "birthday".to_string(),
            FieldValue::Date("2020-01-01".to_string()),
        )]);
        assert_eq!(
            result,
            ValidationResult::Invalid(vec![FieldError {
                field: "name".to_string(),
                message: "Informe o nome do paciente".to_string(),
            }])
        );
    }

    #[test]
    fn test_snapshot_fields_outside_schema_pass_through() {
        let mut snap = snapshot("Ana", "2020-01-01");
        snap.push(("email".to_string(), FieldValue::Text(String::new())));
        assert_eq!(schema().validate(&snap), ValidationResult::Valid);
    }

    #[test]
    fn test_whitespace_value_passes_required() {
        // Pass-through is literal: no whitespace normalization
        assert_eq!(
            schema().validate(&snapshot(" ", "2020-01-01")),
            ValidationResult::Valid
        );
    }

    #[test]
    fn test_validation_is_deterministic() {
        let snap = snapshot("", "bad-date");
        let schema = schema();
        assert_eq!(schema.validate(&snap), schema.validate(&snap));
    }

    #[test]
    fn test_errors_follow_schema_declaration_order() {
        // Snapshot order differs from schema order
        let snap = vec![
            ("birthday".to_string(), FieldValue::Date(String::new())),
            ("name".to_string(), FieldValue::Text(String::new())),
        ];
        match schema().validate(&snap) {
            ValidationResult::Invalid(errors) => {
                assert_eq!(errors[0].field, "name");
                assert_eq!(errors[1].field, "birthday");
            }
            ValidationResult::Valid => panic!("expected invalid result"),
        }
    }
}
