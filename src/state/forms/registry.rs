//! Field registry binding named fields to the active form
//!
//! The registry is the authoritative value holder for a rendered form:
//! widgets read and write through it, validation reads a snapshot from
//! it, and errors are attached to it for inline display.

use super::field::{FieldValue, FormField};

/// Ordered set of current field values, materialized once per submit
pub type FormSnapshot = Vec<(String, FieldValue)>;

/// Ordered collection of registered form fields, keyed by field name
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: Vec<FormField>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field under its name.
    ///
    /// Registering a name twice is a programming-time defect and fails
    /// fast in debug builds; release builds keep the latest
    /// registration in the original position.
    pub fn register(&mut self, field: FormField) {
        debug_assert!(
            !self.contains(&field.name),
            "duplicate field registration: {}",
            field.name
        );
        if let Some(existing) = self.fields.iter_mut().find(|f| f.name == field.name) {
            *existing = field;
        } else {
            self.fields.push(field);
        }
    }

    /// Remove a field; idempotent when the name is not registered
    #[allow(dead_code)]
    pub fn unregister(&mut self, name: &str) {
        self.fields.retain(|f| f.name != name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Overwrite a field's value; no validation is triggered
    pub fn set_value(&mut self, name: &str, value: FieldValue) {
        if let Some(field) = self.get_mut(name) {
            field.value = value;
        }
    }

    /// Attach or clear the display error for a field
    pub fn set_error(&mut self, name: &str, error: Option<String>) {
        if let Some(field) = self.get_mut(name) {
            field.error = error;
        }
    }

    /// Clear every field's display error
    pub fn clear_errors(&mut self) {
        for field in &mut self.fields {
            field.error = None;
        }
    }

    /// Read every registered field's current value, in registration order
    pub fn snapshot(&self) -> FormSnapshot {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_at(&self, index: usize) -> Option<&FormField> {
        self.fields.get(index)
    }

    pub fn field_at_mut(&mut self, index: usize) -> Option<&mut FormField> {
        self.fields.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_name_field() -> FieldRegistry {
        let mut registry = FieldRegistry::new();
        registry.register(FormField::text("name", "Nome", false));
        registry
    }

    #[test]
    fn test_register_and_get() {
        let registry = registry_with_name_field();
        assert!(registry.contains("name"));
        assert_eq!(registry.get("name").unwrap().label, "Nome");
    }

    #[test]
    #[should_panic(expected = "duplicate field registration")]
    fn test_duplicate_registration_fails_fast() {
        let mut registry = registry_with_name_field();
        registry.register(FormField::text("name", "Nome", false));
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let mut registry = registry_with_name_field();
        registry.unregister("name");
        registry.unregister("name");
        assert!(!registry.contains("name"));
    }

    #[test]
    fn test_set_value_updates_storage() {
        let mut registry = registry_with_name_field();
        registry.set_value("name", FieldValue::Text("Ana".to_string()));
        assert_eq!(registry.get("name").unwrap().as_text(), "Ana");
    }

    #[test]
    fn test_set_value_on_unknown_name_is_noop() {
        let mut registry = registry_with_name_field();
        registry.set_value("missing", FieldValue::Text("x".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_set_error_and_clear() {
        let mut registry = registry_with_name_field();
        registry.set_error("name", Some("Informe o nome do paciente".to_string()));
        assert_eq!(
            registry.get("name").unwrap().error.as_deref(),
            Some("Informe o nome do paciente")
        );
        registry.set_error("name", None);
        assert!(registry.get("name").unwrap().error.is_none());
    }

    #[test]
    fn test_clearing_error_twice_leaves_field_without_error() {
        let mut registry = registry_with_name_field();
        registry.set_error("name", Some("erro".to_string()));
        registry.set_error("name", None);
        registry.set_error("name", None);
        assert!(registry.get("name").unwrap().error.is_none());
    }

    #[test]
    fn test_snapshot_preserves_registration_order() {
        let mut registry = FieldRegistry::new();
        registry.register(FormField::text("group_id", "Grupo", false));
        registry.register(FormField::text("name", "Nome", false));
        registry.register(FormField::date("birthday", "Data de Nascimento"));

        let names: Vec<_> = registry
            .snapshot()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["group_id", "name", "birthday"]);
    }

    #[test]
    fn test_snapshot_reads_latest_committed_value() {
        let mut registry = registry_with_name_field();
        registry.get_mut("name").unwrap().push_char('A');
        let snapshot = registry.snapshot();
        assert_eq!(snapshot[0].1, FieldValue::Text("A".to_string()));
    }
}
