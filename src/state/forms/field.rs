//! Form field value objects

use crate::state::SelectOption;

/// Type-safe field values
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Date(String),
    Select {
        options: Vec<SelectOption>,
        selected: Option<usize>,
    },
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// True when the value would fail a required check: empty text,
    /// empty date buffer, or no selected option. No whitespace
    /// normalization is applied.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) | FieldValue::Date(s) => s.is_empty(),
            FieldValue::Select { options, selected } => match selected {
                Some(idx) => options.get(*idx).map_or(true, |o| o.value.is_empty()),
                None => true,
            },
        }
    }

    /// The value that goes into a snapshot/payload (option value for selects)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) | FieldValue::Date(s) => s,
            FieldValue::Select { options, selected } => selected
                .and_then(|idx| options.get(idx))
                .map_or("", |o| o.value.as_str()),
        }
    }
}

/// Represents a single form field with its configuration, value and
/// validation error
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub value: FieldValue,
    pub error: Option<String>,
    pub is_multiline: bool,
}

impl FormField {
    /// Create a new text field
    pub fn text(name: &str, label: &str, is_multiline: bool) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: FieldValue::Text(String::new()),
            error: None,
            is_multiline,
        }
    }

    /// Create a new text field with initial value
    pub fn text_with_value(name: &str, label: &str, value: String, is_multiline: bool) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: FieldValue::Text(value),
            error: None,
            is_multiline,
        }
    }

    /// Create a new date field (entry format is YYYY-MM-DD)
    pub fn date(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: FieldValue::Date(String::new()),
            error: None,
            is_multiline: false,
        }
    }

    /// Create a new date field with initial value
    pub fn date_with_value(name: &str, label: &str, value: String) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: FieldValue::Date(value),
            error: None,
            is_multiline: false,
        }
    }

    /// Create a new select field with no selection
    pub fn select(name: &str, label: &str, options: Vec<SelectOption>) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: FieldValue::Select {
                options,
                selected: None,
            },
            error: None,
            is_multiline: false,
        }
    }

    /// Create a new select field pre-selected on the option whose value
    /// matches `value` (no selection when the option list has no match)
    pub fn select_with_value(
        name: &str,
        label: &str,
        options: Vec<SelectOption>,
        value: &str,
    ) -> Self {
        let selected = options.iter().position(|o| o.value == value);
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: FieldValue::Select { options, selected },
            error: None,
            is_multiline: false,
        }
    }

    /// Get the submitted value (option value for selects)
    pub fn as_text(&self) -> &str {
        self.value.as_text()
    }

    /// Push a character to the field value
    pub fn push_char(&mut self, c: char) {
        match &mut self.value {
            FieldValue::Text(s) => s.push(c),
            FieldValue::Date(s) => {
                // Date entry only accepts the YYYY-MM-DD alphabet
                if c.is_ascii_digit() || c == '-' {
                    s.push(c);
                }
            }
            FieldValue::Select { .. } => {}
        }
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) | FieldValue::Date(s) => {
                s.pop();
            }
            FieldValue::Select { .. } => {}
        }
    }

    /// Select the next option (wraps around); no-op for non-select fields
    pub fn next_option(&mut self) {
        if let FieldValue::Select { options, selected } = &mut self.value {
            if options.is_empty() {
                return;
            }
            *selected = Some(selected.map_or(0, |idx| (idx + 1) % options.len()));
        }
    }

    /// Select the previous option (wraps around); no-op for non-select fields
    pub fn prev_option(&mut self) {
        if let FieldValue::Select { options, selected } = &mut self.value {
            if options.is_empty() {
                return;
            }
            *selected = Some(match selected {
                Some(0) | None => options.len() - 1,
                Some(idx) => *idx - 1,
            });
        }
    }

    /// Get the display value for rendering (option label for selects)
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) | FieldValue::Date(s) => s.clone(),
            FieldValue::Select { options, selected } => selected
                .and_then(|idx| options.get(idx))
                .map_or(String::new(), |o| o.label.clone()),
        }
    }
}
