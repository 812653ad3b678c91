//! Application state definitions

use serde::{Deserialize, Serialize};

use super::forms::{FormState, SubmitPhase};
use crate::dates;

/// Current view in the application
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Patients,
    PatientDetail,
    PatientCreate,
    PatientEdit,
    SurgeryCreate,
    SurgeryEdit,
}

impl View {
    /// Form views are skipped when walking back through history
    pub fn is_form_view(&self) -> bool {
        matches!(
            self,
            View::PatientCreate | View::PatientEdit | View::SurgeryCreate | View::SurgeryEdit
        )
    }
}

/// A label/value pair for select widgets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

/// Static gender catalog used by the patient form
pub fn gender_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("Masculino", "M"),
        SelectOption::new("Feminino", "F"),
    ]
}

/// Patient group information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
}

/// Surgical procedure information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    pub id: String,
    pub name: String,
}

/// Patient information. Field names mirror the wire contract,
/// including the `helthcare` and `alergy` spellings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub group_id: String,
    pub name: String,
    pub birthday: String,
    pub gender: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub occupation: String,
    pub helthcare: String,
    pub alergy: String,
    #[serde(default)]
    pub avatar: u32,
}

impl Patient {
    /// Whole years since the patient's birthday, when it parses
    pub fn age(&self, today: chrono::NaiveDate) -> Option<u32> {
        dates::age_in_years(&dates::to_entry_format(&self.birthday), today)
    }
}

/// Surgery information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Surgery {
    pub id: String,
    pub patient_id: String,
    pub hospital: String,
    pub date: String,
    #[serde(default)]
    pub annotation: String,
    #[serde(default)]
    pub procedures: Vec<Procedure>,
}

impl Surgery {
    /// Comma-joined procedure names for list rendering
    pub fn procedure_names(&self) -> String {
        self.procedures
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Outgoing patient payload for create/update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientDraft {
    pub group_id: String,
    pub name: String,
    pub birthday: String,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub occupation: String,
    pub helthcare: String,
    pub alergy: String,
    /// Cosmetic default injected on create only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<u32>,
}

/// Outgoing surgery payload for create/update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurgeryDraft {
    pub patient_id: String,
    pub hospital: String,
    pub date: String,
    pub annotation: String,
    pub procedures: Vec<String>,
}

/// A destructive action waiting for user confirmation
#[derive(Debug, Clone)]
pub struct PendingDeleteAction {
    pub surgery_id: String,
    pub entity_display: String,
    /// true = the confirm option is highlighted
    pub selected_option: bool,
}

/// Which widget owns key input on the patient list view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatientsFocus {
    Search,
    #[default]
    List,
}

impl PatientsFocus {
    pub fn toggle(&mut self) {
        *self = match self {
            Self::Search => Self::List,
            Self::List => Self::Search,
        };
    }
}

/// Which widget owns key input on the patient detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailFocus {
    Search,
    #[default]
    List,
}

impl DetailFocus {
    pub fn toggle(&mut self) {
        *self = match self {
            Self::Search => Self::List,
            Self::List => Self::Search,
        };
    }
}

/// Main application state
#[derive(Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,
    pub view_history: Vec<View>,

    // Patient list
    pub patients: Vec<Patient>,
    pub patient_query: String,
    pub patients_focus: PatientsFocus,
    pub selected_index: usize,

    // Patient detail
    pub patient: Option<Patient>,
    pub surgeries: Vec<Surgery>,
    pub selected_surgery_id: Option<String>,
    pub surgery_filter: String,
    pub detail_focus: DetailFocus,

    // Cached option sources
    pub groups: Vec<Group>,
    /// Store-level cache of the last procedure lookup; dropped on the
    /// cache-clear signal
    pub procedure_cache: Vec<Procedure>,

    // Form state
    pub form: FormState,
    pub submit_phase: SubmitPhase,

    // Overlays
    pub pending_delete: Option<PendingDeleteAction>,
    pub errors: Vec<String>,
}

impl AppState {
    /// Push a message onto the error queue for dialog display
    pub fn push_error(&mut self, message: String) {
        self.errors.push(message);
    }

    /// The error currently shown, if any
    pub fn current_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }

    /// Dismiss the currently shown error
    pub fn dismiss_error(&mut self) {
        if !self.errors.is_empty() {
            self.errors.remove(0);
        }
    }

    /// Move patient list selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move patient list selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Replace the surgery list; the first entry is auto-selected when
    /// the list is non-empty, otherwise the selection is cleared
    pub fn set_surgeries(&mut self, surgeries: Vec<Surgery>) {
        self.selected_surgery_id = surgeries.first().map(|s| s.id.clone());
        self.surgeries = surgeries;
    }

    /// Surgeries matching the local filter box (case-insensitive
    /// substring on hospital and procedure names)
    pub fn filtered_surgeries(&self) -> Vec<&Surgery> {
        if self.surgery_filter.is_empty() {
            return self.surgeries.iter().collect();
        }
        let needle = self.surgery_filter.to_lowercase();
        self.surgeries
            .iter()
            .filter(|s| {
                s.hospital.to_lowercase().contains(&needle)
                    || s.procedure_names().to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Currently selected surgery, if it still exists
    pub fn selected_surgery(&self) -> Option<&Surgery> {
        let id = self.selected_surgery_id.as_ref()?;
        self.surgeries.iter().find(|s| &s.id == id)
    }

    /// Select the next surgery in the filtered list
    pub fn select_next_surgery(&mut self) {
        let filtered = self.filtered_surgeries();
        if filtered.is_empty() {
            return;
        }
        let pos = self
            .selected_surgery_id
            .as_ref()
            .and_then(|id| filtered.iter().position(|s| &s.id == id));
        let next = match pos {
            Some(p) if p + 1 < filtered.len() => p + 1,
            Some(p) => p,
            None => 0,
        };
        self.selected_surgery_id = Some(filtered[next].id.clone());
    }

    /// Select the previous surgery in the filtered list
    pub fn select_prev_surgery(&mut self) {
        let filtered = self.filtered_surgeries();
        if filtered.is_empty() {
            return;
        }
        let pos = self
            .selected_surgery_id
            .as_ref()
            .and_then(|id| filtered.iter().position(|s| &s.id == id));
        let prev = match pos {
            Some(p) if p > 0 => p - 1,
            Some(_) => 0,
            None => 0,
        };
        self.selected_surgery_id = Some(filtered[prev].id.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_surgery(id: &str, hospital: &str) -> Surgery {
        Surgery {
            id: id.to_string(),
            patient_id: "p1".to_string(),
            hospital: hospital.to_string(),
            date: "01/15/2024".to_string(),
            annotation: String::new(),
            procedures: vec![],
        }
    }

    mod error_queue {
        use super::*;

        #[test]
        fn test_push_and_dismiss() {
            let mut state = AppState::default();
            state.push_error("falha ao salvar".to_string());
            state.push_error("outra falha".to_string());
            assert_eq!(state.current_error(), Some("falha ao salvar"));
            state.dismiss_error();
            assert_eq!(state.current_error(), Some("outra falha"));
            state.dismiss_error();
            assert!(state.current_error().is_none());
        }

        #[test]
        fn test_dismiss_on_empty_queue_is_noop() {
            let mut state = AppState::default();
            state.dismiss_error(); // Should not panic
        }
    }

    mod surgery_selection {
        use super::*;

        #[test]
        fn test_set_surgeries_selects_first() {
            let mut state = AppState::default();
            state.set_surgeries(vec![test_surgery("s1", "A"), test_surgery("s2", "B")]);
            assert_eq!(state.selected_surgery_id.as_deref(), Some("s1"));
        }

        #[test]
        fn test_set_empty_surgeries_clears_selection() {
            let mut state = AppState::default();
            state.set_surgeries(vec![test_surgery("s1", "A")]);
            state.set_surgeries(vec![]);
            assert!(state.selected_surgery_id.is_none());
        }

        #[test]
        fn test_select_next_and_prev() {
            let mut state = AppState::default();
            state.set_surgeries(vec![test_surgery("s1", "A"), test_surgery("s2", "B")]);
            state.select_next_surgery();
            assert_eq!(state.selected_surgery_id.as_deref(), Some("s2"));
            state.select_next_surgery();
            assert_eq!(state.selected_surgery_id.as_deref(), Some("s2"));
            state.select_prev_surgery();
            assert_eq!(state.selected_surgery_id.as_deref(), Some("s1"));
        }

        #[test]
        fn test_filtered_surgeries_matches_hospital_substring() {
            let mut state = AppState::default();
            state.set_surgeries(vec![
                test_surgery("s1", "Santa Casa"),
                test_surgery("s2", "Hospital das Clínicas"),
            ]);
            state.surgery_filter = "santa".to_string();
            let filtered = state.filtered_surgeries();
            assert_eq!(filtered.len(), 1);
            assert_eq!(filtered[0].id, "s1");
        }
    }

    mod patient {
        use super::*;

        #[test]
        fn test_age_from_wire_format_birthday() {
            let patient = Patient {
                id: "p1".to_string(),
                group_id: "g1".to_string(),
                name: "Ana".to_string(),
                birthday: "08/06/2000".to_string(),
                gender: "F".to_string(),
                email: String::new(),
                phone: String::new(),
                address: String::new(),
                occupation: String::new(),
                helthcare: "Unimed".to_string(),
                alergy: "Nenhuma".to_string(),
                avatar: 0,
            };
            let today = chrono::NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
            assert_eq!(patient.age(today), Some(26));
        }
    }

    mod views {
        use super::*;

        #[test]
        fn test_form_views_are_flagged() {
            assert!(View::PatientCreate.is_form_view());
            assert!(View::SurgeryEdit.is_form_view());
            assert!(!View::Patients.is_form_view());
            assert!(!View::PatientDetail.is_form_view());
        }
    }
}
