//! Form state management and entity form structs

use super::field::{FieldValue, FormField};
use super::registry::FieldRegistry;
use super::schema::{ValidationRule, ValidationSchema};
use crate::dates;
use crate::state::{
    gender_options, Patient, PatientDraft, Procedure, SelectOption, Surgery, SurgeryDraft,
};

/// Minimum query length before the procedure search hits the API
pub const PROCEDURE_QUERY_MIN_LEN: usize = 5;

/// What a procedure query edit asks the application to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureQueryAction {
    /// Query too short for a lookup, nothing to do
    Idle,
    /// Issue the remote procedure lookup
    Fetch,
    /// Clear the local option list and drop the store's cached results
    Clear,
}

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
    fn get_active_field_mut(&mut self) -> Option<&mut FormField>;
    fn get_field(&self, index: usize) -> Option<&FormField>;
}

/// Enum representing all possible form states
#[derive(Debug, Clone, Default)]
pub enum FormState {
    #[default]
    None,
    Patient(PatientForm),
    Surgery(SurgeryForm),
}

impl FormState {
    pub fn next_field(&mut self) {
        match self {
            FormState::None => {}
            FormState::Patient(f) => f.next_field(),
            FormState::Surgery(f) => f.next_field(),
        }
    }

    pub fn prev_field(&mut self) {
        match self {
            FormState::None => {}
            FormState::Patient(f) => f.prev_field(),
            FormState::Surgery(f) => f.prev_field(),
        }
    }

    pub fn get_active_field_mut(&mut self) -> Option<&mut FormField> {
        match self {
            FormState::None => None,
            FormState::Patient(f) => f.get_active_field_mut(),
            FormState::Surgery(f) => f.get_active_field_mut(),
        }
    }
}

// Patient form (create and edit share the struct; a bound id means edit)
#[derive(Debug, Clone)]
pub struct PatientForm {
    pub registry: FieldRegistry,
    /// Identifier of the patient being edited; `None` means create mode
    pub editing: Option<String>,
    pub active_field_index: usize,
    /// Which button is selected on the buttons row (0=Salvar, 1=Cancelar)
    pub selected_button: usize,
}

impl PatientForm {
    /// Number of registered fields; the buttons row sits after them
    pub const FIELD_COUNT: usize = 10;

    /// Create-mode form. The group options must already be loaded;
    /// callers fetch them before constructing the form.
    pub fn new(groups: Vec<SelectOption>) -> Self {
        let mut registry = FieldRegistry::new();
        registry.register(FormField::select("group_id", "Grupo", groups));
        registry.register(FormField::text("name", "Nome", false));
        registry.register(FormField::date("birthday", "Data de Nascimento"));
        registry.register(FormField::select("gender", "Genero", gender_options()));
        registry.register(FormField::text("email", "Email", false));
        registry.register(FormField::text("phone", "Telefone", false));
        registry.register(FormField::text("address", "Endereco", false));
        registry.register(FormField::text("occupation", "Profissão", false));
        registry.register(FormField::text("helthcare", "Convenio", false));
        registry.register(FormField::text("alergy", "Comorbidades/Alergias", false));

        Self {
            registry,
            editing: None,
            active_field_index: 0,
            selected_button: 0,
        }
    }

    /// Edit-mode form seeded from an existing patient. Option lists are
    /// bound before the entity's values so the selects can resolve.
    pub fn from_patient(groups: Vec<SelectOption>, patient: &Patient) -> Self {
        let mut registry = FieldRegistry::new();
        registry.register(FormField::select_with_value(
            "group_id",
            "Grupo",
            groups,
            &patient.group_id,
        ));
        registry.register(FormField::text_with_value(
            "name",
            "Nome",
            patient.name.clone(),
            false,
        ));
        registry.register(FormField::date_with_value(
            "birthday",
            "Data de Nascimento",
            dates::to_entry_format(&patient.birthday),
        ));
        registry.register(FormField::select_with_value(
            "gender",
            "Genero",
            gender_options(),
            &patient.gender,
        ));
        registry.register(FormField::text_with_value(
            "email",
            "Email",
            patient.email.clone(),
            false,
        ));
        registry.register(FormField::text_with_value(
            "phone",
            "Telefone",
            patient.phone.clone(),
            false,
        ));
        registry.register(FormField::text_with_value(
            "address",
            "Endereco",
            patient.address.clone(),
            false,
        ));
        registry.register(FormField::text_with_value(
            "occupation",
            "Profissão",
            patient.occupation.clone(),
            false,
        ));
        registry.register(FormField::text_with_value(
            "helthcare",
            "Convenio",
            patient.helthcare.clone(),
            false,
        ));
        registry.register(FormField::text_with_value(
            "alergy",
            "Comorbidades/Alergias",
            patient.alergy.clone(),
            false,
        ));

        Self {
            registry,
            editing: Some(patient.id.clone()),
            active_field_index: 0,
            selected_button: 0,
        }
    }

    /// Validation schema for the patient form, in declaration order
    pub fn schema() -> ValidationSchema {
        ValidationSchema::new()
            .field(
                "group_id",
                vec![ValidationRule::required(
                    "Selecione o grupo que deseja salva o paciente",
                )],
            )
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
            .field(
                "helthcare",
                vec![ValidationRule::required(
                    "Informe o plano de saude do paciente",
                )],
            )
            .field(
                "gender",
                vec![ValidationRule::required("Informe o genero do paciente")],
            )
            .field(
                "alergy",
                vec![ValidationRule::required(
                    "Informe se o paciente possui alergia",
                )],
            )
    }

    /// Materialize the draft payload from the registry's current
    /// values. The birthday stays in entry format; the wire transform
    /// is the submission step's job.
    pub fn draft(&self) -> PatientDraft {
        let value = |name: &str| {
            self.registry
                .get(name)
                .map_or(String::new(), |f| f.as_text().to_string())
        };
        PatientDraft {
            group_id: value("group_id"),
            name: value("name"),
            birthday: value("birthday"),
            gender: value("gender"),
            email: value("email"),
            phone: value("phone"),
            address: value("address"),
            occupation: value("occupation"),
            helthcare: value("helthcare"),
            alergy: value("alergy"),
            avatar: None,
        }
    }

    /// Returns true if the buttons row is currently active
    pub fn is_buttons_row_active(&self) -> bool {
        self.active_field_index == Self::FIELD_COUNT
    }

    /// Move to the next button (wraps around)
    pub fn next_button(&mut self) {
        self.selected_button = (self.selected_button + 1) % 2;
    }

    /// Move to the previous button (wraps around)
    pub fn prev_button(&mut self) {
        self.selected_button = (self.selected_button + 1) % 2;
    }
}

impl Form for PatientForm {
    fn field_count(&self) -> usize {
        self.registry.len() + 1 // fields + buttons row
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(Self::FIELD_COUNT);
    }
    fn get_active_field_mut(&mut self) -> Option<&mut FormField> {
        self.registry.field_at_mut(self.active_field_index)
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        self.registry.field_at(index)
    }
}

// Surgery form (create and edit share the struct; a bound id means edit)
#[derive(Debug, Clone)]
pub struct SurgeryForm {
    pub registry: FieldRegistry,
    /// Identifier of the surgery being edited; `None` means create mode
    pub editing: Option<String>,
    /// Patient this surgery belongs to
    pub patient_id: String,
    /// Selected procedures (toggle semantics)
    pub procedures: Vec<Procedure>,
    /// Search-as-you-type query for the procedure lookup
    pub procedure_query: String,
    /// Currently displayed lookup results
    pub procedure_options: Vec<Procedure>,
    /// Cursor into the displayed results
    pub procedure_cursor: usize,
    pub active_field_index: usize,
    /// Which button is selected on the buttons row (0=Salvar, 1=Cancelar)
    pub selected_button: usize,
}

impl SurgeryForm {
    /// Number of registered fields
    pub const FIELD_COUNT: usize = 3;
    /// Slot index of the procedure selector widget
    pub const PROCEDURE_SLOT: usize = 3;
    /// Slot index of the buttons row
    pub const BUTTONS_SLOT: usize = 4;

    pub fn new(patient_id: &str) -> Self {
        let mut registry = FieldRegistry::new();
        registry.register(FormField::text("hospital", "Hospital", false));
        registry.register(FormField::date("date", "Data da Cirurgia"));
        registry.register(FormField::text("annotation", "Anotações", true));

        Self {
            registry,
            editing: None,
            patient_id: patient_id.to_string(),
            procedures: Vec::new(),
            procedure_query: String::new(),
            procedure_options: Vec::new(),
            procedure_cursor: 0,
            active_field_index: 0,
            selected_button: 0,
        }
    }

    pub fn from_surgery(surgery: &Surgery) -> Self {
        let mut form = Self::new(&surgery.patient_id);
        form.editing = Some(surgery.id.clone());
        form.procedures = surgery.procedures.clone();
        form.registry
            .set_value("hospital", FieldValue::Text(surgery.hospital.clone()));
        form.registry.set_value(
            "date",
            FieldValue::Date(dates::to_entry_format(&surgery.date)),
        );
        form.registry
            .set_value("annotation", FieldValue::Text(surgery.annotation.clone()));
        form
    }

    /// Validation schema for the surgery form
    pub fn schema() -> ValidationSchema {
        ValidationSchema::new()
            .field(
                "hospital",
                vec![ValidationRule::required("Informe o hospital da cirurgia")],
            )
            .field(
                "date",
                vec![
                    ValidationRule::required("Informe a data da cirurgia"),
                    ValidationRule::calendar_date("Informe uma data de cirurgia valida"),
                ],
            )
    }

    /// Materialize the draft payload; date stays in entry format
    pub fn draft(&self) -> SurgeryDraft {
        let value = |name: &str| {
            self.registry
                .get(name)
                .map_or(String::new(), |f| f.as_text().to_string())
        };
        SurgeryDraft {
            patient_id: self.patient_id.clone(),
            hospital: value("hospital"),
            date: value("date"),
            annotation: value("annotation"),
            procedures: self.procedures.iter().map(|p| p.id.clone()).collect(),
        }
    }

    /// Toggle a lookup result in the selected set: selecting an
    /// already-selected procedure removes it. Either way the displayed
    /// results are cleared.
    pub fn toggle_procedure(&mut self, option: Procedure) {
        if let Some(pos) = self.procedures.iter().position(|p| p.id == option.id) {
            self.procedures.remove(pos);
        } else {
            self.procedures.push(option);
        }
        self.procedure_options.clear();
        self.procedure_cursor = 0;
    }

    /// Length-threshold policy for the search-as-you-type lookup
    pub fn procedure_query_action(&self) -> ProcedureQueryAction {
        if self.procedure_query.is_empty() {
            ProcedureQueryAction::Clear
        } else if self.procedure_query.len() >= PROCEDURE_QUERY_MIN_LEN {
            ProcedureQueryAction::Fetch
        } else {
            ProcedureQueryAction::Idle
        }
    }

    pub fn is_procedure_slot_active(&self) -> bool {
        self.active_field_index == Self::PROCEDURE_SLOT
    }

    pub fn is_buttons_row_active(&self) -> bool {
        self.active_field_index == Self::BUTTONS_SLOT
    }

    pub fn next_button(&mut self) {
        self.selected_button = (self.selected_button + 1) % 2;
    }

    pub fn prev_button(&mut self) {
        self.selected_button = (self.selected_button + 1) % 2;
    }
}

impl Form for SurgeryForm {
    fn field_count(&self) -> usize {
        Self::BUTTONS_SLOT + 1 // fields + procedure selector + buttons row
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(Self::BUTTONS_SLOT);
    }
    fn get_active_field_mut(&mut self) -> Option<&mut FormField> {
        self.registry.field_at_mut(self.active_field_index)
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        self.registry.field_at(index)
    }
}
