//! Application state and core logic

use crate::api::ApiClientTrait;
use crate::dates;
use crate::state::{
    apply_validation, AppState, DetailFocus, FormState, PatientForm, PatientsFocus,
    PendingDeleteAction, ProcedureQueryAction, SelectOption, SubmitPhase, SurgeryForm, View,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::Rng;

/// Cosmetic avatar default injected on patient create
fn random_avatar() -> u32 {
    rand::thread_rng().gen_range(0..5)
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Injected clinic API operations
    pub api: Box<dyn ApiClientTrait>,
    /// Whether the app should quit
    quit: bool,
    /// Feedback message for the status bar
    pub status_message: Option<String>,
    /// Whether the API answered at startup
    pub api_connected: bool,
}

impl App {
    /// Create a new App instance with injected API operations
    pub async fn new(api: Box<dyn ApiClientTrait>) -> Self {
        let mut app = Self {
            state: AppState::default(),
            api,
            quit: false,
            status_message: None,
            api_connected: false,
        };

        app.api_connected = app.api.check_connection().await;
        if app.api_connected {
            app.refresh_patients().await;
        }

        app
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%message, "surfacing error");
        self.state.push_error(message);
    }

    /// Handle a key event for the current view or overlay
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // The error dialog owns input until dismissed
        if self.state.current_error().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // The confirmation dialog owns input while open
        if self.state.pending_delete.is_some() {
            return self.handle_confirm_delete_key(key).await;
        }

        match self.state.current_view {
            View::Patients => self.handle_patients_key(key).await,
            View::PatientDetail => self.handle_patient_detail_key(key).await,
            View::PatientCreate | View::PatientEdit => self.handle_patient_form_key(key).await,
            View::SurgeryCreate | View::SurgeryEdit => self.handle_surgery_form_key(key).await,
        }
    }

    /// Handle keys in the patient list view
    async fn handle_patients_key(&mut self, key: KeyEvent) -> Result<()> {
        let searching = matches!(self.state.patients_focus, PatientsFocus::Search);

        match key.code {
            KeyCode::Tab => self.state.patients_focus.toggle(),
            KeyCode::Char(c) if searching => {
                self.state.patient_query.push(c);
            }
            KeyCode::Backspace if searching => {
                self.state.patient_query.pop();
            }
            KeyCode::Enter if searching => {
                // Remote list request with the current filter
                self.refresh_patients().await;
                self.state.patients_focus = PatientsFocus::List;
            }
            KeyCode::Esc if searching => {
                self.state.patients_focus = PatientsFocus::List;
            }
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('/') => self.state.patients_focus = PatientsFocus::Search,
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.move_selection_down(self.state.patients.len());
            }
            KeyCode::Up | KeyCode::Char('k') => self.state.move_selection_up(),
            KeyCode::Char('n') => self.open_patient_create().await,
            KeyCode::Char('r') => self.refresh_patients().await,
            KeyCode::Enter => self.open_patient_detail().await,
            _ => {}
        }
        Ok(())
    }

    /// Handle keys in the patient detail view
    async fn handle_patient_detail_key(&mut self, key: KeyEvent) -> Result<()> {
        let searching = matches!(self.state.detail_focus, DetailFocus::Search);

        match key.code {
            KeyCode::Tab => self.state.detail_focus.toggle(),
            KeyCode::Char(c) if searching => {
                self.state.surgery_filter.push(c);
            }
            KeyCode::Backspace if searching => {
                self.state.surgery_filter.pop();
            }
            KeyCode::Esc if searching => {
                self.state.detail_focus = DetailFocus::List;
            }
            KeyCode::Char('/') => self.state.detail_focus = DetailFocus::Search,
            KeyCode::Down | KeyCode::Char('j') => self.state.select_next_surgery(),
            KeyCode::Up | KeyCode::Char('k') => self.state.select_prev_surgery(),
            KeyCode::Char('n') => self.open_surgery_create(),
            KeyCode::Char('e') => self.open_surgery_edit(),
            KeyCode::Char('p') => self.open_patient_edit().await,
            KeyCode::Char('d') => self.request_surgery_delete(),
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
        Ok(())
    }

    /// Handle keys in the patient create/edit views
    async fn handle_patient_form_key(&mut self, key: KeyEvent) -> Result<()> {
        let on_buttons_row = matches!(
            self.state.form,
            FormState::Patient(ref f) if f.is_buttons_row_active()
        );

        match key.code {
            KeyCode::Tab => self.state.form.next_field(),
            KeyCode::BackTab => self.state.form.prev_field(),
            // Left/Right switch buttons on the buttons row
            KeyCode::Left | KeyCode::Up if on_buttons_row => {
                if let FormState::Patient(ref mut f) = self.state.form {
                    f.prev_button();
                }
            }
            KeyCode::Right | KeyCode::Down if on_buttons_row => {
                if let FormState::Patient(ref mut f) = self.state.form {
                    f.next_button();
                }
            }
            // Enter on the buttons row triggers the selected button
            // Button order: 0=Salvar, 1=Cancelar
            KeyCode::Enter if on_buttons_row => {
                let button = match self.state.form {
                    FormState::Patient(ref f) => f.selected_button,
                    _ => return Ok(()),
                };
                match button {
                    0 => self.save_patient().await,
                    1 => self.cancel_form(),
                    _ => {}
                }
            }
            // Save shortcut works from anywhere
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.save_patient().await;
            }
            KeyCode::Esc => self.cancel_form(),
            // Up/Down cycle options on select fields
            KeyCode::Up => {
                if let Some(field) = self.state.form.get_active_field_mut() {
                    field.prev_option();
                }
            }
            KeyCode::Down => {
                if let Some(field) = self.state.form.get_active_field_mut() {
                    field.next_option();
                }
            }
            KeyCode::Char(c) if !on_buttons_row => {
                let ch = if key.modifiers.contains(KeyModifiers::SHIFT) {
                    c.to_ascii_uppercase()
                } else {
                    c
                };
                if let Some(field) = self.state.form.get_active_field_mut() {
                    field.push_char(ch);
                }
            }
            KeyCode::Backspace if !on_buttons_row => {
                if let Some(field) = self.state.form.get_active_field_mut() {
                    field.pop_char();
                }
            }
            // Enter from a field submits, like the original form
            KeyCode::Enter if !on_buttons_row => {
                self.save_patient().await;
            }
            _ => {}
        }
        Ok(())
    }

    /// Handle keys in the surgery create/edit views
    async fn handle_surgery_form_key(&mut self, key: KeyEvent) -> Result<()> {
        let (on_buttons_row, on_procedures) = match self.state.form {
            FormState::Surgery(ref f) => (f.is_buttons_row_active(), f.is_procedure_slot_active()),
            _ => (false, false),
        };

        match key.code {
            KeyCode::Tab => self.state.form.next_field(),
            KeyCode::BackTab => self.state.form.prev_field(),
            // Save shortcut works from anywhere
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.save_surgery().await;
            }
            // Procedure selector: type to search, Up/Down move the
            // cursor, Enter toggles the highlighted result
            KeyCode::Char(c) if on_procedures => {
                if let FormState::Surgery(ref mut f) = self.state.form {
                    f.procedure_query.push(c);
                }
                self.procedure_query_changed().await;
            }
            KeyCode::Backspace if on_procedures => {
                if let FormState::Surgery(ref mut f) = self.state.form {
                    f.procedure_query.pop();
                }
                self.procedure_query_changed().await;
            }
            KeyCode::Down if on_procedures => {
                if let FormState::Surgery(ref mut f) = self.state.form {
                    if !f.procedure_options.is_empty()
                        && f.procedure_cursor + 1 < f.procedure_options.len()
                    {
                        f.procedure_cursor += 1;
                    }
                }
            }
            KeyCode::Up if on_procedures => {
                if let FormState::Surgery(ref mut f) = self.state.form {
                    f.procedure_cursor = f.procedure_cursor.saturating_sub(1);
                }
            }
            KeyCode::Enter if on_procedures => {
                if let FormState::Surgery(ref mut f) = self.state.form {
                    if let Some(option) = f.procedure_options.get(f.procedure_cursor).cloned() {
                        f.toggle_procedure(option);
                    }
                }
            }
            KeyCode::Left | KeyCode::Up if on_buttons_row => {
                if let FormState::Surgery(ref mut f) = self.state.form {
                    f.prev_button();
                }
            }
            KeyCode::Right | KeyCode::Down if on_buttons_row => {
                if let FormState::Surgery(ref mut f) = self.state.form {
                    f.next_button();
                }
            }
            KeyCode::Enter if on_buttons_row => {
                let button = match self.state.form {
                    FormState::Surgery(ref f) => f.selected_button,
                    _ => return Ok(()),
                };
                match button {
                    0 => self.save_surgery().await,
                    1 => self.cancel_form(),
                    _ => {}
                }
            }
            KeyCode::Esc => self.cancel_form(),
            KeyCode::Char(c) if !on_buttons_row => {
                let ch = if key.modifiers.contains(KeyModifiers::SHIFT) {
                    c.to_ascii_uppercase()
                } else {
                    c
                };
                if let Some(field) = self.state.form.get_active_field_mut() {
                    field.push_char(ch);
                }
            }
            KeyCode::Backspace if !on_buttons_row => {
                if let Some(field) = self.state.form.get_active_field_mut() {
                    field.pop_char();
                }
            }
            KeyCode::Enter if !on_buttons_row => {
                // Enter in the annotation field adds a newline
                let multiline = self
                    .state
                    .form
                    .get_active_field_mut()
                    .map(|f| f.is_multiline)
                    .unwrap_or(false);
                if multiline {
                    if let Some(field) = self.state.form.get_active_field_mut() {
                        field.push_char('\n');
                    }
                } else {
                    self.save_surgery().await;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Handle keys while the delete confirmation dialog is open
    async fn handle_confirm_delete_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                if let Some(ref mut action) = self.state.pending_delete {
                    action.selected_option = !action.selected_option;
                }
            }
            KeyCode::Enter => {
                let Some(action) = self.state.pending_delete.take() else {
                    return Ok(());
                };
                // Confirmed destructive actions proceed unconditionally
                if action.selected_option {
                    if let Err(err) = self.api.remove_surgery(&action.surgery_id).await {
                        self.push_error(format!("Falha ao excluir cirurgia: {err}"));
                    }
                    self.refresh_surgeries().await;
                }
            }
            KeyCode::Esc => self.state.pending_delete = None,
            _ => {}
        }
        Ok(())
    }

    /// Refresh the patient list with the current query filter
    async fn refresh_patients(&mut self) {
        match self.api.list_patients(&self.state.patient_query).await {
            Ok(patients) => {
                self.state.patients = patients;
                if self.state.selected_index >= self.state.patients.len() {
                    self.state.selected_index = self.state.patients.len().saturating_sub(1);
                }
            }
            Err(err) => self.push_error(format!("Falha ao listar pacientes: {err}")),
        }
    }

    /// Refresh the surgery list for the current patient
    async fn refresh_surgeries(&mut self) {
        let Some(patient_id) = self.state.patient.as_ref().map(|p| p.id.clone()) else {
            return;
        };
        match self.api.list_surgeries(&patient_id).await {
            Ok(surgeries) => self.state.set_surgeries(surgeries),
            Err(err) => self.push_error(format!("Falha ao listar cirurgias: {err}")),
        }
    }

    /// Re-fetch the patient shown in the detail view
    async fn refresh_current_patient(&mut self) {
        let Some(id) = self.state.patient.as_ref().map(|p| p.id.clone()) else {
            return;
        };
        match self.api.get_patient(&id).await {
            Ok(patient) => self.state.patient = Some(patient),
            Err(err) => self.push_error(format!("Falha ao carregar paciente: {err}")),
        }
    }

    /// Open the detail view for the selected patient: the patient is
    /// fetched first, then its surgeries, as two ordered steps
    async fn open_patient_detail(&mut self) {
        let Some(patient) = self.state.patients.get(self.state.selected_index).cloned() else {
            return;
        };
        match self.api.get_patient(&patient.id).await {
            Ok(patient) => {
                match self.api.list_surgeries(&patient.id).await {
                    Ok(surgeries) => self.state.set_surgeries(surgeries),
                    Err(err) => {
                        self.state.set_surgeries(Vec::new());
                        self.push_error(format!("Falha ao listar cirurgias: {err}"));
                    }
                }
                self.state.patient = Some(patient);
                self.state.surgery_filter.clear();
                self.state.detail_focus = DetailFocus::List;
                self.navigate(View::PatientDetail);
            }
            Err(err) => self.push_error(format!("Falha ao carregar paciente: {err}")),
        }
    }

    /// Fetch the group catalog and turn it into select options.
    /// Options are loaded before any entity data is bound, so a select
    /// never renders ahead of its option list.
    async fn load_group_options(&mut self) -> Option<Vec<SelectOption>> {
        match self.api.list_groups().await {
            Ok(groups) => {
                self.state.groups = groups;
                Some(
                    self.state
                        .groups
                        .iter()
                        .map(|g| SelectOption::new(&g.name, &g.id))
                        .collect(),
                )
            }
            Err(err) => {
                self.push_error(format!("Falha ao carregar grupos: {err}"));
                None
            }
        }
    }

    /// Open the patient create form
    async fn open_patient_create(&mut self) {
        let Some(options) = self.load_group_options().await else {
            return;
        };
        self.state.form = FormState::Patient(PatientForm::new(options));
        self.navigate(View::PatientCreate);
    }

    /// Open the patient edit form bound to the detail view's patient
    async fn open_patient_edit(&mut self) {
        let Some(patient) = self.state.patient.clone() else {
            return;
        };
        let Some(options) = self.load_group_options().await else {
            return;
        };
        self.state.form = FormState::Patient(PatientForm::from_patient(options, &patient));
        self.navigate(View::PatientEdit);
    }

    /// Open the surgery create form for the detail view's patient
    fn open_surgery_create(&mut self) {
        let Some(patient_id) = self.state.patient.as_ref().map(|p| p.id.clone()) else {
            return;
        };
        let mut form = SurgeryForm::new(&patient_id);
        // The selector mirrors the store's cached lookup on open
        form.procedure_options = self.state.procedure_cache.clone();
        self.state.form = FormState::Surgery(form);
        self.navigate(View::SurgeryCreate);
    }

    /// Open the surgery edit form bound to the selected surgery
    fn open_surgery_edit(&mut self) {
        let Some(surgery) = self.state.selected_surgery().cloned() else {
            return;
        };
        let mut form = SurgeryForm::from_surgery(&surgery);
        form.procedure_options = self.state.procedure_cache.clone();
        self.state.form = FormState::Surgery(form);
        self.navigate(View::SurgeryEdit);
    }

    /// Queue the selected surgery for deletion behind the confirmation
    /// dialog
    fn request_surgery_delete(&mut self) {
        if let Some(surgery) = self.state.selected_surgery() {
            self.state.pending_delete = Some(PendingDeleteAction {
                surgery_id: surgery.id.clone(),
                entity_display: surgery.hospital.clone(),
                selected_option: false,
            });
        }
    }

    /// Submit the patient form: validate, transform, dispatch, close
    async fn save_patient(&mut self) {
        // A submit arriving while one is in flight is dropped
        if self.state.submit_phase.is_busy() {
            return;
        }
        self.state.submit_phase = SubmitPhase::Validating;

        let prepared = match self.state.form {
            FormState::Patient(ref mut form) => {
                if apply_validation(&mut form.registry, &PatientForm::schema()) {
                    Some((form.draft(), form.editing.clone()))
                } else {
                    None
                }
            }
            _ => None,
        };
        let Some((mut draft, editing)) = prepared else {
            // Invalid: errors are on the fields, no network call
            self.state.submit_phase = SubmitPhase::Idle;
            return;
        };

        self.state.submit_phase = SubmitPhase::Submitting;
        // Serialization happens only after validation accepted the date
        if let Some(wire) = dates::to_wire_format(&draft.birthday) {
            draft.birthday = wire;
        }

        let result = match editing {
            Some(ref id) => self.api.update_patient(id, &draft).await,
            None => {
                draft.avatar = Some(random_avatar());
                self.api.create_patient(&draft).await.map(|_| ())
            }
        };

        // Fire-and-forget: the form closes whatever the remote outcome;
        // a dispatch error is surfaced through the error queue
        match result {
            Ok(()) => self.status_message = Some("Paciente salvo".to_string()),
            Err(err) => self.push_error(format!("Falha ao salvar paciente: {err}")),
        }
        self.close_form().await;
        self.state.submit_phase = SubmitPhase::Idle;
    }

    /// Submit the surgery form: validate, transform, dispatch, close
    async fn save_surgery(&mut self) {
        if self.state.submit_phase.is_busy() {
            return;
        }
        self.state.submit_phase = SubmitPhase::Validating;

        let prepared = match self.state.form {
            FormState::Surgery(ref mut form) => {
                if apply_validation(&mut form.registry, &SurgeryForm::schema()) {
                    Some((form.draft(), form.editing.clone()))
                } else {
                    None
                }
            }
            _ => None,
        };
        let Some((mut draft, editing)) = prepared else {
            self.state.submit_phase = SubmitPhase::Idle;
            return;
        };

        self.state.submit_phase = SubmitPhase::Submitting;
        if let Some(wire) = dates::to_wire_format(&draft.date) {
            draft.date = wire;
        }

        let result = match editing {
            Some(ref id) => self.api.update_surgery(id, &draft).await,
            None => self.api.create_surgery(&draft).await.map(|_| ()),
        };

        match result {
            Ok(()) => self.status_message = Some("Cirurgia salva".to_string()),
            Err(err) => self.push_error(format!("Falha ao salvar cirurgia: {err}")),
        }
        self.close_form().await;
        self.state.submit_phase = SubmitPhase::Idle;
    }

    /// React to an edit of the procedure search query
    async fn procedure_query_changed(&mut self) {
        let action = match self.state.form {
            FormState::Surgery(ref f) => f.procedure_query_action(),
            _ => return,
        };

        match action {
            ProcedureQueryAction::Idle => {}
            ProcedureQueryAction::Clear => {
                if let FormState::Surgery(ref mut f) = self.state.form {
                    f.procedure_options.clear();
                    f.procedure_cursor = 0;
                }
                // Cache-clear signal to the store
                self.state.procedure_cache.clear();
            }
            ProcedureQueryAction::Fetch => {
                let query = match self.state.form {
                    FormState::Surgery(ref f) => f.procedure_query.clone(),
                    _ => return,
                };
                match self.api.search_procedures(&query).await {
                    Ok(procedures) => {
                        self.state.procedure_cache = procedures.clone();
                        if let FormState::Surgery(ref mut f) = self.state.form {
                            f.procedure_options = procedures;
                            f.procedure_cursor = 0;
                        }
                    }
                    Err(err) => {
                        self.push_error(format!("Falha ao buscar procedimentos: {err}"));
                    }
                }
            }
        }
    }

    /// Close the active form after a dispatched submission and refresh
    /// whatever list backs the view underneath
    async fn close_form(&mut self) {
        self.state.form = FormState::None;
        self.go_back();
        match self.state.current_view {
            View::Patients => self.refresh_patients().await,
            View::PatientDetail => {
                self.refresh_current_patient().await;
                self.refresh_surgeries().await;
            }
            _ => {}
        }
    }

    /// Abandon the active form without dispatching anything
    fn cancel_form(&mut self) {
        self.state.form = FormState::None;
        self.go_back();
    }

    /// Navigate to a view, remembering where we came from
    fn navigate(&mut self, view: View) {
        self.state.view_history.push(self.state.current_view.clone());
        self.state.current_view = view;
    }

    /// Walk back through the view history, skipping form views
    fn go_back(&mut self) {
        while let Some(view) = self.state.view_history.pop() {
            if view.is_form_view() {
                continue;
            }
            self.state.current_view = view;
            return;
        }
        self.state.current_view = View::Patients;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockApiClientTrait;
    use crate::state::{FieldValue, Patient, PatientDraft, Procedure, Surgery};
    use pretty_assertions::assert_eq;

    fn app_with(api: MockApiClientTrait) -> App {
        App {
            state: AppState::default(),
            api: Box::new(api),
            quit: false,
            status_message: None,
            api_connected: true,
        }
    }

    fn created_patient() -> Patient {
        Patient {
            id: "p-new".to_string(),
            group_id: "g1".to_string(),
            name: "Ana".to_string(),
            birthday: "01/01/2020".to_string(),
            gender: "F".to_string(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            occupation: String::new(),
            helthcare: "Unimed".to_string(),
            alergy: "Nenhuma".to_string(),
            avatar: 1,
        }
    }

    fn detail_patient() -> Patient {
        Patient {
            id: "p1".to_string(),
            ..created_patient()
        }
    }

    fn test_surgery(id: &str) -> Surgery {
        Surgery {
            id: id.to_string(),
            patient_id: "p1".to_string(),
            hospital: "Santa Casa".to_string(),
            date: "03/15/2024".to_string(),
            annotation: String::new(),
            procedures: vec![],
        }
    }

    fn test_procedure(id: &str, name: &str) -> Procedure {
        Procedure {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    /// Fully valid patient form (create mode)
    fn filled_patient_form() -> PatientForm {
        let mut form = PatientForm::new(vec![SelectOption::new("Grupo A", "g1")]);
        form.registry.get_mut("group_id").unwrap().next_option();
        form.registry
            .set_value("name", FieldValue::Text("Ana".to_string()));
        form.registry
            .set_value("birthday", FieldValue::Date("2020-01-01".to_string()));
        let gender = form.registry.get_mut("gender").unwrap();
        gender.next_option();
        gender.next_option(); // Feminino
        form.registry
            .set_value("helthcare", FieldValue::Text("Unimed".to_string()));
        form.registry
            .set_value("alergy", FieldValue::Text("Nenhuma".to_string()));
        form
    }

    fn filled_surgery_form() -> SurgeryForm {
        let mut form = SurgeryForm::new("p1");
        form.registry
            .set_value("hospital", FieldValue::Text("Santa Casa".to_string()));
        form.registry
            .set_value("date", FieldValue::Date("2024-03-15".to_string()));
        form.procedures = vec![test_procedure("pr1", "Artroscopia de joelho")];
        form
    }

    mod patient_submission {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_invalid_form_issues_no_network_call() {
            let api = MockApiClientTrait::new(); // any call would panic
            let mut app = app_with(api);
            let mut form = filled_patient_form();
            form.registry
                .set_value("name", FieldValue::Text(String::new()));
            app.state.form = FormState::Patient(form);
            app.state.current_view = View::PatientCreate;

            app.save_patient().await;

            // Form stays open with the inline error attached
            match app.state.form {
                FormState::Patient(ref f) => {
                    assert_eq!(
                        f.registry.get("name").unwrap().error.as_deref(),
                        Some("Informe o nome do paciente")
                    );
                }
                _ => panic!("form should stay open"),
            }
            assert_eq!(app.state.current_view, View::PatientCreate);
            assert_eq!(app.state.submit_phase, SubmitPhase::Idle);
        }

        #[tokio::test]
        async fn test_create_dispatches_transformed_payload_with_avatar() {
            let mut api = MockApiClientTrait::new();
            api.expect_create_patient()
                .withf(|draft: &PatientDraft| {
                    draft.name == "Ana"
                        && draft.birthday == "01/01/2020"
                        && draft.group_id == "g1"
                        && draft.gender == "F"
                        && draft.avatar.is_some_and(|a| a < 5)
                })
                .times(1)
                .returning(|_| Ok(created_patient()));
            api.expect_list_patients().returning(|_| Ok(vec![]));

            let mut app = app_with(api);
            app.state.form = FormState::Patient(filled_patient_form());
            app.state.current_view = View::PatientCreate;
            app.state.view_history = vec![View::Patients];

            app.save_patient().await;

            assert!(matches!(app.state.form, FormState::None));
            assert_eq!(app.state.current_view, View::Patients);
            assert!(app.state.errors.is_empty());
            assert_eq!(app.state.submit_phase, SubmitPhase::Idle);
        }

        #[tokio::test]
        async fn test_edit_mode_dispatches_update_with_original_id() {
            let mut api = MockApiClientTrait::new();
            api.expect_create_patient().never();
            api.expect_update_patient()
                .withf(|id: &str, draft: &PatientDraft| {
                    id == "p1" && draft.birthday == "01/01/2020" && draft.avatar.is_none()
                })
                .times(1)
                .returning(|_, _| Ok(()));
            api.expect_list_patients().returning(|_| Ok(vec![]));

            let mut app = app_with(api);
            let mut form = filled_patient_form();
            form.editing = Some("p1".to_string());
            app.state.form = FormState::Patient(form);
            app.state.current_view = View::PatientEdit;
            app.state.view_history = vec![View::Patients];

            app.save_patient().await;

            assert!(matches!(app.state.form, FormState::None));
            assert!(app.state.errors.is_empty());
        }

        #[tokio::test]
        async fn test_dispatch_failure_still_closes_and_surfaces_error() {
            let mut api = MockApiClientTrait::new();
            api.expect_create_patient()
                .returning(|_| Err(anyhow::anyhow!("offline")));
            api.expect_list_patients().returning(|_| Ok(vec![]));

            let mut app = app_with(api);
            app.state.form = FormState::Patient(filled_patient_form());
            app.state.current_view = View::PatientCreate;
            app.state.view_history = vec![View::Patients];

            app.save_patient().await;

            assert!(matches!(app.state.form, FormState::None));
            assert_eq!(app.state.current_view, View::Patients);
            assert!(app
                .state
                .current_error()
                .is_some_and(|e| e.contains("offline")));
        }

        #[tokio::test]
        async fn test_second_submit_while_busy_is_dropped() {
            let api = MockApiClientTrait::new(); // any call would panic
            let mut app = app_with(api);
            app.state.form = FormState::Patient(filled_patient_form());
            app.state.current_view = View::PatientCreate;
            app.state.submit_phase = SubmitPhase::Submitting;

            app.save_patient().await;

            // Nothing happened: the form is untouched
            assert!(matches!(app.state.form, FormState::Patient(_)));
            assert_eq!(app.state.submit_phase, SubmitPhase::Submitting);
        }
    }

    mod surgery_submission {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_create_dispatches_transformed_date_and_procedure_ids() {
            let mut api = MockApiClientTrait::new();
            api.expect_create_surgery()
                .withf(|draft: &crate::state::SurgeryDraft| {
                    draft.patient_id == "p1"
                        && draft.date == "03/15/2024"
                        && draft.procedures == vec!["pr1".to_string()]
                })
                .times(1)
                .returning(|_| Ok(test_surgery("s-new")));
            api.expect_get_patient().returning(|_| Ok(detail_patient()));
            api.expect_list_surgeries()
                .returning(|_| Ok(vec![test_surgery("s-new")]));

            let mut app = app_with(api);
            app.state.patient = Some(detail_patient());
            app.state.form = FormState::Surgery(filled_surgery_form());
            app.state.current_view = View::SurgeryCreate;
            app.state.view_history = vec![View::Patients, View::PatientDetail];

            app.save_surgery().await;

            assert!(matches!(app.state.form, FormState::None));
            assert_eq!(app.state.current_view, View::PatientDetail);
            assert_eq!(app.state.selected_surgery_id.as_deref(), Some("s-new"));
        }

        #[tokio::test]
        async fn test_edit_mode_dispatches_update() {
            let mut api = MockApiClientTrait::new();
            api.expect_create_surgery().never();
            api.expect_update_surgery()
                .withf(|id: &str, _| id == "s1")
                .times(1)
                .returning(|_, _| Ok(()));
            api.expect_get_patient().returning(|_| Ok(detail_patient()));
            api.expect_list_surgeries().returning(|_| Ok(vec![]));

            let mut app = app_with(api);
            app.state.patient = Some(detail_patient());
            let mut form = filled_surgery_form();
            form.editing = Some("s1".to_string());
            app.state.form = FormState::Surgery(form);
            app.state.current_view = View::SurgeryEdit;
            app.state.view_history = vec![View::Patients, View::PatientDetail];

            app.save_surgery().await;

            assert!(matches!(app.state.form, FormState::None));
        }
    }

    mod procedure_search {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_query_of_length_four_issues_no_lookup() {
            let mut api = MockApiClientTrait::new();
            api.expect_search_procedures().never();

            let mut app = app_with(api);
            let mut form = SurgeryForm::new("p1");
            form.procedure_query = "artr".to_string();
            app.state.form = FormState::Surgery(form);

            app.procedure_query_changed().await;
        }

        #[tokio::test]
        async fn test_query_of_length_five_issues_lookup() {
            let mut api = MockApiClientTrait::new();
            api.expect_search_procedures()
                .withf(|name: &str| name == "artro")
                .times(1)
                .returning(|_| Ok(vec![test_procedure("pr1", "Artroscopia de joelho")]));

            let mut app = app_with(api);
            let mut form = SurgeryForm::new("p1");
            form.procedure_query = "artro".to_string();
            app.state.form = FormState::Surgery(form);

            app.procedure_query_changed().await;

            match app.state.form {
                FormState::Surgery(ref f) => assert_eq!(f.procedure_options.len(), 1),
                _ => panic!("surgery form expected"),
            }
            assert_eq!(app.state.procedure_cache.len(), 1);
        }

        #[tokio::test]
        async fn test_empty_query_clears_options_and_store_cache() {
            let mut api = MockApiClientTrait::new();
            api.expect_search_procedures().never();

            let mut app = app_with(api);
            let mut form = SurgeryForm::new("p1");
            form.procedure_options = vec![test_procedure("pr1", "Artroscopia de joelho")];
            app.state.form = FormState::Surgery(form);
            app.state.procedure_cache = vec![test_procedure("pr1", "Artroscopia de joelho")];

            app.procedure_query_changed().await;

            match app.state.form {
                FormState::Surgery(ref f) => assert!(f.procedure_options.is_empty()),
                _ => panic!("surgery form expected"),
            }
            assert!(app.state.procedure_cache.is_empty());
        }
    }

    mod delete_confirmation {
        use super::*;

        fn key(code: KeyCode) -> KeyEvent {
            KeyEvent::new(code, KeyModifiers::NONE)
        }

        #[tokio::test]
        async fn test_cancelled_dialog_issues_no_remove() {
            let mut api = MockApiClientTrait::new();
            api.expect_remove_surgery().never();

            let mut app = app_with(api);
            app.state.patient = Some(detail_patient());
            app.state.set_surgeries(vec![test_surgery("s1")]);
            app.state.current_view = View::PatientDetail;
            app.request_surgery_delete();
            assert!(app.state.pending_delete.is_some());

            app.handle_key(key(KeyCode::Esc)).await.unwrap();
            assert!(app.state.pending_delete.is_none());
        }

        #[tokio::test]
        async fn test_confirmed_dialog_removes_and_refreshes() {
            let mut api = MockApiClientTrait::new();
            api.expect_remove_surgery()
                .withf(|id: &str| id == "s1")
                .times(1)
                .returning(|_| Ok(()));
            api.expect_list_surgeries().returning(|_| Ok(vec![]));

            let mut app = app_with(api);
            app.state.patient = Some(detail_patient());
            app.state.set_surgeries(vec![test_surgery("s1")]);
            app.state.current_view = View::PatientDetail;
            app.request_surgery_delete();

            // Highlight the confirm option, then confirm
            app.handle_key(key(KeyCode::Down)).await.unwrap();
            app.handle_key(key(KeyCode::Enter)).await.unwrap();

            assert!(app.state.pending_delete.is_none());
            assert!(app.state.surgeries.is_empty());
        }

        #[tokio::test]
        async fn test_enter_on_default_selection_does_not_delete() {
            let mut api = MockApiClientTrait::new();
            api.expect_remove_surgery().never();

            let mut app = app_with(api);
            app.state.patient = Some(detail_patient());
            app.state.set_surgeries(vec![test_surgery("s1")]);
            app.state.current_view = View::PatientDetail;
            app.request_surgery_delete();

            // Cancel is highlighted by default
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert!(app.state.pending_delete.is_none());
        }
    }

    mod navigation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_go_back_skips_form_views() {
            let api = MockApiClientTrait::new();
            let mut app = app_with(api);
            app.state.view_history =
                vec![View::Patients, View::PatientDetail, View::SurgeryCreate];
            app.state.current_view = View::SurgeryEdit;

            app.go_back();
            assert_eq!(app.state.current_view, View::PatientDetail);
        }

        #[test]
        fn test_go_back_on_empty_history_lands_on_patients() {
            let api = MockApiClientTrait::new();
            let mut app = app_with(api);
            app.state.current_view = View::PatientDetail;
            app.go_back();
            assert_eq!(app.state.current_view, View::Patients);
        }
    }
}
