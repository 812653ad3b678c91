//! UI module for rendering the TUI

pub mod components;
mod forms;
mod layout;
mod patient_detail;
mod patients;

use crate::app::App;
use crate::state::View;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (main_area, status_area) = layout::create_layout(frame.area());

    match &app.state.current_view {
        View::Patients => patients::draw(frame, main_area, app),
        View::PatientDetail => patient_detail::draw(frame, main_area, app),
        View::PatientCreate | View::PatientEdit => {
            forms::draw_patient_form(frame, main_area, app)
        }
        View::SurgeryCreate | View::SurgeryEdit => {
            forms::draw_surgery_form(frame, main_area, app)
        }
    }

    layout::draw_status_bar(frame, status_area, app);

    // Overlays
    if let Some(ref action) = app.state.pending_delete {
        components::dialog::render_confirm_dialog(frame, action);
    }
    if let Some(error) = app.state.current_error() {
        components::dialog::render_error_dialog(frame, error);
    }
}
