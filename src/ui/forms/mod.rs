//! Form rendering for the entity create/edit views

mod field_renderer;
mod patient_form;
mod procedure_select;
mod surgery_form;

use crate::app::App;
use ratatui::{layout::Rect, Frame};

/// Draw the patient create/edit form
pub fn draw_patient_form(frame: &mut Frame, area: Rect, app: &App) {
    patient_form::draw(frame, area, app);
}

/// Draw the surgery create/edit form
pub fn draw_surgery_form(frame: &mut Frame, area: Rect, app: &App) {
    surgery_form::draw(frame, area, app);
}
