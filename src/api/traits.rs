//! Trait abstraction for the API client to enable mocking in tests
//!
//! The application receives this trait boxed, so form submission talks
//! to injected operations instead of a concrete transport.

use crate::state::{Group, Patient, PatientDraft, Procedure, Surgery, SurgeryDraft};
use anyhow::Result;
use async_trait::async_trait;

/// Trait for clinic API operations, enabling mocking in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiClientTrait: Send + Sync {
    /// Check if the API is reachable
    async fn check_connection(&self) -> bool;

    /// List the current user's patient groups
    async fn list_groups(&mut self) -> Result<Vec<Group>>;

    /// List patients, optionally filtered by a name query
    async fn list_patients(&mut self, query: &str) -> Result<Vec<Patient>>;

    /// Fetch a single patient
    async fn get_patient(&mut self, patient_id: &str) -> Result<Patient>;

    /// Create a new patient
    async fn create_patient(&mut self, draft: &PatientDraft) -> Result<Patient>;

    /// Update an existing patient
    async fn update_patient(&mut self, patient_id: &str, draft: &PatientDraft) -> Result<()>;

    /// List surgeries for a patient
    async fn list_surgeries(&mut self, patient_id: &str) -> Result<Vec<Surgery>>;

    /// Create a new surgery
    async fn create_surgery(&mut self, draft: &SurgeryDraft) -> Result<Surgery>;

    /// Update an existing surgery
    async fn update_surgery(&mut self, surgery_id: &str, draft: &SurgeryDraft) -> Result<()>;

    /// Delete a surgery
    async fn remove_surgery(&mut self, surgery_id: &str) -> Result<()>;

    /// Search procedures by name
    async fn search_procedures(&mut self, name: &str) -> Result<Vec<Procedure>>;
}
