//! REST client for communicating with the clinic API
//!
//! Thin wrapper over `reqwest`: every operation maps to one endpoint,
//! errors are folded into the [`ApiError`] taxonomy and bubbled up as
//! `anyhow` results at the trait boundary.

use super::error::ApiError;
use super::traits::ApiClientTrait;
use crate::state::{Group, Patient, PatientDraft, Procedure, Surgery, SurgeryDraft};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Default API address
const DEFAULT_ADDRESS: &str = "http://127.0.0.1:3333";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Client for communicating with the clinic API
pub struct ApiClient {
    /// The HTTP client
    http: reqwest::Client,
    /// The API base address
    base_url: String,
}

impl ApiClient {
    /// Create a new API client. The address comes from the
    /// `CLINIC_API_ADDRESS` environment variable, then the configured
    /// value, then the default.
    pub fn new(configured_address: Option<String>, timeout_seconds: Option<u64>) -> Result<Self> {
        let base_url = std::env::var("CLINIC_API_ADDRESS")
            .ok()
            .or(configured_address)
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(
                timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            ))
            .build()?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&[(&str, &str)]>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        tracing::debug!(%url, "GET");

        let mut request = self.http.get(&url);
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                endpoint: url,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        tracing::debug!(%url, method = %method, "request with body");

        let response = self
            .http
            .request(method, &url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                endpoint: url,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_no_content<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(path);
        tracing::debug!(%url, method = %method, "request");

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                endpoint: url,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl ApiClientTrait for ApiClient {
    async fn check_connection(&self) -> bool {
        self.http.get(&self.base_url).send().await.is_ok()
    }

    async fn list_groups(&mut self) -> Result<Vec<Group>> {
        Ok(self.get_json("/groups", None).await?)
    }

    async fn list_patients(&mut self, query: &str) -> Result<Vec<Patient>> {
        let filter = [("name", query)];
        let query = (!query.is_empty()).then_some(&filter[..]);
        Ok(self.get_json("/patients", query).await?)
    }

    async fn get_patient(&mut self, patient_id: &str) -> Result<Patient> {
        Ok(self
            .get_json(&format!("/patients/{patient_id}"), None)
            .await?)
    }

    async fn create_patient(&mut self, draft: &PatientDraft) -> Result<Patient> {
        Ok(self.send_json(Method::POST, "/patients", draft).await?)
    }

    async fn update_patient(&mut self, patient_id: &str, draft: &PatientDraft) -> Result<()> {
        Ok(self
            .send_no_content(Method::PUT, &format!("/patients/{patient_id}"), Some(draft))
            .await?)
    }

    async fn list_surgeries(&mut self, patient_id: &str) -> Result<Vec<Surgery>> {
        Ok(self
            .get_json("/surgeries", Some(&[("patient", patient_id)]))
            .await?)
    }

    async fn create_surgery(&mut self, draft: &SurgeryDraft) -> Result<Surgery> {
        Ok(self.send_json(Method::POST, "/surgeries", draft).await?)
    }

    async fn update_surgery(&mut self, surgery_id: &str, draft: &SurgeryDraft) -> Result<()> {
        Ok(self
            .send_no_content(Method::PUT, &format!("/surgeries/{surgery_id}"), Some(draft))
            .await?)
    }

    async fn remove_surgery(&mut self, surgery_id: &str) -> Result<()> {
        Ok(self
            .send_no_content::<()>(Method::DELETE, &format!("/surgeries/{surgery_id}"), None)
            .await?)
    }

    async fn search_procedures(&mut self, name: &str) -> Result<Vec<Procedure>> {
        Ok(self
            .get_json("/procedures", Some(&[("name", name)]))
            .await?)
    }
}

/// Join a base address and a path without doubling the slash
fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
