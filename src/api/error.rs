//! API error taxonomy
//!
//! Errors are surfaced through the application's error queue and never
//! retried by the UI layer.

use thiserror::Error;

/// Errors produced while talking to the clinic API
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never reached the server
    #[error("Falha ao conectar com o servidor: {0}")]
    Connection(String),

    /// The server answered with a non-success status
    #[error("O servidor respondeu {status} para {endpoint}")]
    Status { status: u16, endpoint: String },

    /// The response body could not be decoded
    #[error("Resposta invalida do servidor: {0}")]
    Decode(String),
}
