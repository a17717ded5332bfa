//! WhatsApp client errors.

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WhatsAppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {body}")]
    Api { status: u16, body: Value },
}

impl WhatsAppError {
    /// The error body returned by the Cloud API, if the request got that far.
    pub fn provider_body(&self) -> Option<&Value> {
        match self {
            WhatsAppError::Api { body, .. } => Some(body),
            _ => None,
        }
    }
}
