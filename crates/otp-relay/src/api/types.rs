//! API request and response types.

use crate::otp::Verification;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request to send a code to a phone number.
#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    /// Destination in the provider's format (country code, no `+`)
    pub phone: String,
}

/// Response after the provider accepted the message.
#[derive(Debug, Serialize)]
pub struct SendOtpResponse {
    pub success: bool,
    /// Provider message id
    pub id: Option<String>,
}

/// Request to check a submitted code.
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub phone: String,

    /// Anything other than a string never matches; the outcome is still
    /// reported as a verification result.
    #[serde(default)]
    pub otp: Option<Value>,
}

impl VerifyOtpRequest {
    /// The submitted code, if it was sent as a string.
    pub fn code(&self) -> Option<&str> {
        self.otp.as_ref().and_then(Value::as_str)
    }
}

/// Verification result. Failures are reported here, not as HTTP errors.
#[derive(Debug, Serialize)]
pub struct VerifyOtpResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

impl From<Verification> for VerifyOtpResponse {
    fn from(outcome: Verification) -> Self {
        Self {
            valid: outcome.is_valid(),
            reason: outcome.reason(),
        }
    }
}

/// Request to register the sender phone number.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Two-step verification PIN
    pub pin: String,

    /// Optional local storage region for message data
    pub data_localization_region: Option<String>,
}

/// Provider response relayed verbatim.
#[derive(Debug, Serialize)]
pub struct PassThroughResponse {
    pub success: bool,
    pub data: Value,
}

/// Query parameters of the webhook subscribe handshake.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookVerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,

    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,

    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verify_response_serialization() {
        let valid = serde_json::to_value(VerifyOtpResponse::from(Verification::Valid)).unwrap();
        assert_eq!(valid, json!({ "valid": true }));

        let expired = serde_json::to_value(VerifyOtpResponse::from(Verification::Expired)).unwrap();
        assert_eq!(expired, json!({ "valid": false, "reason": "OTP expired" }));
    }

    #[test]
    fn test_verify_request_accepts_any_otp_value() {
        let text: VerifyOtpRequest =
            serde_json::from_value(json!({ "phone": "155", "otp": "482913" })).unwrap();
        assert_eq!(text.code(), Some("482913"));

        let number: VerifyOtpRequest =
            serde_json::from_value(json!({ "phone": "155", "otp": 482913 })).unwrap();
        assert_eq!(number.code(), None);

        let missing: VerifyOtpRequest = serde_json::from_value(json!({ "phone": "155" })).unwrap();
        assert_eq!(missing.code(), None);
    }

    #[test]
    fn test_webhook_query_names() {
        let query: WebhookVerifyQuery = serde_json::from_value(json!({
            "hub.mode": "subscribe",
            "hub.verify_token": "token",
            "hub.challenge": "1158201444"
        }))
        .unwrap();

        assert_eq!(query.mode.as_deref(), Some("subscribe"));
        assert_eq!(query.verify_token.as_deref(), Some("token"));
        assert_eq!(query.challenge.as_deref(), Some("1158201444"));
    }
}
