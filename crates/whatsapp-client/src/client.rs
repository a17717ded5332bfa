//! WhatsApp Cloud API HTTP client.

use crate::error::WhatsAppError;
use crate::types::*;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Graph API host used when none is configured.
pub const DEFAULT_API_BASE: &str = "https://graph.facebook.com";

/// Graph API version used for all Cloud API endpoints.
pub const DEFAULT_API_VERSION: &str = "v22.0";

/// Client bound to a single sender phone number.
///
/// Every call is a single attempt. Retries, if wanted, belong to the caller.
#[derive(Clone)]
pub struct WhatsAppClient {
    client: Client,
    base_url: String,
    access_token: SecretString,
}

impl WhatsAppClient {
    /// Create a client for `{api_base}/{api_version}/{phone_number_id}`.
    pub fn new(
        api_base: &str,
        api_version: &str,
        phone_number_id: &str,
        access_token: SecretString,
    ) -> Result<Self, WhatsAppError> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            base_url: format!(
                "{}/{}/{}",
                api_base.trim_end_matches('/'),
                api_version,
                phone_number_id
            ),
            access_token,
        })
    }

    /// Base endpoint all requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a templated message. Returns the provider's message id.
    #[instrument(skip(self, message), fields(to = %message.to, template = %message.template_name))]
    pub async fn send_template(
        &self,
        message: &TemplateMessage,
    ) -> Result<Option<String>, WhatsAppError> {
        let body = self.post("messages", &message.to_payload()).await?;
        let id = MessagesResponse::message_id(body);

        debug!(id = ?id, "Template message accepted");
        Ok(id)
    }

    /// Register the sender phone number with its two-step verification PIN.
    #[instrument(skip(self, pin))]
    pub async fn register(
        &self,
        pin: &str,
        data_localization_region: Option<&str>,
    ) -> Result<Value, WhatsAppError> {
        let payload = RegisterPayload {
            messaging_product: MESSAGING_PRODUCT,
            pin,
            data_localization_region: data_localization_region.filter(|r| !r.is_empty()),
        };

        self.post("register", &payload).await
    }

    /// Deregister the sender phone number.
    #[instrument(skip(self))]
    pub async fn deregister(&self) -> Result<Value, WhatsAppError> {
        self.post("deregister", &serde_json::json!({})).await
    }

    async fn post<B>(&self, endpoint: &str, body: &B) -> Result<Value, WhatsAppError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(url = %url, "Sending Cloud API request");

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.access_token.expose_secret()),
            )
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Any 2xx is a success; only the status decides. Bodies that are not
    /// JSON (including empty ones) are kept as a JSON string.
    async fn handle_response(&self, response: reqwest::Response) -> Result<Value, WhatsAppError> {
        let status = response.status();
        let text = response.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        if status.is_success() {
            return Ok(body);
        }

        warn!(status = %status, body = %body, "Cloud API request failed");

        Err(WhatsAppError::Api {
            status: status.as_u16(),
            body,
        })
    }
}
