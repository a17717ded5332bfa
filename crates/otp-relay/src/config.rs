//! Configuration for the OTP relay.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;
use whatsapp_client::{DEFAULT_API_BASE, DEFAULT_API_VERSION, DEFAULT_LANGUAGE, DEFAULT_TEMPLATE_NAME};

/// Flat variable names used by WhatsApp Cloud API tooling, mapped onto
/// their nested configuration keys.
const ENV_ALIASES: &[(&str, &str)] = &[
    ("WABA_TOKEN", "whatsapp.access_token"),
    ("WABA_PHONE_NUMBER_ID", "whatsapp.phone_number_id"),
    ("VERIFY_TOKEN", "webhook.verify_token"),
    ("PORT", "server.port"),
];

/// Relay configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// WhatsApp Cloud API configuration
    pub whatsapp: WhatsAppConfig,

    /// Webhook configuration
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// OTP configuration
    #[serde(default)]
    pub otp: OtpConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppConfig {
    /// Bearer token for the Cloud API
    pub access_token: SecretString,

    /// Sender phone number id
    pub phone_number_id: String,

    /// Graph API host
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Graph API version
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Secret echoed back by the provider during the subscribe handshake
    #[serde(default = "default_verify_token")]
    pub verify_token: SecretString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtpConfig {
    /// How long an issued code stays valid
    #[serde(default = "default_otp_ttl", with = "humantime_serde")]
    pub ttl: Duration,

    /// Message template name
    #[serde(default = "default_template_name")]
    pub template_name: String,

    /// Message template locale
    #[serde(default = "default_language")]
    pub language: String,

    /// Value for the template's URL button parameter
    #[serde(default)]
    pub button_param: ButtonParam,
}

/// What to put in the template's URL button parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ButtonParam {
    /// The destination phone number
    #[default]
    Phone,
    /// No button component
    Omit,
    /// A fixed value
    Fixed(String),
}

impl From<String> for ButtonParam {
    fn from(value: String) -> Self {
        match value.as_str() {
            "phone" => ButtonParam::Phone,
            "none" | "" => ButtonParam::Omit,
            _ => ButtonParam::Fixed(value),
        }
    }
}

impl ButtonParam {
    /// Resolve the parameter for a message sent to `phone`.
    pub fn resolve(&self, phone: &str) -> Option<String> {
        match self {
            ButtonParam::Phone => Some(phone.to_string()),
            ButtonParam::Omit => None,
            ButtonParam::Fixed(value) => Some(value.clone()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default implementations
impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            verify_token: default_verify_token(),
        }
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl: default_otp_ttl(),
            template_name: default_template_name(),
            language: default_language(),
            button_param: ButtonParam::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_api_base() -> String {
    DEFAULT_API_BASE.into()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.into()
}

fn default_verify_token() -> SecretString {
    SecretString::new("my_verify_token".into())
}

fn default_otp_ttl() -> Duration {
    Duration::from_secs(5 * 60)
}

fn default_template_name() -> String {
    DEFAULT_TEMPLATE_NAME.into()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.into()
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder().add_source(
            config::Environment::default()
                .separator("__")
                .try_parsing(false),
        );

        for (var, key) in ENV_ALIASES {
            builder = builder
                .set_override_option(*key, std::env::var(var).ok())
                .context("Failed to apply environment alias")?;
        }

        Self::from_builder(builder)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn minimal() -> config::ConfigBuilder<config::builder::DefaultState> {
        config::Config::builder()
            .set_override("whatsapp.access_token", "token")
            .unwrap()
            .set_override("whatsapp.phone_number_id", "1234567890")
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_builder(minimal()).unwrap();

        assert_eq!(config.whatsapp.access_token.expose_secret(), "token");
        assert_eq!(config.whatsapp.api_base, "https://graph.facebook.com");
        assert_eq!(config.whatsapp.api_version, "v22.0");
        assert_eq!(config.webhook.verify_token.expose_secret(), "my_verify_token");
        assert_eq!(config.otp.ttl, Duration::from_secs(300));
        assert_eq!(config.otp.template_name, "first_test");
        assert_eq!(config.otp.language, "en_US");
        assert_eq!(config.otp.button_param, ButtonParam::Phone);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_overrides() {
        let builder = minimal()
            .set_override("server.port", "8080")
            .unwrap()
            .set_override("otp.ttl", "90s")
            .unwrap()
            .set_override("otp.button_param", "none")
            .unwrap()
            .set_override("webhook.verify_token", "s3cret")
            .unwrap();
        let config = Config::from_builder(builder).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.otp.ttl, Duration::from_secs(90));
        assert_eq!(config.otp.button_param, ButtonParam::Omit);
        assert_eq!(config.webhook.verify_token.expose_secret(), "s3cret");
    }

    #[test]
    fn test_missing_credentials_fail() {
        let result = Config::from_builder(config::Config::builder());
        assert!(result.is_err());
    }

    #[test]
    fn test_button_param_resolution() {
        assert_eq!(ButtonParam::Phone.resolve("155"), Some("155".to_string()));
        assert_eq!(ButtonParam::Omit.resolve("155"), None);
        assert_eq!(
            ButtonParam::from("promo".to_string()).resolve("155"),
            Some("promo".to_string())
        );
    }
}
