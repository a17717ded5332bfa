//! Request and response types for the WhatsApp Cloud API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Template used for OTP delivery unless configured otherwise.
pub const DEFAULT_TEMPLATE_NAME: &str = "first_test";

/// Template locale used unless configured otherwise.
pub const DEFAULT_LANGUAGE: &str = "en_US";

/// A templated message carrying a one-time code.
///
/// The code fills the template's single body parameter. The optional
/// button parameter fills the first URL button.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateMessage {
    pub to: String,
    pub template_name: String,
    pub language: String,
    pub code: String,
    pub button_param: Option<String>,
}

impl TemplateMessage {
    /// Build the default OTP message, with the destination number as the
    /// button parameter.
    pub fn otp(to: impl Into<String>, code: impl Into<String>) -> Self {
        let to = to.into();
        Self {
            button_param: Some(to.clone()),
            to,
            template_name: DEFAULT_TEMPLATE_NAME.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            code: code.into(),
        }
    }

    pub fn with_template(mut self, name: impl Into<String>, language: impl Into<String>) -> Self {
        self.template_name = name.into();
        self.language = language.into();
        self
    }

    pub fn with_button_param(mut self, param: Option<String>) -> Self {
        self.button_param = param;
        self
    }

    pub(crate) fn to_payload(&self) -> MessagePayload<'_> {
        let mut components = vec![Component::Body {
            parameters: vec![Parameter::Text { text: &self.code }],
        }];

        if let Some(param) = &self.button_param {
            components.push(Component::Button {
                sub_type: "url",
                index: 0,
                parameters: vec![Parameter::Text { text: param }],
            });
        }

        MessagePayload {
            messaging_product: MESSAGING_PRODUCT,
            to: &self.to,
            kind: "template",
            template: Template {
                name: &self.template_name,
                language: Language {
                    code: &self.language,
                },
                components,
            },
        }
    }
}

pub(crate) const MESSAGING_PRODUCT: &str = "whatsapp";

/// Body of `POST /{phone-number-id}/messages`.
#[derive(Debug, Serialize)]
pub(crate) struct MessagePayload<'a> {
    pub messaging_product: &'a str,
    pub to: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub template: Template<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Template<'a> {
    pub name: &'a str,
    pub language: Language<'a>,
    pub components: Vec<Component<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Language<'a> {
    pub code: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum Component<'a> {
    Body {
        parameters: Vec<Parameter<'a>>,
    },
    Button {
        sub_type: &'a str,
        index: u32,
        parameters: Vec<Parameter<'a>>,
    },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum Parameter<'a> {
    Text { text: &'a str },
}

/// Body of `POST /{phone-number-id}/register`.
#[derive(Debug, Serialize)]
pub(crate) struct RegisterPayload<'a> {
    pub messaging_product: &'a str,
    pub pin: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_localization_region: Option<&'a str>,
}

/// Response from the messages endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub messages: Vec<MessageId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageId {
    pub id: String,
}

impl MessagesResponse {
    /// Id of the first accepted message. Bodies of an unexpected shape
    /// yield `None`.
    pub fn message_id(body: Value) -> Option<String> {
        serde_json::from_value::<MessagesResponse>(body)
            .ok()
            .and_then(|r| r.messages.into_iter().next())
            .map(|m| m.id)
    }
}
