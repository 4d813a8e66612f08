use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::errors::ContactError;

/// Raw submission as posted by the site's contact and quote forms.
///
/// Every field is optional at the wire level so that absence is reported as
/// a validation failure rather than a decoding failure.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,

    #[validate(required, length(min = 1))]
    pub email: Option<String>,

    pub subject: Option<String>,

    #[validate(required, length(min = 1))]
    pub message: Option<String>,

    pub token: Option<String>,

    /// Untyped: bots fill it with whatever they like.
    #[serde(rename = "_hp")]
    pub honeypot: Option<Value>,
}

/// Body bytes together with the declared content type. `oversized` marks a
/// body that was cut off at the size limit; its bytes are not kept.
#[derive(Debug, Clone, Copy)]
pub struct InquiryBody<'a> {
    pub content_type: Option<&'a str>,
    pub bytes: &'a [u8],
    pub oversized: bool,
}

impl<'a> InquiryBody<'a> {
    pub fn new(content_type: Option<&'a str>, bytes: &'a [u8]) -> Self {
        InquiryBody { content_type, bytes, oversized: false }
    }

    pub fn json(bytes: &'a [u8]) -> Self {
        Self::new(Some("application/json"), bytes)
    }

    pub fn form(bytes: &'a [u8]) -> Self {
        Self::new(Some("application/x-www-form-urlencoded"), bytes)
    }

    pub fn oversized(content_type: Option<&'a str>) -> Self {
        InquiryBody { content_type, bytes: &[], oversized: true }
    }
}

impl ContactForm {
    /// Decodes a JSON or form-encoded body. An empty body, or a JSON value
    /// that is not an object, yields a form with every field absent.
    pub fn decode(body: InquiryBody<'_>) -> Result<Self, ContactError> {
        if body.oversized {
            return Err(ContactError::PayloadTooLarge);
        }

        if body.bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(ContactForm::default());
        }

        let is_form = body
            .content_type
            .map(|ct| ct.trim().to_ascii_lowercase().starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);

        if is_form {
            let fields: Map<String, Value> = url::form_urlencoded::parse(body.bytes)
                .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
                .collect();
            serde_json::from_value(Value::Object(fields)).map_err(|e| {
                tracing::debug!("Rejecting form body: {}", e);
                ContactError::InvalidBody
            })
        } else {
            let value: Value = serde_json::from_slice(body.bytes).map_err(|e| {
                tracing::debug!("Rejecting JSON body: {}", e);
                ContactError::InvalidBody
            })?;
            if !value.is_object() {
                return Ok(ContactForm::default());
            }
            serde_json::from_value(value).map_err(|e| {
                tracing::debug!("Rejecting JSON body: {}", e);
                ContactError::InvalidBody
            })
        }
    }

    pub fn is_spam(&self) -> bool {
        self.honeypot.as_ref().is_some_and(is_filled)
    }
}

/// Whether a honeypot value counts as filled in: non-empty strings, `true`,
/// non-zero numbers, objects and arrays.
fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A submission that passed honeypot and required-field screening.
#[derive(Debug, Clone, PartialEq)]
pub struct Inquiry {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub token: Option<String>,
}

impl TryFrom<ContactForm> for Inquiry {
    type Error = ContactError;

    fn try_from(form: ContactForm) -> Result<Self, Self::Error> {
        form.validate()?;

        match (form.name, form.email, form.message) {
            (Some(name), Some(email), Some(message)) => Ok(Inquiry {
                name,
                email,
                subject: form.subject.filter(|s| !s.is_empty()),
                message,
                token: form.token.filter(|t| !t.is_empty()),
            }),
            _ => Err(ContactError::MissingFields),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ContactResponse {
    pub ok: bool,
}
