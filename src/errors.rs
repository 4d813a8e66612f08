use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use derive_more::Display;
use validator::ValidationErrors;

/// Every way a contact submission can halt before dispatch.
///
/// The `Display` text is exactly what the caller sees in the `error` field,
/// so server-side detail never belongs here.
#[derive(Debug, Display, PartialEq, Eq)]
pub enum ContactError {
    #[display("Method not allowed")]
    MethodNotAllowed,

    #[display("Too many requests")]
    RateLimited,

    #[display("Invalid request body")]
    InvalidBody,

    #[display("Payload too large")]
    PayloadTooLarge,

    #[display("Spam detected")]
    SpamDetected,

    #[display("Missing required fields")]
    MissingFields,

    #[display("Failed captcha verification")]
    CaptchaRejected,

    #[display("Captcha verification failed")]
    CaptchaUnavailable,

    #[display("Email service not configured")]
    NotConfigured,

    #[display("Failed to send email")]
    DeliveryFailed,
}

impl ResponseError for ContactError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(serde_json::json!({"error": self.to_string()}))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ContactError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ContactError::InvalidBody => StatusCode::BAD_REQUEST,
            ContactError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ContactError::SpamDetected => StatusCode::BAD_REQUEST,
            ContactError::MissingFields => StatusCode::BAD_REQUEST,
            ContactError::CaptchaRejected => StatusCode::BAD_REQUEST,
            ContactError::CaptchaUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            ContactError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            ContactError::DeliveryFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for ContactError {
    fn from(_: ValidationErrors) -> Self {
        ContactError::MissingFields
    }
}

impl From<CaptchaError> for ContactError {
    fn from(_: CaptchaError) -> Self {
        ContactError::CaptchaUnavailable
    }
}

impl From<MailError> for ContactError {
    fn from(_: MailError) -> Self {
        ContactError::DeliveryFailed
    }
}

#[derive(Debug, Display)]
pub enum CaptchaError {
    #[display("Captcha request failed: {_0}")]
    Transport(String),

    #[display("Captcha service returned status {_0}")]
    Status(u16),

    #[display("Captcha response could not be decoded: {_0}")]
    Decode(String),
}

impl From<reqwest::Error> for CaptchaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CaptchaError::Decode(err.to_string())
        } else {
            CaptchaError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Display)]
pub enum MailError {
    #[display("Mail request failed: {_0}")]
    Transport(String),

    #[display("Mail provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        MailError::Transport(err.to_string())
    }
}

#[derive(Debug, Display)]
pub enum RateLimitError {
    #[display("Rate limiter backend unavailable: {_0}")]
    Backend(String),
}
