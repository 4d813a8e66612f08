use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    test, web, App,
};
use async_trait::async_trait;
use contact_backend::{
    entities::{captcha::CaptchaVerification, email::OutboundEmail},
    errors::{CaptchaError, MailError},
    limiter::rate_limiter::FixedWindowLimiter,
    repositories::{captcha::CaptchaVerifier, mailer::Mailer},
    routes::configure_routes_for,
    use_cases::contact::ContactHandler,
    AppState,
};

pub const RECIPIENT: &str = "ops@clean.example";

/// Verifier answering every token with a fixed verdict.
#[derive(Clone)]
pub struct FakeCaptcha {
    verdict: Option<CaptchaVerification>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl FakeCaptcha {
    pub fn answering(success: bool, score: Option<f64>) -> Self {
        FakeCaptcha {
            verdict: Some(CaptchaVerification { success, score, ..Default::default() }),
            calls: Arc::default(),
        }
    }

    pub fn unreachable() -> Self {
        FakeCaptcha { verdict: None, calls: Arc::default() }
    }
}

#[async_trait]
impl CaptchaVerifier for FakeCaptcha {
    async fn verify(&self, token: &str) -> Result<CaptchaVerification, CaptchaError> {
        self.calls.lock().unwrap().push(token.to_string());
        self.verdict
            .clone()
            .ok_or_else(|| CaptchaError::Transport("operation timed out".into()))
    }
}

/// Mailer that records instead of delivering.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    pub sent: Arc<Mutex<Vec<OutboundEmail>>>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        RecordingMailer { fail: true, ..Default::default() }
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Rejected { status: 401, body: "invalid api key".into() });
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

pub struct TestSetup {
    pub captcha: Option<FakeCaptcha>,
    pub mailer: Option<RecordingMailer>,
    pub recipient: Option<String>,
    pub window: Duration,
}

impl Default for TestSetup {
    fn default() -> Self {
        TestSetup {
            captcha: None,
            mailer: Some(RecordingMailer::default()),
            recipient: Some(RECIPIENT.to_string()),
            window: Duration::from_secs(3600),
        }
    }
}

pub async fn spawn_app(
    setup: TestSetup,
) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    let handler = ContactHandler::new(
        FixedWindowLimiter::new(5, setup.window),
        setup.captcha,
        setup.mailer,
        setup.recipient,
    );
    let state = web::Data::new(AppState::with_handler(handler, true));

    test::init_service(
        App::new()
            .app_data(state)
            .configure(configure_routes_for::<FixedWindowLimiter, FakeCaptcha, RecordingMailer>),
    )
    .await
}

pub fn post_contact(client: &str, body: serde_json::Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/contact")
        .insert_header(("x-forwarded-for", client.to_string()))
        .set_json(body)
}

pub fn valid_inquiry() -> serde_json::Value {
    serde_json::json!({
        "name": "Jane",
        "email": "jane@x.com",
        "message": "Hello",
        "_hp": ""
    })
}
