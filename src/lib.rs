mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod telemetry;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{captcha, limiter, mail, utils};

use captcha::recaptcha::RecaptchaVerifier;
use limiter::rate_limiter::FixedWindowLimiter;
use mail::sendgrid::SendGridMailer;
use repositories::{captcha::CaptchaVerifier, mailer::Mailer, rate_limit::RateLimiter};
use settings::{present, AppConfig};
use use_cases::contact::ContactHandler;
use utils::http_client::build_http_client;

pub struct AppState<L = FixedWindowLimiter, C = RecaptchaVerifier, M = SendGridMailer>
where
    L: RateLimiter,
    C: CaptchaVerifier,
    M: Mailer,
{
    pub contact_handler: ContactHandler<L, C, M>,
    pub trust_forwarded_for: bool,
}

pub type AppContactHandler = ContactHandler<FixedWindowLimiter, RecaptchaVerifier, SendGridMailer>;

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config.outbound_timeout())?;

        let rate_limiter = FixedWindowLimiter::new(
            config.rate_limit_max_requests,
            config.rate_limit_window(),
        );

        let captcha = present(&config.recaptcha_secret).map(|secret| {
            RecaptchaVerifier::new(client.clone(), &config.recaptcha_verify_url, secret)
        });
        if captcha.is_none() {
            tracing::warn!("RECAPTCHA_SECRET not set, contact submissions are accepted without captcha");
        }

        let mailer = present(&config.sendgrid_api_key).map(|api_key| {
            SendGridMailer::new(client.clone(), &config.sendgrid_api_url, api_key)
        });
        if !config.mail_configured() {
            tracing::warn!("SENDGRID_API_KEY or CONTACT_RECIPIENT not set, contact submissions will fail");
        }

        let contact_handler = ContactHandler::new(
            rate_limiter,
            captcha,
            mailer,
            present(&config.contact_recipient).map(str::to_string),
        )
        .with_min_captcha_score(config.recaptcha_min_score)
        .with_default_subject(config.default_subject.clone());

        Ok(AppState {
            contact_handler,
            trust_forwarded_for: config.trust_forwarded_for,
        })
    }
}

impl<L, C, M> AppState<L, C, M>
where
    L: RateLimiter,
    C: CaptchaVerifier,
    M: Mailer,
{
    pub fn with_handler(contact_handler: ContactHandler<L, C, M>, trust_forwarded_for: bool) -> Self {
        AppState { contact_handler, trust_forwarded_for }
    }
}
