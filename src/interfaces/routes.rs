use actix_web::web;

use crate::{
    captcha::recaptcha::RecaptchaVerifier,
    limiter::rate_limiter::FixedWindowLimiter,
    mail::sendgrid::SendGridMailer,
    repositories::{captcha::CaptchaVerifier, mailer::Mailer, rate_limit::RateLimiter},
};

mod contact;
mod system;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    configure_routes_for::<FixedWindowLimiter, RecaptchaVerifier, SendGridMailer>(cfg);
}

/// Route table for any limiter, verifier and mailer combination.
pub fn configure_routes_for<L, C, M>(cfg: &mut web::ServiceConfig)
where
    L: RateLimiter + 'static,
    C: CaptchaVerifier + 'static,
    M: Mailer + 'static,
{
    cfg.configure(system::config_routes::<L, C, M>);
    cfg.configure(contact::config_routes::<L, C, M>);
}
