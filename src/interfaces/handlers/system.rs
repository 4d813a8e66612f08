use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use serde::Serialize;
use std::time::Duration;

use crate::{
    constants::START_TIME,
    repositories::{captcha::CaptchaVerifier, mailer::Mailer, rate_limit::RateLimiter},
    AppState,
};

#[derive(Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    version: &'static str,
    uptime: String,
    started_at: String,
    timestamp: String,
    captcha_enabled: bool,
    mail_configured: bool,
    tracked_clients: Option<usize>,
}

pub async fn health_check<L, C, M>(state: web::Data<AppState<L, C, M>>) -> impl Responder
where
    L: RateLimiter + 'static,
    C: CaptchaVerifier + 'static,
    M: Mailer + 'static,
{
    let now_utc = Utc::now();
    let uptime_secs = now_utc.signed_duration_since(*START_TIME).num_seconds().max(0) as u64;
    let handler = &state.contact_handler;

    HttpResponse::Ok().json(HealthCheckResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime: format_duration(Duration::from_secs(uptime_secs)).to_string(),
        started_at: START_TIME.to_rfc3339(),
        timestamp: now_utc.to_rfc3339(),
        captcha_enabled: handler.captcha_enabled(),
        mail_configured: handler.mail_configured(),
        tracked_clients: handler.rate_limiter.tracked_clients(),
    })
}
