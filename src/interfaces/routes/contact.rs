use actix_web::web;

use crate::{
    handlers::contact::{method_not_allowed, submit_contact},
    repositories::{captcha::CaptchaVerifier, mailer::Mailer, rate_limit::RateLimiter},
};

pub fn config_routes<L, C, M>(cfg: &mut web::ServiceConfig)
where
    L: RateLimiter + 'static,
    C: CaptchaVerifier + 'static,
    M: Mailer + 'static,
{
    cfg.service(
        web::resource("/api/contact")
            .route(web::post().to(submit_contact::<L, C, M>))
            .default_service(web::to(method_not_allowed))
    );
}
