use actix_web::web;

use crate::{
    handlers::system::health_check,
    repositories::{captcha::CaptchaVerifier, mailer::Mailer, rate_limit::RateLimiter},
};

pub fn config_routes<L, C, M>(cfg: &mut web::ServiceConfig)
where
    L: RateLimiter + 'static,
    C: CaptchaVerifier + 'static,
    M: Mailer + 'static,
{
    cfg.service(
        web::resource("/health").route(web::get().to(health_check::<L, C, M>))
    );
}
