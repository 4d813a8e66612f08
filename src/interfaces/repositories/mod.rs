pub mod captcha;
pub mod mailer;
pub mod rate_limit;
