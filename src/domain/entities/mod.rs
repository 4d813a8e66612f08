pub mod captcha;
pub mod contact;
pub mod email;
