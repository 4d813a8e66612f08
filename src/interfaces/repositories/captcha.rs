use async_trait::async_trait;

use crate::{entities::captcha::CaptchaVerification, errors::CaptchaError};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    /// Redeems a client-side challenge token with the provider.
    async fn verify(&self, token: &str) -> Result<CaptchaVerification, CaptchaError>;
}
