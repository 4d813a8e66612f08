use async_trait::async_trait;
use reqwest::Client;
use zeroize::Zeroizing;

use crate::{
    entities::captcha::CaptchaVerification,
    errors::CaptchaError,
    repositories::captcha::CaptchaVerifier,
};

/// reCAPTCHA `siteverify` client.
#[derive(Clone)]
pub struct RecaptchaVerifier {
    client: Client,
    verify_url: String,
    secret: Zeroizing<String>,
}

impl RecaptchaVerifier {
    pub fn new(client: Client, verify_url: impl Into<String>, secret: impl Into<String>) -> Self {
        RecaptchaVerifier {
            client,
            verify_url: verify_url.into(),
            secret: Zeroizing::new(secret.into()),
        }
    }
}

#[async_trait]
impl CaptchaVerifier for RecaptchaVerifier {
    async fn verify(&self, token: &str) -> Result<CaptchaVerification, CaptchaError> {
        let params = [("secret", self.secret.as_str()), ("response", token)];

        let response = self.client
            .post(&self.verify_url)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CaptchaError::Status(status.as_u16()));
        }

        let verification = response
            .json::<CaptchaVerification>()
            .await
            .map_err(|e| CaptchaError::Decode(e.to_string()))?;

        Ok(verification)
    }
}
