use crate::{
    entities::{
        contact::{ContactForm, ContactResponse, Inquiry, InquiryBody},
        email::OutboundEmail,
    },
    errors::ContactError,
    repositories::{captcha::CaptchaVerifier, mailer::Mailer, rate_limit::RateLimiter},
};

pub struct ContactHandler<L, C, M>
where
    L: RateLimiter,
    C: CaptchaVerifier,
    M: Mailer,
{
    pub rate_limiter: L,
    pub captcha: Option<C>,
    pub mailer: Option<M>,
    pub recipient: Option<String>,
    pub min_captcha_score: f64,
    pub default_subject: String,
}

impl<L, C, M> ContactHandler<L, C, M>
where
    L: RateLimiter,
    C: CaptchaVerifier,
    M: Mailer,
{
    pub fn new(rate_limiter: L, captcha: Option<C>, mailer: Option<M>, recipient: Option<String>) -> Self {
        ContactHandler {
            rate_limiter,
            captcha,
            mailer,
            recipient: recipient.filter(|r| !r.trim().is_empty()),
            min_captcha_score: 0.5,
            default_subject: "Nouveau message".to_string(),
        }
    }

    pub fn with_min_captcha_score(mut self, min_score: f64) -> Self {
        self.min_captcha_score = min_score;
        self
    }

    pub fn with_default_subject(mut self, subject: impl Into<String>) -> Self {
        self.default_subject = subject.into();
        self
    }

    pub fn captcha_enabled(&self) -> bool {
        self.captcha.is_some()
    }

    pub fn mail_configured(&self) -> bool {
        self.mailer.is_some() && self.recipient.is_some()
    }

    /// Screens one inquiry and relays it to the operator's inbox.
    ///
    /// Stages run in a fixed order and the first failing one decides the
    /// outcome: rate limit, body decoding, honeypot, required fields,
    /// CAPTCHA, mail configuration, dispatch.
    pub async fn submit(
        &self,
        client_key: &str,
        body: InquiryBody<'_>,
    ) -> Result<ContactResponse, ContactError> {
        self.check_rate_limit(client_key).await?;

        let form = ContactForm::decode(body)?;

        if form.is_spam() {
            tracing::warn!(client = %client_key, "Honeypot field filled, dropping submission");
            return Err(ContactError::SpamDetected);
        }

        let inquiry: Inquiry = form.try_into()?;

        self.verify_captcha(&inquiry).await?;

        let (Some(mailer), Some(recipient)) = (&self.mailer, &self.recipient) else {
            tracing::error!("Contact submission refused: mail provider key or recipient is not configured");
            return Err(ContactError::NotConfigured);
        };

        let email = OutboundEmail::compose(&inquiry, recipient, &self.default_subject);

        mailer.send(&email).await.map_err(|e| {
            tracing::error!(error = %e, "SendGrid error");
            ContactError::from(e)
        })?;

        tracing::info!(subject = %email.subject, "Contact message dispatched");
        Ok(ContactResponse { ok: true })
    }

    /// Limiter failures let the request through.
    async fn check_rate_limit(&self, client_key: &str) -> Result<(), ContactError> {
        match self.rate_limiter.allow(client_key).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::warn!(client = %client_key, "Contact rate limit exceeded");
                Err(ContactError::RateLimited)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Rate limiter failed, continuing without it");
                Ok(())
            }
        }
    }

    /// Runs only when a verifier is configured and the caller sent a token.
    async fn verify_captcha(&self, inquiry: &Inquiry) -> Result<(), ContactError> {
        let (Some(captcha), Some(token)) = (&self.captcha, inquiry.token.as_deref()) else {
            return Ok(());
        };

        let verdict = captcha.verify(token).await.map_err(|e| {
            tracing::error!(error = %e, "Captcha verification request failed");
            ContactError::from(e)
        })?;

        if !verdict.passes(self.min_captcha_score) {
            tracing::info!(
                score = ?verdict.score,
                error_codes = ?verdict.error_codes,
                "Captcha verification rejected submission"
            );
            return Err(ContactError::CaptchaRejected);
        }

        Ok(())
    }
}
