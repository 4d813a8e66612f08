use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use zeroize::Zeroizing;

use crate::{entities::email::OutboundEmail, errors::MailError, repositories::mailer::Mailer};

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

/// Request body for the v3 `mail/send` endpoint.
#[derive(Serialize)]
struct SendRequest<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    subject: &'a str,
    content: [Content<'a>; 2],
}

impl<'a> From<&'a OutboundEmail> for SendRequest<'a> {
    fn from(email: &'a OutboundEmail) -> Self {
        SendRequest {
            personalizations: [Personalization { to: [Address { email: &email.to }] }],
            from: Address { email: &email.from },
            subject: &email.subject,
            // text/plain must precede text/html
            content: [
                Content { kind: "text/plain", value: &email.text_body },
                Content { kind: "text/html", value: &email.html_body },
            ],
        }
    }
}

#[derive(Clone)]
pub struct SendGridMailer {
    client: Client,
    api_url: String,
    api_key: Zeroizing<String>,
}

impl SendGridMailer {
    pub fn new(client: Client, api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        SendGridMailer {
            client,
            api_url: api_url.into(),
            api_key: Zeroizing::new(api_key.into()),
        }
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        let response = self.client
            .post(&self.api_url)
            .bearer_auth(self.api_key.as_str())
            .json(&SendRequest::from(email))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(MailError::Rejected { status: status.as_u16(), body })
    }
}
