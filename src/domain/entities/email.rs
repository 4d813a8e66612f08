use serde::Serialize;

use crate::entities::contact::Inquiry;

const SUBJECT_PREFIX: &str = "[Contact]";

/// Notification mailed to the site operator for an accepted inquiry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundEmail {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

impl OutboundEmail {
    /// Sends from the recipient to itself so the provider's verified-sender
    /// rule holds. Field values are interpolated as-is, without HTML escaping.
    pub fn compose(inquiry: &Inquiry, recipient: &str, default_subject: &str) -> Self {
        let subject = inquiry.subject.as_deref().unwrap_or(default_subject);

        OutboundEmail {
            to: recipient.to_string(),
            from: recipient.to_string(),
            subject: format!("{} {}", SUBJECT_PREFIX, subject),
            text_body: format!(
                "Name: {}\nEmail: {}\n\n{}",
                inquiry.name, inquiry.email, inquiry.message
            ),
            html_body: format!(
                "<p><strong>Name:</strong> {}</p><p><strong>Email:</strong> {}</p><p>{}</p>",
                inquiry.name, inquiry.email, inquiry.message
            ),
        }
    }
}
