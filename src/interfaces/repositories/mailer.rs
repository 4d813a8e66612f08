use async_trait::async_trait;

use crate::{entities::email::OutboundEmail, errors::MailError};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Hands one message to the delivery provider. No retries.
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError>;
}
