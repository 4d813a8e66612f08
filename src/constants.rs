use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Upper bound for a contact form body.
pub const MAX_CONTACT_BODY_BYTES: usize = 64 * 1024;
