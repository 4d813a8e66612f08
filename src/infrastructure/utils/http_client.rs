use std::time::Duration;

use reqwest::Client;

/// Shared outbound client. The timeout covers the whole request, so a slow
/// provider surfaces as a transport error.
pub fn build_http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}
