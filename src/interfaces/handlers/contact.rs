use actix_web::{http::header, web, HttpRequest, HttpResponse, ResponseError};

use crate::{
    constants::MAX_CONTACT_BODY_BYTES,
    entities::contact::InquiryBody,
    errors::ContactError,
    repositories::{captcha::CaptchaVerifier, mailer::Mailer, rate_limit::RateLimiter},
    utils::get_client_ip::get_client_ip,
    AppState,
};

/// The payload is read here rather than through an extractor so that a body
/// over the limit still reaches the rate limiter and gets a JSON error.
pub async fn submit_contact<L, C, M>(
    req: HttpRequest,
    state: web::Data<AppState<L, C, M>>,
    payload: web::Payload,
) -> Result<HttpResponse, ContactError>
where
    L: RateLimiter + 'static,
    C: CaptchaVerifier + 'static,
    M: Mailer + 'static,
{
    let client_key = get_client_ip(&req, state.trust_forwarded_for);
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    let bytes = match payload.to_bytes_limited(MAX_CONTACT_BODY_BYTES).await {
        Ok(Ok(bytes)) => Some(bytes),
        Ok(Err(e)) => {
            tracing::warn!(client = %client_key, "Failed to read contact body: {}", e);
            return Err(ContactError::InvalidBody);
        }
        Err(_) => None,
    };

    let body = match &bytes {
        Some(bytes) => InquiryBody::new(content_type, &bytes[..]),
        None => InquiryBody::oversized(content_type),
    };

    let response = state.contact_handler.submit(&client_key, body).await?;

    Ok(HttpResponse::Ok().json(response))
}

pub async fn method_not_allowed() -> HttpResponse {
    ContactError::MethodNotAllowed.error_response()
}
