mod common;

use std::time::Duration;

use actix_web::{http::StatusCode, test};
use common::*;
use serde_json::{json, Value};

#[actix_rt::test]
async fn valid_inquiry_is_mailed_once() {
    let mailer = RecordingMailer::default();
    let app = spawn_app(TestSetup { mailer: Some(mailer.clone()), ..Default::default() }).await;

    let res = test::call_service(&app, post_contact("203.0.113.1", valid_inquiry()).to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({"ok": true}));

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "[Contact] Nouveau message");
    assert_eq!(sent[0].to, RECIPIENT);
    assert_eq!(sent[0].from, RECIPIENT);
    assert_eq!(sent[0].text_body, "Name: Jane\nEmail: jane@x.com\n\nHello");
}

#[actix_rt::test]
async fn form_encoded_inquiry_is_accepted() {
    let mailer = RecordingMailer::default();
    let app = spawn_app(TestSetup { mailer: Some(mailer.clone()), ..Default::default() }).await;

    let req = test::TestRequest::post()
        .uri("/api/contact")
        .insert_header(("content-type", "application/x-www-form-urlencoded"))
        .set_payload("name=Jane&email=jane%40x.com&subject=Devis&message=Bonjour")
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(mailer.sent()[0].subject, "[Contact] Devis");
}

#[actix_rt::test]
async fn sixth_request_in_window_is_throttled() {
    let app = spawn_app(TestSetup::default()).await;

    for attempt in 1..=5 {
        let res = test::call_service(&app, post_contact("198.51.100.9", valid_inquiry()).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK, "attempt {attempt}");
    }

    let res = test::call_service(&app, post_contact("198.51.100.9", valid_inquiry()).to_request()).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "Too many requests");

    let res = test::call_service(&app, post_contact("198.51.100.10", valid_inquiry()).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn quota_resets_after_window() {
    let app = spawn_app(TestSetup { window: Duration::from_millis(300), ..Default::default() }).await;

    for _ in 0..5 {
        test::call_service(&app, post_contact("192.0.2.4", valid_inquiry()).to_request()).await;
    }
    let res = test::call_service(&app, post_contact("192.0.2.4", valid_inquiry()).to_request()).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);

    actix_rt::time::sleep(Duration::from_millis(400)).await;

    let res = test::call_service(&app, post_contact("192.0.2.4", valid_inquiry()).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn honeypot_consumes_quota_and_is_rejected() {
    let mailer = RecordingMailer::default();
    let app = spawn_app(TestSetup { mailer: Some(mailer.clone()), ..Default::default() }).await;
    let mut spam = valid_inquiry();
    spam["_hp"] = json!("https://cheap-pills.example");

    for _ in 0..5 {
        let res = test::call_service(&app, post_contact("192.0.2.50", spam.clone()).to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Spam detected");
    }

    let res = test::call_service(&app, post_contact("192.0.2.50", valid_inquiry()).to_request()).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(mailer.sent().is_empty());
}

#[actix_rt::test]
async fn non_string_honeypot_is_spam() {
    let mailer = RecordingMailer::default();
    let app = spawn_app(TestSetup { mailer: Some(mailer.clone()), ..Default::default() }).await;

    for trap in [json!(1), json!(true), json!(["x"]), json!({"a": 1})] {
        let mut spam = valid_inquiry();
        spam["_hp"] = trap.clone();

        let res = test::call_service(&app, post_contact("192.0.2.51", spam).to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{trap}");
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Spam detected");
    }
    assert!(mailer.sent().is_empty());

    let mut clean = valid_inquiry();
    clean["_hp"] = json!(0);
    let res = test::call_service(&app, post_contact("192.0.2.52", clean).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn missing_fields_are_always_400() {
    let app = spawn_app(TestSetup::default()).await;

    for body in [
        json!({"email": "jane@x.com", "message": "Hello"}),
        json!({"name": "Jane", "message": "Hello"}),
        json!({"name": "Jane", "email": "jane@x.com"}),
        json!({"name": "Jane", "email": "jane@x.com", "message": ""}),
    ] {
        let res = test::call_service(&app, post_contact("192.0.2.60", body.clone()).to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{body}");
        let payload: Value = test::read_body_json(res).await;
        assert_eq!(payload["error"], "Missing required fields");
    }
}

#[actix_rt::test]
async fn empty_body_reports_missing_fields() {
    let app = spawn_app(TestSetup::default()).await;

    let req = test::TestRequest::post().uri("/api/contact").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload: Value = test::read_body_json(res).await;
    assert_eq!(payload["error"], "Missing required fields");
}

#[actix_rt::test]
async fn malformed_json_is_invalid_body() {
    let app = spawn_app(TestSetup::default()).await;

    let req = test::TestRequest::post()
        .uri("/api/contact")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"name\": ")
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload: Value = test::read_body_json(res).await;
    assert_eq!(payload["error"], "Invalid request body");
}

#[actix_rt::test]
async fn null_body_reports_missing_fields() {
    let app = spawn_app(TestSetup::default()).await;

    for raw in ["null", "[]", "\"hello\"", "42"] {
        let req = test::TestRequest::post()
            .uri("/api/contact")
            .insert_header(("content-type", "application/json"))
            .set_payload(raw)
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{raw}");
        let payload: Value = test::read_body_json(res).await;
        assert_eq!(payload["error"], "Missing required fields");
    }
}

#[actix_rt::test]
async fn oversized_body_is_json_413_and_consumes_quota() {
    let mailer = RecordingMailer::default();
    let app = spawn_app(TestSetup { mailer: Some(mailer.clone()), ..Default::default() }).await;
    let mut huge = valid_inquiry();
    huge["message"] = json!("a".repeat(70 * 1024));

    for attempt in 1..=5 {
        let res = test::call_service(&app, post_contact("192.0.2.70", huge.clone()).to_request()).await;
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE, "attempt {attempt}");
        assert_eq!(res.headers().get("content-type").unwrap(), "application/json");
        let payload: Value = test::read_body_json(res).await;
        assert_eq!(payload, json!({"error": "Payload too large"}));
    }

    let res = test::call_service(&app, post_contact("192.0.2.70", valid_inquiry()).to_request()).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(mailer.sent().is_empty());
}

#[actix_rt::test]
async fn other_methods_get_405() {
    let app = spawn_app(TestSetup::default()).await;

    for req in [
        test::TestRequest::get().uri("/api/contact").to_request(),
        test::TestRequest::put().uri("/api/contact").to_request(),
        test::TestRequest::delete().uri("/api/contact").to_request(),
    ] {
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        let payload: Value = test::read_body_json(res).await;
        assert_eq!(payload, json!({"error": "Method not allowed"}));
    }
}

#[actix_rt::test]
async fn rejected_captcha_is_400() {
    let captcha = FakeCaptcha::answering(false, None);
    let mailer = RecordingMailer::default();
    let app = spawn_app(TestSetup {
        captcha: Some(captcha.clone()),
        mailer: Some(mailer.clone()),
        ..Default::default()
    })
    .await;
    let mut body = valid_inquiry();
    body["token"] = json!("03AFcWeA");

    let res = test::call_service(&app, post_contact("192.0.2.70", body).to_request()).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload: Value = test::read_body_json(res).await;
    assert_eq!(payload["error"], "Failed captcha verification");
    assert_eq!(*captcha.calls.lock().unwrap(), vec!["03AFcWeA".to_string()]);
    assert!(mailer.sent().is_empty());
}

#[actix_rt::test]
async fn captcha_score_threshold_applies() {
    let mut body = valid_inquiry();
    body["token"] = json!("tok");

    let app = spawn_app(TestSetup {
        captcha: Some(FakeCaptcha::answering(true, Some(0.3))),
        ..Default::default()
    })
    .await;
    let res = test::call_service(&app, post_contact("192.0.2.71", body.clone()).to_request()).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let app = spawn_app(TestSetup {
        captcha: Some(FakeCaptcha::answering(true, Some(0.9))),
        ..Default::default()
    })
    .await;
    let res = test::call_service(&app, post_contact("192.0.2.71", body).to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn captcha_outage_is_500() {
    let app = spawn_app(TestSetup {
        captcha: Some(FakeCaptcha::unreachable()),
        ..Default::default()
    })
    .await;
    let mut body = valid_inquiry();
    body["token"] = json!("tok");

    let res = test::call_service(&app, post_contact("192.0.2.72", body).to_request()).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload: Value = test::read_body_json(res).await;
    assert_eq!(payload["error"], "Captcha verification failed");
}

#[actix_rt::test]
async fn captcha_is_skipped_without_token() {
    let captcha = FakeCaptcha::answering(false, None);
    let app = spawn_app(TestSetup { captcha: Some(captcha.clone()), ..Default::default() }).await;

    let res = test::call_service(&app, post_contact("192.0.2.73", valid_inquiry()).to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(captcha.calls.lock().unwrap().is_empty());
}

#[actix_rt::test]
async fn missing_mail_config_is_500_without_dispatch() {
    let mailer = RecordingMailer::default();
    let app = spawn_app(TestSetup {
        mailer: Some(mailer.clone()),
        recipient: None,
        ..Default::default()
    })
    .await;

    let res = test::call_service(&app, post_contact("192.0.2.80", valid_inquiry()).to_request()).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload: Value = test::read_body_json(res).await;
    assert_eq!(payload["error"], "Email service not configured");
    assert!(mailer.sent().is_empty());

    let app = spawn_app(TestSetup { mailer: None, ..Default::default() }).await;
    let res = test::call_service(&app, post_contact("192.0.2.80", valid_inquiry()).to_request()).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_rt::test]
async fn provider_failure_is_generic_500() {
    let app = spawn_app(TestSetup { mailer: Some(RecordingMailer::failing()), ..Default::default() }).await;

    let res = test::call_service(&app, post_contact("192.0.2.90", valid_inquiry()).to_request()).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload: Value = test::read_body_json(res).await;
    assert_eq!(payload, json!({"error": "Failed to send email"}));
}

#[actix_rt::test]
async fn health_reports_configuration() {
    let app = spawn_app(TestSetup::default()).await;
    test::call_service(&app, post_contact("192.0.2.100", valid_inquiry()).to_request()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["captcha_enabled"], false);
    assert_eq!(body["mail_configured"], true);
    assert_eq!(body["tracked_clients"], 1);
}
