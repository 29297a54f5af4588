//! # HTTP API の統合テスト
//!
//! ルーターを組み立て、`oneshot` でリクエストを流して検証する。
//! 送信手段はインメモリモックに差し替える。

use std::sync::Arc;

use axum::{Router, body::Body};
use countryconfig_domain::{
    application::{ApplicationConfig, CountryLogo},
    certificate::CertificateConfiguration,
};
use countryconfig_infra::{
    StaticApplicationConfigProvider,
    mock::{MockEmailSender, MockSmsSender},
};
use countryconfig_service::{
    app_builder::build_app,
    config::AppEnvironment,
    handler::{ConfigState, NotificationState},
    usecase::{NotificationService, NotificationSettings, TemplateRenderer},
};
use http::{Request, StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    email:  MockEmailSender,
    sms:    MockSmsSender,
}

fn test_app(environment: AppEnvironment, email: MockEmailSender, sms: MockSmsSender) -> TestApp {
    let application = Arc::new(StaticApplicationConfigProvider::new(
        ApplicationConfig::default()
            .with_application_name("Farajaland CRVS")
            .with_country_logo(CountryLogo::from_url(
                "https://countryconfig.example.org/content/country-logo.png",
            )),
    ));
    let service = NotificationService::new(
        Arc::new(email.clone()),
        Arc::new(sms.clone()),
        TemplateRenderer::new().unwrap(),
        application.clone(),
        NotificationSettings {
            environment,
            sender_email: "noreply@farajaland.example.org".to_string(),
            country_logo_url: "https://countryconfig.example.org/content/country-logo.png"
                .to_string(),
            login_url: "https://login.example.org".to_string(),
        },
    );

    let router = build_app(
        Arc::new(NotificationState {
            service: Arc::new(service),
        }),
        Arc::new(ConfigState {
            application,
            certificate: CertificateConfiguration::new("https://countryconfig.example.org"),
        }),
    );

    TestApp { router, email, sms }
}

fn production() -> TestApp {
    test_app(AppEnvironment::Production, MockEmailSender::new(), MockSmsSender::new())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn notification(recipient: Value) -> Value {
    json!({
        "templateName": { "email": "birth-registration", "sms": "birth-registration" },
        "recipient": recipient,
        "type": "informant",
        "locale": "en",
        "variables": {
            "informantName": "Amina Kamara",
            "name": "Baby Kamara",
            "registrationNumber": "2024BRN0001"
        }
    })
}

#[tokio::test]
async fn test_本番以外では200を返しどこにも送信しない() {
    let app = test_app(
        AppEnvironment::Development,
        MockEmailSender::new(),
        MockSmsSender::new(),
    );

    let response = app
        .router
        .oneshot(post_json(
            "/notification",
            notification(json!({ "email": "informant@example.org", "sms": "+256700000000" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.email.sent_emails().is_empty());
    assert!(app.sms.sent_sms().is_empty());
}

#[tokio::test]
async fn test_メール宛先だけならメールだけを1回送信する() {
    let app = production();

    let response = app
        .router
        .oneshot(post_json(
            "/notification",
            notification(json!({ "email": "informant@example.org" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let sent = app.email.sent_emails();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Birth registered");
    assert!(sent[0].html_body.contains("Baby Kamara"));
    assert!(app.sms.sent_sms().is_empty());
}

#[tokio::test]
async fn test_片方のチャネルが失敗しても200を返しもう片方は送信される() {
    let app = test_app(
        AppEnvironment::Production,
        MockEmailSender::new(),
        MockSmsSender::failing(),
    );

    let response = app
        .router
        .oneshot(post_json(
            "/notification",
            notification(json!({ "email": "informant@example.org", "sms": "+256700000000" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.email.sent_emails().len(), 1);
    assert_eq!(app.sms.sent_sms().len(), 1);
}

#[tokio::test]
async fn test_template_name_smsがないと400でどこにも送信しない() {
    let app = production();
    let mut body = notification(json!({ "email": "informant@example.org" }));
    body["templateName"] = json!({ "email": "birth-registration" });

    let response = app
        .router
        .oneshot(post_json("/notification", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["type"],
        "https://countryconfig.example.org/errors/validation-error"
    );
    assert!(app.email.sent_emails().is_empty());
}

#[tokio::test]
async fn test_typeが不正だと400() {
    let app = production();
    let mut body = notification(json!({ "email": "informant@example.org" }));
    body["type"] = json!("registrar");

    let response = app
        .router
        .oneshot(post_json("/notification", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.email.sent_emails().is_empty());
}

#[tokio::test]
async fn test_空のテンプレート名は400() {
    let app = production();
    let mut body = notification(json!({ "email": "informant@example.org" }));
    body["templateName"]["email"] = json!("");

    let response = app
        .router
        .oneshot(post_json("/notification", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let detail = json["detail"].as_str().unwrap();
    assert!(detail.contains("templateName.email は必須です"), "{detail}");
}

#[tokio::test]
async fn test_未知のメールテンプレートは404() {
    let app = production();
    let mut body = notification(json!({ "email": "informant@example.org" }));
    body["templateName"]["email"] = json!("marriage-registration");

    let response = app
        .router
        .oneshot(post_json("/notification", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(
        json["type"],
        "https://countryconfig.example.org/errors/template-not-found"
    );
    assert!(app.email.sent_emails().is_empty());
}

#[tokio::test]
async fn test_emailエンドポイントは本番で送信し200() {
    let app = production();

    let response = app
        .router
        .oneshot(post_json(
            "/email",
            json!({
                "subject": "Certificate ready",
                "html": "<p>Your certificate is ready.</p>",
                "from": "noreply@farajaland.example.org",
                "to": "informant@example.org"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.email.sent_emails().len(), 1);
}

#[tokio::test]
async fn test_emailエンドポイントの送信失敗は502() {
    let app = test_app(
        AppEnvironment::Production,
        MockEmailSender::failing(),
        MockSmsSender::new(),
    );

    let response = app
        .router
        .oneshot(post_json(
            "/email",
            json!({
                "subject": "Certificate ready",
                "html": "<p>Your certificate is ready.</p>",
                "from": "noreply@farajaland.example.org",
                "to": "informant@example.org"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_emailエンドポイントでtoがないと400() {
    let app = production();

    let response = app
        .router
        .oneshot(post_json(
            "/email",
            json!({
                "subject": "Certificate ready",
                "html": "<p>Your certificate is ready.</p>",
                "from": "noreply@farajaland.example.org"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.email.sent_emails().is_empty());
}

#[tokio::test]
async fn test_application_configはアプリケーション名とロゴを返す() {
    let app = production();

    let response = app.router.oneshot(get("/application-config")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["APPLICATION_NAME"], "Farajaland CRVS");
    assert_eq!(
        json["COUNTRY_LOGO"]["file"],
        "https://countryconfig.example.org/content/country-logo.png"
    );
    assert_eq!(json["COUNTRY_LOGO"]["fileName"], "country-logo.png");
}

#[tokio::test]
async fn test_certificate_configurationは公開urlを起点にしたフォントurlを返す() {
    let app = production();

    let response = app
        .router
        .oneshot(get("/certificate-configuration"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json["fonts"]["Merriweather"]["normal"],
        "https://countryconfig.example.org/fonts/Merriweather-Regular.ttf"
    );
}

#[tokio::test]
async fn test_healthはhealthyを返す() {
    let app = production();

    let response = app.router.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
}
