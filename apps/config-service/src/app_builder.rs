//! # アプリケーション構築
//!
//! State を受け取ってルーターを組み立てる。
//! `main.rs` は設定読み込み・依存の初期化・サーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    extract::Request,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::handler::{
    ConfigState,
    NotificationState,
    get_application_config,
    get_certificate_configuration,
    health_check,
    send_email,
    send_notification,
};

/// ログに付与するサービス名
pub const SERVICE_NAME: &str = "config-service";

/// リクエストごとの span を作る
///
/// ハンドラはワーカースレッドで動くため、`service` はここで span に載せる。
pub fn make_request_span(request: &Request) -> Span {
    tracing::info_span!(
        "request",
        service = SERVICE_NAME,
        method = %request.method(),
        uri = %request.uri(),
    )
}

/// ルーターを構築する
pub fn build_app(notification_state: Arc<NotificationState>, config_state: Arc<ConfigState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // 通知 API
        .route("/notification", post(send_notification))
        .route("/email", post(send_email))
        .with_state(notification_state)
        // 設定 API
        .route("/application-config", get(get_application_config))
        .route("/certificate-configuration", get(get_certificate_configuration))
        .with_state(config_state)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    #[test]
    fn リクエストspanにサービス名とメソッドが載る() {
        let request = Request::builder()
            .method("POST")
            .uri("/notification")
            .body(Body::empty())
            .unwrap();

        tracing::subscriber::with_default(tracing_subscriber::registry(), || {
            let span = make_request_span(&request);
            let metadata = span.metadata().unwrap();

            assert_eq!(metadata.name(), "request");
            assert!(metadata.fields().field("service").is_some());
            assert!(metadata.fields().field("method").is_some());
            assert!(metadata.fields().field("uri").is_some());
        });
    }
}
