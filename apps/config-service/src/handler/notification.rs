//! # 通知 API ハンドラ
//!
//! コア登録プラットフォームから呼ばれる通知エンドポイントを実装する。
//!
//! いずれも処理（または本番以外での抑止）が完了すれば 200 を返す。
//! `/notification` はチャネルごとの送信失敗を呼び出し元に返さない。

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use countryconfig_domain::notification::{EmailPayload, NotificationRequest};

use crate::{error::ServiceError, extract::extract_validated_json, usecase::NotificationService};

/// 通知ハンドラーの State
pub struct NotificationState {
    pub service: Arc<NotificationService>,
}

/// 通知を送信する
///
/// ## エンドポイント
/// POST /notification
#[tracing::instrument(skip_all)]
pub async fn send_notification(
    State(state): State<Arc<NotificationState>>,
    body: Result<Json<NotificationRequest>, JsonRejection>,
) -> Result<StatusCode, ServiceError> {
    let request = extract_validated_json(body)?;

    let report = state.service.notify(&request).await?;
    tracing::debug!(
        email = ?report.email,
        sms = ?report.sms,
        "通知リクエストを処理しました"
    );

    Ok(StatusCode::OK)
}

/// レンダリング済みのメールを送信する
///
/// ## エンドポイント
/// POST /email
#[tracing::instrument(skip_all)]
pub async fn send_email(
    State(state): State<Arc<NotificationState>>,
    body: Result<Json<EmailPayload>, JsonRejection>,
) -> Result<StatusCode, ServiceError> {
    let payload = extract_validated_json(body)?;

    state.service.send_email(payload).await?;

    Ok(StatusCode::OK)
}
