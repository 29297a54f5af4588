//! # Config Service エラー定義
//!
//! サービス固有のエラーと、HTTP レスポンス（RFC 9457）への変換を定義する。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use countryconfig_domain::notification::NotificationError;
use countryconfig_shared::{
    ErrorResponse,
    event_log::error::{category, kind},
};
use thiserror::Error;

/// Config Service で発生するエラー
#[derive(Debug, Error)]
pub enum ServiceError {
    /// リクエストボディの形式・値が不正
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// 通知処理のエラー
    #[error(transparent)]
    Notification(#[from] NotificationError),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = match self {
            ServiceError::Validation(detail) => ErrorResponse::validation_error(detail),
            ServiceError::Notification(NotificationError::TemplateNotFound(name)) => {
                ErrorResponse::new(
                    "template-not-found",
                    "Template Not Found",
                    404,
                    format!("テンプレートが見つかりません: {name}"),
                )
            }
            ServiceError::Notification(NotificationError::DeliveryFailed(reason)) => {
                tracing::warn!(
                    error.category = category::EXTERNAL_SERVICE,
                    error.kind = kind::DELIVERY,
                    "メール送信に失敗: {}",
                    reason
                );
                ErrorResponse::bad_gateway("メールの送信に失敗しました")
            }
            ServiceError::Notification(NotificationError::TemplateFailed(reason)) => {
                tracing::error!(
                    error.category = category::EXTERNAL_SERVICE,
                    error.kind = kind::TEMPLATE,
                    "テンプレートレンダリングに失敗: {}",
                    reason
                );
                ErrorResponse::internal_error()
            }
        };

        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(ServiceError::Validation("type は必須です".to_string()), StatusCode::BAD_REQUEST)]
    #[case(
        NotificationError::TemplateNotFound("unknown".to_string()).into(),
        StatusCode::NOT_FOUND
    )]
    #[case(
        NotificationError::TemplateFailed("parse error".to_string()).into(),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    #[case(
        NotificationError::DeliveryFailed("smtp down".to_string()).into(),
        StatusCode::BAD_GATEWAY
    )]
    fn エラーが対応するステータスに変換される(
        #[case] error: ServiceError,
        #[case] expected: StatusCode,
    ) {
        let response = error.into_response();

        assert_eq!(response.status(), expected);
    }
}
