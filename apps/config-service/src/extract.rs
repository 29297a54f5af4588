//! # リクエストボディの取り出し
//!
//! JSON のパース失敗と `validator` による検証失敗を、どちらも
//! [`ServiceError::Validation`] に揃える。
//!
//! ハンドラは `Result<Json<T>, JsonRejection>` を受け取り、
//! 先頭で [`extract_validated_json`] を呼ぶ。

use axum::{Json, extract::rejection::JsonRejection};
use countryconfig_shared::event_log::error::category;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::ServiceError;

/// JSON ボディを取り出して検証する
pub fn extract_validated_json<T: Validate>(
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, ServiceError> {
    let Json(value) = body.map_err(|rejection| {
        tracing::debug!(
            error.category = category::VALIDATION,
            "JSON ボディを解釈できません: {}",
            rejection.body_text()
        );
        ServiceError::Validation(rejection.body_text())
    })?;

    value
        .validate()
        .map_err(|errors| ServiceError::Validation(describe(&errors)))?;

    Ok(value)
}

/// 検証エラーを `path: message` 形式の 1 行にまとめる
fn describe(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect(errors, "", &mut messages);
    messages.sort();
    messages.join(", ")
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, entry) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match entry {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| error.code.to_string());
                    out.push(format!("{path}: {message}"));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}
