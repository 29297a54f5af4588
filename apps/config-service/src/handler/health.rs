//! # ヘルスチェックハンドラ
//!
//! ```text
//! GET /health
//! ```
//!
//! レスポンス型は [`countryconfig_shared::HealthResponse`] を参照。

use axum::Json;
use countryconfig_shared::HealthResponse;

/// ヘルスチェックエンドポイント
///
/// サーバーが稼働していれば常に `"healthy"` を返す。
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}
