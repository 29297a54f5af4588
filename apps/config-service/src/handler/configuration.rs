//! # 設定 API ハンドラ
//!
//! コア登録プラットフォームが起動時に読み込む国別設定を返す。

use std::sync::Arc;

use axum::{Json, extract::State};
use countryconfig_domain::{
    application::ApplicationConfig,
    certificate::CertificateConfiguration,
};
use countryconfig_infra::ApplicationConfigProvider;

/// 設定ハンドラーの State
pub struct ConfigState {
    pub application: Arc<dyn ApplicationConfigProvider>,
    pub certificate: CertificateConfiguration,
}

/// アプリケーション設定を取得する
///
/// ## エンドポイント
/// GET /application-config
pub async fn get_application_config(
    State(state): State<Arc<ConfigState>>,
) -> Json<ApplicationConfig> {
    Json(state.application.application_config().await)
}

/// 証明書設定（フォント）を取得する
///
/// ## エンドポイント
/// GET /certificate-configuration
pub async fn get_certificate_configuration(
    State(state): State<Arc<ConfigState>>,
) -> Json<CertificateConfiguration> {
    Json(state.certificate.clone())
}
