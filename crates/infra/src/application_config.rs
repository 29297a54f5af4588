//! # アプリケーション設定プロバイダ
//!
//! 通知テンプレートへ埋め込むアプリケーション表示名などを提供する。
//! 現状は起動時に確定する静的な設定のみ。

use async_trait::async_trait;
use countryconfig_domain::application::ApplicationConfig;

/// アプリケーション設定の取得元
#[async_trait]
pub trait ApplicationConfigProvider: Send + Sync {
    async fn application_config(&self) -> ApplicationConfig;
}

/// 起動時に与えた設定をそのまま返すプロバイダ
#[derive(Debug, Clone)]
pub struct StaticApplicationConfigProvider {
    config: ApplicationConfig,
}

impl StaticApplicationConfigProvider {
    pub fn new(config: ApplicationConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ApplicationConfigProvider for StaticApplicationConfigProvider {
    async fn application_config(&self) -> ApplicationConfig {
        self.config.clone()
    }
}
