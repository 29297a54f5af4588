//! # サービス設定
//!
//! 環境変数から Config Service の設定を読み込む。
//!
//! 読み取りは [`ServiceConfig::from_lookup`] に集約し、テストでは環境変数を
//! 書き換えずにキーと値の組を渡して検証する。

use std::{env, time::Duration};

use thiserror::Error;

/// 設定読み込みのエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    #[error("{key} の値が不正です: {value}")]
    Invalid { key: &'static str, value: String },
}

/// 実行環境
///
/// `production` 以外では通知を実際には送信せず、ログに記録するだけにする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AppEnvironment {
    #[default]
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

/// メール送信バックエンド
///
/// - `smtp`: SMTP サーバー経由で送信
/// - `ses`: Amazon SES v2 経由で送信
/// - `noop`: 送信しない（ログ出力のみ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EmailBackend {
    Smtp,
    Ses,
    #[default]
    Noop,
}

/// Config Service の設定
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// バインドアドレス
    pub host:             String,
    /// ポート番号
    pub port:             u16,
    pub environment:      AppEnvironment,
    /// このサービスの公開 URL（フォント URL の起点）
    pub public_url:       String,
    /// アプリケーション表示名の上書き
    pub application_name: Option<String>,
    pub notification:     NotificationConfig,
    /// SMS ゲートウェイ設定（未設定なら SMS はログ出力のみ）
    pub sms_gateway:      Option<SmsGatewayConfig>,
}

/// 通知機能の設定
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub email_backend:    EmailBackend,
    /// SMTP ホスト（backend=smtp の場合に使用）
    pub smtp_host:        String,
    /// SMTP ポート（backend=smtp の場合に使用）
    pub smtp_port:        u16,
    /// 送信元メールアドレス
    pub sender_email:     String,
    /// メールに埋め込むロゴ画像の URL
    pub country_logo_url: String,
    /// メール内のログインリンク
    pub login_url:        String,
}

/// SMS ゲートウェイの接続設定
#[derive(Clone)]
pub struct SmsGatewayConfig {
    pub endpoint:          String,
    pub user_id:           String,
    pub password:          String,
    pub email:             String,
    /// 残り有効時間がこれを下回ったらトークンを更新する
    pub refresh_threshold: Duration,
    /// ゲートウェイへの HTTP リクエストのタイムアウト
    pub timeout:           Duration,
}

impl std::fmt::Debug for SmsGatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsGatewayConfig")
            .field("endpoint", &self.endpoint)
            .field("user_id", &self.user_id)
            .field("password", &"********")
            .field("email", &self.email)
            .field("refresh_threshold", &self.refresh_threshold)
            .field("timeout", &self.timeout)
            .finish()
    }
}

const DEFAULT_REFRESH_THRESHOLD_SECS: u64 = 60 * 60;
const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 10;

impl ServiceConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー参照関数から設定を読み込む
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&lookup);

        let public_url = vars.or("PUBLIC_URL", "http://localhost:3040");
        let notification = NotificationConfig {
            email_backend:    vars.parse_or("EMAIL_BACKEND", EmailBackend::default())?,
            smtp_host:        vars.or("SMTP_HOST", "localhost"),
            smtp_port:        vars.parse_or("SMTP_PORT", 1025)?,
            sender_email:     vars.or("SENDER_EMAIL_ADDRESS", "noreply@opencrvs.org"),
            country_logo_url: vars.or("COUNTRY_LOGO_URL", &format!("{public_url}/content/country-logo.png")),
            login_url:        vars.or("LOGIN_URL", "http://localhost:3020"),
        };

        let port = vars.required("PORT")?;
        let port = port.parse().map_err(|_| ConfigError::Invalid {
            key:   "PORT",
            value: port,
        })?;

        Ok(Self {
            host: vars.or("HOST", "0.0.0.0"),
            port,
            environment: vars.parse_or("APP_ENV", AppEnvironment::default())?,
            application_name: vars.get("APPLICATION_NAME"),
            sms_gateway: SmsGatewayConfig::from_vars(&vars)?,
            public_url,
            notification,
        })
    }
}

impl SmsGatewayConfig {
    /// `SMS_GATEWAY_ENDPOINT` が未設定なら `None`
    ///
    /// エンドポイントが設定されている場合、認証情報はすべて必須。
    fn from_vars(vars: &Vars<'_>) -> Result<Option<Self>, ConfigError> {
        let Some(endpoint) = vars.get("SMS_GATEWAY_ENDPOINT") else {
            return Ok(None);
        };

        Ok(Some(Self {
            endpoint,
            user_id: vars.required("SMS_USER_ID")?,
            password: vars.required("SMS_PASSWORD")?,
            email: vars.required("SMS_EMAIL")?,
            refresh_threshold: Duration::from_secs(
                vars.parse_or("SMS_TOKEN_REFRESH_THRESHOLD_SECS", DEFAULT_REFRESH_THRESHOLD_SECS)?,
            ),
            timeout: Duration::from_secs(
                vars.parse_or("SMS_GATEWAY_TIMEOUT_SECS", DEFAULT_GATEWAY_TIMEOUT_SECS)?,
            ),
        }))
    }
}

/// 空文字列を未設定として扱う参照ヘルパー
struct Vars<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Vars<'_> {
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::Missing(key))
    }

    fn parse_or<T: std::str::FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(key) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value }),
            None => Ok(default),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<ServiceConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn portだけで起動できデフォルト値が使われる() {
        let config = load(&[("PORT", "3040")]).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3040);
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.notification.email_backend, EmailBackend::Noop);
        assert_eq!(config.notification.smtp_port, 1025);
        assert_eq!(
            config.notification.country_logo_url,
            "http://localhost:3040/content/country-logo.png"
        );
        assert!(config.sms_gateway.is_none());
        assert!(config.application_name.is_none());
    }

    #[test]
    fn portがないとmissingエラー() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing("PORT"));
    }

    #[test]
    fn 数値でないportはinvalidエラー() {
        assert_eq!(
            load(&[("PORT", "http")]).unwrap_err(),
            ConfigError::Invalid {
                key:   "PORT",
                value: "http".to_string(),
            }
        );
    }

    #[rstest]
    #[case("production", AppEnvironment::Production)]
    #[case("PRODUCTION", AppEnvironment::Production)]
    #[case("development", AppEnvironment::Development)]
    #[case("test", AppEnvironment::Test)]
    fn app_envをパースできる(#[case] value: &str, #[case] expected: AppEnvironment) {
        let config = load(&[("PORT", "3040"), ("APP_ENV", value)]).unwrap();

        assert_eq!(config.environment, expected);
    }

    #[test]
    fn 未知のapp_envはinvalidエラー() {
        let result = load(&[("PORT", "3040"), ("APP_ENV", "staging")]);

        assert!(matches!(result, Err(ConfigError::Invalid { key: "APP_ENV", .. })));
    }

    #[rstest]
    #[case("smtp", EmailBackend::Smtp)]
    #[case("ses", EmailBackend::Ses)]
    #[case("noop", EmailBackend::Noop)]
    fn email_backendをパースできる(#[case] value: &str, #[case] expected: EmailBackend) {
        let config = load(&[("PORT", "3040"), ("EMAIL_BACKEND", value)]).unwrap();

        assert_eq!(config.notification.email_backend, expected);
    }

    #[test]
    fn ゲートウェイ設定は認証情報とともに読み込まれる() {
        let config = load(&[
            ("PORT", "3040"),
            ("SMS_GATEWAY_ENDPOINT", "https://sms.example.org/"),
            ("SMS_USER_ID", "crvs"),
            ("SMS_PASSWORD", "secret"),
            ("SMS_EMAIL", "crvs@example.org"),
            ("SMS_TOKEN_REFRESH_THRESHOLD_SECS", "600"),
        ])
        .unwrap();

        let gateway = config.sms_gateway.unwrap();
        assert_eq!(gateway.endpoint, "https://sms.example.org/");
        assert_eq!(gateway.refresh_threshold, Duration::from_secs(600));
        assert_eq!(gateway.timeout, Duration::from_secs(10));
        assert!(!format!("{gateway:?}").contains("secret"));
    }

    #[test]
    fn ゲートウェイのエンドポイントがあり認証情報が欠けるとmissingエラー() {
        let result = load(&[
            ("PORT", "3040"),
            ("SMS_GATEWAY_ENDPOINT", "https://sms.example.org/"),
            ("SMS_USER_ID", "crvs"),
        ]);

        assert_eq!(result.unwrap_err(), ConfigError::Missing("SMS_PASSWORD"));
    }

    #[test]
    fn 空文字列は未設定として扱う() {
        let config = load(&[("PORT", "3040"), ("APPLICATION_NAME", ""), ("SMS_GATEWAY_ENDPOINT", " ")])
            .unwrap();

        assert!(config.application_name.is_none());
        assert!(config.sms_gateway.is_none());
    }
}
