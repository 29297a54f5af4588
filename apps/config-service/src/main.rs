//! # Config Service サーバー
//!
//! コア登録プラットフォームに国別設定と通知の配信を提供するサービス。
//!
//! ## 役割
//!
//! - **通知**: メール/SMS テンプレートのレンダリングと送信（本番環境のみ）
//! - **設定配信**: アプリケーション設定と証明書フォントの提供
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `PORT` | **Yes** | ポート番号 |
//! | `APP_ENV` | No | `production` の場合のみ通知を送信（デフォルト: `development`） |
//! | `EMAIL_BACKEND` | No | `smtp` / `ses` / `noop`（デフォルト: `noop`） |
//! | `SMS_GATEWAY_ENDPOINT` | No | 未設定なら SMS はログ出力のみ |
//! | `LOG_FORMAT` | No | `json` / `pretty`（デフォルト: `pretty`） |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! PORT=3040 cargo run -p countryconfig-service
//!
//! # 本番環境
//! PORT=3040 APP_ENV=production EMAIL_BACKEND=ses cargo run -p countryconfig-service --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use countryconfig_domain::{
    application::{ApplicationConfig, CountryLogo},
    certificate::CertificateConfiguration,
    clock::SystemClock,
};
use countryconfig_infra::{
    ApplicationConfigProvider,
    EmailSender,
    SmsSender,
    StaticApplicationConfigProvider,
    notification::{NoopEmailSender, NoopSmsSender, SesEmailSender, SmtpEmailSender},
    sms_gateway::{
        GatewayCredentials,
        GatewaySmsSender,
        HttpSmsGatewayClient,
        SmsGatewayClient,
        TokenCache,
        TokenProvider,
    },
};
use countryconfig_service::{
    app_builder::{SERVICE_NAME, build_app},
    config::{EmailBackend, NotificationConfig, ServiceConfig, SmsGatewayConfig},
    handler::{ConfigState, NotificationState},
    usecase::{NotificationService, NotificationSettings, TemplateRenderer},
};
use countryconfig_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let _span = init_tracing(&TracingConfig::from_env(SERVICE_NAME));

    let config = ServiceConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        environment = %config.environment,
        "Config Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    let email_sender = build_email_sender(&config.notification).await;
    let sms_sender = build_sms_sender(config.sms_gateway.as_ref())?;

    let mut application = ApplicationConfig::default().with_country_logo(CountryLogo::from_url(
        config.notification.country_logo_url.as_str(),
    ));
    if let Some(name) = &config.application_name {
        application = application.with_application_name(name);
    }
    let application: Arc<dyn ApplicationConfigProvider> =
        Arc::new(StaticApplicationConfigProvider::new(application));

    let renderer = TemplateRenderer::new().context("テンプレートの読み込みに失敗しました")?;
    let service = NotificationService::new(
        email_sender,
        sms_sender,
        renderer,
        application.clone(),
        NotificationSettings {
            environment:      config.environment,
            sender_email:     config.notification.sender_email.clone(),
            country_logo_url: config.notification.country_logo_url.clone(),
            login_url:        config.notification.login_url.clone(),
        },
    );

    let notification_state = Arc::new(NotificationState {
        service: Arc::new(service),
    });
    let config_state = Arc::new(ConfigState {
        application,
        certificate: CertificateConfiguration::new(&config.public_url),
    });

    let app = build_app(notification_state, config_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("バインドアドレスが不正です")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Config Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// `EMAIL_BACKEND` に応じたメール送信実装を作る
async fn build_email_sender(config: &NotificationConfig) -> Arc<dyn EmailSender> {
    match config.email_backend {
        EmailBackend::Smtp => {
            tracing::info!(
                "メール送信: SMTP ({}:{})",
                config.smtp_host,
                config.smtp_port
            );
            Arc::new(SmtpEmailSender::new(&config.smtp_host, config.smtp_port))
        }
        EmailBackend::Ses => {
            tracing::info!("メール送信: Amazon SES");
            Arc::new(SesEmailSender::from_env().await)
        }
        EmailBackend::Noop => {
            tracing::info!("メール送信: Noop（ログ出力のみ）");
            Arc::new(NoopEmailSender)
        }
    }
}

/// SMS ゲートウェイ設定があればゲートウェイ経由の送信実装を作る
fn build_sms_sender(config: Option<&SmsGatewayConfig>) -> anyhow::Result<Arc<dyn SmsSender>> {
    let Some(config) = config else {
        tracing::info!("SMS 送信: Noop（SMS_GATEWAY_ENDPOINT 未設定）");
        return Ok(Arc::new(NoopSmsSender));
    };

    let credentials = GatewayCredentials {
        user_id:  config.user_id.clone(),
        password: config.password.clone(),
        email:    config.email.clone(),
    };
    let client: Arc<dyn SmsGatewayClient> = Arc::new(
        HttpSmsGatewayClient::new(&config.endpoint, credentials, config.timeout)
            .context("SMS ゲートウェイクライアントの初期化に失敗しました")?,
    );
    let threshold = chrono::Duration::from_std(config.refresh_threshold)
        .context("トークン更新の閾値が大きすぎます")?;
    let tokens = Arc::new(TokenProvider::new(
        client.clone(),
        Arc::new(TokenCache::new()),
        Arc::new(SystemClock),
        threshold,
    ));

    tracing::info!("SMS 送信: ゲートウェイ ({})", config.endpoint);
    Ok(Arc::new(GatewaySmsSender::new(client, tokens)))
}
