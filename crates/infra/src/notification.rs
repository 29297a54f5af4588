//! # 通知送信
//!
//! メール/SMS の送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `EmailSender` / `SmsSender` で送信手段を抽象化
//! - **メールは 3 実装**: SMTP（開発・オンプレ）、SES（クラウド本番）、Noop（ログのみ）
//! - **SMS はゲートウェイ経由**: [`GatewaySmsSender`](crate::sms_gateway::GatewaySmsSender) が JWT 認証付きで送信
//! - **環境変数切替**: `EMAIL_BACKEND` でランタイム選択

mod noop;
mod ses;
mod smtp;

use async_trait::async_trait;
use countryconfig_domain::notification::{EmailMessage, NotificationError, SmsMessage};
pub use noop::{NoopEmailSender, NoopSmsSender};
pub use ses::SesEmailSender;
pub use smtp::SmtpEmailSender;

/// メール送信トレイト
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// メールを送信する
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;
}

/// SMS 送信トレイト
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// レンダリング済みの SMS を送信する
    async fn send_sms(&self, sms: &SmsMessage) -> Result<(), NotificationError>;
}
