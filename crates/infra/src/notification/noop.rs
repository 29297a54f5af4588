//! Noop 通知送信実装
//!
//! 実際には送信せず、ログ出力のみ行う。
//! ゲートウェイやメールサーバーを用意しない環境で使用する。

use async_trait::async_trait;
use countryconfig_domain::notification::{EmailMessage, NotificationError, SmsMessage};

use super::{EmailSender, SmsSender};

/// Noop メール送信（ログ出力のみ）
#[derive(Debug, Clone, Default)]
pub struct NoopEmailSender;

#[async_trait]
impl EmailSender for NoopEmailSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        tracing::info!(
            to = %email.to,
            bcc = email.bcc.len(),
            subject = %email.subject,
            "Noop: メール送信をスキップ"
        );
        Ok(())
    }
}

/// Noop SMS 送信（ログ出力のみ）
#[derive(Debug, Clone, Default)]
pub struct NoopSmsSender;

#[async_trait]
impl SmsSender for NoopSmsSender {
    async fn send_sms(&self, sms: &SmsMessage) -> Result<(), NotificationError> {
        tracing::info!(
            recipient = %sms.recipient,
            locale = %sms.locale,
            unicode = sms.unicode,
            "Noop: SMS 送信をスキップ"
        );
        Ok(())
    }
}
