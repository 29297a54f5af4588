//! SMTP メール送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! 開発環境では Mailpit（ローカル SMTP サーバー）に接続する。

use async_trait::async_trait;
use countryconfig_domain::notification::{EmailMessage, NotificationError};
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Mailbox, Message, header::ContentType},
};

use super::EmailSender;

/// SMTP メール送信
///
/// 送信元アドレスはメッセージごとに指定する（`POST /email` は呼び出し元が決める）。
pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailSender {
    /// 新しい SMTP 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `host`: SMTP サーバーのホスト名（例: "localhost"）
    /// - `port`: SMTP サーバーのポート番号（例: 1025 for Mailpit）
    pub fn new(host: &str, port: u16) -> Self {
        // builder_dangerous: TLS なしで接続（Mailpit 等のローカル SMTP 向け）
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Self { transport }
    }
}

fn mailbox(address: &str, label: &str) -> Result<Mailbox, NotificationError> {
    address
        .parse()
        .map_err(|e| NotificationError::DeliveryFailed(format!("{label}アドレス不正: {e}")))
}

/// `EmailMessage` を lettre のメッセージに変換する
fn build_message(email: &EmailMessage) -> Result<Message, NotificationError> {
    let mut builder = Message::builder()
        .from(mailbox(&email.from, "送信元")?)
        .to(mailbox(&email.to, "宛先")?)
        .subject(&email.subject);

    for bcc in &email.bcc {
        builder = builder.bcc(mailbox(bcc, "BCC ")?);
    }

    builder
        .header(ContentType::TEXT_HTML)
        .body(email.html_body.clone())
        .map_err(|e| NotificationError::DeliveryFailed(format!("メッセージ構築失敗: {e}")))
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let message = build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::DeliveryFailed(format!("SMTP 送信失敗: {e}")))?;

        Ok(())
    }
}
