//! # テスト用モック
//!
//! ユースケーステストで使用するインメモリモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! countryconfig-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use countryconfig_domain::notification::{EmailMessage, NotificationError, SmsMessage};
use jsonwebtoken::{EncodingKey, Header};
use serde::Serialize;

use crate::{
    notification::{EmailSender, SmsSender},
    sms_gateway::{GatewayError, SmsGatewayClient},
};

/// 指定した `exp`（UNIX 秒）を持つ HS256 の JWT を作る
pub fn make_jwt(subject: &str, exp: i64) -> String {
    #[derive(Serialize)]
    struct Claims<'a> {
        sub: &'a str,
        exp: i64,
    }

    jsonwebtoken::encode(
        &Header::default(),
        &Claims { sub: subject, exp },
        &EncodingKey::from_secret(b"test-secret"),
    )
    .expect("テスト用 JWT の生成に失敗")
}

// ===== MockEmailSender =====

/// 送信したメールを記録するモック
///
/// [`failing`](MockEmailSender::failing) で常に失敗するインスタンスを作れる。
#[derive(Clone, Default)]
pub struct MockEmailSender {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    fail: bool,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// 送信を試みたメール（失敗したものも含む）
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(email.clone());
        if self.fail {
            return Err(NotificationError::DeliveryFailed(
                "mock: SMTP connection refused".to_string(),
            ));
        }
        Ok(())
    }
}

// ===== MockSmsSender =====

/// 送信した SMS を記録するモック
#[derive(Clone, Default)]
pub struct MockSmsSender {
    sent: Arc<Mutex<Vec<SmsMessage>>>,
    fail: bool,
}

impl MockSmsSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// 送信を試みた SMS（失敗したものも含む）
    pub fn sent_sms(&self) -> Vec<SmsMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SmsSender for MockSmsSender {
    async fn send_sms(&self, sms: &SmsMessage) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(sms.clone());
        if self.fail {
            return Err(NotificationError::DeliveryFailed(
                "mock: gateway unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

// ===== MockSmsGatewayClient =====

#[derive(Default)]
struct GatewayState {
    acquire_results: VecDeque<Result<String, GatewayError>>,
    refresh_results: VecDeque<Result<String, GatewayError>>,
    send_results:    VecDeque<Result<(), GatewayError>>,
    acquire_calls:   usize,
    refreshed:       Vec<String>,
    sent:            Vec<(String, SmsMessage)>,
}

/// 応答を事前に積んでおくゲートウェイクライアントのモック
///
/// 積まれた応答がない状態で取得・更新が呼ばれると `Unexpected` を返す。
/// 送信は応答がなければ成功とする。
#[derive(Clone, Default)]
pub struct MockSmsGatewayClient {
    state: Arc<Mutex<GatewayState>>,
    delay: Option<Duration>,
}

impl MockSmsGatewayClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 各呼び出しに遅延を入れる（同時実行のテスト用）
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_acquire(&self, result: Result<String, GatewayError>) {
        self.state.lock().unwrap().acquire_results.push_back(result);
    }

    pub fn push_refresh(&self, result: Result<String, GatewayError>) {
        self.state.lock().unwrap().refresh_results.push_back(result);
    }

    pub fn push_send(&self, result: Result<(), GatewayError>) {
        self.state.lock().unwrap().send_results.push_back(result);
    }

    pub fn acquire_calls(&self) -> usize {
        self.state.lock().unwrap().acquire_calls
    }

    pub fn refresh_calls(&self) -> usize {
        self.state.lock().unwrap().refreshed.len()
    }

    /// 更新呼び出しで渡されたトークン
    pub fn refreshed_tokens(&self) -> Vec<String> {
        self.state.lock().unwrap().refreshed.clone()
    }

    /// 送信呼び出し（トークン, メッセージ）
    pub fn sent_sms(&self) -> Vec<(String, SmsMessage)> {
        self.state.lock().unwrap().sent.clone()
    }

    async fn wait(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn exhausted(operation: &str) -> GatewayError {
    GatewayError::Unexpected(format!("mock: {operation} の応答が設定されていません"))
}

#[async_trait]
impl SmsGatewayClient for MockSmsGatewayClient {
    async fn acquire_token(&self) -> Result<String, GatewayError> {
        self.wait().await;
        let mut state = self.state.lock().unwrap();
        state.acquire_calls += 1;
        state
            .acquire_results
            .pop_front()
            .unwrap_or_else(|| Err(exhausted("acquire_token")))
    }

    async fn refresh_token(&self, token: &str) -> Result<String, GatewayError> {
        self.wait().await;
        let mut state = self.state.lock().unwrap();
        state.refreshed.push(token.to_string());
        state
            .refresh_results
            .pop_front()
            .unwrap_or_else(|| Err(exhausted("refresh_token")))
    }

    async fn send_sms(&self, token: &str, sms: &SmsMessage) -> Result<(), GatewayError> {
        self.wait().await;
        let mut state = self.state.lock().unwrap();
        state.sent.push((token.to_string(), sms.clone()));
        state.send_results.pop_front().unwrap_or(Ok(()))
    }
}
