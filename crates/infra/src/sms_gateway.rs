//! # SMS ゲートウェイ
//!
//! JWT 認証付きの外部 SMS ゲートウェイとの通信を担当する。
//!
//! ## 構成
//!
//! ```text
//! GatewaySmsSender ──→ TokenProvider ──→ TokenCache
//!        │                  │
//!        └──────────────────┴──→ SmsGatewayClient（HTTP）
//! ```
//!
//! - [`client`] - トークン取得・更新・SMS 送信の HTTP 呼び出し
//! - [`token`] - トークンキャッシュと有効期限に基づく更新
//! - [`sender`] - [`SmsSender`](crate::notification::SmsSender) 実装
//!
//! ## エンドポイント
//!
//! - `POST v1/get-jwt-token` - 資格情報からトークンを取得
//! - `POST v1/refresh-jwt-token` - 既存トークンを更新
//! - `POST v1/send-sms` - SMS 送信（Bearer 認証）

pub mod client;
pub mod sender;
pub mod token;

pub use client::{GatewayCredentials, HttpSmsGatewayClient, SmsGatewayClient};
pub use sender::GatewaySmsSender;
pub use token::{CachedToken, TokenCache, TokenProvider};
use thiserror::Error;

/// SMS ゲートウェイとの通信エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// トークンの取得・更新が拒否された（2xx 以外）
    #[error("SMS ゲートウェイの認証に失敗しました（{status}）: {body}")]
    Auth { status: u16, body: String },

    /// SMS 送信が拒否された（2xx 以外）
    #[error("SMS ゲートウェイが送信を拒否しました（{status}）: {body}")]
    Rejected { status: u16, body: String },

    /// トークンから有効期限を読み取れない
    #[error("不正なトークン: {0}")]
    MalformedToken(String),

    /// ネットワークエラー（接続失敗、タイムアウト）
    #[error("ネットワークエラー: {0}")]
    Network(String),

    /// 設定・レスポンス形式の不備
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Unexpected(format!("レスポンスの解析に失敗: {err}"))
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}

impl GatewayError {
    /// 認証系のエラーかどうか
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. } | Self::Rejected { status: 401, .. })
    }
}
