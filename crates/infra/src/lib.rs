//! # CountryConfig インフラ層
//!
//! 外部システムとの通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **メール送信**: SMTP / SES / Noop の 3 実装
//! - **SMS ゲートウェイ**: JWT の取得・更新・キャッシュと SMS 送信
//! - **アプリケーション設定**: 通知テンプレートに埋め込む表示名などの提供
//!
//! ## 依存関係
//!
//! ```text
//! service → infra → domain
//!              ↘
//!               shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`notification`] - メール/SMS 送信トレイトと実装
//! - [`sms_gateway`] - SMS ゲートウェイクライアントとトークンキャッシュ
//! - [`application_config`] - アプリケーション設定プロバイダ

pub mod application_config;
pub mod notification;
pub mod sms_gateway;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use application_config::{ApplicationConfigProvider, StaticApplicationConfigProvider};
pub use notification::{EmailSender, SmsSender};
