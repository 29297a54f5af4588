//! # CountryConfig ドメイン層
//!
//! 国別設定サービスのドメインモデルを定義する。
//!
//! ## モジュール構成
//!
//! - [`notification`] - 通知リクエスト、メール/SMS メッセージ、通知エラー
//! - [`template`] - 通知テンプレートのカタログ（名前、種別、件名）
//! - [`application`] - アプリケーション設定（表示名、登録目標、手数料など）
//! - [`certificate`] - 証明書フォント設定
//! - [`clock`] - 時刻プロバイダ
//!
//! ## 依存関係
//!
//! ドメイン層はインフラ層・HTTP 層に依存しない。

pub mod application;
pub mod certificate;
pub mod clock;
pub mod notification;
pub mod template;
