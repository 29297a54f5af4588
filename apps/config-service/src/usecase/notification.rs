//! # 通知ユースケース
//!
//! 通知リクエストのテンプレート解決・レンダリング・送信を統合する。
//!
//! ## モジュール構成
//!
//! - [`template_renderer`] - tera テンプレートエンジンによるメール/SMS 本文の生成
//! - [`service`] - 本番判定 + レンダリング + 並行送信の統合サービス

pub mod service;
pub mod template_renderer;

pub use service::{ChannelOutcome, DispatchReport, NotificationService, NotificationSettings};
pub use template_renderer::TemplateRenderer;
