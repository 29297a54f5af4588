//! # ユースケース層
//!
//! Config Service のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: 送信手段や設定の取得元は `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、ロジックはユースケースに集約

pub mod notification;

pub use notification::{
    ChannelOutcome,
    DispatchReport,
    NotificationService,
    NotificationSettings,
    TemplateRenderer,
};
