//! # ビジネスイベントログとエラーコンテキストの構造化ヘルパー
//!
//! `jq` で効率的に調査できるよう、ログフィールドの命名規約とヘルパーマクロを提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"` マーカーが
//! 自動付与され、`jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! ## フィールド命名規約
//!
//! ドット記法（`event.category`、`error.kind`）を使用。tracing の
//! `$($field:ident).+` パターンでサポートされ、JSON 出力でフラットなキーになる。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、
/// `tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const NOTIFICATION: &str = "notification";
        pub const SMS_GATEWAY: &str = "sms_gateway";
    }

    /// イベントアクション
    pub mod action {
        // 通知
        pub const NOTIFICATION_SENT: &str = "notification.sent";
        pub const NOTIFICATION_FAILED: &str = "notification.failed";
        pub const NOTIFICATION_SUPPRESSED: &str = "notification.suppressed";

        // SMS ゲートウェイ
        pub const TOKEN_ACQUIRED: &str = "sms_gateway.token_acquired";
        pub const TOKEN_REFRESHED: &str = "sms_gateway.token_refreshed";
    }

    /// 通知チャネル
    pub mod channel {
        pub const EMAIL: &str = "email";
        pub const SMS: &str = "sms";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// 外部サービス呼び出し（SMS ゲートウェイ、メールサーバー）
        pub const EXTERNAL_SERVICE: &str = "external_service";
        /// 入力値の問題
        pub const VALIDATION: &str = "validation";
    }

    /// エラー種別
    pub mod kind {
        pub const GATEWAY_AUTH: &str = "gateway_auth";
        pub const DELIVERY: &str = "delivery";
        pub const TEMPLATE: &str = "template";
    }
}
