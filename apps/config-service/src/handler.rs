//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ビジネスロジックはユースケース層に委譲

pub mod configuration;
pub mod health;
pub mod notification;

pub use configuration::{ConfigState, get_application_config, get_certificate_configuration};
pub use health::health_check;
pub use notification::{NotificationState, send_email, send_notification};
