//! # 通知
//!
//! コア登録プラットフォームから届く通知リクエストと、
//! 送信チャネルに渡すメッセージを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`NotificationRequest`] | 通知リクエスト | メール/SMS のテンプレート名・宛先・変数 |
//! | [`RecipientType`] | 受信者種別 | システム利用者（user）または届出人（informant） |
//! | [`EmailMessage`] | メールメッセージ | レンダリング済みのメール |
//! | [`SmsMessage`] | SMS メッセージ | レンダリング済みの SMS |
//!
//! ## 設計方針
//!
//! - **境界でのバリデーション**: serde の型制約と `validator` で不正なペイロードを
//!   ディスパッチ前に弾く
//! - **未知フィールドの許容**: コア側の拡張フィールドは無視する
//! - **ベストエフォート**: 送信失敗はチャネル単位で記録し、登録業務を止めない

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use validator::{Validate, ValidationError};

/// テンプレート変数
pub type TemplateVariables = Map<String, Value>;

/// ロケール未指定時のデフォルト
pub const DEFAULT_LOCALE: &str = "en";

/// 通知処理のエラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// 指定されたテンプレートが存在しない
    #[error("テンプレートが見つかりません: {0}")]
    TemplateNotFound(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),

    /// メール/SMS の送信に失敗
    #[error("送信に失敗: {0}")]
    DeliveryFailed(String),
}

/// 受信者種別
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecipientType {
    /// システム利用者（登録官など）
    User,
    /// 届出人
    Informant,
}

/// チャネル別テンプレート名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TemplateNames {
    /// メールテンプレート名
    #[validate(length(min = 1, message = "templateName.email は必須です"))]
    pub email: String,
    /// SMS テンプレート名
    #[validate(length(min = 1, message = "templateName.sms は必須です"))]
    pub sms:   String,
}

/// 宛先
///
/// `null` と空文字列はどちらも「宛先なし」として扱う。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Recipient {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_bcc"))]
    pub bcc:   Option<Vec<String>>,
    #[serde(default)]
    pub sms:   Option<String>,
}

impl Recipient {
    /// 送信先メールアドレス（空文字列は除外）
    pub fn email(&self) -> Option<&str> {
        non_empty(self.email.as_deref())
    }

    /// 送信先電話番号（空文字列は除外）
    pub fn sms(&self) -> Option<&str> {
        non_empty(self.sms.as_deref())
    }

    /// BCC アドレス一覧
    pub fn bcc(&self) -> &[String] {
        self.bcc.as_deref().unwrap_or_default()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn validate_bcc(bcc: &[String]) -> Result<(), ValidationError> {
    if bcc.iter().any(String::is_empty) {
        return Err(ValidationError::new("bcc").with_message("bcc に空のアドレスは指定できません".into()));
    }
    Ok(())
}

/// 通知リクエスト
///
/// `POST /notification` のペイロード。リクエストごとに生成され、保存はしない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    #[validate(nested)]
    pub template_name:   TemplateNames,
    #[serde(default)]
    #[validate(nested)]
    pub recipient:       Recipient,
    #[serde(rename = "type")]
    pub recipient_type:  RecipientType,
    #[serde(default = "default_locale")]
    pub locale:          String,
    #[serde(default)]
    pub variables:       TemplateVariables,
    #[serde(default)]
    pub convert_unicode: Option<bool>,
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

impl NotificationRequest {
    /// SMS を UCS-2 に変換して送るかどうか
    pub fn convert_unicode(&self) -> bool {
        self.convert_unicode.unwrap_or(false)
    }
}

/// 直接送信用のメールペイロード
///
/// `POST /email` のペイロード。本文はレンダリング済みの HTML。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct EmailPayload {
    #[validate(length(min = 1, message = "subject は必須です"))]
    pub subject: String,
    #[validate(length(min = 1, message = "html は必須です"))]
    pub html:    String,
    #[validate(length(min = 1, message = "from は必須です"))]
    pub from:    String,
    #[validate(length(min = 1, message = "to は必須です"))]
    pub to:      String,
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。メール送信実装に渡される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信元メールアドレス
    pub from:      String,
    /// 送信先メールアドレス
    pub to:        String,
    pub bcc:       Vec<String>,
    pub subject:   String,
    pub html_body: String,
}

impl From<EmailPayload> for EmailMessage {
    fn from(payload: EmailPayload) -> Self {
        Self {
            from:      payload.from,
            to:        payload.to,
            bcc:       Vec::new(),
            subject:   payload.subject,
            html_body: payload.html,
        }
    }
}

/// SMS メッセージ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmsMessage {
    /// 送信先電話番号
    pub recipient: String,
    /// 本文（`unicode` が true の場合は UCS-2 の 16 進表現）
    pub message:   String,
    pub locale:    String,
    pub unicode:   bool,
}

/// 文字列を UCS-2（UTF-16 コードユニット）の 16 進表現に変換する
///
/// 各コードユニットを大文字 4 桁で表す。ゲートウェイ側で非 ASCII 文字を
/// 扱えない場合に使用する。
pub fn to_ucs2_hex(text: &str) -> String {
    text.encode_utf16().map(|unit| format!("{unit:04X}")).collect()
}
