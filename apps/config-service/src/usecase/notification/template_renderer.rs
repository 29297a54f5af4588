//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで通知メールの HTML 本文と SMS 本文を生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **メールは継承**: 各メールテンプレートは `email/base.html` を継承する
//! - **SMS はロケール別**: `sms/{locale}/{name}.txt` を探し、なければ `en` を使う

use std::collections::HashSet;

use countryconfig_domain::{
    notification::{DEFAULT_LOCALE, NotificationError, TemplateVariables},
    template::TemplateName,
};
use serde_json::Value;
use tera::{Context, Tera};

macro_rules! embedded {
    ($($path:literal),+ $(,)?) => {
        vec![$(($path, include_str!(concat!("../../../templates/", $path)))),+]
    };
}

fn embedded_templates() -> Vec<(&'static str, &'static str)> {
    embedded![
        "email/base.html",
        "email/onboarding-invite.html",
        "email/2-factor-authentication.html",
        "email/password-reset.html",
        "email/username-reminder.html",
        "email/all-user-notification.html",
        "email/birth-declaration.html",
        "email/birth-registration.html",
        "email/birth-rejection.html",
        "email/death-declaration.html",
        "email/death-registration.html",
        "sms/en/onboarding-invite.txt",
        "sms/en/2-factor-authentication.txt",
        "sms/en/password-reset.txt",
        "sms/en/username-reminder.txt",
        "sms/en/all-user-notification.txt",
        "sms/en/birth-declaration.txt",
        "sms/en/birth-registration.txt",
        "sms/en/birth-rejection.txt",
        "sms/en/death-declaration.txt",
        "sms/en/death-registration.txt",
        "sms/fr/2-factor-authentication.txt",
        "sms/fr/birth-registration.txt",
    ]
}

/// テンプレートレンダラー
pub struct TemplateRenderer {
    engine: Tera,
    names:  HashSet<&'static str>,
}

impl TemplateRenderer {
    /// 埋め込みテンプレートを tera に登録する
    pub fn new() -> Result<Self, NotificationError> {
        let templates = embedded_templates();
        let names = templates.iter().map(|(name, _)| *name).collect();

        let mut engine = Tera::default();
        engine
            .add_raw_templates(templates)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine, names })
    }

    /// メール本文（HTML）を生成する
    pub fn render_email(
        &self,
        template: TemplateName,
        variables: &TemplateVariables,
    ) -> Result<String, NotificationError> {
        let name = format!("email/{template}.html");
        if !self.names.contains(name.as_str()) {
            return Err(NotificationError::TemplateNotFound(template.to_string()));
        }
        self.render(&name, variables)
    }

    /// SMS 本文を生成する
    ///
    /// 指定ロケールのテンプレートがなければ `en` にフォールバックする。
    /// 前後の空白・改行は取り除く。
    pub fn render_sms(
        &self,
        template: TemplateName,
        locale: &str,
        variables: &TemplateVariables,
    ) -> Result<String, NotificationError> {
        let localized = format!("sms/{locale}/{template}.txt");
        let name = if self.names.contains(localized.as_str()) {
            localized
        } else {
            format!("sms/{DEFAULT_LOCALE}/{template}.txt")
        };
        if !self.names.contains(name.as_str()) {
            return Err(NotificationError::TemplateNotFound(template.to_string()));
        }

        self.render(&name, variables)
            .map(|text| text.trim().to_string())
    }

    fn render(&self, name: &str, variables: &TemplateVariables) -> Result<String, NotificationError> {
        let context = Context::from_value(Value::Object(variables.clone()))
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        self.engine
            .render(name, &context)
            .map_err(|e| NotificationError::TemplateFailed(format!("{name}: {e}")))
    }
}
