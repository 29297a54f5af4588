//! # 通知テンプレートカタログ
//!
//! テンプレート名から件名とテンプレート種別を引く静的レジストリ。
//! 本文テンプレートそのものはサービス側で tera に登録する。
//!
//! テンプレート名はコア登録プラットフォームとの契約で、kebab-case の文字列として
//! 送られてくる（例: `"birth-registration"`）。

use std::str::FromStr;

use strum::{EnumIter, IntoEnumIterator};

use crate::notification::NotificationError;

/// 通知テンプレート名
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum TemplateName {
    /// 新規ユーザーへの招待
    OnboardingInvite,
    /// 二要素認証コード
    #[strum(serialize = "2-factor-authentication")]
    TwoFactorAuthentication,
    /// パスワードリセット
    PasswordReset,
    /// ユーザー名の通知
    UsernameReminder,
    /// 全ユーザーへの一斉通知
    AllUserNotification,
    /// 出生届の受付
    BirthDeclaration,
    /// 出生の登録完了
    BirthRegistration,
    /// 出生届の差し戻し
    BirthRejection,
    /// 死亡届の受付
    DeathDeclaration,
    /// 死亡の登録完了
    DeathRegistration,
}

/// テンプレート種別
///
/// 件名の決め方を決定する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// 件名はテンプレート固定
    Standard,
    /// 件名は呼び出し元が変数 `subject` で指定する
    AllUserNotification,
}

/// メールテンプレート定義
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmailTemplate {
    pub name:    TemplateName,
    pub kind:    TemplateKind,
    /// 固定件名（[`TemplateKind::Standard`] の場合に使用）
    pub subject: &'static str,
}

impl TemplateName {
    /// 名前からテンプレートを引く
    ///
    /// 未登録の名前は [`NotificationError::TemplateNotFound`] を返す。
    pub fn parse(name: &str) -> Result<Self, NotificationError> {
        Self::from_str(name).map_err(|_| NotificationError::TemplateNotFound(name.to_string()))
    }

    /// 登録済みの全テンプレート名
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// テンプレートファイルのベース名（例: `"birth-registration"`）
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// メールテンプレート定義を返す
    pub fn email_template(self) -> EmailTemplate {
        let (kind, subject) = match self {
            Self::OnboardingInvite => (TemplateKind::Standard, "Welcome to the civil registration system"),
            Self::TwoFactorAuthentication => (TemplateKind::Standard, "Your verification code"),
            Self::PasswordReset => (TemplateKind::Standard, "Password reset"),
            Self::UsernameReminder => (TemplateKind::Standard, "Your username"),
            Self::AllUserNotification => (TemplateKind::AllUserNotification, ""),
            Self::BirthDeclaration => (TemplateKind::Standard, "Birth declaration received"),
            Self::BirthRegistration => (TemplateKind::Standard, "Birth registered"),
            Self::BirthRejection => (TemplateKind::Standard, "Birth declaration requires updates"),
            Self::DeathDeclaration => (TemplateKind::Standard, "Death declaration received"),
            Self::DeathRegistration => (TemplateKind::Standard, "Death registered"),
        };

        EmailTemplate {
            name: self,
            kind,
            subject,
        }
    }
}

/// 名前からメールテンプレートを解決する
pub fn find_email_template(name: &str) -> Result<EmailTemplate, NotificationError> {
    TemplateName::parse(name).map(TemplateName::email_template)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("onboarding-invite", TemplateName::OnboardingInvite)]
    #[case("2-factor-authentication", TemplateName::TwoFactorAuthentication)]
    #[case("all-user-notification", TemplateName::AllUserNotification)]
    #[case("birth-registration", TemplateName::BirthRegistration)]
    fn テンプレート名をパースできる(#[case] input: &str, #[case] expected: TemplateName) {
        assert_eq!(TemplateName::parse(input).unwrap(), expected);
        assert_eq!(expected.as_str(), input);
    }

    #[test]
    fn 未登録のテンプレート名はtemplate_not_found() {
        let result = find_email_template("marriage-registration");

        assert!(matches!(
            result,
            Err(NotificationError::TemplateNotFound(name)) if name == "marriage-registration"
        ));
    }

    #[test]
    fn 全ユーザー通知のみ件名を呼び出し元が指定する() {
        for name in TemplateName::all() {
            let template = name.email_template();
            if name == TemplateName::AllUserNotification {
                assert_eq!(template.kind, TemplateKind::AllUserNotification);
            } else {
                assert_eq!(template.kind, TemplateKind::Standard);
                assert!(!template.subject.is_empty(), "{name} の件名が空");
            }
        }
    }
}
