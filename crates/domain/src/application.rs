//! # アプリケーション設定
//!
//! コア登録プラットフォームに提供する国別のアプリケーション設定。
//! キー名はコア側の契約に合わせて SCREAMING_SNAKE_CASE でシリアライズする。

use serde::{Deserialize, Serialize};

/// 届出種別ごとの手数料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Fees {
    pub on_time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late:    Option<u32>,
    pub delayed: u32,
}

/// 届出種別ごとの登録設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct EventConfig {
    /// 期限内登録の日数
    pub registration_target:      u32,
    /// 遅延登録の日数（出生のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late_registration_target: Option<u32>,
    pub fee:                      Fees,
    pub print_in_advance:         bool,
}

/// 通貨設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub languages_and_country: Vec<String>,
    pub iso_code:              String,
}

/// ログイン画面の背景
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginBackground {
    pub background_color: String,
}

/// 国のロゴ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryLogo {
    pub file_name: String,
    /// 画像の URL またはデータ URI
    pub file:      String,
}

impl CountryLogo {
    /// 公開 URL 上の画像を指すロゴ
    pub fn from_url(url: impl Into<String>) -> Self {
        let file = url.into();
        let file_name = file
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_LOGO_FILE_NAME)
            .to_string();
        Self { file_name, file }
    }
}

const DEFAULT_LOGO_FILE_NAME: &str = "country-logo.png";

/// 通知の配信方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Email,
    Sms,
    #[serde(rename = "")]
    Disabled,
}

/// 機能フラグ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct FeatureFlags {
    pub death_registration:            bool,
    pub marriage_registration:         bool,
    pub external_validation_workqueue: bool,
    pub informant_signature:           bool,
    pub informant_signature_required:  bool,
    pub print_declaration:             bool,
    pub date_of_birth_unknown:         bool,
}

/// アプリケーション設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ApplicationConfig {
    /// アプリケーション表示名（通知テンプレートにも埋め込まれる）
    pub application_name:                       String,
    pub birth:                                  EventConfig,
    pub death:                                  EventConfig,
    pub country_logo:                           CountryLogo,
    pub marriage:                               EventConfig,
    pub currency:                               Currency,
    pub phone_number_pattern:                   String,
    pub nid_number_pattern:                     String,
    pub login_background:                       LoginBackground,
    pub field_agent_audit_locations:            String,
    pub declaration_audit_locations:            String,
    pub features:                               FeatureFlags,
    pub user_notification_delivery_method:      DeliveryMethod,
    pub informant_notification_delivery_method: DeliveryMethod,
    pub signature_required_for_roles:           Vec<String>,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            application_name: "NIRA OpenCRVS".to_string(),
            birth: EventConfig {
                registration_target:      30 * 6,
                late_registration_target: Some(365 * 3),
                fee:                      Fees {
                    on_time: 0,
                    late:    Some(5000),
                    delayed: 10000,
                },
                print_in_advance:         true,
            },
            death: EventConfig {
                registration_target:      45,
                late_registration_target: None,
                fee:                      Fees {
                    on_time: 5000,
                    late:    None,
                    delayed: 5000,
                },
                print_in_advance:         true,
            },
            country_logo: CountryLogo::from_url(
                "http://localhost:3040/content/country-logo.png",
            ),
            marriage: EventConfig {
                registration_target:      90,
                late_registration_target: None,
                fee:                      Fees {
                    on_time: 0,
                    late:    None,
                    delayed: 0,
                },
                print_in_advance:         true,
            },
            currency: Currency {
                languages_and_country: vec!["en-US".to_string()],
                iso_code:              "UGX".to_string(),
            },
            phone_number_pattern: "^(03|07)[0-9]{8}$".to_string(),
            nid_number_pattern: "^[a-zA-Z0-9]{14}$".to_string(),
            login_background: LoginBackground {
                background_color: "36304E".to_string(),
            },
            field_agent_audit_locations: "DISTRICT".to_string(),
            declaration_audit_locations: "DISTRICT".to_string(),
            features: FeatureFlags {
                death_registration:            true,
                marriage_registration:         false,
                external_validation_workqueue: false,
                informant_signature:           true,
                informant_signature_required:  true,
                print_declaration:             false,
                date_of_birth_unknown:         true,
            },
            user_notification_delivery_method: DeliveryMethod::Email,
            informant_notification_delivery_method: DeliveryMethod::Email,
            signature_required_for_roles: vec![
                "LOCAL_REGISTRAR".to_string(),
                "NATIONAL_REGISTRAR".to_string(),
            ],
        }
    }
}

impl ApplicationConfig {
    /// 表示名だけを差し替えた設定を返す
    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = name.into();
        self
    }

    /// ロゴだけを差し替えた設定を返す
    pub fn with_country_logo(mut self, logo: CountryLogo) -> Self {
        self.country_logo = logo;
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn コア側のキー名でシリアライズされる() {
        let json = serde_json::to_value(ApplicationConfig::default()).unwrap();

        assert_eq!(json["APPLICATION_NAME"], "NIRA OpenCRVS");
        assert_eq!(json["COUNTRY_LOGO"]["fileName"], "country-logo.png");
        assert_eq!(
            json["COUNTRY_LOGO"]["file"],
            "http://localhost:3040/content/country-logo.png"
        );
        assert_eq!(json["BIRTH"]["REGISTRATION_TARGET"], 180);
        assert_eq!(json["BIRTH"]["LATE_REGISTRATION_TARGET"], 1095);
        assert_eq!(json["BIRTH"]["FEE"]["LATE"], 5000);
        assert_eq!(json["CURRENCY"]["isoCode"], "UGX");
        assert_eq!(json["LOGIN_BACKGROUND"]["backgroundColor"], "36304E");
        assert_eq!(json["FEATURES"]["MARRIAGE_REGISTRATION"], false);
        assert_eq!(json["USER_NOTIFICATION_DELIVERY_METHOD"], "email");
    }

    #[test]
    fn 死亡届には遅延登録の項目を出力しない() {
        let json = serde_json::to_value(ApplicationConfig::default()).unwrap();

        assert!(json["DEATH"].get("LATE_REGISTRATION_TARGET").is_none());
        assert!(json["DEATH"]["FEE"].get("LATE").is_none());
    }

    #[test]
    fn 配信方法の空文字列は無効を表す() {
        let method: DeliveryMethod = serde_json::from_str(r#""""#).unwrap();
        assert_eq!(method, DeliveryMethod::Disabled);
    }

    #[test]
    fn with_application_nameは表示名のみ変更する() {
        let config = ApplicationConfig::default().with_application_name("Farajaland CRVS");

        assert_eq!(config.application_name, "Farajaland CRVS");
        assert_eq!(config.birth, ApplicationConfig::default().birth);
    }

    #[test]
    fn ロゴのファイル名はurlの最後のセグメントになる() {
        let logo = CountryLogo::from_url("https://countryconfig.example.org/content/flag.svg");

        assert_eq!(logo.file_name, "flag.svg");
        assert_eq!(logo.file, "https://countryconfig.example.org/content/flag.svg");
    }

    #[test]
    fn with_country_logoはロゴのみ変更する() {
        let logo = CountryLogo::from_url("https://countryconfig.example.org/content/flag.svg");

        let config = ApplicationConfig::default().with_country_logo(logo.clone());

        assert_eq!(config.country_logo, logo);
        assert_eq!(config.application_name, "NIRA OpenCRVS");
    }
}
