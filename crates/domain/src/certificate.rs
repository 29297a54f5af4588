//! # 証明書設定
//!
//! 証明書 PDF の生成時にコア側が読み込むフォントを定義する。
//! フォントファイル自体はこのサービスの `/fonts` 配下で公開される前提。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// フォントファミリー（書体ごとのファイル URL）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontFamily {
    pub normal:      String,
    pub bold:        String,
    pub italics:     String,
    pub bolditalics: String,
}

impl FontFamily {
    fn new(base_url: &str, normal: &str, bold: &str, italics: &str, bolditalics: &str) -> Self {
        let url = |file: &str| format!("{base_url}/fonts/{file}");
        Self {
            normal:      url(normal),
            bold:        url(bold),
            italics:     url(italics),
            bolditalics: url(bolditalics),
        }
    }
}

/// 証明書設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateConfiguration {
    pub fonts: BTreeMap<String, FontFamily>,
}

impl CertificateConfiguration {
    /// 公開 URL を起点にフォント URL を組み立てる
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let fonts = BTreeMap::from([
            (
                "Merriweather".to_string(),
                FontFamily::new(
                    base_url,
                    "Merriweather-Regular.ttf",
                    "Merriweather-Black.ttf",
                    "Merriweather-Regular.ttf",
                    "Merriweather-Regular.ttf",
                ),
            ),
            (
                "Arimo".to_string(),
                FontFamily::new(
                    base_url,
                    "Arimo-Bold.ttf",
                    "Arimo-Bold.ttf",
                    "Arimo-Bold.ttf",
                    "Arimo-Bold.ttf",
                ),
            ),
        ]);

        Self { fonts }
    }
}
