//! # SMS ゲートウェイクライアント
//!
//! ゲートウェイの HTTP API を呼び出す。リトライは行わない
//! （失敗は呼び出し元の通知リクエスト単位で扱う）。

use std::time::Duration;

use async_trait::async_trait;
use countryconfig_domain::notification::SmsMessage;
use serde::{Deserialize, Serialize};
use url::Url;

use super::GatewayError;

const GET_TOKEN_PATH: &str = "v1/get-jwt-token";
const REFRESH_TOKEN_PATH: &str = "v1/refresh-jwt-token";
const SEND_SMS_PATH: &str = "v1/send-sms";

/// ゲートウェイの資格情報
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayCredentials {
    pub user_id:  String,
    pub password: String,
    pub email:    String,
}

impl std::fmt::Debug for GatewayCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayCredentials")
            .field("user_id", &self.user_id)
            .field("password", &"***")
            .field("email", &self.email)
            .finish()
    }
}

#[derive(Serialize)]
struct RefreshTokenRequest<'a> {
    token: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

/// SMS ゲートウェイクライアントトレイト
///
/// テスト時にスタブを使用できるようトレイトで定義。
#[async_trait]
pub trait SmsGatewayClient: Send + Sync {
    /// 資格情報から新しいトークンを取得する
    async fn acquire_token(&self) -> Result<String, GatewayError>;

    /// 既存トークンを渡して新しいトークンを取得する
    async fn refresh_token(&self, token: &str) -> Result<String, GatewayError>;

    /// SMS を送信する
    async fn send_sms(&self, token: &str, sms: &SmsMessage) -> Result<(), GatewayError>;
}

/// SMS ゲートウェイクライアント実装
pub struct HttpSmsGatewayClient {
    endpoint:    Url,
    credentials: GatewayCredentials,
    client:      reqwest::Client,
}

impl HttpSmsGatewayClient {
    /// 新しいクライアントを作成する
    ///
    /// # 引数
    ///
    /// - `endpoint`: ゲートウェイのベース URL。各パスは URL の相対解決で結合する
    ///   （`https://gw.example/api/` → `https://gw.example/api/v1/get-jwt-token`）
    /// - `timeout`: 1 リクエストあたりのタイムアウト
    pub fn new(
        endpoint: &str,
        credentials: GatewayCredentials,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let mut endpoint = Url::parse(endpoint)
            .map_err(|e| GatewayError::Unexpected(format!("エンドポイント URL が不正: {e}")))?;
        // 末尾スラッシュがないと join で最後のセグメントが置き換わる
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Unexpected(format!("HTTP クライアント構築失敗: {e}")))?;

        Ok(Self {
            endpoint,
            credentials,
            client,
        })
    }

    fn url(&self, path: &str) -> Result<Url, GatewayError> {
        self.endpoint
            .join(path)
            .map_err(|e| GatewayError::Unexpected(format!("URL の結合に失敗: {e}")))
    }

    /// トークン系エンドポイントを呼び出し、`{ token }` を取り出す
    async fn post_for_token<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, GatewayError> {
        let response = self.client.post(self.url(path)?).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Auth {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.json::<TokenResponse>().await?;
        Ok(body.token)
    }
}

#[async_trait]
impl SmsGatewayClient for HttpSmsGatewayClient {
    async fn acquire_token(&self) -> Result<String, GatewayError> {
        self.post_for_token(GET_TOKEN_PATH, &self.credentials).await
    }

    async fn refresh_token(&self, token: &str) -> Result<String, GatewayError> {
        self.post_for_token(REFRESH_TOKEN_PATH, &RefreshTokenRequest { token })
            .await
    }

    async fn send_sms(&self, token: &str, sms: &SmsMessage) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.url(SEND_SMS_PATH)?)
            .bearer_auth(token)
            .json(sms)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn credentials() -> GatewayCredentials {
        GatewayCredentials {
            user_id:  "crvs".to_string(),
            password: "secret".to_string(),
            email:    "crvs@example.org".to_string(),
        }
    }

    #[test]
    fn パスはベースurlからの相対解決で結合する() {
        let client = HttpSmsGatewayClient::new(
            "https://gw.example.org/api/",
            credentials(),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            client.url(GET_TOKEN_PATH).unwrap().as_str(),
            "https://gw.example.org/api/v1/get-jwt-token"
        );
    }

    #[test]
    fn 末尾スラッシュのないベースurlもパスを保つ() {
        let client = HttpSmsGatewayClient::new(
            "https://gw.example.org/api",
            credentials(),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            client.url(SEND_SMS_PATH).unwrap().as_str(),
            "https://gw.example.org/api/v1/send-sms"
        );
    }

    #[test]
    fn 不正なエンドポイントはエラー() {
        let result = HttpSmsGatewayClient::new("not a url", credentials(), Duration::from_secs(5));

        assert!(matches!(result, Err(GatewayError::Unexpected(_))));
    }

    #[test]
    fn 資格情報はキャメルケースでシリアライズされる() {
        let json = serde_json::to_value(credentials()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "userId": "crvs",
                "password": "secret",
                "email": "crvs@example.org"
            })
        );
    }

    #[test]
    fn debug出力にパスワードを含めない() {
        let debug = format!("{:?}", credentials());

        assert!(!debug.contains("secret"));
    }
}
