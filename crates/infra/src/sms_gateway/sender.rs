//! ゲートウェイ経由の SMS 送信実装

use std::sync::Arc;

use async_trait::async_trait;
use countryconfig_domain::notification::{NotificationError, SmsMessage};
use countryconfig_shared::event_log::error::{category, kind};

use super::{SmsGatewayClient, TokenProvider};
use crate::notification::SmsSender;

/// SMS ゲートウェイ送信
///
/// 送信前に [`TokenProvider`] から有効なトークンを取得する。
/// ゲートウェイが 401 を返した場合はキャッシュを破棄し、次回の送信で再取得させる。
pub struct GatewaySmsSender {
    client: Arc<dyn SmsGatewayClient>,
    tokens: Arc<TokenProvider>,
}

impl GatewaySmsSender {
    pub fn new(client: Arc<dyn SmsGatewayClient>, tokens: Arc<TokenProvider>) -> Self {
        Self { client, tokens }
    }
}

#[async_trait]
impl SmsSender for GatewaySmsSender {
    async fn send_sms(&self, sms: &SmsMessage) -> Result<(), NotificationError> {
        let token = self.tokens.get_token().await.map_err(|e| {
            tracing::warn!(
                error.category = category::EXTERNAL_SERVICE,
                error.kind = kind::GATEWAY_AUTH,
                "SMS ゲートウェイのトークンを取得できません: {}",
                e
            );
            NotificationError::DeliveryFailed(e.to_string())
        })?;

        self.client.send_sms(&token, sms).await.map_err(|e| {
            if e.is_auth() {
                self.tokens.invalidate();
            }
            NotificationError::DeliveryFailed(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration};
    use countryconfig_domain::clock::FixedClock;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        mock::{MockSmsGatewayClient, make_jwt},
        sms_gateway::{GatewayError, TokenCache},
    };

    const NOW: i64 = 1_700_000_000;

    fn make_sender(client: &MockSmsGatewayClient) -> (GatewaySmsSender, Arc<TokenCache>) {
        let client: Arc<dyn SmsGatewayClient> = Arc::new(client.clone());
        let cache = Arc::new(TokenCache::new());
        let tokens = Arc::new(TokenProvider::new(
            client.clone(),
            cache.clone(),
            Arc::new(FixedClock::new(DateTime::from_timestamp(NOW, 0).unwrap())),
            Duration::hours(1),
        ));
        (GatewaySmsSender::new(client, tokens), cache)
    }

    fn sms() -> SmsMessage {
        SmsMessage {
            recipient: "+256700000000".to_string(),
            message:   "Your code is 123456".to_string(),
            locale:    "en".to_string(),
            unicode:   false,
        }
    }

    #[tokio::test]
    async fn 取得したトークンで送信する() {
        let client = MockSmsGatewayClient::new();
        let token = make_jwt("t", NOW + 7200);
        client.push_acquire(Ok(token.clone()));
        let (sender, _) = make_sender(&client);

        sender.send_sms(&sms()).await.unwrap();

        let sent = client.sent_sms();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, token);
        assert_eq!(sent[0].1, sms());
    }

    #[tokio::test]
    async fn トークン取得に失敗したら送信しない() {
        let client = MockSmsGatewayClient::new();
        client.push_acquire(Err(GatewayError::Auth {
            status: 403,
            body:   "forbidden".to_string(),
        }));
        let (sender, _) = make_sender(&client);

        let result = sender.send_sms(&sms()).await;

        assert!(matches!(result, Err(NotificationError::DeliveryFailed(_))));
        assert!(client.sent_sms().is_empty());
    }

    #[tokio::test]
    async fn 送信が401で拒否されたらキャッシュを破棄する() {
        let client = MockSmsGatewayClient::new();
        client.push_acquire(Ok(make_jwt("t", NOW + 7200)));
        client.push_send(Err(GatewayError::Rejected {
            status: 401,
            body:   "token revoked".to_string(),
        }));
        let (sender, cache) = make_sender(&client);

        let result = sender.send_sms(&sms()).await;

        assert!(result.is_err());
        assert!(cache.get().is_none());
    }
}
