//! # ゲートウェイトークンのキャッシュ
//!
//! SMS ゲートウェイの Bearer トークンを 1 つだけ保持し、有効期限が近づいたら
//! 更新してから返す。
//!
//! ## 有効期限の判定
//!
//! JWT の `exp` は秒単位、時刻はミリ秒単位で扱うため、`exp` はミリ秒に揃えてから比較する。
//! 残り有効時間が閾値を下回ったトークンは「期限切れ間近」とみなす:
//!
//! ```text
//! expires_at_ms - now_ms < threshold_ms  →  refresh
//! ```
//!
//! すでに期限切れのトークンはゲートウェイが更新を受け付けないため、破棄して取得し直す。
//!
//! ## 同時実行
//!
//! 取得・更新はプロバイダ内の非同期 Mutex で直列化する（single-flight）。
//! キャッシュが空の状態で同時に呼ばれても、ゲートウェイへの取得呼び出しは 1 回になり、
//! 後続の呼び出し元は同じトークンを受け取る。

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};
use countryconfig_domain::clock::Clock;
use countryconfig_shared::{event_log::event, log_business_event};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::Mutex;

use super::{GatewayError, SmsGatewayClient};

/// キャッシュされたトークン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub value:      String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct ExpiryClaim {
    // NumericDate は小数を許す
    exp: f64,
}

impl CachedToken {
    /// JWT の `exp` クレームを読み取ってキャッシュ値を作る
    ///
    /// 署名は検証しない（このサービスはトークンの受け手ではなく、期限のみ必要）。
    pub fn from_jwt(value: String) -> Result<Self, GatewayError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        // 整数以外の exp を弾かないよう、存在チェックは ExpiryClaim のデシリアライズに任せる
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<ExpiryClaim>(
            &value,
            &DecodingKey::from_secret(&[]),
            &validation,
        )
        .map_err(|e| GatewayError::MalformedToken(e.to_string()))?;

        let exp = data.claims.exp;
        let expires_at = exp
            .is_finite()
            .then(|| DateTime::from_timestamp_millis((exp * 1000.0).trunc() as i64))
            .flatten()
            .ok_or_else(|| GatewayError::MalformedToken(format!("exp が範囲外です: {exp}")))?;

        Ok(Self { value, expires_at })
    }

    /// 期限切れ間近（残り有効時間が閾値未満）かどうか
    pub fn is_stale(&self, now_millis: i64, threshold: Duration) -> bool {
        self.expires_at.timestamp_millis() - now_millis < threshold.num_milliseconds()
    }

    /// 有効期限を過ぎているかどうか
    pub fn is_expired(&self, now_millis: i64) -> bool {
        self.expires_at.timestamp_millis() <= now_millis
    }
}

/// トークンキャッシュ
///
/// 有効なトークンを高々 1 つ保持する。プロセス再起動で失われる（必要時に再取得）。
#[derive(Debug, Default)]
pub struct TokenCache {
    token: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<CachedToken> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// キャッシュを置き換える
    pub fn set(&self, token: CachedToken) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token);
    }

    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

/// トークンプロバイダ
///
/// キャッシュ・ゲートウェイクライアント・時刻を注入して構築する。
pub struct TokenProvider {
    client:    Arc<dyn SmsGatewayClient>,
    cache:     Arc<TokenCache>,
    clock:     Arc<dyn Clock>,
    threshold: Duration,
    in_flight: Mutex<()>,
}

impl TokenProvider {
    /// # 引数
    ///
    /// - `threshold`: 残り有効時間がこれを下回ったら更新する（例: 1 時間）
    pub fn new(
        client: Arc<dyn SmsGatewayClient>,
        cache: Arc<TokenCache>,
        clock: Arc<dyn Clock>,
        threshold: Duration,
    ) -> Self {
        Self {
            client,
            cache,
            clock,
            threshold,
            in_flight: Mutex::new(()),
        }
    }

    /// 有効なトークンを返す
    ///
    /// 1. キャッシュが空、または期限切れならゲートウェイから取得してキャッシュする
    /// 2. 期限切れ間近なら更新し、キャッシュを置き換える
    ///
    /// 取得に失敗した場合キャッシュは空のまま、更新に失敗した場合は
    /// 更新前のトークンが残る。
    pub async fn get_token(&self) -> Result<String, GatewayError> {
        let _guard = self.in_flight.lock().await;
        let now_millis = self.clock.now_millis();

        let current = match self.cache.get() {
            Some(token) if !token.is_expired(now_millis) => token,
            Some(_) => {
                self.cache.clear();
                self.acquire_locked().await?
            }
            None => self.acquire_locked().await?,
        };

        if !current.is_stale(now_millis, self.threshold) {
            return Ok(current.value);
        }

        let refreshed = self.refresh_locked(&current.value).await?;
        Ok(refreshed.value)
    }

    /// 既存トークンを更新してキャッシュを置き換える
    pub async fn refresh(&self, old_token: &str) -> Result<String, GatewayError> {
        let _guard = self.in_flight.lock().await;
        self.refresh_locked(old_token).await.map(|token| token.value)
    }

    /// キャッシュを破棄する（ゲートウェイがトークンを拒否した場合）
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    async fn acquire_locked(&self) -> Result<CachedToken, GatewayError> {
        let token = CachedToken::from_jwt(self.client.acquire_token().await?)?;
        self.cache.set(token.clone());
        log_business_event!(
            event.category = event::category::SMS_GATEWAY,
            event.action = event::action::TOKEN_ACQUIRED,
            event.result = event::result::SUCCESS,
            token.expires_at = %token.expires_at,
            "SMS ゲートウェイのトークンを取得"
        );
        Ok(token)
    }

    async fn refresh_locked(&self, old_token: &str) -> Result<CachedToken, GatewayError> {
        let token = CachedToken::from_jwt(self.client.refresh_token(old_token).await?)?;
        self.cache.set(token.clone());
        log_business_event!(
            event.category = event::category::SMS_GATEWAY,
            event.action = event::action::TOKEN_REFRESHED,
            event.result = event::result::SUCCESS,
            token.expires_at = %token.expires_at,
            "SMS ゲートウェイのトークンを更新"
        );
        Ok(token)
    }
}
