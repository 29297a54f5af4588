//! # 通知サービス
//!
//! テンプレート解決 → レンダリング → メール/SMS 送信を統合するサービス。
//!
//! ## 設計方針
//!
//! - **本番以外は送信しない**: `production` 以外の環境ではパラメータをログに残すだけ
//! - **ベストエフォート**: メールと SMS は並行に送信し、片方の失敗はもう片方に影響しない。
//!   送信失敗はエラーとして返さずログに記録する
//! - **依存性注入**: 送信手段とアプリケーション設定は trait で抽象化

use std::sync::Arc;

use countryconfig_domain::{
    notification::{
        EmailMessage,
        EmailPayload,
        NotificationError,
        NotificationRequest,
        SmsMessage,
        TemplateVariables,
        to_ucs2_hex,
    },
    template::{EmailTemplate, TemplateKind, TemplateName, find_email_template},
};
use countryconfig_infra::{ApplicationConfigProvider, EmailSender, SmsSender};
use countryconfig_shared::{
    event_log::{error, event},
    log_business_event,
};
use serde_json::{Value, json};

use super::TemplateRenderer;
use crate::config::AppEnvironment;

/// 通知の固定コンテキスト
#[derive(Debug, Clone)]
pub struct NotificationSettings {
    pub environment:      AppEnvironment,
    /// 送信元メールアドレス
    pub sender_email:     String,
    pub country_logo_url: String,
    pub login_url:        String,
}

/// チャネルごとの送信結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelOutcome {
    /// 本番以外のため送信しなかった
    Suppressed,
    /// 宛先がないため送信しなかった
    Skipped,
    Sent,
    Failed(String),
}

/// 通知リクエストの処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub email: ChannelOutcome,
    pub sms:   ChannelOutcome,
}

/// 通知サービス
pub struct NotificationService {
    email_sender: Arc<dyn EmailSender>,
    sms_sender:   Arc<dyn SmsSender>,
    renderer:     TemplateRenderer,
    app_config:   Arc<dyn ApplicationConfigProvider>,
    settings:     NotificationSettings,
}

impl NotificationService {
    pub fn new(
        email_sender: Arc<dyn EmailSender>,
        sms_sender: Arc<dyn SmsSender>,
        renderer: TemplateRenderer,
        app_config: Arc<dyn ApplicationConfigProvider>,
        settings: NotificationSettings,
    ) -> Self {
        Self {
            email_sender,
            sms_sender,
            renderer,
            app_config,
            settings,
        }
    }

    /// 通知リクエストを処理する
    ///
    /// テンプレートが見つからない、またはメール本文をレンダリングできない
    /// 場合はどのチャネルにも送信せずエラーを返す。送信そのものの失敗は
    /// [`ChannelOutcome::Failed`] として報告するだけで、エラーにはならない。
    pub async fn notify(
        &self,
        request: &NotificationRequest,
    ) -> Result<DispatchReport, NotificationError> {
        let application_name = self.app_config.application_config().await.application_name;

        if !self.settings.environment.is_production() {
            let params = json!({
                "templateName": request.template_name,
                "recipient": request.recipient,
                "convertUnicode": request.convert_unicode,
                "type": request.recipient_type,
            });
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_SUPPRESSED,
                event.result = event::result::SUCCESS,
                app.environment = %self.settings.environment,
                notification.params = %params,
                "本番環境ではないため通知を送信しません"
            );
            return Ok(DispatchReport {
                email: ChannelOutcome::Suppressed,
                sms:   ChannelOutcome::Suppressed,
            });
        }

        let template = find_email_template(&request.template_name.email)?;
        let subject = resolve_subject(&template, &request.variables, &application_name);

        let mut email_variables = request.variables.clone();
        email_variables.insert("applicationName".to_string(), json!(application_name));
        email_variables.insert("countryLogo".to_string(), json!(self.settings.country_logo_url));
        email_variables.insert("loginURL".to_string(), json!(self.settings.login_url));
        let html_body = self.renderer.render_email(template.name, &email_variables)?;

        let email = async {
            let Some(to) = request.recipient.email() else {
                return ChannelOutcome::Skipped;
            };
            let message = EmailMessage {
                from: self.settings.sender_email.clone(),
                to: to.to_string(),
                bcc: request.recipient.bcc().to_vec(),
                subject,
                html_body,
            };
            let result = self.email_sender.send_email(&message).await;
            record(event::channel::EMAIL, &request.template_name.email, to, result)
        };

        let sms = async {
            let Some(phone) = request.recipient.sms() else {
                return ChannelOutcome::Skipped;
            };
            let result = match self.render_sms(request, &application_name, phone) {
                Ok(message) => self.sms_sender.send_sms(&message).await,
                Err(e) => Err(e),
            };
            record(event::channel::SMS, &request.template_name.sms, phone, result)
        };

        let (email, sms) = futures::future::join(email, sms).await;
        Ok(DispatchReport { email, sms })
    }

    /// レンダリング済みのメールをそのまま送信する
    ///
    /// 本番以外ではログに残すだけ。本番での送信失敗はエラーとして返す。
    pub async fn send_email(
        &self,
        payload: EmailPayload,
    ) -> Result<ChannelOutcome, NotificationError> {
        if !self.settings.environment.is_production() {
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_SUPPRESSED,
                event.result = event::result::SUCCESS,
                notification.channel = event::channel::EMAIL,
                app.environment = %self.settings.environment,
                notification.subject = %payload.subject,
                notification.from = %payload.from,
                notification.recipient = %payload.to,
                "本番環境ではないためメールを送信しません"
            );
            return Ok(ChannelOutcome::Suppressed);
        }

        let message = EmailMessage::from(payload);
        let result = self.email_sender.send_email(&message).await;
        match record(event::channel::EMAIL, "direct", &message.to, result) {
            ChannelOutcome::Failed(reason) => Err(NotificationError::DeliveryFailed(reason)),
            outcome => Ok(outcome),
        }
    }

    fn render_sms(
        &self,
        request: &NotificationRequest,
        application_name: &str,
        phone: &str,
    ) -> Result<SmsMessage, NotificationError> {
        let template = TemplateName::parse(&request.template_name.sms)?;

        let mut variables = request.variables.clone();
        variables.insert("applicationName".to_string(), json!(application_name));
        variables.insert("countryLogo".to_string(), json!(self.settings.country_logo_url));
        let text = self
            .renderer
            .render_sms(template, &request.locale, &variables)?;

        let unicode = request.convert_unicode();
        Ok(SmsMessage {
            recipient: phone.to_string(),
            message: if unicode { to_ucs2_hex(&text) } else { text },
            locale: request.locale.clone(),
            unicode,
        })
    }
}

/// 件名を決める
///
/// 一斉通知テンプレートは呼び出し元の変数 `subject` を使い、
/// 渡されていなければアプリケーション名で代用する。
fn resolve_subject(
    template: &EmailTemplate,
    variables: &TemplateVariables,
    application_name: &str,
) -> String {
    match template.kind {
        TemplateKind::Standard => template.subject.to_string(),
        TemplateKind::AllUserNotification => match variables.get("subject") {
            Some(Value::String(subject)) if !subject.is_empty() => subject.clone(),
            _ => application_name.to_string(),
        },
    }
}

/// 送信結果をビジネスイベントとして記録する
fn record(
    channel: &'static str,
    template: &str,
    recipient: &str,
    result: Result<(), NotificationError>,
) -> ChannelOutcome {
    match result {
        Ok(()) => {
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_SENT,
                event.result = event::result::SUCCESS,
                notification.channel = channel,
                notification.template = template,
                notification.recipient = recipient,
                "通知送信成功"
            );
            ChannelOutcome::Sent
        }
        Err(e) => {
            let error_kind = match e {
                NotificationError::DeliveryFailed(_) => error::kind::DELIVERY,
                _ => error::kind::TEMPLATE,
            };
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_FAILED,
                event.result = event::result::FAILURE,
                notification.channel = channel,
                notification.template = template,
                notification.recipient = recipient,
                error.category = error::category::EXTERNAL_SERVICE,
                error.kind = error_kind,
                error = %e,
                "通知送信失敗"
            );
            ChannelOutcome::Failed(e.to_string())
        }
    }
}
