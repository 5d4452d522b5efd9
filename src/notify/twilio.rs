use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    models::order::NewOrder,
    notify::{MessageReceipt, Notifier, NotifyError, order_confirmation},
};

pub const TWILIO_BASE_URL: &str = "https://api.twilio.com";

const WHATSAPP_SCHEME: &str = "whatsapp:";

#[derive(Debug, Deserialize)]
struct TwilioError {
    code: Option<i64>,
    message: String,
}

/// [`Notifier`] delivering WhatsApp messages through the Twilio Messages API.
pub struct TwilioNotifier {
    client: reqwest::Client,
    messages_url: String,
    account_sid: Arc<str>,
    auth_token: Arc<str>,
    from: String,
}

impl TwilioNotifier {
    pub fn new(base_url: &str, account_sid: Arc<str>, auth_token: Arc<str>, from: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            messages_url: format!(
                "{}/2010-04-01/Accounts/{}/Messages.json",
                base_url.trim_end_matches('/'),
                account_sid
            ),
            account_sid,
            auth_token,
            from: format!("{}{}", WHATSAPP_SCHEME, from),
        }
    }
}

#[async_trait]
impl Notifier for TwilioNotifier {
    async fn send(
        &self,
        destination: &str,
        order: &NewOrder,
    ) -> Result<MessageReceipt, NotifyError> {
        let to = format!("{}{}", WHATSAPP_SCHEME, destination);
        let body = order_confirmation(order);

        log::info!("[twilio] sending whatsapp message to: {}", to);
        log::debug!("[twilio] message content: {}", body);

        let response = self
            .client
            .post(&self.messages_url)
            .basic_auth(&*self.account_sid, Some(&*self.auth_token))
            .form(&[("To", to.as_str()), ("From", self.from.as_str()), ("Body", body.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let (code, message) = match serde_json::from_str::<TwilioError>(&text) {
                Ok(err) => (err.code, err.message),
                Err(_) => (None, format!("messaging provider responded with {}", status)),
            };
            log::error!("[twilio] message to {} rejected: {} ({:?})", to, message, code);

            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                code,
                message,
            });
        }

        let receipt: MessageReceipt = response.json().await.map_err(NotifyError::Decode)?;
        log::info!(
            "[twilio] message sent: {} (status: {})",
            receipt.sid,
            receipt.status.as_deref().unwrap_or("unknown")
        );

        Ok(receipt)
    }
}
