pub mod twilio;

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::order::NewOrder;

pub use twilio::TwilioNotifier;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The provider answered but refused to send the message.
    #[error("{message}")]
    Rejected {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    #[error("failed to reach messaging provider: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider accepted the request but its reply could not be read.
    #[error("messaging provider returned an unreadable receipt: {0}")]
    Decode(#[source] reqwest::Error),
}

/// What the provider hands back for an accepted message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageReceipt {
    pub sid: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Sends the customer a confirmation for a stored order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// `destination` must already be in international `+` form.
    async fn send(&self, destination: &str, order: &NewOrder)
    -> Result<MessageReceipt, NotifyError>;
}

pub fn order_confirmation(order: &NewOrder) -> String {
    format!(
        "Thank you for your order!\n\n\
         Order Details:\n\
         Name: {}\n\
         Meal Plan: {}\n\
         Delivery Address: {}\n\
         Total Amount: ${}\n\n\
         We'll process your order soon!",
        order.name_text(),
        order.plan_text(),
        order.address_text(),
        order.total_amount_text(),
    )
}
