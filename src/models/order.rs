use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::Validate;

/// An order submission.
///
/// Only `phone` is checked. The details used in the confirmation message are
/// kept as whatever JSON the caller sent, and every other field lands in
/// `extra`. All of it is stored verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Ama Mensah")]
    pub name: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Weekly lunch")]
    pub plan: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "12 Oxford Street, Osu")]
    pub address: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 120)]
    pub total_amount: Option<Value>,

    #[validate(
        required(message = "Phone number is required"),
        length(min = 1, message = "Phone number is required")
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "0551234567")]
    pub phone: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewOrder {
    pub fn phone(&self) -> &str {
        self.phone.as_deref().unwrap_or_default()
    }

    pub fn name_text(&self) -> String {
        detail_text(self.name.as_ref())
    }

    pub fn plan_text(&self) -> String {
        detail_text(self.plan.as_ref())
    }

    pub fn address_text(&self) -> String {
        detail_text(self.address.as_ref())
    }

    pub fn total_amount_text(&self) -> String {
        detail_text(self.total_amount.as_ref())
    }
}

// strings render bare, anything else as compact JSON, absent or null as nothing
fn detail_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// An order as persisted, with the store-assigned id and the creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    #[schema(example = "Xk2b9RfQe1tZ0aLm")]
    pub id: String,

    #[serde(flatten)]
    pub fields: NewOrder,

    // RFC 3339
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "2026-10-18T09:30:00.000000Z")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRes {
    #[schema(example = true)]
    pub success: bool,

    #[schema(example = "Order saved successfully")]
    pub message: String,

    #[schema(example = "Xk2b9RfQe1tZ0aLm")]
    pub order_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 120)]
    pub total_amount: Option<Value>,
}

impl CreateOrderRes {
    pub fn new(order_id: String, total_amount: Option<Value>) -> Self {
        Self {
            success: true,
            message: String::from("Order saved successfully"),
            order_id,
            total_amount,
        }
    }
}
