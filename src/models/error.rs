use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct ResponseError {
    // always false when present, omitted on the read routes
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = false)]
    pub success: Option<bool>,

    // this describes the reason for the error, can be directly shown to the user
    #[schema(example = "Phone number is required")]
    pub error: String,
}
