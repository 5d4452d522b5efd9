use crate::{handler, models};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handler::health,
        handler::order::create_order,
        handler::order::orders_by_phone,
    ),
    components(
        schemas(
            // create_order
            models::order::NewOrder,
            models::order::CreateOrderRes,

            // orders_by_phone
            models::order::Order,

            // generic error response
            models::error::ResponseError,
        )
    ),
    tags(
        (name = "Orders", description = "Order intake with WhatsApp confirmation"),
        (name = "Health", description = "Service liveness"),
    )
)]
pub struct ApiDoc;
