use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use validator::Validate;

use crate::app::AppState;
use crate::error::AppError;
use crate::models::{
    self,
    order::{CreateOrderRes, NewOrder, Order},
};
use crate::util::phone;

/// Submit a new order.
///
/// The order is stored first, then the customer gets a WhatsApp confirmation
/// on the given phone number. A failed confirmation fails the request even
/// though the order has already been stored.
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = NewOrder,
    responses(
        (status = 201, description = "Order stored and confirmation sent", body = CreateOrderRes),
        (status = 400, description = "Missing phone number, malformed body, storage or messaging failure", body = models::error::ResponseError),
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<NewOrder>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(order) =
        payload.map_err(|e| AppError::bad_request_with_source(e.body_text(), e))?;
    order.validate()?;

    let order_id = state.store.save(&order).await?;

    let destination = phone::to_international(order.phone());
    state.notifier.send(&destination, &order).await?;

    log::info!("[orders] order {} accepted", order_id);

    Ok((
        StatusCode::CREATED,
        [(header::CONTENT_TYPE, "application/json")],
        Json(CreateOrderRes::new(order_id, order.total_amount)),
    ))
}

/// List every order placed with the given phone number.
#[utoipa::path(
    get,
    path = "/api/orders/{phone}",
    tag = "Orders",
    params(
        ("phone" = String, Path, description = "Phone number exactly as it was submitted"),
    ),
    responses(
        (status = 200, description = "Matching orders, possibly none", body = [Order]),
        (status = 500, description = "Orders could not be read", body = models::error::ResponseError),
    )
)]
pub async fn orders_by_phone(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let orders = state.store.find_by_phone(&phone).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(orders),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::router;
    use crate::notify::{MessageReceipt, MockNotifier, NotifyError};
    use crate::store::{MockOrderStore, StoreError};
    use axum::{
        Router,
        body::Body,
        http::{Request, Response},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(store: MockOrderStore, notifier: MockNotifier) -> Router {
        router(
            AppState::new(Arc::new(store), Arc::new(notifier)),
            &[String::from("http://localhost:3000")],
        )
    }

    fn post_order(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/orders")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn receipt() -> MessageReceipt {
        MessageReceipt {
            sid: "SM123".into(),
            status: Some("queued".into()),
        }
    }

    #[tokio::test]
    async fn stores_order_and_notifies_customer() {
        let mut store = MockOrderStore::new();
        store
            .expect_save()
            .withf(|order| order.phone() == "0551234567" && order.name == Some(json!("Ama")))
            .times(1)
            .returning(|_| Ok("order-1".into()));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_send()
            .withf(|to, order| to == "+233551234567" && order.plan == Some(json!("Weekly")))
            .times(1)
            .returning(|_, _| Ok(receipt()));

        let body = json!({
            "name": "Ama",
            "plan": "Weekly",
            "address": "12 Oxford Street",
            "totalAmount": 120,
            "phone": "0551234567",
        });
        let response = app(store, notifier)
            .oneshot(post_order(&body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            json_body(response).await,
            json!({
                "success": true,
                "message": "Order saved successfully",
                "orderId": "order-1",
                "totalAmount": 120,
            })
        );
    }

    #[tokio::test]
    async fn missing_phone_never_reaches_store() {
        let mut store = MockOrderStore::new();
        store.expect_save().never();
        let mut notifier = MockNotifier::new();
        notifier.expect_send().never();

        let app = app(store, notifier);
        for body in [r#"{"name": "Ama"}"#, r#"{"name": "Ama", "phone": ""}"#] {
            let response = app.clone().oneshot(post_order(body)).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                json_body(response).await,
                json!({"success": false, "error": "Phone number is required"})
            );
        }
    }

    #[tokio::test]
    async fn accepts_details_of_any_json_type() {
        let mut store = MockOrderStore::new();
        store
            .expect_save()
            .withf(|order| order.address == Some(json!({"city": "Accra"})))
            .times(1)
            .returning(|_| Ok("order-4".into()));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_send()
            .times(1)
            .returning(|_, _| Ok(receipt()));

        let body = json!({
            "name": 42,
            "address": {"city": "Accra"},
            "totalAmount": true,
            "phone": "0551234567",
        });
        let response = app(store, notifier)
            .oneshot(post_order(&body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            json_body(response).await,
            json!({
                "success": true,
                "message": "Order saved successfully",
                "orderId": "order-4",
                "totalAmount": true,
            })
        );
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let mut store = MockOrderStore::new();
        store.expect_save().never();

        let response = app(store, MockNotifier::new())
            .oneshot(post_order("{not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["success"], json!(false));
    }

    #[tokio::test]
    async fn store_failure_skips_notification() {
        let mut store = MockOrderStore::new();
        store
            .expect_save()
            .times(1)
            .returning(|_| Err(StoreError::Write(anyhow::anyhow!("permission denied"))));
        let mut notifier = MockNotifier::new();
        notifier.expect_send().times(0);

        let response = app(store, notifier)
            .oneshot(post_order(r#"{"phone": "0551234567"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"success": false, "error": "failed to save order: permission denied"})
        );
    }

    #[tokio::test]
    async fn notification_failure_fails_stored_order() {
        let mut store = MockOrderStore::new();
        store
            .expect_save()
            .times(1)
            .returning(|_| Ok("order-2".into()));
        let mut notifier = MockNotifier::new();
        notifier.expect_send().times(1).returning(|_, _| {
            Err(NotifyError::Rejected {
                status: 400,
                code: Some(21211),
                message: "The 'To' number is not a valid phone number.".into(),
            })
        });

        let response = app(store, notifier)
            .oneshot(post_order(r#"{"phone": "0551234567", "totalAmount": "50"}"#))
            .await
            .unwrap();

        // the order is stored but the caller is told it failed
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"success": false, "error": "The 'To' number is not a valid phone number."})
        );
    }

    #[tokio::test]
    async fn international_number_is_sent_unchanged() {
        let mut store = MockOrderStore::new();
        store.expect_save().returning(|_| Ok("order-3".into()));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_send()
            .withf(|to, _| to == "+233551234567")
            .times(1)
            .returning(|_, _| Ok(receipt()));

        let response = app(store, notifier)
            .oneshot(post_order(r#"{"phone": "+233551234567"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(json_body(response).await.get("totalAmount").is_none());
    }

    #[tokio::test]
    async fn lists_orders_for_phone() {
        let mut store = MockOrderStore::new();
        store
            .expect_find_by_phone()
            .withf(|phone| phone == "0551234567")
            .times(1)
            .returning(|phone| {
                Ok(vec![Order {
                    id: "order-1".into(),
                    fields: NewOrder {
                        phone: Some(phone.to_string()),
                        total_amount: Some(json!(120)),
                        ..Default::default()
                    },
                    timestamp: Some("2026-10-18T09:30:00Z".into()),
                }])
            });

        let request = Request::get("/api/orders/0551234567")
            .body(Body::empty())
            .unwrap();
        let response = app(store, MockNotifier::new())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!([{
                "id": "order-1",
                "phone": "0551234567",
                "totalAmount": 120,
                "timestamp": "2026-10-18T09:30:00Z",
            }])
        );
    }

    #[tokio::test]
    async fn no_matches_is_empty_list() {
        let mut store = MockOrderStore::new();
        store.expect_find_by_phone().returning(|_| Ok(vec![]));

        let request = Request::get("/api/orders/0200000000")
            .body(Body::empty())
            .unwrap();
        let response = app(store, MockNotifier::new())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!([]));
    }

    #[tokio::test]
    async fn read_failure_is_server_error() {
        let mut store = MockOrderStore::new();
        store
            .expect_find_by_phone()
            .returning(|_| Err(StoreError::Read(anyhow::anyhow!("unavailable"))));

        let request = Request::get("/api/orders/0551234567")
            .body(Body::empty())
            .unwrap();
        let response = app(store, MockNotifier::new())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({"error": "Failed to fetch orders"})
        );
    }

    #[tokio::test]
    async fn health_ignores_collaborators() {
        let mut store = MockOrderStore::new();
        store.expect_save().never();
        store.expect_find_by_phone().never();

        let request = Request::get("/health").body(Body::empty()).unwrap();
        let response = app(store, MockNotifier::new())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"status": "healthy"}));
    }
}
