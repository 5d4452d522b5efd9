use std::time::SystemTime;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::{
    models::order::{NewOrder, Order},
    store::{
        OrderStore, StoreError,
        value::{self, FieldValue, Fields},
    },
    util::gcloud::{Credentials, TokenSource},
};

pub const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";

const ID_FIELD: &str = "id";
const PHONE_FIELD: &str = "phone";
const TIMESTAMP_FIELD: &str = "timestamp";

#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: Fields,
}

impl Document {
    // documents are named `projects/{p}/databases/{d}/documents/{collection}/{id}`
    fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }

    // a stored `id` field takes precedence over the document id
    fn into_order(self) -> anyhow::Result<Order> {
        let doc_id = self.id().to_string();
        let mut data = value::decode_fields(self.fields);
        let id = match data.remove(ID_FIELD) {
            Some(Value::String(id)) => id,
            Some(Value::Null) | None => doc_id.clone(),
            Some(other) => other.to_string(),
        };
        let timestamp = match data.remove(TIMESTAMP_FIELD) {
            Some(Value::String(ts)) => Some(ts),
            _ => None,
        };
        let fields: NewOrder = serde_json::from_value(Value::Object(data))
            .with_context(|| format!("document {} is not a valid order", doc_id))?;

        Ok(Order {
            id,
            fields,
            timestamp,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RunQueryEntry {
    document: Option<Document>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    message: String,
}

/// [`OrderStore`] backed by the Firestore REST API.
pub struct FirestoreStore {
    client: reqwest::Client,
    tokens: TokenSource,
    documents_url: String,
    collection: String,
}

impl FirestoreStore {
    pub fn new(
        base_url: &str,
        project_id: &str,
        collection: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            tokens: TokenSource::new(credentials),
            documents_url: format!(
                "{}/v1/projects/{}/databases/(default)/documents",
                base_url.trim_end_matches('/'),
                project_id
            ),
            collection: collection.into(),
        }
    }

    async fn post<T: DeserializeOwned>(&self, url: &str, body: &Value) -> anyhow::Result<T> {
        let token = self.tokens.token().await?;
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GoogleErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(anyhow!("firestore responded with {}: {}", status, message));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl OrderStore for FirestoreStore {
    async fn save(&self, order: &NewOrder) -> Result<String, StoreError> {
        let data = match serde_json::to_value(order) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(StoreError::Write(anyhow!("order is not a JSON object"))),
            Err(e) => return Err(StoreError::Write(e.into())),
        };

        let mut fields = value::encode_fields(&data);
        fields.insert(
            TIMESTAMP_FIELD.to_string(),
            FieldValue::TimestampValue(
                humantime::format_rfc3339_micros(SystemTime::now()).to_string(),
            ),
        );

        let url = format!("{}/{}", self.documents_url, self.collection);
        let document: Document = self
            .post(&url, &json!({ "fields": fields }))
            .await
            .map_err(StoreError::Write)?;

        let id = document.id().to_string();
        log::info!("[firestore] order saved with id: {}", id);

        Ok(id)
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Vec<Order>, StoreError> {
        let query = json!({
            "structuredQuery": {
                "from": [{ "collectionId": self.collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": PHONE_FIELD },
                        "op": "EQUAL",
                        "value": FieldValue::StringValue(phone.to_string()),
                    }
                }
            }
        });

        let url = format!("{}:runQuery", self.documents_url);
        let entries: Vec<RunQueryEntry> = self
            .post(&url, &query)
            .await
            .map_err(StoreError::Read)?;

        let orders: Vec<Order> = entries
            .into_iter()
            .filter_map(|entry| entry.document)
            .filter_map(|document| match document.into_order() {
                Ok(order) => Some(order),
                Err(e) => {
                    log::warn!("[firestore] skipping document: {:#}", e);
                    None
                }
            })
            .collect();

        log::debug!("[firestore] {} orders found for {}", orders.len(), phone);

        Ok(orders)
    }
}
