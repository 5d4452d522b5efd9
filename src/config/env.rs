use crate::util::deserialize_arc_str;
use dotenvy::dotenv;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::sync::Arc;
use validator::{Validate, ValidationError};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Prd,
}

impl Environment {
    /// Read `ENVIRONMENT` directly, for code that runs before [`ENV`] is loaded.
    pub fn from_env() -> Self {
        match std::env::var("ENVIRONMENT").as_deref() {
            Ok("prd") => Self::Prd,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        *self == Self::Dev
    }
}

#[derive(Debug, Validate, Deserialize)]
#[validate(schema(function = "validate_credentials"))]
pub struct Env {
    #[serde(default)]
    pub environment: Environment,

    #[serde(default = "default_port")]
    #[validate(range(min = 1, message = "PORT must be a valid port number"))]
    pub port: u16,

    #[validate(length(min = 1, message = "FIREBASE_PROJECT_ID must not be empty"))]
    #[serde(deserialize_with = "deserialize_arc_str")]
    pub firebase_project_id: Arc<str>,

    #[serde(default = "default_collection", deserialize_with = "deserialize_arc_str")]
    #[validate(length(min = 1, message = "FIRESTORE_COLLECTION must not be empty"))]
    pub firestore_collection: Arc<str>,

    // base64 encoded service account key
    #[serde(default)]
    pub gcloud_srv: Option<String>,

    #[serde(default)]
    pub firestore_emulator_host: Option<String>,

    #[validate(length(min = 1, message = "TWILIO_ACCOUNT_SID must not be empty"))]
    #[serde(deserialize_with = "deserialize_arc_str")]
    pub twilio_account_sid: Arc<str>,

    #[validate(length(min = 1, message = "TWILIO_AUTH_TOKEN must not be empty"))]
    #[serde(deserialize_with = "deserialize_arc_str")]
    pub twilio_auth_token: Arc<str>,

    #[validate(length(min = 1, message = "TWILIO_PHONE_NUMBER must not be empty"))]
    #[serde(deserialize_with = "deserialize_arc_str")]
    pub twilio_phone_number: Arc<str>,

    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_port() -> u16 {
    3000
}

fn default_collection() -> Arc<str> {
    Arc::from("orders")
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        String::from("https://ecormerce-frontend.vercel.app"),
        String::from("http://localhost:3000"),
        String::from("https://eccomerce-backend-ep7i.onrender.com"),
    ]
}

fn validate_credentials(env: &Env) -> Result<(), ValidationError> {
    let has_key = env.gcloud_srv.as_deref().is_some_and(|k| !k.is_empty());
    let has_emulator = env
        .firestore_emulator_host
        .as_deref()
        .is_some_and(|h| !h.is_empty());

    if has_key || has_emulator {
        Ok(())
    } else {
        Err(ValidationError::new("credentials")
            .with_message("one of GCLOUD_SRV or FIRESTORE_EMULATOR_HOST must be set".into()))
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl Env {
    pub fn new() -> Self {
        let _ = dotenv();

        let env: Self = envy::from_env().unwrap_or_else(|e| {
            log::error!("{}, exiting ... ", e);
            std::process::exit(1);
        });

        env.validate().unwrap_or_else(|e| {
            let message = e
                .field_errors()
                .values()
                .flat_map(|e| e.iter())
                .filter_map(|err| {
                    err.message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .or(Some(String::from("invalid value")))
                })
                .next()
                .unwrap_or(String::from("invalid value"));

            log::error!("Environment variable error: {}, exiting ... ", message);
            std::process::exit(1);
        });

        env
    }
}

pub static ENV: Lazy<Env> = Lazy::new(Env::new);
