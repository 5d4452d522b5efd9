use std::time::{Duration, Instant};

use base64::{Engine as _, engine::general_purpose};
use tokio::sync::{Mutex, RwLock};

const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

// the emulator accepts any bearer token, `owner` bypasses security rules
const EMULATOR_TOKEN: &str = "owner";

// google issues access tokens valid for an hour
const TOKEN_LIFETIME: Duration = Duration::from_secs(59 * 60);
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum GCloudError {
    #[error("service account key is not valid base64: {0}")]
    KeyEncoding(#[from] base64::DecodeError),

    #[error("service account key is malformed: {0}")]
    KeyFormat(#[source] std::io::Error),

    #[error("failed to build authenticator: {0}")]
    Authenticator(#[source] std::io::Error),

    #[error("failed to get access token: {0}")]
    Token(#[from] yup_oauth2::Error),

    #[error("access token response did not contain a token")]
    MissingToken,
}

pub enum Credentials {
    ServiceAccount(yup_oauth2::ServiceAccountKey),
    Emulator,
}

impl Credentials {
    /// Decode a base64 encoded service account key JSON file.
    pub fn from_base64_key(encoded: &str) -> Result<Self, GCloudError> {
        let key = general_purpose::STANDARD.decode(encoded.trim())?;
        let key = yup_oauth2::parse_service_account_key(key).map_err(GCloudError::KeyFormat)?;

        Ok(Self::ServiceAccount(key))
    }
}

#[derive(Debug)]
struct CachedToken {
    token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn fresh(&self) -> Option<&str> {
        (Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at).then_some(self.token.as_str())
    }
}

/// Hands out OAuth2 access tokens for the Firestore API, refreshing them
/// shortly before they expire. Concurrent callers share one refresh.
pub struct TokenSource {
    credentials: Credentials,
    cache: RwLock<Option<CachedToken>>,
    refresh_lock: Mutex<()>,
}

impl TokenSource {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            cache: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    pub async fn token(&self) -> Result<String, GCloudError> {
        let key = match &self.credentials {
            Credentials::Emulator => return Ok(EMULATOR_TOKEN.to_string()),
            Credentials::ServiceAccount(key) => key,
        };

        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let _guard = self.refresh_lock.lock().await;
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        log::debug!("[gcloud] refreshing access token for {}", key.client_email);
        let auth = yup_oauth2::ServiceAccountAuthenticator::builder(key.clone())
            .build()
            .await
            .map_err(GCloudError::Authenticator)?;

        let result = auth.token(&[DATASTORE_SCOPE]).await?;
        let token = result.token().ok_or(GCloudError::MissingToken)?.to_string();

        {
            let mut cache = self.cache.write().await;
            *cache = Some(CachedToken {
                token: token.clone(),
                expires_at: Instant::now() + TOKEN_LIFETIME,
            })
        }

        Ok(token)
    }

    async fn cached(&self) -> Option<String> {
        let cache = self.cache.read().await;
        cache.as_ref().and_then(CachedToken::fresh).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emulator_uses_static_token() {
        let source = TokenSource::new(Credentials::Emulator);
        assert_eq!(source.token().await.unwrap(), "owner");
    }

    #[test]
    fn rejects_non_base64_key() {
        let result = Credentials::from_base64_key("not base64 at all!");
        assert!(matches!(result, Err(GCloudError::KeyEncoding(_))));
    }

    #[test]
    fn rejects_malformed_key() {
        let encoded = general_purpose::STANDARD.encode(r#"{"type": "service_account"}"#);
        let result = Credentials::from_base64_key(&encoded);
        assert!(matches!(result, Err(GCloudError::KeyFormat(_))));
    }

    #[test]
    fn cached_token_expires_early() {
        let stale = CachedToken {
            token: "t".into(),
            expires_at: Instant::now() + Duration::from_secs(30),
        };
        assert!(stale.fresh().is_none());

        let fresh = CachedToken {
            token: "t".into(),
            expires_at: Instant::now() + TOKEN_LIFETIME,
        };
        assert_eq!(fresh.fresh(), Some("t"));
    }
}
