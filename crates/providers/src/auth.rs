use chrono::{Duration, Utc};
use indexpush_transport::{HttpRequest, HttpTransport};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::AuthError;

pub const INDEXING_SCOPE: &str = "https://www.googleapis.com/auth/indexing";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertion lifetime accepted by the token endpoint
const ASSERTION_TTL_SECS: i64 = 3600;

/// The subset of a Google service-account key file we need
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Claims of the signed assertion exchanged for an access token
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub fn load_service_account(path: impl AsRef<Path>) -> Result<ServiceAccountKey, AuthError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| AuthError::InvalidKeyFile(e.to_string()))
}

/// Build the RS256 assertion for `scope`
pub fn sign_assertion(key: &ServiceAccountKey, scope: &str) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = AssertionClaims {
        iss: key.client_email.clone(),
        scope: scope.to_string(),
        aud: key.token_uri.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ASSERTION_TTL_SECS)).timestamp(),
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| AuthError::InvalidKeyFile(e.to_string()))?;

    encode(&header, &claims, &encoding_key).map_err(|e| AuthError::Signing(e.to_string()))
}

/// Exchange a signed assertion for a bearer token
pub async fn fetch_access_token(
    transport: &dyn HttpTransport,
    key: &ServiceAccountKey,
    scope: &str,
) -> Result<String, AuthError> {
    let assertion = sign_assertion(key, scope)?;

    debug!(client = %key.client_email, "Requesting access token");

    let request = HttpRequest::post(&key.token_uri).form(vec![
        ("grant_type".to_string(), JWT_BEARER_GRANT.to_string()),
        ("assertion".to_string(), assertion),
    ]);

    let response = transport.send(request).await?;
    if !response.is_ok() {
        return Err(AuthError::TokenRejected {
            status: response.status,
        });
    }

    let token: TokenResponse = serde_json::from_str(&response.body)
        .map_err(|e| AuthError::InvalidTokenResponse(e.to_string()))?;

    Ok(token.access_token)
}
