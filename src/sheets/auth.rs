//! Google service-account authentication.
//!
//! Builds an RS256-signed JWT assertion from the service-account key and
//! exchanges it at the key's `token_uri` for a bearer token. The token is
//! reused until shortly before it expires.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::sha2::Sha256;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the token's stated expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Fields of the service-account key file this client needs.
#[derive(Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse service account key JSON")
    }

    /// Key from a base64-encoded JSON value, as deployed through the environment.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .context("GOOGLE_CREDENTIALS_BASE64 is not valid base64")?;
        let json = String::from_utf8(bytes).context("Decoded credentials are not UTF-8")?;
        Self::from_json(&json)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials file: {}", path.display()))?;
        Self::from_json(&json)
    }

    /// The base64 environment value wins; the key file is the local fallback.
    pub fn load(base64_env: Option<&SecretString>, path: &Path) -> Result<Self> {
        match base64_env {
            Some(encoded) => {
                info!("Using service account credentials from environment");
                Self::from_base64(encoded.expose_secret())
            }
            None => {
                info!(path = %path.display(), "Using service account credentials file");
                Self::from_file(path)
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct JwtHeader<'a> {
    alg: &'a str,
    typ: &'a str,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct JwtClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_LIFETIME_SECS as u64
}

struct CachedToken {
    token: String,
    refresh_at: Instant,
}

/// Signs assertions and caches the resulting access token.
pub struct ServiceAccountAuth {
    client_email: String,
    token_uri: String,
    scope: String,
    signing_key: SigningKey<Sha256>,
    token: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for ServiceAccountAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountAuth")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("signing_key", &"<redacted>")
            .finish()
    }
}

impl ServiceAccountAuth {
    pub fn new(key: ServiceAccountKey, scope: &str) -> Result<Self> {
        // Keys pasted through env files sometimes carry literal "\n".
        let pem = key.private_key.replace("\\n", "\n");
        let pem = pem.trim();

        let private_key = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .context("Failed to parse service account private key")?;

        Ok(Self {
            client_email: key.client_email,
            token_uri: key.token_uri,
            scope: scope.to_string(),
            signing_key: SigningKey::<Sha256>::new(private_key),
            token: Mutex::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    /// Signed `header.claims.signature` assertion issued at `issued_at` (unix seconds).
    fn assertion(&self, issued_at: i64) -> Result<String> {
        let header = JwtHeader {
            alg: "RS256",
            typ: "JWT",
        };
        let claims = JwtClaims {
            iss: self.client_email.clone(),
            scope: self.scope.clone(),
            aud: self.token_uri.clone(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?)
        );
        let signature = self.signing_key.sign(signing_input.as_bytes());

        Ok(format!(
            "{signing_input}.{}",
            URL_SAFE_NO_PAD.encode(signature.to_bytes())
        ))
    }

    /// Current bearer token, exchanging a fresh assertion when needed.
    pub async fn access_token(&self, http: &reqwest::Client) -> Result<SecretString> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(SecretString::from(token.token.clone()));
            }
        }

        let assertion = self.assertion(chrono::Utc::now().timestamp())?;
        let response = http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .context("OAuth token request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("OAuth token endpoint error ({status}): {body}");
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse OAuth token response")?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        debug!(expires_in = token.expires_in, "Obtained service account access token");

        let secret = SecretString::from(token.access_token.clone());
        *cached = Some(CachedToken {
            token: token.access_token,
            refresh_at: Instant::now() + lifetime,
        });

        Ok(secret)
    }
}
