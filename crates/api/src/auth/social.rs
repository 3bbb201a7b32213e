//! Social identity token verification (Sign in with Apple, Google Sign-In).
//!
//! Both providers issue RS256 JWTs signed with keys published as a JWKS
//! document. [`JwksVerifier`] fetches that document with `reqwest`, caches it,
//! and checks signature, issuer, audience and expiry with `jsonwebtoken`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// How long a fetched key set is trusted.
const JWKS_TTL: Duration = Duration::from_secs(60 * 60);

/// An unknown `kid` triggers a refetch at most this often.
const JWKS_MIN_REFETCH: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialProvider {
    Apple,
    Google,
}

impl SocialProvider {
    /// Value stored in the `users.provider` column.
    pub const fn as_str(self) -> &'static str {
        match self {
            SocialProvider::Apple => "apple",
            SocialProvider::Google => "google",
        }
    }

    pub const fn issuers(self) -> &'static [&'static str] {
        match self {
            SocialProvider::Apple => &["https://appleid.apple.com"],
            SocialProvider::Google => &["accounts.google.com", "https://accounts.google.com"],
        }
    }

    pub const fn jwks_url(self) -> &'static str {
        match self {
            SocialProvider::Apple => "https://appleid.apple.com/auth/keys",
            SocialProvider::Google => "https://www.googleapis.com/oauth2/v3/certs",
        }
    }
}

impl std::fmt::Display for SocialProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SocialProvider::Apple => "Apple",
            SocialProvider::Google => "Google",
        })
    }
}

/// The identity a provider vouches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderIdentity {
    /// The provider's stable subject id (`sub`).
    pub provider_user_id: String,
    pub email: Option<String>,
    pub email_verified: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("Failed to fetch signing keys: {0}")]
    Jwks(#[from] reqwest::Error),

    #[error("Token rejected: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Token header has no key id")]
    MissingKid,

    #[error("No signing key with id {0}")]
    UnknownKey(String),
}

/// Verifies a provider-issued identity token.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    fn provider(&self) -> SocialProvider;

    async fn verify(&self, id_token: &str) -> Result<ProviderIdentity, VerifyError>;
}

/// Apple sends `email_verified` as a string, Google as a bool.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Text(String),
}

impl Flag {
    fn is_true(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Text(s) => s.eq_ignore_ascii_case("true"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IdentityClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<Flag>,
}

impl From<IdentityClaims> for ProviderIdentity {
    fn from(claims: IdentityClaims) -> Self {
        Self {
            provider_user_id: claims.sub,
            email: claims.email.filter(|e| !e.trim().is_empty()),
            email_verified: claims.email_verified.is_some_and(|f| f.is_true()),
        }
    }
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

/// [`IdentityVerifier`] backed by the provider's published JWKS.
pub struct JwksVerifier {
    provider: SocialProvider,
    audiences: Vec<String>,
    jwks_url: String,
    client: reqwest::Client,
    cache: RwLock<Option<CachedKeys>>,
}

impl JwksVerifier {
    /// * `audiences` - Client ids accepted as the token's `aud`.
    pub fn new(provider: SocialProvider, audiences: Vec<String>, client: reqwest::Client) -> Self {
        Self {
            provider,
            audiences,
            jwks_url: provider.jwks_url().to_string(),
            client,
            cache: RwLock::new(None),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(self.audiences.as_slice());
        validation.set_issuer(self.provider.issuers());
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation
    }

    async fn fetch_keys(&self) -> Result<JwkSet, VerifyError> {
        let keys = self
            .client
            .get(&self.jwks_url)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;
        tracing::debug!(provider = %self.provider, count = keys.keys.len(), "Fetched JWKS");
        Ok(keys)
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, VerifyError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                let age = cached.fetched_at.elapsed();
                if age < JWKS_TTL {
                    if let Some(jwk) = cached.keys.find(kid) {
                        return Ok(DecodingKey::from_jwk(jwk)?);
                    }
                    if age < JWKS_MIN_REFETCH {
                        return Err(VerifyError::UnknownKey(kid.to_string()));
                    }
                }
            }
        }

        let keys = self.fetch_keys().await?;
        let key = keys.find(kid).map(DecodingKey::from_jwk).transpose()?;
        *self.cache.write().await = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });
        key.ok_or_else(|| VerifyError::UnknownKey(kid.to_string()))
    }
}

#[async_trait]
impl IdentityVerifier for JwksVerifier {
    fn provider(&self) -> SocialProvider {
        self.provider
    }

    async fn verify(&self, id_token: &str) -> Result<ProviderIdentity, VerifyError> {
        let header = decode_header(id_token)?;
        let kid = header.kid.ok_or(VerifyError::MissingKid)?;
        let key = self.decoding_key(&kid).await?;

        let data = decode::<IdentityClaims>(id_token, &key, &self.validation())?;
        Ok(data.claims.into())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use jsonwebtoken::{encode, EncodingKey, Header};

    use super::*;

    fn verifier() -> JwksVerifier {
        JwksVerifier::new(
            SocialProvider::Google,
            vec!["client.apps.googleusercontent.com".to_string()],
            reqwest::Client::new(),
        )
    }

    #[test]
    fn email_verified_accepts_bool_and_string() {
        let google: IdentityClaims =
            serde_json::from_str(r#"{"sub":"1","email":"a@b.io","email_verified":true}"#).unwrap();
        let apple: IdentityClaims =
            serde_json::from_str(r#"{"sub":"2","email":"c@d.io","email_verified":"true"}"#).unwrap();
        let unverified: IdentityClaims =
            serde_json::from_str(r#"{"sub":"3","email":"e@f.io","email_verified":"false"}"#).unwrap();

        assert!(ProviderIdentity::from(google).email_verified);
        assert!(ProviderIdentity::from(apple).email_verified);
        assert!(!ProviderIdentity::from(unverified).email_verified);
    }

    #[test]
    fn missing_email_is_unverified() {
        let claims: IdentityClaims = serde_json::from_str(r#"{"sub":"000123.abc"}"#).unwrap();
        let identity = ProviderIdentity::from(claims);

        assert_eq!(identity.provider_user_id, "000123.abc");
        assert_eq!(identity.email, None);
        assert!(!identity.email_verified);
    }

    #[test]
    fn provider_column_values() {
        assert_eq!(SocialProvider::Apple.as_str(), "apple");
        assert_eq!(SocialProvider::Google.as_str(), "google");
        assert!(SocialProvider::Google
            .issuers()
            .contains(&"https://accounts.google.com"));
    }

    #[tokio::test]
    async fn garbage_token_is_rejected_without_fetching() {
        let result = verifier().verify("not.a.jwt").await;
        assert_matches!(result, Err(VerifyError::Token(_)));
    }

    #[tokio::test]
    async fn token_without_kid_is_rejected() {
        let token = encode(
            &Header::default(),
            &serde_json::json!({"sub": "1", "exp": 4_000_000_000_i64}),
            &EncodingKey::from_secret(b"irrelevant"),
        )
        .unwrap();

        let result = verifier().verify(&token).await;
        assert_matches!(result, Err(VerifyError::MissingKid));
    }
}
