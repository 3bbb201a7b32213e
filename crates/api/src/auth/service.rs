//! The authentication and session lifecycle.
//!
//! [`AuthService`] ties the credential validators, the session store and the
//! token issuer together. Handlers and extractors call into it; it never
//! touches HTTP types.

use std::collections::HashMap;
use std::sync::Arc;

use myorder_core::email::normalize_email;
use myorder_core::roles::{Role, Status};
use myorder_core::types::{DbId, SessionId};
use myorder_db::models::session::Session;
use myorder_db::models::user::{CreateUser, UpdateUser, User, PROVIDER_EMAIL};
use myorder_db::repositories::{SessionRepo, UserRepo};
use myorder_db::StoreError;

use crate::auth::error::{AuthError, AuthResult};
use crate::auth::jwt::{
    issue_token_pair, validate_refresh_token, AccessClaims, JwtConfig, TokenPair,
};
use crate::auth::password::{
    burn_verification, hash_password, validate_password_strength, verify_password,
};
use crate::auth::social::{IdentityVerifier, SocialProvider};

/// Input for email/password registration.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Optional names supplied alongside a social identity token.
///
/// Apple only hands these to the client on the very first sign-in.
#[derive(Debug, Clone, Default)]
pub struct ProfileNames {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Self-service profile changes. `password` requires `old_password`.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub old_password: Option<String>,
}

pub struct AuthService {
    users: UserRepo,
    sessions: SessionRepo,
    jwt: JwtConfig,
    password_min_length: usize,
    verifiers: HashMap<SocialProvider, Arc<dyn IdentityVerifier>>,
}

impl AuthService {
    pub fn new(
        users: UserRepo,
        sessions: SessionRepo,
        jwt: JwtConfig,
        password_min_length: usize,
    ) -> Self {
        Self {
            users,
            sessions,
            jwt,
            password_min_length,
            verifiers: HashMap::new(),
        }
    }

    /// Enable sign-in with the verifier's provider.
    pub fn with_verifier(mut self, verifier: Arc<dyn IdentityVerifier>) -> Self {
        self.verifiers.insert(verifier.provider(), verifier);
        self
    }

    pub fn jwt(&self) -> &JwtConfig {
        &self.jwt
    }

    // -----------------------------------------------------------------------
    // Credential validators
    // -----------------------------------------------------------------------

    /// Resolve an active user from email and password.
    ///
    /// Fails with [`AuthError::UserNotFound`] or
    /// [`AuthError::InvalidCredentials`]. The login handler reports both as
    /// invalid credentials.
    pub async fn validate_password(&self, email: &str, password: &str) -> AuthResult<User> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .filter(User::is_active);

        let Some(user) = user else {
            burn_blocking(password).await?;
            return Err(AuthError::UserNotFound);
        };
        // Social-only accounts have no password to match.
        let Some(hash) = user.password_hash.clone() else {
            burn_blocking(password).await?;
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_blocking(password, hash).await? {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(user)
    }

    /// Create an email/password account with the `user` role.
    pub async fn register(&self, input: NewAccount) -> AuthResult<User> {
        let email = normalize_email(&input.email);
        if email.is_empty() {
            return Err(AuthError::Validation("Email is required".into()));
        }
        validate_password_strength(&input.password, self.password_min_length)
            .map_err(AuthError::Validation)?;

        let password_hash = hash_blocking(input.password).await?;
        let user = self
            .users
            .create(CreateUser {
                email: Some(email),
                password_hash: Some(password_hash),
                provider: PROVIDER_EMAIL.to_string(),
                social_id: None,
                first_name: input.first_name,
                last_name: input.last_name,
                role_id: Role::User.id(),
                status_id: Status::Active.id(),
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::EmailTaken,
                other => other.into(),
            })?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Resolve (or auto-register) the user behind a social identity token.
    ///
    /// Lookup order: the bound provider id, then a live account holding the
    /// same email if the provider reports it verified, then a new account.
    pub async fn social_login(
        &self,
        provider: SocialProvider,
        id_token: &str,
        names: ProfileNames,
    ) -> AuthResult<User> {
        let verifier = self
            .verifiers
            .get(&provider)
            .ok_or(AuthError::ProviderNotConfigured(provider))?;

        let identity = verifier.verify(id_token).await.map_err(|e| {
            tracing::warn!(%provider, error = %e, "Identity token rejected");
            AuthError::InvalidProviderToken(provider)
        })?;

        if let Some(user) = self
            .users
            .find_by_social(provider.as_str(), &identity.provider_user_id)
            .await?
        {
            return active(user);
        }

        let verified_email = identity
            .email
            .filter(|_| identity.email_verified)
            .map(|e| normalize_email(&e));

        if let Some(email) = &verified_email {
            if let Some(existing) = self.users.find_by_email(email).await? {
                return self.link(existing, provider, identity.provider_user_id).await;
            }
        }

        let created = self
            .users
            .create(CreateUser {
                email: verified_email,
                password_hash: None,
                provider: provider.as_str().to_string(),
                social_id: Some(identity.provider_user_id.clone()),
                first_name: names.first_name,
                last_name: names.last_name,
                role_id: Role::User.id(),
                status_id: Status::Active.id(),
            })
            .await;

        match created {
            Ok(user) => {
                tracing::info!(user_id = user.id, %provider, "User registered via social login");
                Ok(user)
            }
            // A concurrent first login for the same identity won the insert.
            Err(StoreError::Conflict(_)) => self
                .users
                .find_by_social(provider.as_str(), &identity.provider_user_id)
                .await?
                .ok_or(AuthError::EmailTaken)
                .and_then(active),
            Err(e) => Err(e.into()),
        }
    }

    async fn link(
        &self,
        existing: User,
        provider: SocialProvider,
        provider_user_id: String,
    ) -> AuthResult<User> {
        let existing = active(existing)?;
        if existing.social_id.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let linked = self
            .users
            .update(
                existing.id,
                UpdateUser {
                    provider: Some(provider.as_str().to_string()),
                    social_id: Some(provider_user_id),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::EmailTaken,
                other => other.into(),
            })?
            .ok_or(AuthError::UserNotFound)?;

        tracing::info!(user_id = linked.id, %provider, "Linked social identity to existing account");
        Ok(linked)
    }

    // -----------------------------------------------------------------------
    // Sessions and tokens
    // -----------------------------------------------------------------------

    /// Start a session for an already-validated user and mint its tokens.
    pub async fn login(&self, user: &User) -> AuthResult<(TokenPair, Session)> {
        let session = self.sessions.create(user.id).await?;
        let tokens = self.issue(user, &session)?;
        tracing::info!(user_id = user.id, session_id = %session.id, "Session started");
        Ok((tokens, session))
    }

    /// Rotate a refresh token into a new pair bound to the same session.
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<(TokenPair, User)> {
        let claims =
            validate_refresh_token(refresh_token, &self.jwt).map_err(|_| AuthError::InvalidToken)?;

        let session = self
            .sessions
            .touch(claims.session_id)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .filter(User::is_active)
            .ok_or(AuthError::UserNotFound)?;

        let tokens = self.issue(&user, &session)?;
        tracing::debug!(user_id = user.id, session_id = %session.id, "Session refreshed");
        Ok((tokens, user))
    }

    /// End one session.
    pub async fn logout(&self, session_id: SessionId) -> AuthResult<()> {
        let was_live = self.sessions.delete_by_id(session_id).await?;
        tracing::info!(%session_id, was_live, "Session ended");
        Ok(())
    }

    /// End every session of `user_id` except `keep`.
    pub async fn logout_others(&self, user_id: DbId, keep: SessionId) -> AuthResult<u64> {
        Ok(self
            .sessions
            .delete_all_for_user_except(user_id, Some(keep))
            .await?)
    }

    /// End every session of `user_id`.
    pub async fn sign_out_everywhere(&self, user_id: DbId) -> AuthResult<u64> {
        let revoked = self.sessions.delete_all_for_user_except(user_id, None).await?;
        tracing::info!(user_id, revoked, "Signed out everywhere");
        Ok(revoked)
    }

    fn issue(&self, user: &User, session: &Session) -> AuthResult<TokenPair> {
        issue_token_pair(user, session, &self.jwt)
            .map_err(|e| AuthError::Internal(format!("Token generation error: {e}")))
    }

    // -----------------------------------------------------------------------
    // Current user
    // -----------------------------------------------------------------------

    /// Re-load the user behind verified access claims.
    pub async fn resolve_current_user(&self, claims: &AccessClaims) -> AuthResult<User> {
        self.users
            .find_by_id(claims.sub)
            .await?
            .filter(User::is_active)
            .ok_or_else(|| {
                AuthError::Unauthorized(
                    "User object does not exist after successful authentication".into(),
                )
            })
    }

    /// Apply self-service profile changes.
    ///
    /// A password change signs out every session except `current_session`.
    pub async fn update_profile(
        &self,
        user: &User,
        current_session: SessionId,
        update: ProfileUpdate,
    ) -> AuthResult<User> {
        let mut patch = UpdateUser {
            first_name: update.first_name,
            last_name: update.last_name,
            ..Default::default()
        };

        let changing_password = update.password.is_some();
        if let Some(password) = update.password {
            let Some(current_hash) = user.password_hash.clone() else {
                return Err(AuthError::Validation(
                    "This account signs in with a social provider and has no password".into(),
                ));
            };
            let old_password = update
                .old_password
                .ok_or_else(|| AuthError::Validation("Old password is required".into()))?;
            if !verify_blocking(&old_password, current_hash).await? {
                return Err(AuthError::Validation("Incorrect old password".into()));
            }
            validate_password_strength(&password, self.password_min_length)
                .map_err(AuthError::Validation)?;
            patch.password_hash = Some(hash_blocking(password).await?);
        }

        let updated = self
            .users
            .update(user.id, patch)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if changing_password {
            let revoked = self
                .sessions
                .delete_all_for_user_except(user.id, Some(current_session))
                .await?;
            tracing::info!(user_id = user.id, revoked, "Password changed");
        }
        Ok(updated)
    }

    /// Soft-delete the user. Sessions are left in place; the access guard
    /// and refresh both reject a deleted owner.
    pub async fn delete_account(&self, user_id: DbId) -> AuthResult<()> {
        if !self.users.soft_delete(user_id).await? {
            return Err(AuthError::UserNotFound);
        }
        tracing::info!(user_id, "Account deleted");
        Ok(())
    }
}

fn active(user: User) -> AuthResult<User> {
    if user.is_active() {
        Ok(user)
    } else {
        Err(AuthError::UserNotFound)
    }
}

async fn verify_blocking(password: &str, hash: String) -> AuthResult<bool> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AuthError::Internal(format!("Password task failed: {e}")))?
        .map_err(|e| AuthError::Internal(format!("Password verification error: {e}")))
}

async fn hash_blocking(password: String) -> AuthResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AuthError::Internal(format!("Password task failed: {e}")))?
        .map_err(|e| AuthError::Internal(format!("Password hashing error: {e}")))
}

async fn burn_blocking(password: &str) -> AuthResult<()> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || burn_verification(&password))
        .await
        .map_err(|e| AuthError::Internal(format!("Password task failed: {e}")))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use myorder_db::MemoryStore;

    use super::*;
    use crate::auth::jwt::validate_access_token;
    use crate::auth::social::{ProviderIdentity, VerifyError};

    const PASSWORD: &str = "hunter2-but-longer";

    /// Accepts tokens of the form `sub|email|verified`.
    struct StubVerifier(SocialProvider);

    #[async_trait]
    impl IdentityVerifier for StubVerifier {
        fn provider(&self) -> SocialProvider {
            self.0
        }

        async fn verify(&self, id_token: &str) -> Result<ProviderIdentity, VerifyError> {
            let mut parts = id_token.split('|');
            let sub = parts.next().filter(|s| !s.is_empty());
            let Some(sub) = sub else {
                return Err(VerifyError::MissingKid);
            };
            Ok(ProviderIdentity {
                provider_user_id: sub.to_string(),
                email: parts.next().filter(|s| !s.is_empty()).map(str::to_string),
                email_verified: parts.next() == Some("true"),
            })
        }
    }

    fn service() -> AuthService {
        let users = UserRepo::new(Arc::new(MemoryStore::<User>::new()));
        let sessions = SessionRepo::new(Arc::new(MemoryStore::<Session>::new()));
        let jwt = JwtConfig {
            access_secret: "test-access-secret".into(),
            refresh_secret: "test-refresh-secret".into(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 30,
        };
        AuthService::new(users, sessions, jwt, 8)
            .with_verifier(Arc::new(StubVerifier(SocialProvider::Apple)))
            .with_verifier(Arc::new(StubVerifier(SocialProvider::Google)))
    }

    async fn registered(svc: &AuthService, email: &str) -> User {
        svc.register(NewAccount {
            email: email.to_string(),
            password: PASSWORD.to_string(),
            first_name: Some("Ada".into()),
            last_name: None,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn password_login_resolves_the_user() {
        let svc = service();
        let user = registered(&svc, "Owner@Shop.io").await;
        assert_eq!(user.email.as_deref(), Some("owner@shop.io"));

        let resolved = svc.validate_password("  OWNER@shop.io ", PASSWORD).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_fail() {
        let svc = service();
        registered(&svc, "owner@shop.io").await;

        assert_matches!(
            svc.validate_password("owner@shop.io", "wrong-password").await,
            Err(AuthError::InvalidCredentials)
        );
        assert_matches!(
            svc.validate_password("nobody@shop.io", PASSWORD).await,
            Err(AuthError::UserNotFound)
        );
    }

    #[tokio::test]
    async fn inactive_user_cannot_log_in() {
        let svc = service();
        let user = registered(&svc, "owner@shop.io").await;
        svc.users
            .update(
                user.id,
                UpdateUser {
                    status_id: Some(Status::Inactive.id()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_matches!(
            svc.validate_password("owner@shop.io", PASSWORD).await,
            Err(AuthError::UserNotFound)
        );
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let svc = service();
        registered(&svc, "owner@shop.io").await;

        let again = svc
            .register(NewAccount {
                email: "OWNER@shop.io".into(),
                password: PASSWORD.into(),
                first_name: None,
                last_name: None,
            })
            .await;
        assert_matches!(again, Err(AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let svc = service();
        let result = svc
            .register(NewAccount {
                email: "a@shop.io".into(),
                password: "short".into(),
                first_name: None,
                last_name: None,
            })
            .await;
        assert_matches!(result, Err(AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn access_token_carries_user_role_and_session() {
        let svc = service();
        let user = registered(&svc, "owner@shop.io").await;

        let (tokens, session) = svc.login(&user).await.unwrap();
        let claims = validate_access_token(&tokens.access_token, svc.jwt()).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, Role::User.id());
        assert_eq!(claims.session_id, session.id);
    }

    #[tokio::test]
    async fn refresh_reuses_the_session() {
        let svc = service();
        let user = registered(&svc, "owner@shop.io").await;
        let (tokens, session) = svc.login(&user).await.unwrap();

        let (rotated, refreshed_user) = svc.refresh(&tokens.refresh_token).await.unwrap();
        let claims = validate_access_token(&rotated.access_token, svc.jwt()).unwrap();

        assert_eq!(refreshed_user.id, user.id);
        assert_eq!(claims.session_id, session.id);
        assert_eq!(svc.sessions.list_for_user(user.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn refresh_after_logout_fails() {
        let svc = service();
        let user = registered(&svc, "owner@shop.io").await;
        let (tokens, session) = svc.login(&user).await.unwrap();

        svc.logout(session.id).await.unwrap();

        assert_matches!(
            svc.refresh(&tokens.refresh_token).await,
            Err(AuthError::SessionNotFound)
        );
    }

    #[tokio::test]
    async fn refresh_with_garbage_fails() {
        let svc = service();
        assert_matches!(svc.refresh("garbage").await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn expired_refresh_token_fails_for_a_live_session() {
        use crate::auth::jwt::RefreshClaims;
        use chrono::Utc;
        use jsonwebtoken::{encode, EncodingKey, Header};

        let svc = service();
        let user = registered(&svc, "owner@shop.io").await;
        let (_, session) = svc.login(&user).await.unwrap();

        let now = Utc::now().timestamp();
        // Well past the default 60-second leeway.
        let claims = RefreshClaims {
            session_id: session.id,
            iat: now - 600,
            exp: now - 300,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(svc.jwt().refresh_secret.as_bytes()),
        )
        .unwrap();

        assert_matches!(svc.refresh(&token).await, Err(AuthError::InvalidToken));
        assert!(svc.sessions.find_by_id(session.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn access_token_is_not_a_refresh_token() {
        let svc = service();
        let user = registered(&svc, "owner@shop.io").await;
        let (tokens, _) = svc.login(&user).await.unwrap();

        assert_matches!(
            svc.refresh(&tokens.access_token).await,
            Err(AuthError::InvalidToken)
        );
    }

    #[tokio::test]
    async fn refresh_for_deleted_user_fails() {
        let svc = service();
        let user = registered(&svc, "owner@shop.io").await;
        let (tokens, _) = svc.login(&user).await.unwrap();

        svc.delete_account(user.id).await.unwrap();

        assert_matches!(
            svc.refresh(&tokens.refresh_token).await,
            Err(AuthError::UserNotFound)
        );
    }

    #[tokio::test]
    async fn logout_others_keeps_only_the_current_session() {
        let svc = service();
        let user = registered(&svc, "owner@shop.io").await;
        let (_, phone) = svc.login(&user).await.unwrap();
        let (_, laptop) = svc.login(&user).await.unwrap();
        let (_, tablet) = svc.login(&user).await.unwrap();

        assert_eq!(svc.logout_others(user.id, laptop.id).await.unwrap(), 2);

        let live: Vec<_> = svc
            .sessions
            .list_for_user(user.id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(live, vec![laptop.id]);
        assert!(!live.contains(&phone.id) && !live.contains(&tablet.id));

        assert_eq!(svc.sign_out_everywhere(user.id).await.unwrap(), 1);
        assert!(svc.sessions.list_for_user(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleted_user_is_rejected_by_resolve() {
        let svc = service();
        let user = registered(&svc, "owner@shop.io").await;
        let (tokens, _) = svc.login(&user).await.unwrap();
        let claims = validate_access_token(&tokens.access_token, svc.jwt()).unwrap();

        assert_eq!(svc.resolve_current_user(&claims).await.unwrap().id, user.id);

        svc.delete_account(user.id).await.unwrap();

        assert_matches!(
            svc.resolve_current_user(&claims).await,
            Err(AuthError::Unauthorized(_))
        );
    }

    #[tokio::test]
    async fn social_login_registers_then_resolves() {
        let svc = service();
        let names = ProfileNames {
            first_name: Some("Tim".into()),
            last_name: None,
        };

        let first = svc
            .social_login(SocialProvider::Apple, "apple-sub-1|tim@icloud.com|true", names)
            .await
            .unwrap();
        assert_eq!(first.provider, "apple");
        assert_eq!(first.social_id.as_deref(), Some("apple-sub-1"));
        assert_eq!(first.email.as_deref(), Some("tim@icloud.com"));
        assert_eq!(first.first_name.as_deref(), Some("Tim"));
        assert!(first.password_hash.is_none());

        // Apple omits the email after the first sign-in.
        let again = svc
            .social_login(SocialProvider::Apple, "apple-sub-1||", ProfileNames::default())
            .await
            .unwrap();
        assert_eq!(again.id, first.id);
    }

    #[tokio::test]
    async fn unverified_email_is_not_stored_or_linked() {
        let svc = service();
        let owner = registered(&svc, "owner@shop.io").await;

        let user = svc
            .social_login(
                SocialProvider::Google,
                "g-1|owner@shop.io|false",
                ProfileNames::default(),
            )
            .await
            .unwrap();

        assert_ne!(user.id, owner.id);
        assert_eq!(user.email, None);
    }

    #[tokio::test]
    async fn verified_email_links_existing_account() {
        let svc = service();
        let owner = registered(&svc, "owner@shop.io").await;

        let user = svc
            .social_login(
                SocialProvider::Google,
                "g-2|Owner@Shop.io|true",
                ProfileNames::default(),
            )
            .await
            .unwrap();

        assert_eq!(user.id, owner.id);
        assert_eq!(user.social_id.as_deref(), Some("g-2"));
        assert!(user.password_hash.is_some(), "password login keeps working");
    }

    #[tokio::test]
    async fn rejected_identity_token_maps_to_provider_error() {
        let svc = service();
        assert_matches!(
            svc.social_login(SocialProvider::Google, "", ProfileNames::default())
                .await,
            Err(AuthError::InvalidProviderToken(SocialProvider::Google))
        );
    }

    #[tokio::test]
    async fn unconfigured_provider_is_rejected() {
        let users = UserRepo::new(Arc::new(MemoryStore::<User>::new()));
        let sessions = SessionRepo::new(Arc::new(MemoryStore::<Session>::new()));
        let svc = AuthService::new(users, sessions, service().jwt().clone(), 8);

        assert_matches!(
            svc.social_login(SocialProvider::Apple, "x|y|true", ProfileNames::default())
                .await,
            Err(AuthError::ProviderNotConfigured(SocialProvider::Apple))
        );
    }

    #[tokio::test]
    async fn password_change_requires_old_password_and_revokes_other_sessions() {
        let svc = service();
        let user = registered(&svc, "owner@shop.io").await;
        let (_, current) = svc.login(&user).await.unwrap();
        let (_, other) = svc.login(&user).await.unwrap();

        let wrong = svc
            .update_profile(
                &user,
                current.id,
                ProfileUpdate {
                    password: Some("brand-new-password".into()),
                    old_password: Some("not-it".into()),
                    ..Default::default()
                },
            )
            .await;
        assert_matches!(wrong, Err(AuthError::Validation(msg)) if msg == "Incorrect old password");

        svc.update_profile(
            &user,
            current.id,
            ProfileUpdate {
                password: Some("brand-new-password".into()),
                old_password: Some(PASSWORD.into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(svc.sessions.find_by_id(current.id).await.unwrap().is_some());
        assert!(svc.sessions.find_by_id(other.id).await.unwrap().is_none());
        assert!(svc
            .validate_password("owner@shop.io", "brand-new-password")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn name_change_keeps_sessions() {
        let svc = service();
        let user = registered(&svc, "owner@shop.io").await;
        let (_, current) = svc.login(&user).await.unwrap();
        let (_, other) = svc.login(&user).await.unwrap();

        let updated = svc
            .update_profile(
                &user,
                current.id,
                ProfileUpdate {
                    last_name: Some("Lovelace".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.last_name.as_deref(), Some("Lovelace"));
        assert_eq!(updated.first_name.as_deref(), Some("Ada"));
        assert!(svc.sessions.find_by_id(other.id).await.unwrap().is_some());
    }
}
