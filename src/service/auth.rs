use crate::database::session_cache::SessionStore;
use crate::database::user::{UserRepository, dummy_verify, hash_password, verify_password};
use crate::error::app_error::AppError;
use crate::models::token::{TokenKind, TokenPair};
use crate::models::user::{LoginRequest, RegisterRequest, Role, User};
use crate::service::token::TokenService;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Orchestrates registration, login, logout and refresh-token rotation
/// over the user store and the session cache.
pub struct AuthService<'a, U, S>
where
    U: UserRepository,
    S: SessionStore,
{
    users: &'a U,
    sessions: &'a S,
    tokens: &'a TokenService,
}

impl<'a, U, S> AuthService<'a, U, S>
where
    U: UserRepository,
    S: SessionStore,
{
    pub fn new(users: &'a U, sessions: &'a S, tokens: &'a TokenService) -> Self {
        Self { users, sessions, tokens }
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<(), AppError> {
        request.validate()?;

        let user = User {
            id: Uuid::new_v4(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            phone_number: request.phone_number.clone(),
            city: request.city.clone(),
            address: request.address.clone(),
            email: request.email.clone(),
            password_hash: hash_password(&request.password)?,
            role: request.role,
        };

        self.users.create_user(&user).await?;
        info!(user_id = %user.id, "registered new user");

        Ok(())
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<TokenPair, AppError> {
        let Some(user) = self.users.get_user_by_email(&request.email).await? else {
            dummy_verify(&request.password);
            return Err(AppError::UserNotFound);
        };

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        info!(user_id = %user.id, "login succeeded");
        self.issue_pair(user.id, user.role).await
    }

    /// Revokes the session behind the given refresh token. Absence of the
    /// session entry is reported, not ignored.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AppError> {
        let claims = self.tokens.verify(TokenKind::Refresh, refresh_token)?;

        if !self.sessions.revoke(&claims.token_id).await? {
            return Err(AppError::TokenNotFound);
        }

        info!(user_id = %claims.user_id, "session revoked");
        Ok(())
    }

    /// Rotates a refresh token: the old token id is consumed with a single
    /// atomic delete, so a replayed or concurrently-rotated token observes
    /// the missing entry and fails.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self.tokens.verify(TokenKind::Refresh, refresh_token)?;

        if !self.sessions.revoke(&claims.token_id).await? {
            return Err(AppError::TokenNotFound);
        }

        self.issue_pair(claims.user_id, claims.role).await
    }

    async fn issue_pair(&self, user_id: Uuid, role: Role) -> Result<TokenPair, AppError> {
        let access = self.tokens.issue(TokenKind::Access, user_id, role)?;
        let refresh = self.tokens.issue(TokenKind::Refresh, user_id, role)?;

        self.sessions.store(&refresh.token_id).await?;

        Ok(TokenPair::bearer(access.token, refresh.token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::test_utils::{MockRepository, MockSessionStore, register_request};

    fn token_service() -> TokenService {
        TokenService::from_config(&JwtConfig {
            access_secret: "unit-access".to_string(),
            access_ttl_seconds: 60,
            refresh_secret: "unit-refresh".to_string(),
            refresh_ttl_seconds: 3600,
        })
    }

    #[tokio::test]
    async fn register_then_login_returns_a_token_pair() {
        let users = MockRepository::default();
        let sessions = MockSessionStore::default();
        let tokens = token_service();
        let auth = AuthService::new(&users, &sessions, &tokens);

        auth.register(&register_request("a@x.com")).await.unwrap();
        let pair = auth
            .login(&LoginRequest {
                email: "a@x.com".to_string(),
                password: "hunter2hunter2".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(pair.token_type, "bearer");
        assert_eq!(sessions.len(), 1);

        let claims = tokens.verify(TokenKind::Access, &pair.access_token).unwrap();
        assert_eq!(claims.role, Role::Student);
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let users = MockRepository::default();
        let sessions = MockSessionStore::default();
        let tokens = token_service();
        let auth = AuthService::new(&users, &sessions, &tokens);

        auth.register(&register_request("a@x.com")).await.unwrap();
        let err = auth.register(&register_request("a@x.com")).await.unwrap_err();
        assert!(matches!(err, AppError::UserAlreadyExists(_)));
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let users = MockRepository::default();
        let sessions = MockSessionStore::default();
        let tokens = token_service();
        let auth = AuthService::new(&users, &sessions, &tokens);

        let mut request = register_request("a@x.com");
        request.password = "short".to_string();
        let err = auth.register(&request).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn login_with_unknown_email_is_user_not_found() {
        let users = MockRepository::default();
        let sessions = MockSessionStore::default();
        let tokens = token_service();
        let auth = AuthService::new(&users, &sessions, &tokens);

        let err = auth
            .login(&LoginRequest {
                email: "nobody@x.com".to_string(),
                password: "whatever-password".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UserNotFound));
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_invalid_credentials() {
        let users = MockRepository::default();
        let sessions = MockSessionStore::default();
        let tokens = token_service();
        let auth = AuthService::new(&users, &sessions, &tokens);

        auth.register(&register_request("a@x.com")).await.unwrap();
        let err = auth
            .login(&LoginRequest {
                email: "a@x.com".to_string(),
                password: "hunter2hunter3".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        assert_eq!(sessions.len(), 0);
    }

    #[tokio::test]
    async fn refresh_rotates_and_rejects_replay() {
        let users = MockRepository::default();
        let sessions = MockSessionStore::default();
        let tokens = token_service();
        let auth = AuthService::new(&users, &sessions, &tokens);

        auth.register(&register_request("a@x.com")).await.unwrap();
        let pair = auth
            .login(&LoginRequest {
                email: "a@x.com".to_string(),
                password: "hunter2hunter2".to_string(),
            })
            .await
            .unwrap();

        let rotated = auth.refresh(&pair.refresh_token).await.unwrap();
        assert_ne!(rotated.refresh_token, pair.refresh_token);
        assert_eq!(sessions.len(), 1);

        // The pre-rotation token has been consumed.
        let err = auth.refresh(&pair.refresh_token).await.unwrap_err();
        assert!(matches!(err, AppError::TokenNotFound));

        // The rotated one still works.
        auth.refresh(&rotated.refresh_token).await.unwrap();
    }

    #[tokio::test]
    async fn logout_revokes_and_second_logout_fails() {
        let users = MockRepository::default();
        let sessions = MockSessionStore::default();
        let tokens = token_service();
        let auth = AuthService::new(&users, &sessions, &tokens);

        auth.register(&register_request("a@x.com")).await.unwrap();
        let pair = auth
            .login(&LoginRequest {
                email: "a@x.com".to_string(),
                password: "hunter2hunter2".to_string(),
            })
            .await
            .unwrap();

        auth.logout(&pair.refresh_token).await.unwrap();
        assert_eq!(sessions.len(), 0);

        let err = auth.logout(&pair.refresh_token).await.unwrap_err();
        assert!(matches!(err, AppError::TokenNotFound));
    }

    #[tokio::test]
    async fn refresh_with_garbage_token_is_corrupted() {
        let users = MockRepository::default();
        let sessions = MockSessionStore::default();
        let tokens = token_service();
        let auth = AuthService::new(&users, &sessions, &tokens);

        let err = auth.refresh("garbage").await.unwrap_err();
        assert!(matches!(err, AppError::TokenCorrupted));
    }

    #[tokio::test]
    async fn refresh_with_access_token_is_corrupted() {
        let users = MockRepository::default();
        let sessions = MockSessionStore::default();
        let tokens = token_service();
        let auth = AuthService::new(&users, &sessions, &tokens);

        let issued = tokens.issue(TokenKind::Access, Uuid::new_v4(), Role::Student).unwrap();
        let err = auth.refresh(&issued.token).await.unwrap_err();
        assert!(matches!(err, AppError::TokenCorrupted));
    }
}
