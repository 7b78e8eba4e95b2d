use crate::config::JwtConfig;
use crate::error::app_error::AppError;
use crate::models::token::{Claims, TokenKind};
use crate::models::user::Role;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

#[derive(Debug)]
pub struct IssuedToken {
    pub token: String,
    pub token_id: Uuid,
}

struct KindKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: u64,
}

impl KindKeys {
    fn new(secret: &str, ttl_seconds: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
        }
    }
}

/// Issues and verifies the two token classes. Built once at ignite from the
/// jwt config, handed to request handlers via Rocket managed state, and
/// read-only afterwards.
pub struct TokenService {
    access: KindKeys,
    refresh: KindKeys,
}

impl TokenService {
    pub fn from_config(config: &JwtConfig) -> Self {
        Self {
            access: KindKeys::new(&config.access_secret, config.access_ttl_seconds),
            refresh: KindKeys::new(&config.refresh_secret, config.refresh_ttl_seconds),
        }
    }

    fn keys(&self, kind: TokenKind) -> &KindKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    pub fn issue(&self, kind: TokenKind, user_id: Uuid, role: Role) -> Result<IssuedToken, AppError> {
        let keys = self.keys(kind);
        let claims = Claims {
            token_id: Uuid::new_v4(),
            user_id,
            role,
            exp: Utc::now().timestamp() + keys.ttl_seconds as i64,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding)?;

        Ok(IssuedToken {
            token,
            token_id: claims.token_id,
        })
    }

    pub fn verify(&self, kind: TokenKind, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.keys(kind).decoding, &validation)?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn service() -> TokenService {
        TokenService::from_config(&JwtConfig {
            access_secret: "test-access-secret".to_string(),
            access_ttl_seconds: 60,
            refresh_secret: "test-refresh-secret".to_string(),
            refresh_ttl_seconds: 3600,
        })
    }

    #[test]
    fn issue_then_verify_round_trips_both_kinds() {
        let tokens = service();
        let user_id = Uuid::new_v4();

        for kind in [TokenKind::Access, TokenKind::Refresh] {
            let issued = tokens.issue(kind, user_id, Role::Teacher).unwrap();
            let claims = tokens.verify(kind, &issued.token).unwrap();
            assert_eq!(claims.user_id, user_id);
            assert_eq!(claims.role, Role::Teacher);
            assert_eq!(claims.token_id, issued.token_id);
        }
    }

    #[test]
    fn access_token_does_not_verify_as_refresh() {
        let tokens = service();
        let issued = tokens.issue(TokenKind::Access, Uuid::new_v4(), Role::Student).unwrap();
        let err = tokens.verify(TokenKind::Refresh, &issued.token).unwrap_err();
        assert!(matches!(err, AppError::TokenCorrupted));
    }

    #[test]
    fn expired_token_fails_with_expired() {
        let tokens = service();
        let claims = Claims {
            token_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            role: Role::Student,
            exp: Utc::now().timestamp() - 120,
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test-access-secret")).unwrap();

        let err = tokens.verify(TokenKind::Access, &token).unwrap_err();
        assert!(matches!(err, AppError::TokenExpired));
    }

    #[test]
    fn tampered_signature_fails_with_corrupted() {
        let tokens = service();
        let issued = tokens.issue(TokenKind::Access, Uuid::new_v4(), Role::Admin).unwrap();

        let mut tampered = issued.token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        let err = tokens.verify(TokenKind::Access, &tampered).unwrap_err();
        assert!(matches!(err, AppError::TokenCorrupted));
    }

    #[test]
    fn garbage_token_fails_with_corrupted() {
        let tokens = service();
        let err = tokens.verify(TokenKind::Refresh, "not.a.token").unwrap_err();
        assert!(matches!(err, AppError::TokenCorrupted));
    }

    proptest! {
        #[test]
        fn round_trip_preserves_identity_for_any_user(bytes in any::<[u8; 16]>(), role_idx in 0usize..4) {
            let tokens = service();
            let user_id = Uuid::from_bytes(bytes);
            let role = [Role::Student, Role::Teacher, Role::Admin, Role::Moderator][role_idx];

            let issued = tokens.issue(TokenKind::Refresh, user_id, role).unwrap();
            let claims = tokens.verify(TokenKind::Refresh, &issued.token).unwrap();
            prop_assert_eq!(claims.user_id, user_id);
            prop_assert_eq!(claims.role, role);
        }
    }
}
