use crate::error::app_error::AppError;
use crate::models::token::TokenKind;
use crate::models::user::Role;
use crate::service::token::TokenService;
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{FromRequest, Outcome as RequestOutcome, Request};
use serde::Serialize;
use uuid::Uuid;

/// Identity extracted from a verified bearer access token. No store lookup
/// is needed; the claims carry both the user id and the role.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: Role,
}

pub(crate) fn parse_bearer(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for CurrentUser {
    type Error = AppError;

    async fn from_request(req: &'r Request<'_>) -> RequestOutcome<Self, Self::Error> {
        let Some(token) = req.headers().get_one("Authorization").and_then(parse_bearer) else {
            return Outcome::Error((Status::Unauthorized, AppError::MissingToken));
        };

        let tokens = match req.rocket().state::<TokenService>() {
            Some(tokens) => tokens,
            None => return Outcome::Error((Status::InternalServerError, AppError::MissingToken)),
        };

        match tokens.verify(TokenKind::Access, token) {
            Ok(claims) => {
                let current_user = CurrentUser {
                    id: claims.user_id,
                    role: claims.role,
                };
                req.local_cache(|| Some(current_user.clone()));
                Outcome::Success(current_user)
            }
            Err(err) => Outcome::Error((Status::Unauthorized, err)),
        }
    }
}

/// Guard for admin-only mutations; anything but the ADMIN role is refused.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminUser {
    type Error = AppError;

    async fn from_request(req: &'r Request<'_>) -> RequestOutcome<Self, Self::Error> {
        match req.guard::<CurrentUser>().await {
            Outcome::Success(user) if user.role == Role::Admin => Outcome::Success(AdminUser(user)),
            Outcome::Success(_) => Outcome::Error((Status::Forbidden, AppError::Forbidden)),
            Outcome::Error(err) => Outcome::Error(err),
            Outcome::Forward(status) => Outcome::Forward(status),
        }
    }
}
