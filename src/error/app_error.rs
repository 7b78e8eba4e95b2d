use rocket::http::{ContentType, Status};
use rocket::response::Responder;
use rocket::{Request, Response};
use std::io::Cursor;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error")]
    Db {
        message: String,
        #[source]
        source: sqlx::error::Error,
    },
    #[error("Internal server error")]
    Cache {
        message: String,
        #[source]
        source: redis::RedisError,
    },
    #[error("User not found")]
    UserNotFound,
    #[error("User {0} already exists")]
    UserAlreadyExists(String),
    #[error("Module not found")]
    ModuleNotFound,
    #[error("Module {0} already exists")]
    ModuleAlreadyExists(String),
    #[error("Unknown role: {0}")]
    RoleNotFound(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Token has expired")]
    TokenExpired,
    #[error("Token is corrupted")]
    TokenCorrupted,
    #[error("Refresh token not found")]
    TokenNotFound,
    #[error("Authorization header is missing or malformed")]
    MissingToken,
    #[error("Operation requires the admin role")]
    Forbidden,
    #[error("User has no marked days")]
    NoMarkedDays,
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal server error")]
    PasswordHash { message: String },
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),
    #[error("Internal server error")]
    ConfigurationError {
        message: String,
        #[source]
        source: figment::Error,
    },
}

impl AppError {
    pub fn db(message: impl Into<String>, source: sqlx::error::Error) -> Self {
        Self::Db {
            message: message.into(),
            source,
        }
    }

    pub fn cache(message: impl Into<String>, source: redis::RedisError) -> Self {
        Self::Cache {
            message: message.into(),
            source,
        }
    }

    pub fn password_hash(message: impl Into<String>, source: password_hash::Error) -> Self {
        Self::PasswordHash {
            message: format!("{}: {}", message.into(), source),
        }
    }
}

impl From<password_hash::Error> for AppError {
    fn from(e: password_hash::Error) -> Self {
        AppError::password_hash("Password hashing failed", e)
    }
}

impl From<uuid::Error> for AppError {
    fn from(e: uuid::Error) -> Self {
        AppError::BadRequest(format!("Invalid UUID: {}", e))
    }
}

impl From<figment::Error> for AppError {
    fn from(e: figment::Error) -> Self {
        AppError::ConfigurationError {
            message: "Failed to read configuration".to_string(),
            source: e,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            _ => AppError::db("Database error", e),
        }
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::cache("Session cache error", e)
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::TokenCorrupted,
        }
    }
}

impl From<&AppError> for Status {
    fn from(e: &AppError) -> Self {
        match e {
            AppError::UserNotFound
            | AppError::ModuleNotFound
            | AppError::RoleNotFound(_)
            | AppError::NoMarkedDays
            | AppError::NotFound(_) => Status::NotFound,
            AppError::UserAlreadyExists(_) | AppError::ModuleAlreadyExists(_) | AppError::Conflict(_) => Status::Conflict,
            AppError::InvalidCredentials
            | AppError::TokenExpired
            | AppError::TokenCorrupted
            | AppError::TokenNotFound
            | AppError::MissingToken => Status::Unauthorized,
            AppError::Forbidden => Status::Forbidden,
            AppError::BadRequest(_) | AppError::ValidationError(_) => Status::BadRequest,
            AppError::Db { .. } | AppError::Cache { .. } | AppError::PasswordHash { .. } | AppError::ConfigurationError { .. } => {
                Status::InternalServerError
            }
        }
    }
}

impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, req: &Request<'_>) -> rocket::response::Result<'static> {
        let method = req.method();
        let uri = req.uri();

        let request_id = req
            .local_cache(|| None::<crate::middleware::RequestId>)
            .as_ref()
            .map(|r| r.0.as_str())
            .unwrap_or("unknown");

        let user_id = req
            .local_cache(|| None::<crate::auth::CurrentUser>)
            .as_ref()
            .map(|u| u.id.to_string())
            .unwrap_or_else(|| "anonymous".to_string());

        error!(
            error = ?self,
            request_id = %request_id,
            user_id = %user_id,
            method = %method,
            uri = %uri,
            "request failed"
        );

        let status = Status::from(&self);
        let body = serde_json::json!({ "message": self.to_string() }).to_string();

        Response::build()
            .status(status)
            .header(ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}
