use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::user::{Role, User};
use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, Salt, SaltString};
use std::sync::LazyLock;
use uuid::Uuid;

/// A real Argon2 hash generated once at startup, used as a timing decoy
/// so that login requests for non-existent users take the same time as
/// requests for existing users.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(b"dummy-never-matches", Salt::from(&salt))
        .expect("failed to generate dummy hash")
        .to_string()
});

/// Seam used by the auth service; the remaining user queries are plain
/// inherent methods below.
#[async_trait::async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<(), AppError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError>;
}

#[async_trait::async_trait]
impl UserRepository for PostgresRepository {
    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, first_name, last_name, phone_number, city, address, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone_number)
        .bind(&user.city)
        .bind(&user.address)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::UserAlreadyExists(user.email.clone()),
            _ => AppError::from(e),
        })?;

        Ok(())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, phone_number, city, address, email, password_hash, role
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, phone_number, city, address, email, password_hash, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

impl PostgresRepository {
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, phone_number, city, address, email, password_hash, role
            FROM users
            ORDER BY last_name, first_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn list_users_by_role(&self, role: Role) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, phone_number, city, address, email, password_hash, role
            FROM users
            WHERE role = $1
            ORDER BY last_name, first_name
            "#,
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn update_user(&self, user: &User) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET first_name = $1, last_name = $2, phone_number = $3, city = $4,
                address = $5, email = $6, password_hash = $7, role = $8
            WHERE id = $9
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone_number)
        .bind(&user.city)
        .bind(&user.address)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::UserAlreadyExists(user.email.clone()),
            _ => AppError::from(e),
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::UserNotFound);
        }

        Ok(())
    }

    /// Removes the user; enrollment, attendance and post rows follow via
    /// `ON DELETE CASCADE`.
    pub async fn delete_user(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1").bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(AppError::UserNotFound);
        }

        Ok(())
    }
}

/// Hashes a password with a freshly generated per-user salt. The salt is
/// embedded in the returned PHC string.
pub(crate) fn hash_password(password: &str) -> Result<String, AppError> {
    let salt_string = SaltString::generate(&mut OsRng);
    let hash = PasswordHash::generate(Argon2::default(), password.as_bytes(), Salt::from(&salt_string))?;

    Ok(hash.to_string())
}

pub(crate) fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AppError::password_hash("Failed to parse stored password hash", e))?;

    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Perform a throwaway Argon2 verification to equalize response timing
/// regardless of whether the target account exists.
pub(crate) fn dummy_verify(password: &str) {
    let hash = PasswordHash::new(&DUMMY_HASH).expect("invalid dummy hash");
    let _ = Argon2::default().verify_password(password.as_bytes(), &hash);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_the_original_password() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).unwrap());
    }

    #[test]
    fn single_character_change_flips_the_result() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(!verify_password("correct horse batterz", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently_per_user() {
        let first = hash_password("shared-password").unwrap();
        let second = hash_password("shared-password").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("shared-password", &first).unwrap());
        assert!(verify_password("shared-password", &second).unwrap());
    }

    #[test]
    fn garbage_stored_hash_is_an_error_not_a_mismatch() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
