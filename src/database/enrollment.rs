use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::enrollment::{Enrollment, EnrollmentRequest};
use crate::models::module::Module;
use crate::models::user::{Role, User};
use uuid::Uuid;

/// Seam used by the statistics service to resolve a teacher's modules.
#[async_trait::async_trait]
pub trait EnrollmentRepository: Send + Sync {
    async fn taught_module_ids(&self, teacher_id: &Uuid) -> Result<Vec<Uuid>, AppError>;
}

#[async_trait::async_trait]
impl EnrollmentRepository for PostgresRepository {
    async fn taught_module_ids(&self, teacher_id: &Uuid) -> Result<Vec<Uuid>, AppError> {
        let ids: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT module_id
            FROM enrollment
            WHERE user_id = $1 AND role = $2
            "#,
        )
        .bind(teacher_id)
        .bind(Role::Teacher)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }
}

impl PostgresRepository {
    pub async fn create_enrollment(&self, request: &EnrollmentRequest) -> Result<Enrollment, AppError> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"
            INSERT INTO enrollment (id, user_id, module_id, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, module_id, role
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.user_id)
        .bind(request.module_id)
        .bind(request.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::BadRequest("Unknown user or module".to_string())
            }
            _ => AppError::from(e),
        })?;

        Ok(enrollment)
    }

    pub async fn users_for_module(&self, module_id: &Uuid) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.first_name, u.last_name, u.phone_number, u.city, u.address, u.email, u.password_hash, u.role
            FROM enrollment e
            JOIN users u ON u.id = e.user_id
            WHERE e.module_id = $1
            ORDER BY u.last_name, u.first_name
            "#,
        )
        .bind(module_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn modules_for_user(&self, user_id: &Uuid) -> Result<Vec<Module>, AppError> {
        let modules = sqlx::query_as::<_, Module>(
            r#"
            SELECT m.id, m.title, m.alias, m.hours_taught
            FROM enrollment e
            JOIN module m ON m.id = e.module_id
            WHERE e.user_id = $1
            ORDER BY m.title
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(modules)
    }
}
