use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::attendance::{AttendanceDay, DayRequest, DayWithModule, UserDayRow};
use chrono::Utc;
use uuid::Uuid;

/// Seam used by the statistics service.
#[async_trait::async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn days_with_module_for_user(&self, user_id: &Uuid) -> Result<Vec<DayWithModule>, AppError>;
    async fn user_day_rows_all(&self) -> Result<Vec<UserDayRow>, AppError>;
    async fn user_day_rows_for_modules(&self, module_ids: &[Uuid]) -> Result<Vec<UserDayRow>, AppError>;
}

#[async_trait::async_trait]
impl AttendanceRepository for PostgresRepository {
    async fn days_with_module_for_user(&self, user_id: &Uuid) -> Result<Vec<DayWithModule>, AppError> {
        let days = sqlx::query_as::<_, DayWithModule>(
            r#"
            SELECT d.id, d.module_id, m.title AS module_title, d.presence, d.mark, d.mark_type, d.recorded_at
            FROM attendance_day d
            JOIN module m ON m.id = d.module_id
            WHERE d.user_id = $1
            ORDER BY d.recorded_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(days)
    }

    async fn user_day_rows_all(&self) -> Result<Vec<UserDayRow>, AppError> {
        let rows = sqlx::query_as::<_, UserDayRow>(
            r#"
            SELECT u.id AS user_id, u.first_name, u.last_name,
                   d.id, d.module_id, m.title AS module_title, d.presence, d.mark, d.mark_type, d.recorded_at
            FROM attendance_day d
            JOIN users u ON u.id = d.user_id
            JOIN module m ON m.id = d.module_id
            ORDER BY u.last_name, u.first_name, u.id, d.recorded_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn user_day_rows_for_modules(&self, module_ids: &[Uuid]) -> Result<Vec<UserDayRow>, AppError> {
        let rows = sqlx::query_as::<_, UserDayRow>(
            r#"
            SELECT u.id AS user_id, u.first_name, u.last_name,
                   d.id, d.module_id, m.title AS module_title, d.presence, d.mark, d.mark_type, d.recorded_at
            FROM attendance_day d
            JOIN users u ON u.id = d.user_id
            JOIN module m ON m.id = d.module_id
            WHERE d.module_id = ANY($1)
            ORDER BY u.last_name, u.first_name, u.id, d.recorded_at
            "#,
        )
        .bind(module_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

impl PostgresRepository {
    /// Records a new day with a server-side timestamp. Rows are never
    /// updated in place.
    pub async fn create_day(&self, request: &DayRequest) -> Result<AttendanceDay, AppError> {
        let day = sqlx::query_as::<_, AttendanceDay>(
            r#"
            INSERT INTO attendance_day (id, user_id, module_id, presence, mark, mark_type, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, module_id, presence, mark, mark_type, recorded_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.user_id)
        .bind(request.module_id)
        .bind(request.presence)
        .bind(request.mark)
        .bind(request.mark_type)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::BadRequest("Unknown user or module".to_string())
            }
            _ => AppError::from(e),
        })?;

        Ok(day)
    }

    pub async fn days_for_module(&self, module_id: &Uuid) -> Result<Vec<UserDayRow>, AppError> {
        let rows = sqlx::query_as::<_, UserDayRow>(
            r#"
            SELECT u.id AS user_id, u.first_name, u.last_name,
                   d.id, d.module_id, m.title AS module_title, d.presence, d.mark, d.mark_type, d.recorded_at
            FROM attendance_day d
            JOIN users u ON u.id = d.user_id
            JOIN module m ON m.id = d.module_id
            WHERE d.module_id = $1
            ORDER BY d.recorded_at
            "#,
        )
        .bind(module_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
