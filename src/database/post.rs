use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::post::{Post, PostRequest};
use chrono::Utc;
use uuid::Uuid;

impl PostgresRepository {
    pub async fn create_post(&self, author_id: &Uuid, request: &PostRequest) -> Result<Post, AppError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO post (id, title, body, posted_at, author_id, module_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, body, posted_at, author_id, module_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.title)
        .bind(&request.body)
        .bind(Utc::now())
        .bind(author_id)
        .bind(request.module_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::BadRequest("Unknown module".to_string())
            }
            _ => AppError::from(e),
        })?;

        Ok(post)
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, body, posted_at, author_id, module_id
            FROM post
            ORDER BY posted_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    pub async fn posts_for_module(&self, module_id: &Uuid) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, body, posted_at, author_id, module_id
            FROM post
            WHERE module_id = $1
            ORDER BY posted_at DESC
            "#,
        )
        .bind(module_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }
}
