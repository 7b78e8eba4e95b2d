use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::module::{Module, ModuleRequest};
use uuid::Uuid;

impl PostgresRepository {
    pub async fn create_module(&self, request: &ModuleRequest) -> Result<Module, AppError> {
        let module = sqlx::query_as::<_, Module>(
            r#"
            INSERT INTO module (id, title, alias, hours_taught)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, alias, hours_taught
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.title)
        .bind(&request.alias)
        .bind(request.hours_taught)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::ModuleAlreadyExists(request.alias.clone()),
            _ => AppError::from(e),
        })?;

        Ok(module)
    }

    pub async fn list_modules(&self) -> Result<Vec<Module>, AppError> {
        let modules = sqlx::query_as::<_, Module>(
            r#"
            SELECT id, title, alias, hours_taught
            FROM module
            ORDER BY title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(modules)
    }

    pub async fn get_module_by_alias(&self, alias: &str) -> Result<Option<Module>, AppError> {
        let module = sqlx::query_as::<_, Module>(
            r#"
            SELECT id, title, alias, hours_taught
            FROM module
            WHERE LOWER(alias) = LOWER($1)
            "#,
        )
        .bind(alias)
        .fetch_optional(&self.pool)
        .await?;

        Ok(module)
    }

    pub async fn get_module_by_id(&self, id: &Uuid) -> Result<Option<Module>, AppError> {
        let module = sqlx::query_as::<_, Module>(
            r#"
            SELECT id, title, alias, hours_taught
            FROM module
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(module)
    }

    pub async fn update_module(&self, id: &Uuid, request: &ModuleRequest) -> Result<Module, AppError> {
        let module = sqlx::query_as::<_, Module>(
            r#"
            UPDATE module
            SET title = $1, alias = $2, hours_taught = $3
            WHERE id = $4
            RETURNING id, title, alias, hours_taught
            "#,
        )
        .bind(&request.title)
        .bind(&request.alias)
        .bind(request.hours_taught)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::ModuleAlreadyExists(request.alias.clone()),
            _ => AppError::from(e),
        })?;

        module.ok_or(AppError::ModuleNotFound)
    }

    /// Modules are referenced, not owned: deleting one that still has
    /// enrollment, attendance or post rows surfaces as a conflict.
    pub async fn delete_module_by_alias(&self, alias: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM module WHERE LOWER(alias) = LOWER($1)")
            .bind(alias)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    AppError::Conflict(format!("Module {} is still referenced", alias))
                }
                _ => AppError::from(e),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::ModuleNotFound);
        }

        Ok(())
    }
}
