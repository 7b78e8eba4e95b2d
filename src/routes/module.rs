use crate::auth::{AdminUser, CurrentUser};
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::module::{ModuleRequest, ModuleResponse};
use rocket::serde::json::Json;
use rocket::{State, http::Status, routes};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[rocket::get("/")]
pub async fn list_modules(pool: &State<PgPool>, _current_user: CurrentUser) -> Result<Json<Vec<ModuleResponse>>, AppError> {
    let repo = PostgresRepository::new(pool.inner().clone());
    let modules = repo.list_modules().await?;

    Ok(Json(modules.iter().map(ModuleResponse::from).collect()))
}

#[rocket::get("/<alias>")]
pub async fn get_module(pool: &State<PgPool>, _current_user: CurrentUser, alias: &str) -> Result<Json<ModuleResponse>, AppError> {
    let repo = PostgresRepository::new(pool.inner().clone());
    let module = repo.get_module_by_alias(alias).await?.ok_or(AppError::ModuleNotFound)?;

    Ok(Json(ModuleResponse::from(&module)))
}

#[rocket::post("/", data = "<payload>")]
pub async fn create_module(pool: &State<PgPool>, _admin: AdminUser, payload: Json<ModuleRequest>) -> Result<(Status, Json<ModuleResponse>), AppError> {
    payload.validate()?;

    let repo = PostgresRepository::new(pool.inner().clone());
    let module = repo.create_module(&payload).await?;

    Ok((Status::Created, Json(ModuleResponse::from(&module))))
}

#[rocket::put("/<id>", data = "<payload>")]
pub async fn put_module(pool: &State<PgPool>, _admin: AdminUser, id: &str, payload: Json<ModuleRequest>) -> Result<Json<ModuleResponse>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository::new(pool.inner().clone());
    let uuid = Uuid::parse_str(id)?;
    let module = repo.update_module(&uuid, &payload).await?;

    Ok(Json(ModuleResponse::from(&module)))
}

#[rocket::delete("/<alias>")]
pub async fn delete_module(pool: &State<PgPool>, _admin: AdminUser, alias: &str) -> Result<Status, AppError> {
    let repo = PostgresRepository::new(pool.inner().clone());
    repo.delete_module_by_alias(alias).await?;

    Ok(Status::NoContent)
}

pub fn routes() -> Vec<rocket::Route> {
    routes![list_modules, get_module, create_module, put_module, delete_module]
}
