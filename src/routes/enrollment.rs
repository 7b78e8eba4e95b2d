use crate::auth::{AdminUser, CurrentUser};
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::enrollment::{Enrollment, EnrollmentRequest};
use crate::models::module::ModuleResponse;
use crate::models::user::UserResponse;
use rocket::serde::json::Json;
use rocket::{State, http::Status, routes};
use sqlx::PgPool;
use uuid::Uuid;

#[rocket::post("/", data = "<payload>")]
pub async fn create_enrollment(pool: &State<PgPool>, _admin: AdminUser, payload: Json<EnrollmentRequest>) -> Result<(Status, Json<Enrollment>), AppError> {
    let repo = PostgresRepository::new(pool.inner().clone());
    let enrollment = repo.create_enrollment(&payload).await?;

    Ok((Status::Created, Json(enrollment)))
}

#[rocket::get("/module/<module_id>")]
pub async fn users_for_module(pool: &State<PgPool>, _current_user: CurrentUser, module_id: &str) -> Result<Json<Vec<UserResponse>>, AppError> {
    let repo = PostgresRepository::new(pool.inner().clone());
    let uuid = Uuid::parse_str(module_id)?;
    let users = repo.users_for_module(&uuid).await?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

#[rocket::get("/user/<user_id>")]
pub async fn modules_for_user(pool: &State<PgPool>, _current_user: CurrentUser, user_id: &str) -> Result<Json<Vec<ModuleResponse>>, AppError> {
    let repo = PostgresRepository::new(pool.inner().clone());
    let uuid = Uuid::parse_str(user_id)?;
    let modules = repo.modules_for_user(&uuid).await?;

    Ok(Json(modules.iter().map(ModuleResponse::from).collect()))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![create_enrollment, users_for_module, modules_for_user]
}
