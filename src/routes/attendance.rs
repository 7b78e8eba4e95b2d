use crate::auth::CurrentUser;
use crate::database::attendance::AttendanceRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::attendance::{AttendanceDay, DayRequest, DayWithModule, UserDayRow};
use rocket::serde::json::Json;
use rocket::{State, http::Status, routes};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[rocket::post("/", data = "<payload>")]
pub async fn create_day(pool: &State<PgPool>, _current_user: CurrentUser, payload: Json<DayRequest>) -> Result<(Status, Json<AttendanceDay>), AppError> {
    payload.validate()?;

    let repo = PostgresRepository::new(pool.inner().clone());
    let day = repo.create_day(&payload).await?;

    Ok((Status::Created, Json(day)))
}

#[rocket::get("/user/<user_id>")]
pub async fn days_for_user(pool: &State<PgPool>, _current_user: CurrentUser, user_id: &str) -> Result<Json<Vec<DayWithModule>>, AppError> {
    let repo = PostgresRepository::new(pool.inner().clone());
    let uuid = Uuid::parse_str(user_id)?;
    let days = repo.days_with_module_for_user(&uuid).await?;

    Ok(Json(days))
}

#[rocket::get("/module/<module_id>")]
pub async fn days_for_module(pool: &State<PgPool>, _current_user: CurrentUser, module_id: &str) -> Result<Json<Vec<UserDayRow>>, AppError> {
    let repo = PostgresRepository::new(pool.inner().clone());
    let uuid = Uuid::parse_str(module_id)?;
    let days = repo.days_for_module(&uuid).await?;

    Ok(Json(days))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![create_day, days_for_user, days_for_module]
}
