use crate::auth::CurrentUser;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::post::{Post, PostRequest};
use rocket::serde::json::Json;
use rocket::{State, http::Status, routes};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[rocket::post("/", data = "<payload>")]
pub async fn create_post(pool: &State<PgPool>, current_user: CurrentUser, payload: Json<PostRequest>) -> Result<(Status, Json<Post>), AppError> {
    payload.validate()?;

    let repo = PostgresRepository::new(pool.inner().clone());
    let post = repo.create_post(&current_user.id, &payload).await?;

    Ok((Status::Created, Json(post)))
}

#[rocket::get("/")]
pub async fn list_posts(pool: &State<PgPool>, _current_user: CurrentUser) -> Result<Json<Vec<Post>>, AppError> {
    let repo = PostgresRepository::new(pool.inner().clone());
    let posts = repo.list_posts().await?;

    Ok(Json(posts))
}

#[rocket::get("/module/<module_id>")]
pub async fn posts_for_module(pool: &State<PgPool>, _current_user: CurrentUser, module_id: &str) -> Result<Json<Vec<Post>>, AppError> {
    let repo = PostgresRepository::new(pool.inner().clone());
    let uuid = Uuid::parse_str(module_id)?;
    let posts = repo.posts_for_module(&uuid).await?;

    Ok(Json(posts))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![create_post, list_posts, posts_for_module]
}
