pub mod attendance;
pub mod enrollment;
pub mod module;
pub mod post;
pub mod postgres_repository;
pub mod session_cache;
pub mod user;
