pub mod attendance;
pub mod auth;
pub mod enrollment;
pub mod error;
pub mod health;
pub mod module;
pub mod post;
pub mod statistics;
pub mod user;
