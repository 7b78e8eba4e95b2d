pub mod attendance;
pub mod enrollment;
pub mod module;
pub mod post;
pub mod token;
pub mod user;
