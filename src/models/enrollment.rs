use crate::models::user::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role-tagged link between a user and a module. The same user can hold
/// different roles across modules, e.g. TEACHER for one and STUDENT for
/// another.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Enrollment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub module_id: Uuid,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct EnrollmentRequest {
    pub user_id: Uuid,
    pub module_id: Uuid,
    pub role: Role,
}
