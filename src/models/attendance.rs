use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "mark_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum MarkType {
    Labmark,
    Coursework,
}

/// One dated record of a user's presence and optional mark for a module.
/// Rows are append-only; they disappear only when the owning user is deleted.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AttendanceDay {
    pub id: Uuid,
    pub user_id: Uuid,
    pub module_id: Uuid,
    pub presence: bool,
    pub mark: Option<f64>,
    pub mark_type: Option<MarkType>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DayRequest {
    pub user_id: Uuid,
    pub module_id: Uuid,
    pub presence: bool,
    #[validate(range(min = 0.0, max = 100.0))]
    pub mark: Option<f64>,
    pub mark_type: Option<MarkType>,
}

/// An attendance row annotated with its module's display title.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DayWithModule {
    pub id: Uuid,
    pub module_id: Uuid,
    pub module_title: String,
    pub presence: bool,
    pub mark: Option<f64>,
    pub mark_type: Option<MarkType>,
    pub recorded_at: DateTime<Utc>,
}

/// Flat join row used by the aggregation queries: one attendance day plus
/// the identity fields of its owning user.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserDayRow {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub id: Uuid,
    pub module_id: Uuid,
    pub module_title: String,
    pub presence: bool,
    pub mark: Option<f64>,
    pub mark_type: Option<MarkType>,
    pub recorded_at: DateTime<Utc>,
}

/// Per-user grouped view: identity populated once, attendance rows nested.
#[derive(Debug, Serialize)]
pub struct UserMarks {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub days: Vec<DayWithModule>,
}
