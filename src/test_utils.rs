use crate::database::attendance::AttendanceRepository;
use crate::database::enrollment::EnrollmentRepository;
use crate::database::session_cache::SessionStore;
use crate::database::user::{UserRepository, hash_password};
use crate::error::app_error::AppError;
use crate::models::attendance::{DayWithModule, UserDayRow};
use crate::models::enrollment::Enrollment;
use crate::models::user::{RegisterRequest, Role, User};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Mutex;
use uuid::Uuid;

pub fn register_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        phone_number: format!("+44{}", email.len()),
        city: "London".to_string(),
        address: "12 St James Sq".to_string(),
        email: email.to_string(),
        password: "hunter2hunter2".to_string(),
        role: Role::Student,
    }
}

pub fn enrollment(user_id: Uuid, module_id: Uuid, role: Role) -> Enrollment {
    Enrollment {
        id: Uuid::new_v4(),
        user_id,
        module_id,
        role,
    }
}

pub fn user_day_row(user_id: Uuid, first_name: &str, module_id: Uuid, module_title: &str, mark: Option<f64>) -> UserDayRow {
    UserDayRow {
        user_id,
        first_name: first_name.to_string(),
        last_name: "Example".to_string(),
        id: Uuid::new_v4(),
        module_id,
        module_title: module_title.to_string(),
        presence: true,
        mark,
        mark_type: None,
        recorded_at: Utc::now(),
    }
}

/// In-memory stand-in for the Postgres repository seams.
#[derive(Default)]
pub struct MockRepository {
    pub users: Mutex<Vec<User>>,
    pub enrollments: Vec<Enrollment>,
    pub days: Vec<UserDayRow>,
}

#[async_trait::async_trait]
impl UserRepository for MockRepository {
    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email || u.phone_number == user.phone_number) {
            return Err(AppError::UserAlreadyExists(user.email.clone()));
        }
        users.push(user.clone());

        Ok(())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == *id).cloned())
    }
}

#[async_trait::async_trait]
impl EnrollmentRepository for MockRepository {
    async fn taught_module_ids(&self, teacher_id: &Uuid) -> Result<Vec<Uuid>, AppError> {
        Ok(self
            .enrollments
            .iter()
            .filter(|e| e.user_id == *teacher_id && e.role == Role::Teacher)
            .map(|e| e.module_id)
            .collect())
    }
}

#[async_trait::async_trait]
impl AttendanceRepository for MockRepository {
    async fn days_with_module_for_user(&self, user_id: &Uuid) -> Result<Vec<DayWithModule>, AppError> {
        Ok(self
            .days
            .iter()
            .filter(|row| row.user_id == *user_id)
            .map(|row| DayWithModule {
                id: row.id,
                module_id: row.module_id,
                module_title: row.module_title.clone(),
                presence: row.presence,
                mark: row.mark,
                mark_type: row.mark_type,
                recorded_at: row.recorded_at,
            })
            .collect())
    }

    async fn user_day_rows_all(&self) -> Result<Vec<UserDayRow>, AppError> {
        Ok(self.days.clone())
    }

    async fn user_day_rows_for_modules(&self, module_ids: &[Uuid]) -> Result<Vec<UserDayRow>, AppError> {
        Ok(self.days.iter().filter(|row| module_ids.contains(&row.module_id)).cloned().collect())
    }
}

/// In-memory refresh-token id set; TTL expiry is not modelled.
#[derive(Default)]
pub struct MockSessionStore {
    ids: Mutex<HashSet<Uuid>>,
}

impl MockSessionStore {
    pub fn len(&self) -> usize {
        self.ids.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl SessionStore for MockSessionStore {
    async fn store(&self, token_id: &Uuid) -> Result<(), AppError> {
        self.ids.lock().unwrap().insert(*token_id);

        Ok(())
    }

    async fn revoke(&self, token_id: &Uuid) -> Result<bool, AppError> {
        Ok(self.ids.lock().unwrap().remove(token_id))
    }

    async fn active_sessions(&self) -> Result<u64, AppError> {
        Ok(self.len() as u64)
    }
}
