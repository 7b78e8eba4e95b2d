use crate::database::attendance::AttendanceRepository;
use crate::database::enrollment::EnrollmentRepository;
use crate::error::app_error::AppError;
use crate::models::attendance::{DayWithModule, UserDayRow, UserMarks};
use uuid::Uuid;

/// Aggregated attendance views: per-user day listings, cross-user
/// summaries and teacher-scoped summaries. Queries go through the
/// repository seams; the grouping itself is done in the pure helpers
/// below.
pub struct StatisticsService<'a, R>
where
    R: AttendanceRepository + EnrollmentRepository,
{
    repository: &'a R,
}

impl<'a, R> StatisticsService<'a, R>
where
    R: AttendanceRepository + EnrollmentRepository,
{
    pub fn new(repository: &'a R) -> Self {
        Self { repository }
    }

    pub async fn days_for_user(&self, user_id: &Uuid) -> Result<Vec<DayWithModule>, AppError> {
        self.repository.days_with_module_for_user(user_id).await
    }

    pub async fn all_user_summaries(&self) -> Result<Vec<UserMarks>, AppError> {
        let rows = self.repository.user_day_rows_all().await?;

        Ok(summaries_from_rows(rows))
    }

    /// Restricts the cross-user view to the modules where `teacher_id`
    /// holds a TEACHER enrollment. A teacher without modules sees nothing.
    pub async fn teacher_scoped_summaries(&self, teacher_id: &Uuid) -> Result<Vec<UserMarks>, AppError> {
        let module_ids = self.repository.taught_module_ids(teacher_id).await?;
        if module_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self.repository.user_day_rows_for_modules(&module_ids).await?;

        Ok(summaries_from_rows(rows))
    }

    pub async fn user_average_mark(&self, user_id: &Uuid) -> Result<f64, AppError> {
        let days = self.repository.days_with_module_for_user(user_id).await?;

        average_mark(days.iter().map(|day| day.mark)).ok_or(AppError::NoMarkedDays)
    }
}

/// Groups flat join rows into one `UserMarks` per user. Rows arrive ordered
/// by user, so a change of user id starts a new group; first-seen order is
/// preserved.
fn summaries_from_rows(rows: Vec<UserDayRow>) -> Vec<UserMarks> {
    let mut summaries: Vec<UserMarks> = Vec::new();

    for row in rows {
        let day = DayWithModule {
            id: row.id,
            module_id: row.module_id,
            module_title: row.module_title,
            presence: row.presence,
            mark: row.mark,
            mark_type: row.mark_type,
            recorded_at: row.recorded_at,
        };

        match summaries.last_mut() {
            Some(current) if current.user_id == row.user_id => current.days.push(day),
            _ => summaries.push(UserMarks {
                user_id: row.user_id,
                first_name: row.first_name,
                last_name: row.last_name,
                days: vec![day],
            }),
        }
    }

    summaries
}

/// Mean of the present marks rounded to two decimals; `None` when no day
/// carries a mark, so the division by zero never happens.
fn average_mark(marks: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (count, total) = marks.flatten().fold((0u32, 0.0f64), |(count, total), mark| (count + 1, total + mark));

    if count == 0 {
        return None;
    }

    Some((total / f64::from(count) * 100.0).round() / 100.0)
}
