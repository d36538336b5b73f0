use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "enrollment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Active,
    Suspended,
    Expired,
}

#[derive(Debug, Clone, FromRow)]
pub struct EnrollmentEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub status: EnrollmentStatus,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_lessons: Vec<Uuid>,
    pub last_accessed_lesson: Option<Uuid>,
    pub completion_percentage: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl EnrollmentEntity {
    /// Active and not past its expiry.
    pub fn grants_access(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.status == EnrollmentStatus::Active && self.expires_at.is_none_or(|at| at > now)
    }
}
