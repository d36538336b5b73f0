use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::modules::{
    course::{model::CourseResponse, schema::CourseEntity},
    enrollment::schema::{EnrollmentEntity, EnrollmentStatus},
};

/// Floor of `completed * 100 / total`, capped at 100. Zero when the course
/// has no lessons.
pub fn completion_percentage(completed: usize, total_lessons: i64) -> i32 {
    if total_lessons <= 0 {
        return 0;
    }
    ((completed as i64 * 100) / total_lessons).min(100) as i32
}

#[derive(Debug, Clone, FromRow)]
pub struct OwnedCourseRow {
    #[sqlx(flatten)]
    pub course: CourseEntity,
    pub status: EnrollmentStatus,
    pub completion_percentage: i32,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub status: EnrollmentStatus,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_lessons: Vec<Uuid>,
    pub last_accessed_lesson: Option<Uuid>,
    pub completion_percentage: i32,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

impl From<EnrollmentEntity> for EnrollmentResponse {
    fn from(entity: EnrollmentEntity) -> Self {
        EnrollmentResponse {
            id: entity.id,
            course_id: entity.course_id,
            status: entity.status,
            expires_at: entity.expires_at,
            completed_lessons: entity.completed_lessons,
            last_accessed_lesson: entity.last_accessed_lesson,
            completion_percentage: entity.completion_percentage,
            enrolled_at: entity.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedCourseResponse {
    pub course: CourseResponse,
    pub status: EnrollmentStatus,
    pub completion_percentage: i32,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

impl From<OwnedCourseRow> for OwnedCourseResponse {
    fn from(row: OwnedCourseRow) -> Self {
        OwnedCourseResponse {
            course: row.course.into(),
            status: row.status,
            completion_percentage: row.completion_percentage,
            enrolled_at: row.enrolled_at,
        }
    }
}
