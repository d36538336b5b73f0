use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct LessonEntity {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub position: i32,
    pub video_key: Option<String>,
    pub video_url: Option<String>,
    pub duration: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct NoteEntity {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub file_name: String,
    pub file_key: String,
    pub file_url: Option<String>,
    pub file_type: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
