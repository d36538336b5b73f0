use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct CourseEntity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub thumbnail_url: Option<String>,
    pub thumbnail_key: Option<String>,
    pub creator_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
