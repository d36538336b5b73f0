use uuid::Uuid;

use crate::{
    api::error,
    modules::content::{
        model::{InsertLesson, InsertNote},
        repository::ContentRepository,
        schema::{LessonEntity, NoteEntity},
    },
};

#[derive(Clone)]
pub struct ContentRepositoryPg {
    pool: sqlx::PgPool,
}

impl ContentRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ContentRepository for ContentRepositoryPg {
    async fn find_lessons(&self, course_id: &Uuid) -> Result<Vec<LessonEntity>, error::SystemError> {
        let lessons = sqlx::query_as::<_, LessonEntity>(
            "SELECT * FROM lessons WHERE course_id = $1 ORDER BY position",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lessons)
    }

    async fn find_course_notes(
        &self,
        course_id: &Uuid,
    ) -> Result<Vec<NoteEntity>, error::SystemError> {
        let notes = sqlx::query_as::<_, NoteEntity>(
            r#"
            SELECT n.*
            FROM lesson_notes n
            JOIN lessons l ON l.id = n.lesson_id
            WHERE l.course_id = $1
            ORDER BY n.created_at
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notes)
    }

    async fn find_lesson(
        &self,
        course_id: &Uuid,
        lesson_id: &Uuid,
    ) -> Result<Option<LessonEntity>, error::SystemError> {
        let lesson = sqlx::query_as::<_, LessonEntity>(
            "SELECT * FROM lessons WHERE id = $1 AND course_id = $2",
        )
        .bind(lesson_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(lesson)
    }

    async fn find_notes(&self, lesson_id: &Uuid) -> Result<Vec<NoteEntity>, error::SystemError> {
        let notes = sqlx::query_as::<_, NoteEntity>(
            "SELECT * FROM lesson_notes WHERE lesson_id = $1 ORDER BY created_at",
        )
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notes)
    }

    async fn count_lessons(&self, course_id: &Uuid) -> Result<i64, error::SystemError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn create_lesson(
        &self,
        course_id: &Uuid,
        lesson: &InsertLesson,
    ) -> Result<LessonEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let created = sqlx::query_as::<_, LessonEntity>(
            r#"
            INSERT INTO lessons (id, course_id, title, position, video_key, video_url, duration)
            VALUES (
                $1, $2, $3,
                (SELECT COALESCE(MAX(position), 0) + 1 FROM lessons WHERE course_id = $2),
                $4, $5, $6
            )
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(course_id)
        .bind(&lesson.title)
        .bind(&lesson.video_key)
        .bind(&lesson.video_url)
        .bind(lesson.duration)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn create_note(
        &self,
        lesson_id: &Uuid,
        note: &InsertNote,
    ) -> Result<NoteEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let created = sqlx::query_as::<_, NoteEntity>(
            r#"
            INSERT INTO lesson_notes (id, lesson_id, file_name, file_key, file_url, file_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(lesson_id)
        .bind(&note.file_name)
        .bind(&note.file_key)
        .bind(&note.file_url)
        .bind(&note.file_type)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn delete_lesson(
        &self,
        course_id: &Uuid,
        lesson_id: &Uuid,
    ) -> Result<Option<LessonEntity>, error::SystemError> {
        let deleted = sqlx::query_as::<_, LessonEntity>(
            "DELETE FROM lessons WHERE id = $1 AND course_id = $2 RETURNING *",
        )
        .bind(lesson_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(deleted)
    }
}
