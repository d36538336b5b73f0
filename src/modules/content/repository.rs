use uuid::Uuid;

use crate::{
    api::error,
    modules::content::{
        model::{InsertLesson, InsertNote},
        schema::{LessonEntity, NoteEntity},
    },
};

#[async_trait::async_trait]
pub trait ContentRepository {
    /// Lessons of a course in position order.
    async fn find_lessons(&self, course_id: &Uuid) -> Result<Vec<LessonEntity>, error::SystemError>;

    async fn find_course_notes(&self, course_id: &Uuid)
    -> Result<Vec<NoteEntity>, error::SystemError>;

    async fn find_lesson(
        &self,
        course_id: &Uuid,
        lesson_id: &Uuid,
    ) -> Result<Option<LessonEntity>, error::SystemError>;

    async fn find_notes(&self, lesson_id: &Uuid) -> Result<Vec<NoteEntity>, error::SystemError>;

    async fn count_lessons(&self, course_id: &Uuid) -> Result<i64, error::SystemError>;

    /// Appends the lesson after the course's current last position.
    async fn create_lesson(
        &self,
        course_id: &Uuid,
        lesson: &InsertLesson,
    ) -> Result<LessonEntity, error::SystemError>;

    async fn create_note(
        &self,
        lesson_id: &Uuid,
        note: &InsertNote,
    ) -> Result<NoteEntity, error::SystemError>;

    /// Removes the lesson and its notes.
    async fn delete_lesson(
        &self,
        course_id: &Uuid,
        lesson_id: &Uuid,
    ) -> Result<Option<LessonEntity>, error::SystemError>;
}
