use uuid::Uuid;

use crate::{
    api::error,
    modules::course::{
        model::{InsertCourse, UpdateCourseModel},
        schema::CourseEntity,
    },
};

#[async_trait::async_trait]
pub trait CourseRepository {
    async fn find_all(&self) -> Result<Vec<CourseEntity>, error::SystemError>;

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<CourseEntity>, error::SystemError>;

    async fn create(&self, course: &InsertCourse) -> Result<CourseEntity, error::SystemError>;

    async fn update(
        &self,
        id: &Uuid,
        changes: &UpdateCourseModel,
    ) -> Result<Option<CourseEntity>, error::SystemError>;

    async fn set_thumbnail(
        &self,
        id: &Uuid,
        url: &str,
        key: &str,
    ) -> Result<Option<CourseEntity>, error::SystemError>;

    /// Returns the removed row so its stored objects can be cleaned up.
    async fn delete(&self, id: &Uuid) -> Result<Option<CourseEntity>, error::SystemError>;
}
