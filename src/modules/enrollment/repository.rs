use uuid::Uuid;

use crate::{
    api::error,
    modules::enrollment::{model::OwnedCourseRow, schema::EnrollmentEntity},
};

#[async_trait::async_trait]
pub trait EnrollmentRepository {
    async fn find(
        &self,
        user_id: &Uuid,
        course_id: &Uuid,
    ) -> Result<Option<EnrollmentEntity>, error::SystemError>;

    async fn find_owned(&self, user_id: &Uuid) -> Result<Vec<OwnedCourseRow>, error::SystemError>;

    /// Records the purchase and the active enrollment together.
    async fn purchase(
        &self,
        user_id: &Uuid,
        course_id: &Uuid,
        amount: f64,
    ) -> Result<EnrollmentEntity, error::SystemError>;

    /// Adds the lesson to the completed set if absent, marks it as last
    /// accessed and recomputes the percentage against `total_lessons`.
    async fn record_completion(
        &self,
        enrollment_id: &Uuid,
        lesson_id: &Uuid,
        total_lessons: i64,
    ) -> Result<Option<EnrollmentEntity>, error::SystemError>;
}
