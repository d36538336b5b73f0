use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::content::repository::ContentRepository;
use crate::modules::course::repository::CourseRepository;
use crate::modules::enrollment::model::{EnrollmentResponse, OwnedCourseResponse};
use crate::modules::enrollment::repository::EnrollmentRepository;

#[derive(Clone)]
pub struct EnrollmentService {
    repo: Arc<dyn EnrollmentRepository + Send + Sync>,
    courses: Arc<dyn CourseRepository + Send + Sync>,
    content: Arc<dyn ContentRepository + Send + Sync>,
}

impl EnrollmentService {
    pub fn with_dependencies(
        repo: Arc<dyn EnrollmentRepository + Send + Sync>,
        courses: Arc<dyn CourseRepository + Send + Sync>,
        content: Arc<dyn ContentRepository + Send + Sync>,
    ) -> Self {
        info!("EnrollmentService initialized with dependencies");
        EnrollmentService { repo, courses, content }
    }

    pub async fn purchase(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<EnrollmentResponse, error::SystemError> {
        let course = self
            .courses
            .find_by_id(&course_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Course not found"))?;

        if self.repo.find(&user_id, &course_id).await?.is_some() {
            return Err(error::SystemError::already_exists("You are already enrolled in this course"));
        }

        let enrollment = self.repo.purchase(&user_id, &course_id, course.price).await?;
        info!("User {} enrolled in course {}", user_id, course_id);
        Ok(enrollment.into())
    }

    pub async fn owned_courses(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<OwnedCourseResponse>, error::SystemError> {
        let rows = self.repo.find_owned(&user_id).await?;
        Ok(rows.into_iter().map(OwnedCourseResponse::from).collect())
    }

    pub async fn complete_lesson(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<EnrollmentResponse, error::SystemError> {
        let enrollment = self
            .repo
            .find(&user_id, &course_id)
            .await?
            .filter(|e| e.grants_access(chrono::Utc::now()))
            .ok_or_else(|| error::SystemError::forbidden("You do not have access to this course"))?;

        self.content
            .find_lesson(&course_id, &lesson_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Lesson not found"))?;

        let total_lessons = self.content.count_lessons(&course_id).await?;
        let updated = self
            .repo
            .record_completion(&enrollment.id, &lesson_id, total_lessons)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Enrollment not found"))?;

        Ok(updated.into())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::modules::{
        content::{model::InsertLesson, service::testing::InMemoryContent},
        course::service::testing::InMemoryCourses,
        enrollment::schema::EnrollmentStatus,
    };

    struct Fixture {
        service: EnrollmentService,
        enrollments: Arc<InMemoryEnrollments>,
        content: Arc<InMemoryContent>,
        course_id: Uuid,
    }

    fn fixture() -> Fixture {
        let courses = Arc::new(InMemoryCourses::default());
        let enrollments = Arc::new(InMemoryEnrollments::default());
        let content = Arc::new(InMemoryContent::default());
        let course_id = courses.insert("Rust", 42.0);
        let service =
            EnrollmentService::with_dependencies(enrollments.clone(), courses, content.clone());
        Fixture { service, enrollments, content, course_id }
    }

    async fn add_lesson(content: &InMemoryContent, course_id: &Uuid) -> Uuid {
        content
            .create_lesson(
                course_id,
                &InsertLesson { title: "L".into(), video_key: None, video_url: None, duration: 5 },
            )
            .await
            .unwrap()
            .id
    }

    #[actix_web::test]
    async fn purchase_enrolls_once() {
        let f = fixture();
        let user = Uuid::now_v7();

        let enrollment = f.service.purchase(user, f.course_id).await.unwrap();
        assert_eq!(enrollment.status, EnrollmentStatus::Active);
        assert_eq!(f.enrollments.purchases.lock().unwrap().as_slice(), &[(user, f.course_id, 42.0)]);

        let err = f.service.purchase(user, f.course_id).await.unwrap_err();
        assert!(matches!(err, error::SystemError::AlreadyExists(_)));

        let err = f.service.purchase(user, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));
    }

    #[actix_web::test]
    async fn completion_is_idempotent_and_tracks_percentage() {
        let f = fixture();
        let user = Uuid::now_v7();
        let first = add_lesson(&f.content, &f.course_id).await;
        let second = add_lesson(&f.content, &f.course_id).await;
        let _third = add_lesson(&f.content, &f.course_id).await;
        f.service.purchase(user, f.course_id).await.unwrap();

        let progress = f.service.complete_lesson(user, f.course_id, first).await.unwrap();
        assert_eq!(progress.completion_percentage, 33);

        let again = f.service.complete_lesson(user, f.course_id, first).await.unwrap();
        assert_eq!(again.completed_lessons, vec![first]);
        assert_eq!(again.completion_percentage, 33);

        let progress = f.service.complete_lesson(user, f.course_id, second).await.unwrap();
        assert_eq!(progress.completion_percentage, 66);
        assert_eq!(progress.last_accessed_lesson, Some(second));
    }

    #[actix_web::test]
    async fn completion_requires_access_and_a_lesson_of_the_course() {
        let f = fixture();
        let lesson = add_lesson(&f.content, &f.course_id).await;

        let stranger = Uuid::now_v7();
        let err = f.service.complete_lesson(stranger, f.course_id, lesson).await.unwrap_err();
        assert!(matches!(err, error::SystemError::Forbidden(_)));

        let suspended = Uuid::now_v7();
        f.enrollments.enroll(suspended, f.course_id, EnrollmentStatus::Suspended, None);
        let err = f.service.complete_lesson(suspended, f.course_id, lesson).await.unwrap_err();
        assert!(matches!(err, error::SystemError::Forbidden(_)));

        let student = Uuid::now_v7();
        f.service.purchase(student, f.course_id).await.unwrap();
        let err =
            f.service.complete_lesson(student, f.course_id, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));
    }
}
