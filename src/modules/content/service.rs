use log::info;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::content::model::{
    AssetResponse, CourseContentResponse, CreateLessonModel, CreateNoteModel, InsertLesson,
    InsertNote, LessonResponse, NoteResponse,
};
use crate::modules::content::repository::ContentRepository;
use crate::modules::content::schema::NoteEntity;
use crate::modules::course::repository::CourseRepository;
use crate::modules::enrollment::repository::EnrollmentRepository;
use crate::modules::upload::{
    category::{classify, ContentCategory},
    key::sanitize_segment,
    UploadService,
};
use crate::modules::user::schema::UserRole;

const PRIVATE_ACCESS: &str = "private";

#[derive(Clone)]
pub struct ContentService {
    repo: Arc<dyn ContentRepository + Send + Sync>,
    courses: Arc<dyn CourseRepository + Send + Sync>,
    enrollments: Arc<dyn EnrollmentRepository + Send + Sync>,
    uploads: UploadService,
}

impl ContentService {
    pub fn with_dependencies(
        repo: Arc<dyn ContentRepository + Send + Sync>,
        courses: Arc<dyn CourseRepository + Send + Sync>,
        enrollments: Arc<dyn EnrollmentRepository + Send + Sync>,
        uploads: UploadService,
    ) -> Self {
        info!("ContentService initialized with dependencies");
        ContentService { repo, courses, enrollments, uploads }
    }

    async fn ensure_course(&self, course_id: &Uuid) -> Result<(), error::SystemError> {
        match self.courses.find_by_id(course_id).await? {
            Some(_) => Ok(()),
            None => Err(error::SystemError::not_found("Course not found")),
        }
    }

    /// Lesson assets are private objects stored under the course id, in the
    /// folder of the category they were uploaded as.
    fn ensure_lesson_key(
        &self,
        course_id: &Uuid,
        key: &str,
        category: ContentCategory,
    ) -> Result<(), error::SystemError> {
        let course_segment = sanitize_segment(&course_id.to_string());
        match self.uploads.key_scope(key) {
            Some(scope)
                if scope.access_type == PRIVATE_ACCESS
                    && scope.scope_name == course_segment
                    && scope.category == category.as_str() =>
            {
                Ok(())
            }
            _ => Err(error::SystemError::bad_request("Invalid lesson asset key")),
        }
    }

    pub async fn add_lesson(
        &self,
        course_id: Uuid,
        model: CreateLessonModel,
    ) -> Result<LessonResponse, error::SystemError> {
        self.ensure_course(&course_id).await?;

        let video_key = model.video_key.map(|k| k.trim().to_string());
        if let Some(key) = &video_key {
            self.ensure_lesson_key(&course_id, key, ContentCategory::Videos)?;
        }

        let lesson = self
            .repo
            .create_lesson(
                &course_id,
                &InsertLesson {
                    title: model.title.trim().to_string(),
                    video_key,
                    video_url: model.video_url,
                    duration: model.duration.unwrap_or(0),
                },
            )
            .await?;

        info!("Lesson {} added to course {}", lesson.id, course_id);
        let video = match (lesson.video_key, lesson.video_url) {
            (None, None) => None,
            (key, url) => Some(AssetResponse { key, url: url.unwrap_or_default(), expires_in: None }),
        };

        Ok(LessonResponse {
            id: lesson.id,
            title: lesson.title,
            position: lesson.position,
            duration: lesson.duration,
            video,
            notes: Vec::new(),
        })
    }

    pub async fn add_note(
        &self,
        course_id: Uuid,
        lesson_id: Uuid,
        model: CreateNoteModel,
    ) -> Result<NoteResponse, error::SystemError> {
        self.repo
            .find_lesson(&course_id, &lesson_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Lesson not found"))?;

        let file_key = model.file_key.trim().to_string();
        let file_type = model.file_type.trim().to_ascii_lowercase();
        self.ensure_lesson_key(&course_id, &file_key, classify(Some(file_type.as_str())))?;

        let note = self
            .repo
            .create_note(
                &lesson_id,
                &InsertNote {
                    file_name: model.file_name.trim().to_string(),
                    file_key,
                    file_url: model.file_url,
                    file_type,
                },
            )
            .await?;

        Ok(NoteResponse {
            id: note.id,
            file_name: note.file_name,
            file_type: note.file_type,
            file: AssetResponse {
                url: note.file_url.unwrap_or_default(),
                key: Some(note.file_key),
                expires_in: None,
            },
        })
    }

    /// Deletes the lesson row, then its stored objects best-effort.
    pub async fn delete_lesson(
        &self,
        course_id: Uuid,
        lesson_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let notes = self.repo.find_notes(&lesson_id).await?;
        let lesson = self
            .repo
            .delete_lesson(&course_id, &lesson_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Lesson not found"))?;

        let keys = lesson.video_key.into_iter().chain(notes.into_iter().map(|n| n.file_key));
        for key in keys {
            self.uploads.delete_object_quietly(&key).await;
        }

        info!("Lesson {} deleted from course {}", lesson_id, course_id);
        Ok(())
    }

    pub async fn has_access(
        &self,
        course_id: &Uuid,
        user_id: &Uuid,
        role: &UserRole,
    ) -> Result<bool, error::SystemError> {
        if *role == UserRole::Admin {
            return Ok(true);
        }
        let enrollment = self.enrollments.find(user_id, course_id).await?;
        Ok(enrollment.is_some_and(|e| e.grants_access(chrono::Utc::now())))
    }

    async fn sign(&self, key: String) -> Result<AssetResponse, error::SystemError> {
        let expiry = self.uploads.config().read_url_expiry_secs;
        let download = self.uploads.issue_presigned_download(&key, Some(expiry)).await?;
        Ok(AssetResponse { key: Some(key), url: download.url, expires_in: Some(download.expires_in) })
    }

    /// Lessons with signed URLs for every stored object.
    pub async fn get_content(
        &self,
        course_id: Uuid,
        user_id: Uuid,
        role: UserRole,
    ) -> Result<CourseContentResponse, error::SystemError> {
        self.ensure_course(&course_id).await?;

        if !self.has_access(&course_id, &user_id, &role).await? {
            return Err(error::SystemError::forbidden("You do not have access to this course"));
        }

        let lessons = self.repo.find_lessons(&course_id).await?;
        let mut notes_by_lesson: HashMap<Uuid, Vec<NoteEntity>> = HashMap::new();
        for note in self.repo.find_course_notes(&course_id).await? {
            notes_by_lesson.entry(note.lesson_id).or_default().push(note);
        }

        let total_duration = lessons.iter().map(|l| i64::from(l.duration)).sum();
        let mut responses = Vec::with_capacity(lessons.len());

        for lesson in lessons {
            let video = match (lesson.video_key, lesson.video_url) {
                (Some(key), _) => Some(self.sign(key).await?),
                (None, Some(url)) => Some(AssetResponse { key: None, url, expires_in: None }),
                (None, None) => None,
            };

            let mut notes = Vec::new();
            for note in notes_by_lesson.remove(&lesson.id).unwrap_or_default() {
                notes.push(NoteResponse {
                    id: note.id,
                    file_name: note.file_name,
                    file_type: note.file_type,
                    file: self.sign(note.file_key).await?,
                });
            }

            responses.push(LessonResponse {
                id: lesson.id,
                title: lesson.title,
                position: lesson.position,
                duration: lesson.duration,
                video,
                notes,
            });
        }

        Ok(CourseContentResponse { course_id, lessons: responses, total_duration })
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::modules::{
        course::service::testing::InMemoryCourses,
        enrollment::{
            schema::EnrollmentStatus, service::testing::InMemoryEnrollments,
        },
        upload::{
            model::StorageConfig,
            storage::testing::{RecordingStorage, StorageCall},
        },
    };

    struct Fixture {
        service: ContentService,
        content: Arc<InMemoryContent>,
        enrollments: Arc<InMemoryEnrollments>,
        storage: Arc<RecordingStorage>,
        course_id: Uuid,
    }

    fn fixture() -> Fixture {
        let content = Arc::new(InMemoryContent::default());
        let courses = Arc::new(InMemoryCourses::default());
        let enrollments = Arc::new(InMemoryEnrollments::default());
        let storage = Arc::new(RecordingStorage::default());
        let course_id = courses.insert("Rust", 30.0);
        let uploads = UploadService::new(storage.clone(), StorageConfig::default());
        let service = ContentService::with_dependencies(
            content.clone(),
            courses,
            enrollments.clone(),
            uploads,
        );
        Fixture { service, content, enrollments, storage, course_id }
    }

    fn lesson_key(course_id: &Uuid, file: &str) -> String {
        format!("course-market/private/0190aa/{course_id}/videos/1-ab-{file}")
    }

    fn note_key(course_id: &Uuid, file: &str) -> String {
        format!("course-market/private/0190aa/{course_id}/documents/1-ab-{file}")
    }

    fn lesson(title: &str, video_key: Option<String>, duration: i32) -> CreateLessonModel {
        CreateLessonModel { title: title.into(), video_key, video_url: None, duration: Some(duration) }
    }

    #[actix_web::test]
    async fn lessons_are_positioned_and_keys_checked() {
        let f = fixture();
        let first = f
            .service
            .add_lesson(f.course_id, lesson("Intro", Some(lesson_key(&f.course_id, "a.mp4")), 60))
            .await
            .unwrap();
        let second = f.service.add_lesson(f.course_id, lesson("Borrowing", None, 90)).await.unwrap();
        assert_eq!((first.position, second.position), (1, 2));

        let other_course = Uuid::now_v7();
        let err = f
            .service
            .add_lesson(f.course_id, lesson("Bad", Some(lesson_key(&other_course, "a.mp4")), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));

        let public = format!("course-market/public/0190aa/{}/videos/1-ab-a.mp4", f.course_id);
        let err =
            f.service.add_lesson(f.course_id, lesson("Bad", Some(public), 1)).await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));

        let err = f.service.add_lesson(Uuid::now_v7(), lesson("Lost", None, 1)).await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));
    }

    #[actix_web::test]
    async fn asset_keys_must_match_their_category() {
        let f = fixture();
        let document = note_key(&f.course_id, "a.pdf");
        let err =
            f.service.add_lesson(f.course_id, lesson("Bad", Some(document), 1)).await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));

        let added = f.service.add_lesson(f.course_id, lesson("Intro", None, 10)).await.unwrap();
        let note = |file_key: String, file_type: &str| CreateNoteModel {
            file_name: "slides.pdf".into(),
            file_key,
            file_url: None,
            file_type: file_type.into(),
        };

        let err = f
            .service
            .add_note(f.course_id, added.id, note(lesson_key(&f.course_id, "a.mp4"), "application/pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));

        let image = format!("course-market/private/0190aa/{}/images/1-ab-a.png", f.course_id);
        let created = f.service.add_note(f.course_id, added.id, note(image, "image/png")).await.unwrap();
        assert_eq!(created.file_type, "image/png");
        assert!(f.storage.calls().is_empty());
    }

    #[actix_web::test]
    async fn content_requires_admin_or_active_enrollment() {
        let f = fixture();
        let key = lesson_key(&f.course_id, "a.mp4");
        let added = f.service.add_lesson(f.course_id, lesson("Intro", Some(key.clone()), 120)).await.unwrap();
        f.service
            .add_note(
                f.course_id,
                added.id,
                CreateNoteModel {
                    file_name: "slides.pdf".into(),
                    file_key: note_key(&f.course_id, "slides.pdf"),
                    file_url: None,
                    file_type: "application/pdf".into(),
                },
            )
            .await
            .unwrap();

        let student = Uuid::now_v7();
        let err = f.service.get_content(f.course_id, student, UserRole::User).await.unwrap_err();
        assert!(matches!(err, error::SystemError::Forbidden(_)));

        f.enrollments.enroll(student, f.course_id, EnrollmentStatus::Suspended, None);
        let err = f.service.get_content(f.course_id, student, UserRole::User).await.unwrap_err();
        assert!(matches!(err, error::SystemError::Forbidden(_)));

        let expired = chrono::Utc::now() - chrono::Duration::days(1);
        let late = Uuid::now_v7();
        f.enrollments.enroll(late, f.course_id, EnrollmentStatus::Active, Some(expired));
        assert!(f.service.get_content(f.course_id, late, UserRole::User).await.is_err());

        let active = Uuid::now_v7();
        f.enrollments.enroll(active, f.course_id, EnrollmentStatus::Active, None);
        let content = f.service.get_content(f.course_id, active, UserRole::User).await.unwrap();
        assert_eq!(content.total_duration, 120);
        assert_eq!(content.lessons.len(), 1);

        let video = content.lessons[0].video.as_ref().unwrap();
        assert_eq!(video.expires_in, Some(3600));
        assert!(video.url.contains(&key));
        assert_eq!(content.lessons[0].notes.len(), 1);

        let admin = f.service.get_content(f.course_id, Uuid::now_v7(), UserRole::Admin).await;
        assert!(admin.is_ok());

        let gets = f.storage.calls().into_iter().filter(|c| matches!(c, StorageCall::Get { .. })).count();
        assert_eq!(gets, 4);
    }

    #[actix_web::test]
    async fn notes_need_existing_lesson_in_course() {
        let f = fixture();
        let note = || CreateNoteModel {
            file_name: "notes.md".into(),
            file_key: note_key(&f.course_id, "notes.md"),
            file_url: None,
            file_type: "text/markdown".into(),
        };

        let err = f.service.add_note(f.course_id, Uuid::now_v7(), note()).await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));

        let added = f.service.add_lesson(f.course_id, lesson("Intro", None, 10)).await.unwrap();
        let created = f.service.add_note(f.course_id, added.id, note()).await.unwrap();
        assert_eq!(created.file_type, "text/markdown");

        let err = f.service.add_note(Uuid::now_v7(), added.id, note()).await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));
    }

    #[actix_web::test]
    async fn deleting_a_lesson_removes_its_objects() {
        let f = fixture();
        let video = lesson_key(&f.course_id, "a.mp4");
        let file = note_key(&f.course_id, "b.pdf");
        let added =
            f.service.add_lesson(f.course_id, lesson("Intro", Some(video.clone()), 10)).await.unwrap();
        f.service
            .add_note(
                f.course_id,
                added.id,
                CreateNoteModel {
                    file_name: "b.pdf".into(),
                    file_key: file.clone(),
                    file_url: None,
                    file_type: "application/pdf".into(),
                },
            )
            .await
            .unwrap();

        f.service.delete_lesson(f.course_id, added.id).await.unwrap();
        assert!(f.content.lessons.lock().unwrap().is_empty());
        assert!(f.content.notes.lock().unwrap().is_empty());
        assert_eq!(
            f.storage.calls(),
            vec![StorageCall::Delete { key: video }, StorageCall::Delete { key: file }]
        );

        let err = f.service.delete_lesson(f.course_id, added.id).await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));
    }
}
