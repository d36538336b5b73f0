use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::course::model::{
    CourseResponse, CreateCourseModel, InsertCourse, ThumbnailModel, UpdateCourseModel,
};
use crate::modules::content::repository::ContentRepository;
use crate::modules::course::repository::CourseRepository;
use crate::modules::upload::UploadService;

const PUBLIC_ACCESS: &str = "public";

#[derive(Clone)]
pub struct CourseService {
    repo: Arc<dyn CourseRepository + Send + Sync>,
    content: Arc<dyn ContentRepository + Send + Sync>,
    uploads: UploadService,
}

impl CourseService {
    pub fn with_dependencies(
        repo: Arc<dyn CourseRepository + Send + Sync>,
        content: Arc<dyn ContentRepository + Send + Sync>,
        uploads: UploadService,
    ) -> Self {
        info!("CourseService initialized with dependencies");
        CourseService { repo, content, uploads }
    }

    pub async fn list(&self) -> Result<Vec<CourseResponse>, error::SystemError> {
        let courses = self.repo.find_all().await?;
        Ok(courses.into_iter().map(CourseResponse::from).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<CourseResponse, error::SystemError> {
        self.repo
            .find_by_id(&id)
            .await?
            .map(CourseResponse::from)
            .ok_or_else(|| error::SystemError::not_found("Course not found"))
    }

    pub async fn create(
        &self,
        creator_id: Uuid,
        model: CreateCourseModel,
    ) -> Result<CourseResponse, error::SystemError> {
        let course = self
            .repo
            .create(&InsertCourse {
                title: model.title.trim().to_string(),
                description: model.description.trim().to_string(),
                price: model.price,
                creator_id,
            })
            .await?;

        info!("Course {} created by {}", course.id, creator_id);
        Ok(course.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        mut changes: UpdateCourseModel,
    ) -> Result<CourseResponse, error::SystemError> {
        changes.title = changes.title.map(|t| t.trim().to_string());
        changes.description = changes.description.map(|d| d.trim().to_string());

        self.repo
            .update(&id, &changes)
            .await?
            .map(CourseResponse::from)
            .ok_or_else(|| error::SystemError::not_found("Course not found"))
    }

    /// Deletes the course row (lessons and notes cascade), then every object
    /// it referenced best-effort.
    pub async fn delete(&self, id: Uuid) -> Result<(), error::SystemError> {
        let lessons = self.content.find_lessons(&id).await?;
        let notes = self.content.find_course_notes(&id).await?;

        let deleted = self
            .repo
            .delete(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Course not found"))?;

        let keys = deleted
            .thumbnail_key
            .into_iter()
            .chain(lessons.into_iter().filter_map(|l| l.video_key))
            .chain(notes.into_iter().map(|n| n.file_key));
        for key in keys {
            self.uploads.delete_object_quietly(&key).await;
        }

        info!("Course {} deleted", id);
        Ok(())
    }

    /// Points the course at an uploaded thumbnail. The key must be a public
    /// key under the configured root; a replaced object is removed.
    pub async fn set_thumbnail(
        &self,
        id: Uuid,
        thumbnail: ThumbnailModel,
    ) -> Result<CourseResponse, error::SystemError> {
        let key = thumbnail.key.trim();
        match self.uploads.key_scope(key) {
            Some(scope) if scope.access_type == PUBLIC_ACCESS => {}
            _ => return Err(error::SystemError::bad_request("Invalid thumbnail key")),
        }

        let current = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Course not found"))?;

        let updated = self
            .repo
            .set_thumbnail(&id, thumbnail.url.trim(), key)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Course not found"))?;

        if let Some(old) = current.thumbnail_key.filter(|old| old != key) {
            self.uploads.delete_object_quietly(&old).await;
        }

        Ok(updated.into())
    }
}
