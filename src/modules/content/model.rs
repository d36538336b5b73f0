use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::modules::course::model::validate_http_url;

/// MIME types a lesson note may carry.
pub const NOTE_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "text/plain",
    "text/markdown",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "image/jpeg",
    "image/png",
    "image/avif",
    "application/json",
    "text/html",
];

pub fn validate_note_type(file_type: &str) -> Result<(), ValidationError> {
    let file_type = file_type.trim().to_ascii_lowercase();
    if NOTE_CONTENT_TYPES.contains(&file_type.as_str()) {
        return Ok(());
    }
    Err(ValidationError::new("note_type").with_message("Unsupported note file type".into()))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLessonModel {
    #[validate(length(min = 2, max = 100, message = "Title must be 2-100 characters long"))]
    pub title: String,
    #[validate(length(min = 1, message = "Video key must not be empty"))]
    pub video_key: Option<String>,
    #[validate(custom(function = "validate_http_url"))]
    pub video_url: Option<String>,
    #[validate(range(min = 0, max = 86400, message = "Duration must be 0-86400 seconds"))]
    pub duration: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteModel {
    #[validate(length(min = 1, max = 100, message = "File name must be 1-100 characters long"))]
    pub file_name: String,
    #[validate(length(min = 1, message = "File key is required"))]
    pub file_key: String,
    #[validate(custom(function = "validate_http_url"))]
    pub file_url: Option<String>,
    #[validate(custom(function = "validate_note_type"))]
    pub file_type: String,
}

#[derive(Debug, Deserialize)]
pub struct LessonPath {
    pub id: Uuid,
    pub lesson_id: Uuid,
}

pub struct InsertLesson {
    pub title: String,
    pub video_key: Option<String>,
    pub video_url: Option<String>,
    pub duration: i32,
}

pub struct InsertNote {
    pub file_name: String,
    pub file_key: String,
    pub file_url: Option<String>,
    pub file_type: String,
}

/// A stored object as handed to clients. `url` is a signed GET URL when the
/// object has a key.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: Uuid,
    pub file_name: String,
    pub file_type: String,
    pub file: AssetResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonResponse {
    pub id: Uuid,
    pub title: String,
    pub position: i32,
    pub duration: i32,
    pub video: Option<AssetResponse>,
    pub notes: Vec<NoteResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseContentResponse {
    pub course_id: Uuid,
    pub lessons: Vec<LessonResponse>,
    pub total_duration: i64,
}
