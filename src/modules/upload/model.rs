use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::modules::upload::key::StorageKey;

pub const DEFAULT_ROOT_FOLDER: &str = "course-market";
pub const DEFAULT_MAX_SEGMENT_BYTES: usize = 200;
pub const DEFAULT_MAX_KEY_BYTES: usize = 900;
pub const DEFAULT_READ_URL_EXPIRY: u64 = 3600;
pub const DEFAULT_ACCESS_TYPES: &[&str] = &["public", "private"];
pub const DEFAULT_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/avif",
    "video/mp4",
    "video/webm",
    "video/quicktime",
    "application/pdf",
    "text/plain",
    "text/markdown",
    "text/html",
    "application/json",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
];

/// Storage layout and allow-lists, loaded once at startup.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub root_folder: String,
    pub max_segment_bytes: usize,
    pub max_key_bytes: usize,
    pub allowed_access_types: Vec<String>,
    pub allowed_content_types: Vec<String>,
    pub read_url_expiry_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_folder: DEFAULT_ROOT_FOLDER.to_string(),
            max_segment_bytes: DEFAULT_MAX_SEGMENT_BYTES,
            max_key_bytes: DEFAULT_MAX_KEY_BYTES,
            allowed_access_types: DEFAULT_ACCESS_TYPES.iter().map(|s| s.to_string()).collect(),
            allowed_content_types: DEFAULT_CONTENT_TYPES.iter().map(|s| s.to_string()).collect(),
            read_url_expiry_secs: DEFAULT_READ_URL_EXPIRY,
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let root_folder = std::env::var("STORAGE_ROOT_FOLDER")
            .ok()
            .map(|s| s.trim().trim_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.root_folder);

        let max_segment_bytes = std::env::var("STORAGE_MAX_SEGMENT_BYTES")
            .map(|v| {
                v.parse::<usize>().expect("STORAGE_MAX_SEGMENT_BYTES must be a valid usize integer")
            })
            .unwrap_or(defaults.max_segment_bytes);

        let max_key_bytes = std::env::var("STORAGE_MAX_KEY_BYTES")
            .map(|v| v.parse::<usize>().expect("STORAGE_MAX_KEY_BYTES must be a valid usize integer"))
            .unwrap_or(defaults.max_key_bytes);

        let allowed_access_types = std::env::var("STORAGE_ALLOWED_ACCESS_TYPES")
            .map(|v| parse_list(&v))
            .unwrap_or(defaults.allowed_access_types);

        let allowed_content_types = std::env::var("STORAGE_ALLOWED_CONTENT_TYPES")
            .map(|v| parse_list(&v))
            .unwrap_or(defaults.allowed_content_types);

        let read_url_expiry_secs = std::env::var("STORAGE_READ_URL_EXPIRY")
            .map(|v| v.parse::<u64>().expect("STORAGE_READ_URL_EXPIRY must be a valid u64 integer"))
            .unwrap_or(defaults.read_url_expiry_secs);

        Self {
            root_folder,
            max_segment_bytes,
            max_key_bytes,
            allowed_access_types,
            allowed_content_types,
            read_url_expiry_secs,
        }
    }

    pub fn allows_access_type(&self, access_type: &str) -> bool {
        let access_type = access_type.trim().to_ascii_lowercase();
        self.allowed_access_types.iter().any(|a| *a == access_type)
    }

    pub fn allows_content_type(&self, content_type: &str) -> bool {
        let content_type = content_type.trim().to_ascii_lowercase();
        self.allowed_content_types.iter().any(|c| *c == content_type)
    }
}

pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_ascii_lowercase()).filter(|s| !s.is_empty()).collect()
}

/// Logical attributes of a requested upload.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub access_type: String,
    pub actor_id: String,
    pub scope_name: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
    pub url: String,
    pub key: StorageKey,
    pub content_type: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedDownload {
    pub url: String,
    pub expires_in: u64,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailUploadQuery {
    #[validate(custom(function = "validate_course_name"))]
    pub course_name: String,
    #[validate(custom(function = "validate_file_name"))]
    pub file_name: String,
    #[validate(length(min = 1, max = 100, message = "File type must be 1-100 characters long"))]
    pub file_type: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LessonUploadQuery {
    pub course_id: Uuid,
    #[validate(custom(function = "validate_file_name"))]
    pub file_name: String,
    #[validate(length(min = 1, max = 100, message = "File type must be 1-100 characters long"))]
    pub file_type: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DeleteObjectQuery {
    #[validate(length(min = 1, message = "Key is required"))]
    pub key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUploadResponse {
    pub url: String,
    pub key: String,
    pub content_type: String,
    pub expires_in: u64,
}

impl From<PresignedUpload> for PresignedUploadResponse {
    fn from(upload: PresignedUpload) -> Self {
        PresignedUploadResponse {
            url: upload.url,
            key: upload.key.into_string(),
            content_type: upload.content_type,
            expires_in: upload.expires_in,
        }
    }
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Words of `[A-Za-z0-9_-]` separated by single spaces, 3-100 chars.
pub fn validate_course_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.len() < 3 || name.len() > 100 {
        return Err(invalid("course_name_length", "Course name must be 3-100 characters long"));
    }
    if name.starts_with('/') || name.contains("//") || name.contains("..") {
        return Err(invalid("course_name_path", "Course name must not look like a path"));
    }
    let words_ok = name.split(' ').all(|word| {
        !word.is_empty()
            && word.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    });
    if !words_ok {
        return Err(invalid("course_name_chars", "Invalid course name"));
    }
    Ok(())
}

/// 1-100 chars of `[A-Za-z0-9_.-]` with an extension of at least two chars.
pub fn validate_file_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() || name.len() > 100 {
        return Err(invalid("file_name_length", "File name must be 1-100 characters long"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')) {
        return Err(invalid("file_name_chars", "Invalid file name"));
    }
    match name.rsplit_once('.') {
        Some((_, ext)) if ext.len() > 1 => Ok(()),
        _ => Err(invalid("file_name_extension", "File name must include an extension")),
    }
}
