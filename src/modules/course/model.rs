use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::modules::course::schema::CourseEntity;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseModel {
    #[validate(length(min = 2, max = 30, message = "Title must be 2-30 characters long"))]
    pub title: String,
    #[validate(length(min = 2, max = 500, message = "Description must be 2-500 characters long"))]
    pub description: String,
    #[validate(range(min = 1.0, max = 99999.0, message = "Price must be between 1 and 99999"))]
    pub price: f64,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_update_not_empty"))]
pub struct UpdateCourseModel {
    #[validate(length(min = 2, max = 30, message = "Title must be 2-30 characters long"))]
    pub title: Option<String>,
    #[validate(length(min = 2, max = 500, message = "Description must be 2-500 characters long"))]
    pub description: Option<String>,
    #[validate(range(min = 1.0, max = 99999.0, message = "Price must be between 1 and 99999"))]
    pub price: Option<f64>,
}

fn validate_update_not_empty(model: &UpdateCourseModel) -> Result<(), ValidationError> {
    if model.title.is_none() && model.description.is_none() && model.price.is_none() {
        return Err(ValidationError::new("empty_update")
            .with_message("At least one field must be provided".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct ThumbnailModel {
    #[validate(custom(function = "validate_http_url"))]
    pub url: String,
    #[validate(length(min = 1, message = "Key is required"))]
    pub key: String,
}

pub fn validate_http_url(url: &str) -> Result<(), ValidationError> {
    let ok = url.len() <= 2048 && (url.starts_with("https://") || url.starts_with("http://"));
    if !ok {
        return Err(ValidationError::new("url").with_message("Invalid URL".into()));
    }
    Ok(())
}

pub struct InsertCourse {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub creator_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct Thumbnail {
    pub url: String,
    pub key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub thumbnail: Option<Thumbnail>,
    pub creator_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<CourseEntity> for CourseResponse {
    fn from(entity: CourseEntity) -> Self {
        let thumbnail = match (entity.thumbnail_url, entity.thumbnail_key) {
            (Some(url), Some(key)) => Some(Thumbnail { url, key }),
            _ => None,
        };

        CourseResponse {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            price: entity.price,
            thumbnail,
            creator_id: entity.creator_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_bounds() {
        let ok = CreateCourseModel { title: "Go 101".into(), description: "Basics".into(), price: 49.0 };
        assert!(ok.validate().is_ok());

        let free = CreateCourseModel { price: 0.0, ..ok };
        assert!(free.validate().is_err());

        let long = CreateCourseModel {
            title: "x".repeat(31),
            description: "Basics".into(),
            price: 10.0,
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn update_needs_a_field() {
        assert!(UpdateCourseModel::default().validate().is_err());
        let price_only = UpdateCourseModel { price: Some(12.5), ..Default::default() };
        assert!(price_only.validate().is_ok());
    }

    #[test]
    fn thumbnail_url_must_be_http() {
        assert!(validate_http_url("https://cdn.example.com/a.png").is_ok());
        assert!(validate_http_url("javascript:alert(1)").is_err());
    }
}
