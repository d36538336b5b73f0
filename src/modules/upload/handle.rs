use actix_web::{delete, get, web, HttpRequest};

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        upload::{
            key::sanitize_segment,
            model::{
                DeleteObjectQuery, LessonUploadQuery, PresignedUploadResponse,
                ThumbnailUploadQuery, UploadRequest,
            },
            service::UploadService,
        },
        user::schema::UserRole,
    },
    utils::ValidatedQuery,
};

pub const ROUTE_EXPIRY_SECS: u64 = 300;
const PUBLIC_ACCESS: &str = "public";
const PRIVATE_ACCESS: &str = "private";

async fn presign(
    upload_service: &UploadService,
    req: &HttpRequest,
    access_type: &str,
    scope_name: String,
    file_name: String,
    content_type: Option<String>,
) -> Result<success::Success<PresignedUploadResponse>, error::Error> {
    let claims = get_claims(req)?;

    let upload = upload_service
        .issue_presigned_upload(UploadRequest {
            access_type: access_type.to_string(),
            actor_id: claims.sub.to_string(),
            scope_name,
            file_name,
            content_type,
            expires_in: Some(ROUTE_EXPIRY_SECS),
        })
        .await?;

    Ok(success::Success::ok(Some(PresignedUploadResponse::from(upload)))
        .message("Pre-signed URL generated successfully"))
}

/// Lesson assets belong to a course, so only admins may mint upload URLs.
async fn presign_lesson_asset(
    upload_service: &UploadService,
    req: &HttpRequest,
    query: LessonUploadQuery,
) -> Result<success::Success<PresignedUploadResponse>, error::Error> {
    if get_claims(req)?.role != UserRole::Admin {
        return Err(error::Error::forbidden("Only admins can upload lesson content"));
    }

    presign(
        upload_service,
        req,
        PRIVATE_ACCESS,
        query.course_id.to_string(),
        query.file_name.trim().to_string(),
        query.file_type,
    )
    .await
}

#[get("/thumbnail/pre-signed-url")]
pub async fn thumbnail_upload_url(
    upload_service: web::Data<UploadService>,
    query: ValidatedQuery<ThumbnailUploadQuery>,
    req: HttpRequest,
) -> Result<success::Success<PresignedUploadResponse>, error::Error> {
    let query = query.0;
    presign(
        &upload_service,
        &req,
        PUBLIC_ACCESS,
        query.course_name.trim().to_string(),
        query.file_name.trim().to_string(),
        query.file_type,
    )
    .await
}

#[get("/lesson-video/pre-signed-url")]
pub async fn lesson_video_upload_url(
    upload_service: web::Data<UploadService>,
    query: ValidatedQuery<LessonUploadQuery>,
    req: HttpRequest,
) -> Result<success::Success<PresignedUploadResponse>, error::Error> {
    presign_lesson_asset(&upload_service, &req, query.0).await
}

#[get("/lesson-file/pre-signed-url")]
pub async fn lesson_file_upload_url(
    upload_service: web::Data<UploadService>,
    query: ValidatedQuery<LessonUploadQuery>,
    req: HttpRequest,
) -> Result<success::Success<PresignedUploadResponse>, error::Error> {
    presign_lesson_asset(&upload_service, &req, query.0).await
}

#[delete("")]
pub async fn delete_object(
    upload_service: web::Data<UploadService>,
    query: ValidatedQuery<DeleteObjectQuery>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let claims = get_claims(&req)?;
    let key = query.0.key;

    let scope = upload_service
        .key_scope(&key)
        .ok_or_else(|| error::Error::bad_request("Invalid storage key"))?;

    if claims.role != UserRole::Admin && scope.actor_id != sanitize_segment(&claims.sub.to_string()) {
        return Err(error::Error::forbidden("You can only delete your own uploads"));
    }

    upload_service.delete_object(&key).await?;
    Ok(success::Success::no_content())
}
