use actix_web::{delete, get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::content::{model, service::ContentService},
    utils::ValidatedJson,
};

#[get("/courses/{id}/content")]
pub async fn get_content(
    content_service: web::Data<ContentService>,
    id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<model::CourseContentResponse>, error::Error> {
    let claims = get_claims(&req)?;
    let content = content_service.get_content(id.into_inner(), claims.sub, claims.role).await?;
    Ok(success::Success::ok(Some(content)).message("Course content retrieved successfully"))
}

#[post("/courses/{id}/lessons")]
pub async fn add_lesson(
    content_service: web::Data<ContentService>,
    id: web::Path<Uuid>,
    body: ValidatedJson<model::CreateLessonModel>,
) -> Result<success::Success<model::LessonResponse>, error::Error> {
    let lesson = content_service.add_lesson(id.into_inner(), body.0).await?;
    Ok(success::Success::created(Some(lesson)).message("Lesson added successfully"))
}

#[post("/courses/{id}/lessons/{lesson_id}/notes")]
pub async fn add_note(
    content_service: web::Data<ContentService>,
    path: web::Path<model::LessonPath>,
    body: ValidatedJson<model::CreateNoteModel>,
) -> Result<success::Success<model::NoteResponse>, error::Error> {
    let path = path.into_inner();
    let note = content_service.add_note(path.id, path.lesson_id, body.0).await?;
    Ok(success::Success::created(Some(note)).message("Note added successfully"))
}

#[delete("/courses/{id}/lessons/{lesson_id}")]
pub async fn delete_lesson(
    content_service: web::Data<ContentService>,
    path: web::Path<model::LessonPath>,
) -> Result<success::Success<()>, error::Error> {
    let path = path.into_inner();
    content_service.delete_lesson(path.id, path.lesson_id).await?;
    Ok(success::Success::no_content())
}
