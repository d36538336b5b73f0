use actix_web::{delete, get, patch, post, put, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::course::{model, service::CourseService},
    utils::ValidatedJson,
};

#[get("/courses/preview")]
pub async fn preview_courses(
    course_service: web::Data<CourseService>,
) -> Result<success::Success<Vec<model::CourseResponse>>, error::Error> {
    let courses = course_service.list().await?;
    Ok(success::Success::ok(Some(courses)).message("Courses retrieved successfully"))
}

#[get("/courses/{id:[0-9a-fA-F-]+}")]
pub async fn get_course(
    course_service: web::Data<CourseService>,
    id: web::Path<Uuid>,
) -> Result<success::Success<model::CourseResponse>, error::Error> {
    let course = course_service.get(id.into_inner()).await?;
    Ok(success::Success::ok(Some(course)).message("Course retrieved successfully"))
}

#[post("/courses")]
pub async fn create_course(
    course_service: web::Data<CourseService>,
    body: ValidatedJson<model::CreateCourseModel>,
    req: HttpRequest,
) -> Result<success::Success<model::CourseResponse>, error::Error> {
    let creator = get_claims(&req)?.sub;
    let course = course_service.create(creator, body.0).await?;
    Ok(success::Success::created(Some(course)).message("Course created successfully"))
}

#[patch("/courses/{id}")]
pub async fn update_course(
    course_service: web::Data<CourseService>,
    id: web::Path<Uuid>,
    body: ValidatedJson<model::UpdateCourseModel>,
) -> Result<success::Success<model::CourseResponse>, error::Error> {
    let course = course_service.update(id.into_inner(), body.0).await?;
    Ok(success::Success::ok(Some(course)).message("Course updated successfully"))
}

#[delete("/courses/{id}")]
pub async fn delete_course(
    course_service: web::Data<CourseService>,
    id: web::Path<Uuid>,
) -> Result<success::Success<()>, error::Error> {
    course_service.delete(id.into_inner()).await?;
    Ok(success::Success::no_content())
}

#[put("/courses/{id}/thumbnail")]
pub async fn set_thumbnail(
    course_service: web::Data<CourseService>,
    id: web::Path<Uuid>,
    body: ValidatedJson<model::ThumbnailModel>,
) -> Result<success::Success<model::CourseResponse>, error::Error> {
    let course = course_service.set_thumbnail(id.into_inner(), body.0).await?;
    Ok(success::Success::ok(Some(course)).message("Thumbnail updated successfully"))
}
