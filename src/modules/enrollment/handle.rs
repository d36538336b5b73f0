use actix_web::{get, post, web, HttpRequest};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        content::model::LessonPath,
        enrollment::{model, service::EnrollmentService},
    },
};

#[get("/courses/owned")]
pub async fn owned_courses(
    enrollment_service: web::Data<EnrollmentService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<model::OwnedCourseResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let courses = enrollment_service.owned_courses(user_id).await?;
    Ok(success::Success::ok(Some(courses)).message("Owned courses retrieved successfully"))
}

#[post("/courses/{id}/purchase")]
pub async fn purchase_course(
    enrollment_service: web::Data<EnrollmentService>,
    id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<model::EnrollmentResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let enrollment = enrollment_service.purchase(user_id, id.into_inner()).await?;
    Ok(success::Success::created(Some(enrollment)).message("Course purchased successfully"))
}

#[post("/courses/{id}/lessons/{lesson_id}/complete")]
pub async fn complete_lesson(
    enrollment_service: web::Data<EnrollmentService>,
    path: web::Path<LessonPath>,
    req: HttpRequest,
) -> Result<success::Success<model::EnrollmentResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let path = path.into_inner();
    let progress = enrollment_service.complete_lesson(user_id, path.id, path.lesson_id).await?;
    Ok(success::Success::ok(Some(progress)).message("Lesson marked as completed"))
}
