use actix_web::web::ServiceConfig;

use crate::modules::enrollment::handle::{complete_lesson, owned_courses, purchase_course};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(owned_courses).service(purchase_course).service(complete_lesson);
}
