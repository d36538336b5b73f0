use actix_web::web::ServiceConfig;

use crate::modules::course::handle::{
    create_course, delete_course, get_course, preview_courses, set_thumbnail, update_course,
};

pub fn public_api_configure(cfg: &mut ServiceConfig) {
    cfg.service(preview_courses).service(get_course);
}

pub fn admin_configure(cfg: &mut ServiceConfig) {
    cfg.service(create_course)
        .service(update_course)
        .service(delete_course)
        .service(set_thumbnail);
}
