use actix_web::web::ServiceConfig;

use crate::modules::content::handle::{add_lesson, add_note, delete_lesson, get_content};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(get_content);
}

pub fn admin_configure(cfg: &mut ServiceConfig) {
    cfg.service(add_lesson).service(add_note).service(delete_lesson);
}
