use actix_web::web::{scope, ServiceConfig};

use crate::modules::upload::handle::{
    delete_object, lesson_file_upload_url, lesson_video_upload_url, thumbnail_upload_url,
};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/upload")
            .service(thumbnail_upload_url)
            .service(lesson_video_upload_url)
            .service(lesson_file_upload_url)
            .service(delete_object),
    );
}
