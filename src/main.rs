use actix_cors::Cors;
use actix_web::{
    self, App, HttpResponse, HttpServer,
    http::header,
    middleware::{Logger, from_fn},
    web,
};
use std::sync::{Arc, LazyLock};

use crate::{
    configs::{RedisCache, connect_database, connect_object_store},
    middlewares::{authentication, authorization},
    modules::{
        content::{repository_pg::ContentRepositoryPg, service::ContentService},
        course::{repository_pg::CourseRepositoryPg, service::CourseService},
        enrollment::{repository_pg::EnrollmentRepositoryPg, service::EnrollmentService},
        upload::{S3Storage, UploadService},
        user::{repository_pg::UserRepositoryPg, schema::UserRole, service::UserService},
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/health")]
async fn health_check(db_pool: web::Data<sqlx::PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(db_pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().body("Server is running"),
        Err(e) => {
            log::error!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().body("Database unavailable")
        }
    }
}

fn cors() -> Cors {
    ENV.frontend_urls
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .supports_credentials()
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    api::error::expose_error_details(ENV.is_development());

    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    let redis_pool =
        RedisCache::new().await.map_err(|_| std::io::Error::other("Redis connection error"))?;

    let s3_client = connect_object_store().await;

    let user_repo = Arc::new(UserRepositoryPg::new(db_pool.clone()));
    let course_repo = Arc::new(CourseRepositoryPg::new(db_pool.clone()));
    let content_repo = Arc::new(ContentRepositoryPg::new(db_pool.clone()));
    let enrollment_repo = Arc::new(EnrollmentRepositoryPg::new(db_pool.clone()));

    let upload_service = UploadService::new(
        Arc::new(S3Storage::new(s3_client, ENV.s3_bucket.clone())),
        ENV.storage.clone(),
    );
    let user_service = UserService::with_dependencies(
        user_repo,
        Arc::new(redis_pool),
        ENV.token_config(),
        ENV.admin_policy(),
    );
    let course_service = CourseService::with_dependencies(
        course_repo.clone(),
        content_repo.clone(),
        upload_service.clone(),
    );
    let content_service = ContentService::with_dependencies(
        content_repo.clone(),
        course_repo.clone(),
        enrollment_repo.clone(),
        upload_service.clone(),
    );
    let enrollment_service =
        EnrollmentService::with_dependencies(enrollment_repo, course_repo, content_repo);

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors())
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(upload_service.clone()))
            .app_data(web::Data::new(course_service.clone()))
            .app_data(web::Data::new(content_service.clone()))
            .app_data(web::Data::new(enrollment_service.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .service(health_check)
            .service(
                web::scope("/api")
                    .configure(modules::user::route::public_api_configure)
                    .configure(modules::course::route::public_api_configure)
                    .service(
                        web::scope("")
                            .wrap(from_fn(authorization(vec![UserRole::User, UserRole::Admin])))
                            .wrap(from_fn(authentication))
                            .configure(modules::user::route::configure)
                            .configure(modules::upload::route::configure)
                            .configure(modules::enrollment::route::configure)
                            .configure(modules::content::route::configure)
                            .service(
                                web::scope("/admin")
                                    .wrap(from_fn(authorization(vec![UserRole::Admin])))
                                    .configure(modules::course::route::admin_configure)
                                    .configure(modules::content::route::admin_configure),
                            ),
                    ),
            )
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
