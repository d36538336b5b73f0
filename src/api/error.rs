use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use deadpool_redis::{redis::RedisError, CreatePoolError, PoolError};
use std::{borrow::Cow, sync::OnceLock};

use crate::modules::upload::error::UploadError;

static EXPOSE_DETAILS: OnceLock<bool> = OnceLock::new();

/// Whether internal error details are included in 500 responses. Set once at
/// startup from the deployment environment; off unless set.
pub fn expose_error_details(enabled: bool) {
    let _ = EXPOSE_DETAILS.set(enabled);
}

fn internal_details(detail: impl std::fmt::Display) -> Option<Cow<'static, str>> {
    EXPOSE_DETAILS.get().copied().unwrap_or(false).then(|| detail.to_string().into())
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("Unauthorized: {0}")]
    Unauthorized(Cow<'static, str>),
    #[error("Forbidden: {0}")]
    Forbidden(Cow<'static, str>),
    #[error("Not Found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Conflict: {0}")]
    Conflict(Cow<'static, str>),
    #[error("Unprocessable Entity: {0}")]
    UnprocessableEntity(Cow<'static, str>),
    #[error("Internal Server Error")]
    InternalServer(Option<Cow<'static, str>>),
}

#[derive(serde::Serialize)]
pub struct ErrorBody {
    pub message: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Cow<'static, str>>,
}

impl Error {
    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn unprocessable(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::UnprocessableEntity(msg.into())
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match *self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::InternalServer(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut res = HttpResponse::build(self.status_code());

        match self {
            // Has Message
            Error::NotFound(msg)
            | Error::Conflict(msg)
            | Error::Unauthorized(msg)
            | Error::BadRequest(msg)
            | Error::Forbidden(msg)
            | Error::UnprocessableEntity(msg) => {
                res.json(ErrorBody { message: msg.clone(), details: None })
            }
            // No Message
            Error::InternalServer(details) => res.json(ErrorBody {
                message: "Internal Server Error".into(),
                details: details.clone(),
            }),
        }
    }
}

impl From<UploadError> for Error {
    fn from(value: UploadError) -> Self {
        match value {
            UploadError::MissingField(_)
            | UploadError::Validation(_)
            | UploadError::KeyTooLong { .. }
            | UploadError::MissingKey => Error::BadRequest(value.to_string().into()),
            UploadError::ForbiddenAccessType(_) | UploadError::ForbiddenContentType(_) => {
                Error::UnprocessableEntity(value.to_string().into())
            }
            UploadError::StorageProvider(_) => {
                log::error!("Storage provider failure: {}", value);
                Error::InternalServer(internal_details(&value))
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SystemError {
    // jwt errors
    #[error("JWT Error")]
    JwtError(#[from] jsonwebtoken::errors::Error),
    // argon2 errors
    #[error("Hash Error")]
    HashError(#[from] argon2::password_hash::Error),
    // sqlx errors
    #[error("Database Error : {0}")]
    DatabaseError(Cow<'static, str>),
    #[error("Migration Error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    // serde errors
    #[error("JSON Serialization/Deserialization Error")]
    JsonError(#[from] serde_json::Error),
    // redis errors
    #[error(transparent)]
    PoolInit(#[from] CreatePoolError),
    #[error("Redis pool error: {0}")]
    PoolGet(#[from] PoolError),
    #[error("Redis error")]
    RedisError(#[from] RedisError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    // Custom Errors
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("Unauthorized: {0}")]
    Unauthorized(Cow<'static, str>),
    #[error("Forbidden: {0}")]
    Forbidden(Cow<'static, str>),
    #[error("Database Not Found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Database Conflict: {0:?}")]
    Conflict(Option<DbErrorMeta>),
    #[error("Already exists: {0}")]
    AlreadyExists(Cow<'static, str>),
    #[error("Internal System Error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

fn conflict_message(meta: &Option<DbErrorMeta>) -> Cow<'static, str> {
    let Some(m) = meta else {
        return "Duplicate value".into();
    };

    let Some(constraint) = &m.constraint else {
        return "Duplicate value".into();
    };

    // constraints are named `<table>_<field>_key`
    let field = constraint
        .trim_end_matches("_key")
        .split('_')
        .next_back()
        .unwrap_or("value");

    let mut chars = field.chars();
    let field = match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => "Value".to_string(),
    };

    format!("{field} already exists").into()
}

#[derive(Debug)]
pub struct DbErrorMeta {
    pub constraint: Option<String>,
}

impl From<SystemError> for Error {
    fn from(value: SystemError) -> Self {
        match value {
            SystemError::BadRequest(msg) => Error::BadRequest(msg),
            SystemError::Unauthorized(msg) => Error::Unauthorized(msg),
            SystemError::Forbidden(msg) => Error::Forbidden(msg),
            SystemError::NotFound(msg) => Error::NotFound(msg),
            SystemError::Conflict(meta) => Error::Conflict(conflict_message(&meta)),
            SystemError::AlreadyExists(msg) => Error::Conflict(msg),
            SystemError::Upload(err) => err.into(),
            _ => {
                log::error!("Internal Server Error: {:?}", value);
                Error::InternalServer(internal_details(&value))
            }
        }
    }
}

impl From<sqlx::Error> for SystemError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some("23505") => {
                    return SystemError::Conflict(Some(DbErrorMeta {
                        constraint: db_err.constraint().map(|s| s.to_string()),
                    }));
                }
                Some("23503") => {
                    return SystemError::NotFound("Referenced resource not found".into());
                }
                _ => {
                    log::error!("Unhandled DB error: {:?}", db_err);
                    return SystemError::DatabaseError(db_err.message().to_string().into());
                }
            }
        }
        log::error!("{:?}", err);
        SystemError::InternalError(Box::new(err))
    }
}

impl SystemError {
    pub fn bad_request(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn already_exists(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::AlreadyExists(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_errors_map_to_client_statuses() {
        let cases = [
            (UploadError::MissingField("fileName"), StatusCode::BAD_REQUEST),
            (UploadError::Validation("scopeName is empty".into()), StatusCode::BAD_REQUEST),
            (UploadError::KeyTooLong { actual: 901, max: 900 }, StatusCode::BAD_REQUEST),
            (UploadError::MissingKey, StatusCode::BAD_REQUEST),
            (UploadError::ForbiddenAccessType("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (UploadError::ForbiddenContentType("x/y".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (UploadError::StorageProvider("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(Error::from(err).status_code(), status);
        }
    }

    #[test]
    fn key_too_long_message_reaches_client() {
        let err = Error::from(UploadError::KeyTooLong { actual: 950, max: 900 });
        match err {
            Error::BadRequest(msg) => {
                assert!(msg.contains("950"));
                assert!(msg.contains("900"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn conflict_message_names_the_field() {
        let meta = Some(DbErrorMeta { constraint: Some("users_email_key".into()) });
        assert_eq!(conflict_message(&meta), "Email already exists");
        assert_eq!(conflict_message(&None), "Duplicate value");
    }

    #[test]
    fn internal_errors_hide_details_by_default() {
        let err = Error::from(SystemError::DatabaseError("relation missing".into()));
        assert!(matches!(err, Error::InternalServer(None)));
    }
}
