use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, Error, HttpMessage, HttpRequest,
};
use futures_util::{future::LocalBoxFuture, FutureExt};
use std::rc::Rc;

use crate::{
    api::error,
    modules::user::{handle::ACCESS_COOKIE, schema::UserRole, service::UserService},
    utils::{Claims, TypeClaims},
};

fn access_token(req: &ServiceRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    bearer.or_else(|| req.cookie(ACCESS_COOKIE).map(|c| c.value().to_string()))
}

/// Accepts an access token from the bearer header or the access cookie and
/// stores its claims in the request extensions.
pub async fn authentication<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<B>, Error>
where
    B: MessageBody + 'static,
{
    let token = access_token(&req)
        .ok_or_else(|| error::Error::unauthorized("Token not provided."))?;

    let secret = req
        .app_data::<web::Data<UserService>>()
        .map(|service| service.tokens().access_secret.clone())
        .ok_or_else(|| {
            log::error!("UserService missing from app data");
            error::Error::InternalServer(None)
        })?;

    let claims = Claims::decode(&token, secret.as_bytes())
        .map_err(|_| error::Error::unauthorized("Invalid or expired token."))?;

    if !claims.is_type(&TypeClaims::AccessToken) {
        return Err(error::Error::unauthorized("Invalid token payload.").into());
    }

    req.extensions_mut().insert(claims);

    next.call(req).await
}

pub fn get_extensions<T: Clone + 'static>(req: &HttpRequest) -> Result<T, error::Error> {
    req.extensions()
        .get::<T>()
        .cloned()
        .ok_or_else(|| error::Error::unauthorized("Unauthorized"))
}

pub fn get_claims(req: &HttpRequest) -> Result<Claims, error::Error> {
    get_extensions::<Claims>(req)
}

pub fn authorization<B>(
    allowed_roles: Vec<UserRole>,
) -> impl Fn(
    ServiceRequest,
    Next<B>,
) -> LocalBoxFuture<'static, Result<ServiceResponse<B>, actix_web::Error>>
where
    B: MessageBody + 'static,
{
    let allowed_roles = Rc::new(allowed_roles);
    move |req: ServiceRequest, next: Next<B>| {
        let roles = allowed_roles.clone();
        async move {
            let role = get_claims(req.request())?.role;

            if !roles.contains(&role) {
                return Err(error::Error::forbidden("Access denied.").into());
            }
            next.call(req).await
        }
        .boxed_local()
    }
}
