use actix_web::{
    cookie::{time, Cookie, SameSite},
    get, post, web, HttpRequest,
};

use crate::modules::user::model::{SignInResponse, SignUpResponse, TokenConfig, TokenPair};
use crate::modules::user::{model, service::UserService};
use crate::{
    api::{error, success},
    middlewares::get_claims,
    utils::ValidatedJson,
};

pub const REFRESH_COOKIE: &str = "refresh_token";
pub const ACCESS_COOKIE: &str = "access_token";
const REFRESH_COOKIE_PATH: &str = "/api/auth";

fn token_cookie(
    name: &'static str,
    value: String,
    path: &'static str,
    max_age: i64,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build(name, value)
        .path(path)
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age))
        .finish()
}

fn expired_cookie(name: &'static str, path: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build(name, "").path(path).http_only(true).finish();
    cookie.make_removal();
    cookie
}

fn session_response(
    pair: TokenPair,
    tokens: &TokenConfig,
    message: &'static str,
) -> success::Success<SignInResponse> {
    let access_cookie = token_cookie(
        ACCESS_COOKIE,
        pair.access_token.clone(),
        "/",
        tokens.access_ttl_secs as i64,
        tokens.secure_cookies,
    );
    let refresh_cookie = token_cookie(
        REFRESH_COOKIE,
        pair.refresh_token,
        REFRESH_COOKIE_PATH,
        tokens.refresh_ttl_secs as i64,
        tokens.secure_cookies,
    );

    success::Success::ok(Some(SignInResponse { access_token: pair.access_token }))
        .message(message)
        .cookie(access_cookie)
        .cookie(refresh_cookie)
}

#[get("/me")]
pub async fn get_profile(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let id = get_claims(&req)?.sub;
    let user = user_service.get_by_id(id).await?;
    Ok(success::Success::ok(Some(user)).message("Profile retrieved successfully"))
}

#[post("/signup")]
pub async fn sign_up(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::SignUpModel>,
) -> Result<success::Success<SignUpResponse>, error::Error> {
    let user_id = user_service.sign_up(user_data.0).await?;
    Ok(success::Success::created(Some(SignUpResponse { id: user_id })).message("Signup successful"))
}

#[post("/signin")]
pub async fn sign_in(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::SignInModel>,
) -> Result<success::Success<SignInResponse>, error::Error> {
    let pair = user_service.sign_in(user_data.0).await?;
    Ok(session_response(pair, user_service.tokens(), "Sign in successful"))
}

#[post("/refresh")]
pub async fn refresh(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<SignInResponse>, error::Error> {
    let refresh_token = req.cookie(REFRESH_COOKIE).map(|c| c.value().to_string());
    let pair = user_service.refresh(refresh_token).await?;
    Ok(session_response(pair, user_service.tokens(), "Refresh successful"))
}

#[post("/signout")]
pub async fn sign_out(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let refresh_token = req.cookie(REFRESH_COOKIE).map(|c| c.value().to_string());
    user_service.sign_out(refresh_token).await?;

    Ok(success::Success::no_content()
        .cookie(expired_cookie(ACCESS_COOKIE, "/"))
        .cookie(expired_cookie(REFRESH_COOKIE, REFRESH_COOKIE_PATH)))
}
