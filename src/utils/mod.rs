use actix_web::{web, FromRequest};
use argon2::{
    password_hash::{Error as PasswordHashError, PasswordHash, PasswordHasher, SaltString},
    Argon2, PasswordVerifier,
};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{api::error, modules::user::schema::UserRole};

lazy_static::lazy_static! {
  static ref ARGON2: Argon2<'static> = Argon2::default();
}

pub fn hash_password(password: &str) -> Result<String, error::SystemError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = ARGON2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(hash: &str, password: &str) -> Result<bool, error::SystemError> {
    let parsed_hash = PasswordHash::new(hash)?;
    match ARGON2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(e) => Err(error::SystemError::HashError(e)),
    }
}

/// Requires a lowercase letter, an uppercase letter, a digit and a symbol.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_alphanumeric());

    if has_lower && has_upper && has_digit && has_symbol {
        Ok(())
    } else {
        Err(ValidationError::new("password_strength").with_message(
            "Password must contain at least 1 lowercase letter, 1 uppercase letter, 1 digit and 1 special character".into(),
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum TypeClaims {
    RefreshToken,
    AccessToken,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: uuid::Uuid,
    pub iat: u64,
    pub exp: u64,
    pub jti: Option<uuid::Uuid>,
    pub role: UserRole,
    pub _type: Option<TypeClaims>,
}

impl Claims {
    pub fn new(sub: &uuid::Uuid, role: &UserRole, exp: u64) -> Self {
        let now = chrono::Utc::now().timestamp() as u64;
        Claims { sub: *sub, iat: now, exp: now + exp, role: role.clone(), jti: None, _type: None }
    }

    pub fn with_jti(mut self, jti: uuid::Uuid) -> Self {
        self.jti = Some(jti);
        self
    }

    pub fn with_type(mut self, _type: TypeClaims) -> Self {
        self._type = Some(_type);
        self
    }

    pub fn is_type(&self, expected: &TypeClaims) -> bool {
        self._type.as_ref() == Some(expected)
    }

    pub fn encode(&self, secret: &[u8]) -> Result<String, error::SystemError> {
        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, self, &EncodingKey::from_secret(secret))?;
        Ok(token)
    }

    pub fn decode(token: &str, secret: &[u8]) -> Result<Self, error::SystemError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        let token_data = decode::<Self>(token, &DecodingKey::from_secret(secret), &validation)?;
        Ok(token_data.claims)
    }
}

pub struct ValidatedJson<T>(pub T);

impl<T> FromRequest for ValidatedJson<T>
where
    T: Validate + serde::de::DeserializeOwned + 'static,
{
    type Error = error::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let fut = web::Json::<T>::from_request(req, payload);

        Box::pin(async move {
            let json = fut.await.map_err(|e| error::Error::unprocessable(e.to_string()))?;
            let model = json.into_inner();
            model.validate().map_err(|e| error::Error::unprocessable(e.to_string()))?;
            Ok(ValidatedJson(model))
        })
    }
}

pub struct ValidatedQuery<T>(pub T);

impl<T> FromRequest for ValidatedQuery<T>
where
    T: Validate + serde::de::DeserializeOwned + 'static,
{
    type Error = error::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let fut = web::Query::<T>::from_request(req, payload);

        Box::pin(async move {
            let query = fut.await.map_err(|e| error::Error::unprocessable(e.to_string()))?;
            query.validate().map_err(|e| error::Error::unprocessable(e.to_string()))?;
            Ok(ValidatedQuery(query.into_inner()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("S3cret!pw").unwrap();
        assert!(verify_password(&hash, "S3cret!pw").unwrap());
        assert!(!verify_password(&hash, "wrong").unwrap());
    }

    #[test]
    fn password_strength() {
        assert!(validate_password_strength("Abcdef1!").is_ok());
        assert!(validate_password_strength("abcdef1!").is_err());
        assert!(validate_password_strength("ABCDEF1!").is_err());
        assert!(validate_password_strength("Abcdefg!").is_err());
        assert!(validate_password_strength("Abcdefg1").is_err());
    }

    #[test]
    fn claims_round_trip_with_type_and_jti() {
        let id = uuid::Uuid::now_v7();
        let jti = uuid::Uuid::now_v7();
        let token = Claims::new(&id, &UserRole::Admin, 60)
            .with_jti(jti)
            .with_type(TypeClaims::RefreshToken)
            .encode(SECRET)
            .unwrap();

        let claims = Claims::decode(&token, SECRET).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.jti, Some(jti));
        assert_eq!(claims.role, UserRole::Admin);
        assert!(claims.is_type(&TypeClaims::RefreshToken));
        assert!(!claims.is_type(&TypeClaims::AccessToken));
    }

    #[test]
    fn wrong_secret_or_expired_token_is_rejected() {
        let id = uuid::Uuid::now_v7();
        let token = Claims::new(&id, &UserRole::User, 60).encode(SECRET).unwrap();
        assert!(Claims::decode(&token, b"other-secret").is_err());

        let mut expired = Claims::new(&id, &UserRole::User, 0);
        expired.iat -= 7200;
        expired.exp -= 3600;
        let token = expired.encode(SECRET).unwrap();
        assert!(Claims::decode(&token, SECRET).is_err());
    }
}
