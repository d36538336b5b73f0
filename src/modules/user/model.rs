use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::user::schema::{UserEntity, UserRole};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUpModel {
    #[validate(length(min = 2, max = 50, message = "First name must be 2-50 characters long"))]
    pub first_name: String,
    #[validate(length(min = 2, max = 50, message = "Last name must be 2-50 characters long"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(
        length(min = 8, max = 50, message = "Password must be 8-50 characters long"),
        custom(function = "crate::utils::validate_password_strength")
    )]
    pub password: String,
    pub admin_secret: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct SignInModel {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, max = 50, message = "Password must be 8-50 characters long"))]
    pub password: String,
}

pub struct InsertUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub hash_password: String,
    pub role: UserRole,
}

#[derive(Serialize)]
pub struct SignUpResponse {
    pub id: uuid::Uuid,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub access_token: String,
}

/// Access and refresh token issued together.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: uuid::Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserEntity> for UserResponse {
    fn from(entity: UserEntity) -> Self {
        UserResponse {
            id: entity.id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            email: entity.email,
            role: entity.role,
            created_at: entity.created_at,
        }
    }
}

/// Secrets and lifetimes for issued tokens.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl_secs: u64,
    pub refresh_ttl_secs: u64,
    pub secure_cookies: bool,
}

/// Signup inputs that grant the admin role.
#[derive(Debug, Clone, Default)]
pub struct AdminPolicy {
    pub admin_secret: Option<String>,
    pub admin_email: Option<String>,
}

impl AdminPolicy {
    pub fn role_for(&self, email: &str, admin_secret: Option<&str>) -> UserRole {
        let secret_matches = matches!(
            (self.admin_secret.as_deref(), admin_secret),
            (Some(expected), Some(given)) if !expected.is_empty() && expected == given
        );
        let email_matches = self
            .admin_email
            .as_deref()
            .is_some_and(|admin| !admin.is_empty() && admin.eq_ignore_ascii_case(email));

        if secret_matches || email_matches {
            UserRole::Admin
        } else {
            UserRole::User
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_role_by_secret_or_email() {
        let policy = AdminPolicy {
            admin_secret: Some("letmein".into()),
            admin_email: Some("boss@example.com".into()),
        };
        assert_eq!(policy.role_for("a@example.com", Some("letmein")), UserRole::Admin);
        assert_eq!(policy.role_for("Boss@Example.com", None), UserRole::Admin);
        assert_eq!(policy.role_for("a@example.com", Some("nope")), UserRole::User);
        assert_eq!(policy.role_for("a@example.com", None), UserRole::User);
    }

    #[test]
    fn unset_policy_never_grants_admin() {
        let policy = AdminPolicy::default();
        assert_eq!(policy.role_for("a@example.com", Some("")), UserRole::User);
    }

    #[test]
    fn signup_validation() {
        let model = SignUpModel {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: "Analytic1!".into(),
            admin_secret: None,
        };
        assert!(model.validate().is_ok());

        let weak = SignUpModel { password: "analytical".into(), ..model };
        assert!(weak.validate().is_err());
    }
}
