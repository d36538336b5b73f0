use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::modules::user::model::{
    AdminPolicy, InsertUser, SignInModel, SignUpModel, TokenConfig, TokenPair, UserResponse,
};
use crate::modules::user::repository::{SessionRepository, UserRepository};
use crate::modules::user::schema::UserRole;
use crate::utils::{hash_password, verify_password, Claims, TypeClaims};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
    sessions: Arc<dyn SessionRepository + Send + Sync>,
    tokens: TokenConfig,
    admins: AdminPolicy,
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        sessions: Arc<dyn SessionRepository + Send + Sync>,
        tokens: TokenConfig,
        admins: AdminPolicy,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, sessions, tokens, admins }
    }

    pub fn tokens(&self) -> &TokenConfig {
        &self.tokens
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<UserResponse, error::SystemError> {
        self.repo
            .find_by_id(&id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| error::SystemError::not_found("User not found"))
    }

    pub async fn sign_up(&self, user: SignUpModel) -> Result<Uuid, error::SystemError> {
        let email = user.email.trim().to_lowercase();
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(error::SystemError::already_exists("User already exists please sign in."));
        }

        let role = self.admins.role_for(&email, user.admin_secret.as_deref());
        let hash_password = hash_password(&user.password)?;

        let new_user = InsertUser {
            first_name: user.first_name.trim().to_string(),
            last_name: user.last_name.trim().to_string(),
            email,
            hash_password,
            role,
        };

        let user_id = self.repo.create(&new_user).await?;
        info!("User {} signed up as {:?}", user_id, new_user.role);
        Ok(user_id)
    }

    pub async fn sign_in(&self, user: SignInModel) -> Result<TokenPair, error::SystemError> {
        let user_entity = self
            .repo
            .find_by_email(user.email.trim())
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found, please signup first."))?;

        let valid = verify_password(&user_entity.hash_password, &user.password)?;
        if !valid {
            return Err(error::SystemError::unauthorized("Invalid Credentials"));
        }

        self.issue_tokens(&user_entity.id, &user_entity.role).await
    }

    /// Rotates a refresh token: the presented token is consumed and a new
    /// pair is issued. A token that was already consumed or revoked fails.
    pub async fn refresh(&self, token: Option<String>) -> Result<TokenPair, error::SystemError> {
        let token =
            token.ok_or_else(|| error::SystemError::unauthorized("Refresh token not provided"))?;

        let claims = Claims::decode(&token, self.tokens.refresh_secret.as_bytes())
            .map_err(|_| error::SystemError::unauthorized("Invalid or expired refresh token"))?;

        let jti = match (&claims.jti, claims.is_type(&TypeClaims::RefreshToken)) {
            (Some(jti), true) => *jti,
            _ => return Err(error::SystemError::unauthorized("Invalid or expired refresh token")),
        };

        let owner = self
            .sessions
            .take_refresh_token(&jti)
            .await?
            .ok_or_else(|| error::SystemError::unauthorized("Refresh token has been revoked"))?;

        if owner != claims.sub {
            return Err(error::SystemError::unauthorized("Invalid or expired refresh token"));
        }

        let user = self
            .repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| error::SystemError::unauthorized("User no longer exists."))?;

        self.issue_tokens(&user.id, &user.role).await
    }

    /// Revokes the refresh token if it is still valid. Invalid tokens are
    /// ignored so signing out always succeeds.
    pub async fn sign_out(&self, token: Option<String>) -> Result<(), error::SystemError> {
        let Some(token) = token else {
            return Ok(());
        };

        if let Ok(Claims { jti: Some(jti), .. }) =
            Claims::decode(&token, self.tokens.refresh_secret.as_bytes())
        {
            if self.sessions.take_refresh_token(&jti).await?.is_some() {
                info!("Refresh token {} revoked", jti);
            }
        }
        Ok(())
    }

    async fn issue_tokens(
        &self,
        user_id: &Uuid,
        role: &UserRole,
    ) -> Result<TokenPair, error::SystemError> {
        let access_token = Claims::new(user_id, role, self.tokens.access_ttl_secs)
            .with_type(TypeClaims::AccessToken)
            .encode(self.tokens.access_secret.as_bytes())?;

        let jti = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));

        let refresh_token = Claims::new(user_id, role, self.tokens.refresh_ttl_secs)
            .with_jti(jti)
            .with_type(TypeClaims::RefreshToken)
            .encode(self.tokens.refresh_secret.as_bytes())?;

        self.sessions.save_refresh_token(&jti, user_id, self.tokens.refresh_ttl_secs).await?;

        Ok(TokenPair { access_token, refresh_token })
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::modules::user::schema::UserEntity;

    #[derive(Default)]
    pub struct InMemoryUsers {
        pub users: Mutex<HashMap<Uuid, UserEntity>>,
    }

    impl InMemoryUsers {
        pub fn insert(&self, email: &str, role: UserRole) -> Uuid {
            let id = Uuid::now_v7();
            let now = chrono::Utc::now();
            self.users.lock().unwrap().insert(
                id,
                UserEntity {
                    id,
                    first_name: "Test".into(),
                    last_name: "User".into(),
                    email: email.into(),
                    hash_password: String::new(),
                    role,
                    created_at: now,
                    updated_at: now,
                },
            );
            id
        }
    }

    #[async_trait::async_trait]
    impl UserRepository for InMemoryUsers {
        async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
            Ok(self.users.lock().unwrap().get(id).cloned())
        }

        async fn find_by_email(
            &self,
            email: &str,
        ) -> Result<Option<UserEntity>, error::SystemError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .find(|u| u.email.eq_ignore_ascii_case(email))
                .cloned())
        }

        async fn create(&self, user: &InsertUser) -> Result<Uuid, error::SystemError> {
            let id = Uuid::now_v7();
            let now = chrono::Utc::now();
            self.users.lock().unwrap().insert(
                id,
                UserEntity {
                    id,
                    first_name: user.first_name.clone(),
                    last_name: user.last_name.clone(),
                    email: user.email.clone(),
                    hash_password: user.hash_password.clone(),
                    role: user.role.clone(),
                    created_at: now,
                    updated_at: now,
                },
            );
            Ok(id)
        }
    }

    #[derive(Default)]
    pub struct InMemorySessions {
        pub tokens: Mutex<HashMap<Uuid, (Uuid, u64)>>,
    }

    #[async_trait::async_trait]
    impl SessionRepository for InMemorySessions {
        async fn save_refresh_token(
            &self,
            jti: &Uuid,
            user_id: &Uuid,
            ttl_secs: u64,
        ) -> Result<(), error::SystemError> {
            self.tokens.lock().unwrap().insert(*jti, (*user_id, ttl_secs));
            Ok(())
        }

        async fn take_refresh_token(
            &self,
            jti: &Uuid,
        ) -> Result<Option<Uuid>, error::SystemError> {
            Ok(self.tokens.lock().unwrap().remove(jti).map(|(user, _)| user))
        }
    }

    pub fn token_config() -> TokenConfig {
        TokenConfig {
            access_secret: "access-secret".into(),
            refresh_secret: "refresh-secret".into(),
            access_ttl_secs: 900,
            refresh_ttl_secs: 604800,
            secure_cookies: false,
        }
    }
}
