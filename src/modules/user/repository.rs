use uuid::Uuid;

use crate::{
    api::error,
    modules::user::{model::InsertUser, schema::UserEntity},
};

#[async_trait::async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError>;
    async fn create(&self, user: &InsertUser) -> Result<Uuid, error::SystemError>;
}

/// Side-store for live refresh tokens, keyed by their `jti`.
#[async_trait::async_trait]
pub trait SessionRepository {
    async fn save_refresh_token(
        &self,
        jti: &Uuid,
        user_id: &Uuid,
        ttl_secs: u64,
    ) -> Result<(), error::SystemError>;

    /// Removes the entry and returns its owner. A second call for the same
    /// `jti` returns `None`.
    async fn take_refresh_token(&self, jti: &Uuid) -> Result<Option<Uuid>, error::SystemError>;
}
