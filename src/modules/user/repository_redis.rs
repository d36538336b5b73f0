use uuid::Uuid;

use crate::{api::error, configs::RedisCache, modules::user::repository::SessionRepository};

fn refresh_key(jti: &Uuid) -> String {
    format!("refresh_token:{jti}")
}

#[async_trait::async_trait]
impl SessionRepository for RedisCache {
    async fn save_refresh_token(
        &self,
        jti: &Uuid,
        user_id: &Uuid,
        ttl_secs: u64,
    ) -> Result<(), error::SystemError> {
        self.set(&refresh_key(jti), user_id, ttl_secs).await
    }

    async fn take_refresh_token(&self, jti: &Uuid) -> Result<Option<Uuid>, error::SystemError> {
        self.take::<Uuid>(&refresh_key(jti)).await
    }
}
