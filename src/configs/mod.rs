use deadpool_redis::{redis::AsyncCommands, Runtime};
use aws_config::{BehaviorVersion, Region};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{api::error, ENV};

pub async fn connect_database() -> Result<PgPool, error::SystemError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_slow_threshold(std::time::Duration::from_secs(3))
        .connect(&ENV.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Database connected and migrations applied");
    Ok(pool)
}

pub async fn connect_object_store() -> aws_sdk_s3::Client {
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(ENV.s3_region.clone()))
        .load()
        .await;

    let client = match &ENV.s3_endpoint {
        Some(endpoint) => {
            let config = aws_sdk_s3::config::Builder::from(&sdk_config)
                .endpoint_url(endpoint.clone())
                .force_path_style(true)
                .build();
            aws_sdk_s3::Client::from_conf(config)
        }
        None => aws_sdk_s3::Client::new(&sdk_config),
    };

    log::info!("Object store configured for bucket {}", ENV.s3_bucket);
    client
}

#[derive(Clone)]
pub struct RedisCache {
    pool: deadpool_redis::Pool,
}

impl RedisCache {
    pub async fn new() -> Result<Self, error::SystemError> {
        let mut cfg = deadpool_redis::Config::from_url(&ENV.redis_url);
        cfg.pool = Some(deadpool_redis::PoolConfig { max_size: 16, ..Default::default() });
        let pool = cfg.create_pool(Some(Runtime::Tokio1))?;
        Ok(Self { pool })
    }

    pub async fn set<T>(&self, key: &str, value: &T, expiration: u64) -> Result<(), error::SystemError>
    where
        T: serde::Serialize,
    {
        let mut conn = self.pool.get().await?;

        let serialized = serde_json::to_vec(value)?;

        conn.set_ex::<_, _, ()>(key, serialized, expiration).await?;

        Ok(())
    }

    /// Atomically reads and deletes a value.
    pub async fn take<T>(&self, key: &str) -> Result<Option<T>, error::SystemError>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut conn = self.pool.get().await?;

        let value: Option<Vec<u8>> = conn.get_del(key).await?;

        match value {
            Some(v) => Ok(Some(serde_json::from_slice(&v)?)),
            None => Ok(None),
        }
    }
}
