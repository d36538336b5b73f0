use crate::modules::{
    upload::StorageConfig,
    user::model::{AdminPolicy, TokenConfig},
};

pub struct Env {
    pub jwt_access_secret: String,
    pub jwt_refresh_secret: String,
    pub access_token_expiration: u64,
    pub refresh_token_expiration: u64,
    pub database_url: String,
    pub redis_url: String,
    pub frontend_urls: Vec<String>,
    pub ip: String,
    pub port: u16,
    pub app_env: String,
    pub admin_secret_key: Option<String>,
    pub admin_email: Option<String>,
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_endpoint: Option<String>,
    pub storage: StorageConfig,
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Env {
    fn new() -> Self {
        let jwt_access_secret = std::env::var("JWT_ACCESS_SECRET")
            .expect("JWT_ACCESS_SECRET must be set in .env file or environment variable");
        let jwt_refresh_secret = std::env::var("JWT_REFRESH_SECRET")
            .expect("JWT_REFRESH_SECRET must be set in .env file or environment variable");

        let access_token_expiration = std::env::var("ACCESS_TOKEN_EXPIRATION")
            .unwrap_or_else(|_| "900".to_string())
            .parse::<u64>()
            .expect("ACCESS_TOKEN_EXPIRATION must be a valid u64 integer");
        let refresh_token_expiration = std::env::var("REFRESH_TOKEN_EXPIRATION")
            .unwrap_or_else(|_| "604800".to_string())
            .parse::<u64>()
            .expect("REFRESH_TOKEN_EXPIRATION must be a valid u64 integer");

        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set in .env file or environment variable");
        let redis_url = std::env::var("REDIS_URL")
            .expect("REDIS_URL must be set in .env file or environment variable");

        let frontend_urls = std::env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid u16 integer");
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "production".to_string());

        let s3_bucket = std::env::var("S3_BUCKET")
            .expect("S3_BUCKET must be set in .env file or environment variable");
        let s3_region = std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        Env {
            jwt_access_secret,
            jwt_refresh_secret,
            access_token_expiration,
            refresh_token_expiration,
            database_url,
            redis_url,
            frontend_urls,
            ip,
            port,
            app_env,
            admin_secret_key: optional("ADMIN_SECRET_KEY"),
            admin_email: optional("ADMIN_EMAIL"),
            s3_bucket,
            s3_region,
            s3_endpoint: optional("S3_ENDPOINT"),
            storage: StorageConfig::from_env(),
        }
    }

    pub fn is_development(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("development")
    }

    pub fn token_config(&self) -> TokenConfig {
        TokenConfig {
            access_secret: self.jwt_access_secret.clone(),
            refresh_secret: self.jwt_refresh_secret.clone(),
            access_ttl_secs: self.access_token_expiration,
            refresh_ttl_secs: self.refresh_token_expiration,
            secure_cookies: !self.is_development(),
        }
    }

    pub fn admin_policy(&self) -> AdminPolicy {
        AdminPolicy {
            admin_secret: self.admin_secret_key.clone(),
            admin_email: self.admin_email.clone(),
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
