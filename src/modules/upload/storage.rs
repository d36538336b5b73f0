use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use std::time::Duration;

use crate::modules::upload::error::{UploadError, UploadResult};

/// Object-store operations the upload engine depends on.
///
/// Presigning is local, credential-bound signing; `delete` is the only call
/// that reaches the storage service.
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// The returned URL only accepts a PUT carrying exactly `content_type`.
    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> UploadResult<String>;

    async fn presign_get(&self, key: &str, expires_in: Duration) -> UploadResult<String>;

    async fn delete(&self, key: &str) -> UploadResult<()>;
}

#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

fn presigning(expires_in: Duration) -> UploadResult<PresigningConfig> {
    PresigningConfig::expires_in(expires_in).map_err(|e| UploadError::StorageProvider(e.to_string()))
}

#[async_trait::async_trait]
impl ObjectStorage for S3Storage {
    async fn presign_put(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> UploadResult<String> {
        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presigning(expires_in)?)
            .await
            .map_err(|e| {
                log::error!("Failed to presign PUT for {}/{}: {}", self.bucket, key, e);
                UploadError::StorageProvider(e.to_string())
            })?;

        log::info!(
            "Presigned PUT {}/{} ({}) valid for {}s",
            self.bucket,
            key,
            content_type,
            expires_in.as_secs()
        );
        Ok(presigned.uri().to_string())
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> UploadResult<String> {
        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning(expires_in)?)
            .await
            .map_err(|e| {
                log::error!("Failed to presign GET for {}/{}: {}", self.bucket, key, e);
                UploadError::StorageProvider(e.to_string())
            })?;

        Ok(presigned.uri().to_string())
    }

    async fn delete(&self, key: &str) -> UploadResult<()> {
        self.client.delete_object().bucket(&self.bucket).key(key).send().await.map_err(|e| {
            log::error!("Failed to delete {}/{}: {}", self.bucket, key, e);
            UploadError::StorageProvider(e.to_string())
        })?;

        log::info!("Deleted object {}/{}", self.bucket, key);
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum StorageCall {
        Put { key: String, content_type: String, expires_in: Duration },
        Get { key: String, expires_in: Duration },
        Delete { key: String },
    }

    /// Records every call and answers with a fake signed URL.
    #[derive(Default)]
    pub struct RecordingStorage {
        pub calls: Mutex<Vec<StorageCall>>,
        pub fail: bool,
    }

    impl RecordingStorage {
        pub fn failing() -> Self {
            Self { fail: true, ..Self::default() }
        }

        pub fn calls(&self) -> Vec<StorageCall> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: StorageCall) -> UploadResult<()> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                return Err(UploadError::StorageProvider("connection refused".into()));
            }
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl ObjectStorage for RecordingStorage {
        async fn presign_put(
            &self,
            key: &str,
            content_type: &str,
            expires_in: Duration,
        ) -> UploadResult<String> {
            self.record(StorageCall::Put {
                key: key.to_string(),
                content_type: content_type.to_string(),
                expires_in,
            })?;
            Ok(format!("https://bucket.test/{key}?X-Amz-Expires={}", expires_in.as_secs()))
        }

        async fn presign_get(&self, key: &str, expires_in: Duration) -> UploadResult<String> {
            self.record(StorageCall::Get { key: key.to_string(), expires_in })?;
            Ok(format!("https://bucket.test/{key}?get&X-Amz-Expires={}", expires_in.as_secs()))
        }

        async fn delete(&self, key: &str) -> UploadResult<()> {
            self.record(StorageCall::Delete { key: key.to_string() })
        }
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};

    use super::*;

    fn local_storage() -> S3Storage {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("AKIDEXAMPLE", "secret", None, None, "static"))
            .endpoint_url("http://localhost:9000")
            .force_path_style(true)
            .build();
        S3Storage::new(Client::from_conf(config), "course-market".into())
    }

    #[actix_web::test]
    async fn put_url_signs_the_content_type() {
        let storage = local_storage();
        let key = "course-market/public/u1/intro/images/1-ab-x.png";
        let expires = Duration::from_secs(300);

        let png = storage.presign_put(key, "image/png", expires).await.unwrap();
        let exe = storage.presign_put(key, "application/x-msdownload", expires).await.unwrap();

        assert!(png.to_ascii_lowercase().contains("x-amz-signedheaders=content-type"), "{png}");
        assert_ne!(png, exe);
        assert!(png.contains("/course-market/course-market/public/u1/intro/images/1-ab-x.png"));
        assert!(png.contains("X-Amz-Expires=300"));
    }

    #[actix_web::test]
    async fn get_url_is_signed_for_the_key() {
        let storage = local_storage();
        let url = storage
            .presign_get("course-market/private/u1/c1/videos/1-ab-a.mp4", Duration::from_secs(3600))
            .await
            .unwrap();
        assert!(url.contains("/course-market/course-market/private/u1/c1/videos/1-ab-a.mp4"));
        assert!(url.contains("X-Amz-Signature="));
    }
}
