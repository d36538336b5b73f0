use std::sync::Arc;
use std::time::Duration;

use crate::modules::upload::{
    error::{UploadError, UploadResult},
    key::{derive_key, parse_key, KeyParts, KeyScope},
    model::{PresignedDownload, PresignedUpload, StorageConfig, UploadRequest},
    storage::ObjectStorage,
};

pub const MIN_EXPIRY_SECS: u64 = 60;
pub const MAX_EXPIRY_SECS: u64 = 3600;
pub const DEFAULT_EXPIRY_SECS: u64 = 60;
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

pub fn clamp_expiry(expires_in: Option<u64>) -> u64 {
    expires_in.unwrap_or(DEFAULT_EXPIRY_SECS).clamp(MIN_EXPIRY_SECS, MAX_EXPIRY_SECS)
}

/// Resolves the declared content type, or guesses one from the file extension.
pub fn resolve_content_type(file_name: &str, declared: Option<&str>) -> String {
    match declared.map(str::trim).filter(|c| !c.is_empty()) {
        Some(content_type) => content_type.to_ascii_lowercase(),
        None => mime_guess::from_path(file_name)
            .first()
            .map(|mime| mime.essence_str().to_ascii_lowercase())
            .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string()),
    }
}

#[derive(Clone)]
pub struct UploadService {
    storage: Arc<dyn ObjectStorage>,
    config: Arc<StorageConfig>,
}

impl UploadService {
    pub fn new(storage: Arc<dyn ObjectStorage>, config: StorageConfig) -> Self {
        log::info!(
            "UploadService initialized (root folder '{}', {} access types, {} content types)",
            config.root_folder,
            config.allowed_access_types.len(),
            config.allowed_content_types.len()
        );
        Self { storage, config: Arc::new(config) }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn key_scope<'a>(&self, key: &'a str) -> Option<KeyScope<'a>> {
        parse_key(&self.config, key)
    }

    /// Validates an upload request and returns a PUT URL scoped to a freshly
    /// derived key.
    pub async fn issue_presigned_upload(
        &self,
        request: UploadRequest,
    ) -> UploadResult<PresignedUpload> {
        let required = [
            ("fileName", request.file_name.as_str()),
            ("scopeName", request.scope_name.as_str()),
            ("actorId", request.actor_id.as_str()),
            ("accessType", request.access_type.as_str()),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(UploadError::MissingField(*field));
        }

        let content_type =
            resolve_content_type(&request.file_name, request.content_type.as_deref());

        if !self.config.allows_content_type(&content_type) {
            return Err(UploadError::ForbiddenContentType(content_type));
        }

        if !self.config.allows_access_type(&request.access_type) {
            return Err(UploadError::ForbiddenAccessType(request.access_type));
        }

        let key = derive_key(
            &self.config,
            &KeyParts {
                access_type: &request.access_type,
                actor_id: &request.actor_id,
                scope_name: &request.scope_name,
                file_name: &request.file_name,
                content_type: &content_type,
            },
        )?;

        let expires_in = clamp_expiry(request.expires_in);
        let url = self
            .storage
            .presign_put(key.as_str(), &content_type, Duration::from_secs(expires_in))
            .await?;

        Ok(PresignedUpload { url, key, content_type, expires_in })
    }

    /// Signed GET URL for a stored key.
    pub async fn issue_presigned_download(
        &self,
        key: &str,
        expires_in: Option<u64>,
    ) -> UploadResult<PresignedDownload> {
        if key.trim().is_empty() {
            return Err(UploadError::MissingKey);
        }

        let expires_in = clamp_expiry(expires_in);
        let url = self.storage.presign_get(key, Duration::from_secs(expires_in)).await?;
        Ok(PresignedDownload { url, expires_in })
    }

    /// Forwards the key to the object store without checking its shape or
    /// ownership. Callers must only pass keys they issued or stored.
    pub async fn delete_object(&self, key: &str) -> UploadResult<()> {
        if key.is_empty() {
            return Err(UploadError::MissingKey);
        }
        self.storage.delete(key).await
    }

    /// Delete used for cleanup after a record has already changed; failures
    /// are logged rather than returned.
    pub async fn delete_object_quietly(&self, key: &str) {
        if let Err(e) = self.delete_object(key).await {
            log::warn!("Failed to clean up object {}: {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::upload::storage::testing::{RecordingStorage, StorageCall};

    fn service_with(config: StorageConfig) -> (UploadService, Arc<RecordingStorage>) {
        let storage = Arc::new(RecordingStorage::default());
        (UploadService::new(storage.clone(), config), storage)
    }

    fn request(file_name: &str, content_type: Option<&str>) -> UploadRequest {
        UploadRequest {
            access_type: "private".into(),
            actor_id: "64f0a1b2c3d4e5f6a7b8c9ab".into(),
            scope_name: "Intro to Go".into(),
            file_name: file_name.into(),
            content_type: content_type.map(Into::into),
            expires_in: None,
        }
    }

    #[test]
    fn expiry_is_clamped() {
        assert_eq!(clamp_expiry(None), 60);
        assert_eq!(clamp_expiry(Some(10)), 60);
        assert_eq!(clamp_expiry(Some(300)), 300);
        assert_eq!(clamp_expiry(Some(99999)), 3600);
    }

    #[test]
    fn content_type_resolution() {
        assert_eq!(resolve_content_type("a.mp4", Some(" Video/MP4 ")), "video/mp4");
        assert_eq!(resolve_content_type("a.png", None), "image/png");
        assert_eq!(resolve_content_type("a.pdf", Some("")), "application/pdf");
        assert_eq!(resolve_content_type("readme", None), FALLBACK_CONTENT_TYPE);
    }

    #[actix_web::test]
    async fn issues_upload_for_allowed_request() {
        let (service, storage) = service_with(StorageConfig::default());
        let upload =
            service.issue_presigned_upload(request("Lecture 1.mp4", Some("video/mp4"))).await.unwrap();

        let key = upload.key.as_str();
        assert!(key.starts_with("course-market/private/64f0a1b2c3d4e5f6a7b8c9ab/intro-to-go/videos/"));
        assert!(key.ends_with("-lecture-1.mp4"));
        assert!(key.len() <= 900);
        assert_eq!(upload.content_type, "video/mp4");
        assert_eq!(upload.expires_in, 60);

        assert_eq!(
            storage.calls(),
            vec![StorageCall::Put {
                key: key.to_string(),
                content_type: "video/mp4".into(),
                expires_in: Duration::from_secs(60),
            }]
        );
        assert!(upload.url.contains(key));
    }

    #[actix_web::test]
    async fn expiry_passed_to_signer_is_clamped() {
        let (service, storage) = service_with(StorageConfig::default());

        let mut low = request("a.mp4", Some("video/mp4"));
        low.expires_in = Some(10);
        service.issue_presigned_upload(low).await.unwrap();

        let mut high = request("a.mp4", Some("video/mp4"));
        high.expires_in = Some(99999);
        service.issue_presigned_upload(high).await.unwrap();

        let expiries: Vec<Duration> = storage
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                StorageCall::Put { expires_in, .. } => Some(expires_in),
                _ => None,
            })
            .collect();
        assert_eq!(expiries, vec![Duration::from_secs(60), Duration::from_secs(3600)]);
    }

    #[actix_web::test]
    async fn content_type_outside_allow_list_is_forbidden() {
        let (service, storage) = service_with(StorageConfig::default());
        let err = service
            .issue_presigned_upload(request("clip.ogg", Some("audio/ogg")))
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::ForbiddenContentType(ct) if ct == "audio/ogg"));
        assert!(storage.calls().is_empty());
    }

    #[actix_web::test]
    async fn access_type_outside_allow_list_is_forbidden() {
        let (service, _) = service_with(StorageConfig::default());
        let mut req = request("a.mp4", Some("video/mp4"));
        req.access_type = "shared".into();

        let err = service.issue_presigned_upload(req).await.unwrap_err();
        assert!(matches!(err, UploadError::ForbiddenAccessType(_)));
    }

    #[actix_web::test]
    async fn missing_fields_are_checked_first() {
        let (service, _) = service_with(StorageConfig::default());

        let mut req = request("", Some("video/mp4"));
        req.access_type = "shared".into();
        let err = service.issue_presigned_upload(req).await.unwrap_err();
        assert!(matches!(err, UploadError::MissingField("fileName")));

        let mut req = request("a.mp4", None);
        req.scope_name = " ".into();
        let err = service.issue_presigned_upload(req).await.unwrap_err();
        assert!(matches!(err, UploadError::MissingField("scopeName")));
    }

    #[actix_web::test]
    async fn extensionless_file_falls_back_to_octet_stream() {
        let mut config = StorageConfig::default();
        config.allowed_content_types.push(FALLBACK_CONTENT_TYPE.into());
        let (service, _) = service_with(config);

        let upload = service.issue_presigned_upload(request("readme", None)).await.unwrap();
        assert_eq!(upload.content_type, "application/octet-stream");
        assert!(upload.key.as_str().contains("/other/"));
        assert!(upload.key.as_str().ends_with("-readme"));
    }

    #[actix_web::test]
    async fn extensionless_file_rejected_by_default_allow_list() {
        let (service, _) = service_with(StorageConfig::default());
        let err = service.issue_presigned_upload(request("readme", None)).await.unwrap_err();
        assert!(matches!(err, UploadError::ForbiddenContentType(_)));
    }

    #[actix_web::test]
    async fn oversized_key_is_reported() {
        let config = StorageConfig { max_key_bytes: 100, ..StorageConfig::default() };
        let (service, storage) = service_with(config);
        let name = format!("{}.mp4", "long".repeat(20));

        let err = service.issue_presigned_upload(request(&name, None)).await.unwrap_err();
        assert!(matches!(err, UploadError::KeyTooLong { max: 100, .. }));
        assert!(storage.calls().is_empty());
    }

    #[actix_web::test]
    async fn signer_failure_surfaces_as_provider_error() {
        let storage = Arc::new(RecordingStorage::failing());
        let service = UploadService::new(storage, StorageConfig::default());

        let err = service
            .issue_presigned_upload(request("a.mp4", Some("video/mp4")))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::StorageProvider(_)));
    }

    #[actix_web::test]
    async fn download_urls_are_clamped() {
        let (service, storage) = service_with(StorageConfig::default());
        let download = service.issue_presigned_download("some/key.mp4", Some(7200)).await.unwrap();

        assert_eq!(download.expires_in, 3600);
        assert_eq!(
            storage.calls(),
            vec![StorageCall::Get {
                key: "some/key.mp4".into(),
                expires_in: Duration::from_secs(3600)
            }]
        );
        assert!(matches!(
            service.issue_presigned_download("", None).await,
            Err(UploadError::MissingKey)
        ));
    }

    #[actix_web::test]
    async fn delete_forwards_key_verbatim() {
        let (service, storage) = service_with(StorageConfig::default());

        assert!(matches!(service.delete_object("").await, Err(UploadError::MissingKey)));
        service.delete_object("anything/at all/../x").await.unwrap();
        assert_eq!(
            storage.calls(),
            vec![StorageCall::Delete { key: "anything/at all/../x".into() }]
        );
    }

    #[actix_web::test]
    async fn delete_failure_is_provider_error() {
        let service =
            UploadService::new(Arc::new(RecordingStorage::failing()), StorageConfig::default());
        assert!(matches!(
            service.delete_object("k").await,
            Err(UploadError::StorageProvider(_))
        ));
        service.delete_object_quietly("k").await;
    }
}
