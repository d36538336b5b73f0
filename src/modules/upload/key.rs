use rand::{rngs::OsRng, RngCore};
use serde::Serialize;

use crate::modules::upload::{
    category::classify,
    error::{UploadError, UploadResult},
    model::StorageConfig,
};

/// A derived object key: `root/access/actor/scope/category/file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw inputs to [`derive_key`].
#[derive(Debug, Clone, Copy)]
pub struct KeyParts<'a> {
    pub access_type: &'a str,
    pub actor_id: &'a str,
    pub scope_name: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
}

/// Folder segments recovered from a previously derived key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyScope<'a> {
    pub access_type: &'a str,
    pub actor_id: &'a str,
    pub scope_name: &'a str,
    pub category: &'a str,
    pub file_segment: &'a str,
}

/// Lowercases and strips a raw value down to `[a-z0-9_-]`.
///
/// Dots and whitespace become dashes, dash runs collapse, and leading or
/// trailing dashes are dropped. The result may be empty.
pub fn sanitize_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_dash = false;

    for ch in raw.trim().chars().flat_map(char::to_lowercase) {
        let ch = if ch == '.' || ch.is_whitespace() { '-' } else { ch };
        match ch {
            'a'..='z' | '0'..='9' | '_' => {
                if pending_dash && !out.is_empty() {
                    out.push('-');
                }
                pending_dash = false;
                out.push(ch);
            }
            '-' => pending_dash = true,
            _ => {}
        }
    }

    out
}

pub fn validate_segment_length(label: &str, segment: Option<&str>, max: usize) -> UploadResult<()> {
    let Some(segment) = segment else {
        return Ok(());
    };

    let len = segment.len();
    if len == 0 {
        return Err(UploadError::Validation(format!("{label} must not be empty")));
    }
    if len > max {
        return Err(UploadError::Validation(format!(
            "{label} is too long: {len} bytes (maximum {max} bytes)"
        )));
    }
    Ok(())
}

/// Splits a file name into its base name and extension (dot included).
fn split_file_name(file_name: &str) -> (&str, &str) {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    match base.rfind('.') {
        Some(idx) if idx > 0 => base.split_at(idx),
        _ => (base, ""),
    }
}

fn random_suffix() -> String {
    let mut bytes = [0u8; 8];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn derive_key(config: &StorageConfig, parts: &KeyParts<'_>) -> UploadResult<StorageKey> {
    let required = [
        ("accessType", parts.access_type),
        ("actorId", parts.actor_id),
        ("scopeName", parts.scope_name),
        ("contentType", parts.content_type),
        ("fileName", parts.file_name),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(UploadError::MissingField(*field));
    }

    let access_type = sanitize_segment(parts.access_type);
    let actor_id = sanitize_segment(parts.actor_id);
    let scope_name = sanitize_segment(parts.scope_name);
    let category = sanitize_segment(&classify(Some(parts.content_type)).as_str().replace('/', "-"));

    let (base_name, extension) = split_file_name(parts.file_name.trim());
    let base_name = sanitize_segment(base_name);

    let segments = [
        ("accessType", &access_type),
        ("actorId", &actor_id),
        ("scopeName", &scope_name),
        ("category", &category),
        ("fileName", &base_name),
    ];

    if let Some((label, _)) = segments.iter().find(|(_, value)| value.is_empty()) {
        return Err(UploadError::Validation(format!("{label} is empty after sanitization")));
    }

    for (label, value) in &segments {
        validate_segment_length(label, Some(value.as_str()), config.max_segment_bytes)?;
    }

    let file_segment = format!(
        "{}-{}-{}{}",
        chrono::Utc::now().timestamp_millis(),
        random_suffix(),
        base_name,
        extension
    );

    let key = [
        config.root_folder.as_str(),
        &access_type,
        &actor_id,
        &scope_name,
        &category,
        &file_segment,
    ]
    .join("/");

    if key.len() > config.max_key_bytes {
        return Err(UploadError::KeyTooLong { actual: key.len(), max: config.max_key_bytes });
    }

    Ok(StorageKey(key))
}

/// Recovers the folder segments of a key derived under `config`.
pub fn parse_key<'a>(config: &StorageConfig, key: &'a str) -> Option<KeyScope<'a>> {
    let rest = key.strip_prefix(config.root_folder.as_str())?.strip_prefix('/')?;
    let mut parts = rest.splitn(5, '/');
    let scope = KeyScope {
        access_type: parts.next()?,
        actor_id: parts.next()?,
        scope_name: parts.next()?,
        category: parts.next()?,
        file_segment: parts.next()?,
    };

    let folders = [scope.access_type, scope.actor_id, scope.scope_name, scope.category];
    if folders.iter().any(|segment| segment.is_empty() || sanitize_segment(segment) != *segment)
        || scope.file_segment.is_empty()
        || scope.file_segment.contains('/')
    {
        return None;
    }

    Some(scope)
}
