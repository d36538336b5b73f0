use serde::Serialize;

/// Coarse content grouping; names the category folder of a storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentCategory {
    Images,
    Videos,
    Audio,
    Documents,
    Archives,
    Other,
}

impl ContentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentCategory::Images => "images",
            ContentCategory::Videos => "videos",
            ContentCategory::Audio => "audio",
            ContentCategory::Documents => "documents",
            ContentCategory::Archives => "archives",
            ContentCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const MIME_CATEGORIES: &[(&str, ContentCategory)] = &[
    ("image/jpeg", ContentCategory::Images),
    ("image/jpg", ContentCategory::Images),
    ("image/png", ContentCategory::Images),
    ("image/gif", ContentCategory::Images),
    ("image/webp", ContentCategory::Images),
    ("image/avif", ContentCategory::Images),
    ("image/svg+xml", ContentCategory::Images),
    ("image/bmp", ContentCategory::Images),
    ("image/tiff", ContentCategory::Images),
    ("image/heic", ContentCategory::Images),
    ("video/mp4", ContentCategory::Videos),
    ("video/webm", ContentCategory::Videos),
    ("video/ogg", ContentCategory::Videos),
    ("video/quicktime", ContentCategory::Videos),
    ("video/x-msvideo", ContentCategory::Videos),
    ("video/x-matroska", ContentCategory::Videos),
    ("video/mpeg", ContentCategory::Videos),
    ("application/x-mpegurl", ContentCategory::Videos),
    ("application/vnd.apple.mpegurl", ContentCategory::Videos),
    ("audio/mpeg", ContentCategory::Audio),
    ("audio/mp4", ContentCategory::Audio),
    ("audio/aac", ContentCategory::Audio),
    ("audio/wav", ContentCategory::Audio),
    ("audio/x-wav", ContentCategory::Audio),
    ("audio/ogg", ContentCategory::Audio),
    ("audio/webm", ContentCategory::Audio),
    ("audio/flac", ContentCategory::Audio),
    ("application/pdf", ContentCategory::Documents),
    ("application/msword", ContentCategory::Documents),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ContentCategory::Documents,
    ),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        ContentCategory::Documents,
    ),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ContentCategory::Documents,
    ),
    ("application/vnd.ms-excel", ContentCategory::Documents),
    ("application/vnd.ms-powerpoint", ContentCategory::Documents),
    ("application/vnd.oasis.opendocument.text", ContentCategory::Documents),
    ("application/rtf", ContentCategory::Documents),
    ("application/epub+zip", ContentCategory::Documents),
    ("application/json", ContentCategory::Documents),
    ("text/plain", ContentCategory::Documents),
    ("text/markdown", ContentCategory::Documents),
    ("text/csv", ContentCategory::Documents),
    ("text/html", ContentCategory::Documents),
    ("application/zip", ContentCategory::Archives),
    ("application/x-zip-compressed", ContentCategory::Archives),
    ("application/x-tar", ContentCategory::Archives),
    ("application/gzip", ContentCategory::Archives),
    ("application/x-gzip", ContentCategory::Archives),
    ("application/x-bzip2", ContentCategory::Archives),
    ("application/x-7z-compressed", ContentCategory::Archives),
    ("application/x-rar-compressed", ContentCategory::Archives),
    ("application/vnd.rar", ContentCategory::Archives),
];

const DOCUMENT_HINTS: &[&str] = &[
    "pdf",
    "msword",
    "officedocument",
    "opendocument",
    "ms-excel",
    "ms-powerpoint",
    "rtf",
    "epub",
];

const ARCHIVE_HINTS: &[&str] = &["zip", "tar", "rar", "7z", "gzip", "bzip", "compressed"];

/// Maps a MIME type onto its storage category. Never fails: anything
/// unrecognised lands in [`ContentCategory::Other`].
pub fn classify(content_type: Option<&str>) -> ContentCategory {
    let Some(raw) = content_type else {
        return ContentCategory::Other;
    };

    let essence = raw.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    if essence.is_empty() {
        return ContentCategory::Other;
    }

    if let Some((_, category)) = MIME_CATEGORIES.iter().find(|(mime, _)| *mime == essence) {
        return *category;
    }

    fallback(&essence)
}

fn fallback(essence: &str) -> ContentCategory {
    let (primary, subtype) = essence.split_once('/').unwrap_or((essence, ""));
    match primary {
        "image" => ContentCategory::Images,
        "video" => ContentCategory::Videos,
        "audio" => ContentCategory::Audio,
        "text" => ContentCategory::Documents,
        "application" if DOCUMENT_HINTS.iter().any(|hint| subtype.contains(hint)) => {
            ContentCategory::Documents
        }
        "application" if ARCHIVE_HINTS.iter().any(|hint| subtype.contains(hint)) => {
            ContentCategory::Archives
        }
        _ => ContentCategory::Other,
    }
}
