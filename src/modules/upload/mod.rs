pub mod category;
pub mod error;
pub mod handle;
pub mod key;
pub mod model;
pub mod route;
pub mod service;
pub mod storage;

pub use model::StorageConfig;
pub use service::UploadService;
pub use storage::S3Storage;
