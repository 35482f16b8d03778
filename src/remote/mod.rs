//! Remote filesystem client boundary.
//!
//! Every operation carries an absolute drive path and resolves to either
//! typed data from the backend's uniform response envelope or a
//! categorized [`RemoteError`]. Command handlers are the error boundary:
//! they translate these errors into transcript blocks and never let them
//! propagate past the dispatcher.

pub mod http;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// One entry of a directory listing, as the backend reports it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DirEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: u64,
    pub is_dir: bool,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirListing {
    pub path: String,
    pub items: Vec<DirEntry>,
    #[serde(default)]
    pub total_items: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    File,
    Directory,
}

/// Answer of the resolve endpoint, used by `cd` before navigating.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolvedPath {
    pub path: String,
    pub exists: bool,
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Object metadata from the stats endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct FileMetadata {
    pub filename: Option<String>,
    pub size: Option<u64>,
    #[serde(default)]
    pub content_type: Option<String>,
    pub upload_date: DateTime<Utc>,
    pub bucket: String,
    pub object_name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// The uniform wrapper every backend response uses.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: String,
    pub status_code: u16,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A downloaded object body plus the filename the backend suggested via
/// `Content-Disposition`, if any.
#[derive(Debug)]
pub struct Download {
    pub filename: Option<String>,
    pub body: Vec<u8>,
}

/// A local file selected for upload.
#[derive(Debug, Clone)]
pub struct PickedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

/// Byte-level upload progress callback; called with the running total of
/// bytes handed to the transport.
pub type ProgressFn = Arc<dyn Fn(u64) + Send + Sync>;

#[derive(Debug, Error)]
pub enum RemoteError {
    /// The backend answered with a non-success HTTP status. The message is
    /// the envelope message when one could be decoded.
    #[error("{message} (status {status})")]
    Status { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// HTTP status category, when the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend-supplied message, when present and non-empty.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            RemoteError::Status { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

#[async_trait]
pub trait RemoteFs: Send + Sync {
    async fn list_directory(&self, path: &str) -> Result<DirListing, RemoteError>;

    async fn resolve_path(&self, path: &str) -> Result<ResolvedPath, RemoteError>;

    async fn stat_object(&self, path: &str) -> Result<FileMetadata, RemoteError>;

    async fn create_folder(&self, parent: &str, name: &str) -> Result<(), RemoteError>;

    async fn delete_object(&self, path: &str) -> Result<(), RemoteError>;

    async fn rename_object(&self, path: &str, new_name: &str) -> Result<(), RemoteError>;

    async fn move_object(&self, source: &str, destination_folder: &str)
        -> Result<(), RemoteError>;

    async fn copy_object(&self, source: &str, destination_folder: &str)
        -> Result<(), RemoteError>;

    async fn upload_file(
        &self,
        file: &PickedFile,
        destination: &str,
        progress: ProgressFn,
    ) -> Result<(), RemoteError>;

    async fn download_object(&self, path: &str) -> Result<Download, RemoteError>;

    /// Compress objects into a zip archive in `destination_folder`;
    /// returns the created object name.
    async fn compress_objects(
        &self,
        paths: &[String],
        destination_folder: &str,
        output_base_name: &str,
    ) -> Result<String, RemoteError>;
}

#[cfg(test)]
pub mod mock {
    //! Recording in-memory client for dispatcher and handler tests.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MockRemote {
        /// Every call, rendered as `"op arg1 arg2"`.
        pub calls: Mutex<Vec<String>>,
        pub listings: Mutex<HashMap<String, Vec<DirEntry>>>,
        pub resolutions: Mutex<HashMap<String, ResolvedPath>>,
        /// When set, mutating operations fail with this status/message.
        pub fail: Mutex<Option<(u16, String)>>,
    }

    impl MockRemote {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn entry(name: &str, is_dir: bool) -> DirEntry {
            DirEntry {
                name: name.to_string(),
                size: if is_dir { 0 } else { 42 },
                is_dir,
                last_modified: chrono::Utc::now(),
            }
        }

        pub fn with_listing(self, path: &str, entries: Vec<DirEntry>) -> Self {
            self.listings
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .insert(path.to_string(), entries);
            self
        }

        pub fn with_resolution(self, path: &str, exists: bool, kind: ObjectKind) -> Self {
            self.resolutions
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .insert(
                    path.to_string(),
                    ResolvedPath {
                        path: path.to_string(),
                        exists,
                        kind,
                        size: None,
                    },
                );
            self
        }

        pub fn with_failure(self, status: u16, message: &str) -> Self {
            *self.fail.lock().unwrap_or_else(|p| p.into_inner()) =
                Some((status, message.to_string()));
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap_or_else(|p| p.into_inner()).clone()
        }

        fn record(&self, call: String) {
            self.calls
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .push(call);
        }

        fn check_fail(&self) -> Result<(), RemoteError> {
            match &*self.fail.lock().unwrap_or_else(|p| p.into_inner()) {
                Some((status, message)) => Err(RemoteError::Status {
                    status: *status,
                    message: message.clone(),
                }),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl RemoteFs for MockRemote {
        async fn list_directory(&self, path: &str) -> Result<DirListing, RemoteError> {
            self.record(format!("list {path}"));
            self.check_fail()?;
            let items = self
                .listings
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .get(path)
                .cloned()
                .ok_or(RemoteError::Status {
                    status: 404,
                    message: "not found".to_string(),
                })?;
            Ok(DirListing {
                path: path.to_string(),
                total_items: items.len() as u64,
                items,
            })
        }

        async fn resolve_path(&self, path: &str) -> Result<ResolvedPath, RemoteError> {
            self.record(format!("resolve {path}"));
            self.check_fail()?;
            self.resolutions
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .get(path)
                .cloned()
                .ok_or(RemoteError::Status {
                    status: 404,
                    message: "not found".to_string(),
                })
        }

        async fn stat_object(&self, path: &str) -> Result<FileMetadata, RemoteError> {
            self.record(format!("stat {path}"));
            Err(RemoteError::Status {
                status: 404,
                message: "not found".to_string(),
            })
        }

        async fn create_folder(&self, parent: &str, name: &str) -> Result<(), RemoteError> {
            self.record(format!("create_folder {parent} {name}"));
            self.check_fail()
        }

        async fn delete_object(&self, path: &str) -> Result<(), RemoteError> {
            self.record(format!("delete {path}"));
            self.check_fail()
        }

        async fn rename_object(&self, path: &str, new_name: &str) -> Result<(), RemoteError> {
            self.record(format!("rename {path} {new_name}"));
            self.check_fail()
        }

        async fn move_object(
            &self,
            source: &str,
            destination_folder: &str,
        ) -> Result<(), RemoteError> {
            self.record(format!("move {source} {destination_folder}"));
            self.check_fail()
        }

        async fn copy_object(
            &self,
            source: &str,
            destination_folder: &str,
        ) -> Result<(), RemoteError> {
            self.record(format!("copy {source} {destination_folder}"));
            self.check_fail()
        }

        async fn upload_file(
            &self,
            file: &PickedFile,
            destination: &str,
            progress: ProgressFn,
        ) -> Result<(), RemoteError> {
            self.record(format!("upload {} {destination}", file.name));
            self.check_fail()?;
            progress(file.size);
            Ok(())
        }

        async fn download_object(&self, path: &str) -> Result<Download, RemoteError> {
            self.record(format!("download {path}"));
            self.check_fail()?;
            Ok(Download {
                filename: None,
                body: b"payload".to_vec(),
            })
        }

        async fn compress_objects(
            &self,
            paths: &[String],
            destination_folder: &str,
            output_base_name: &str,
        ) -> Result<String, RemoteError> {
            self.record(format!(
                "compress {} {destination_folder} {output_base_name}",
                paths.join(",")
            ));
            self.check_fail()?;
            Ok(format!("{output_base_name}.zip"))
        }
    }
}
