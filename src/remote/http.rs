//! HTTP implementation of the remote filesystem client.
//!
//! Talks to the storage backend's `/storage/*` routes. All responses use
//! the uniform envelope; non-success statuses are decoded into
//! [`RemoteError::Status`] with the envelope message preserved so command
//! handlers can surface it.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{
    DirListing, Download, Envelope, FileMetadata, PickedFile, ProgressFn, RemoteError, RemoteFs,
    ResolvedPath,
};

const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

#[derive(Debug, Serialize)]
struct CreateFolderPayload<'a> {
    // The backend keeps these two fields camel-cased.
    #[serde(rename = "currentPath")]
    current_path: &'a str,
    #[serde(rename = "folderPath")]
    folder_path: &'a str,
}

#[derive(Debug, Serialize)]
struct RenamePayload<'a> {
    path: &'a str,
    new_name: &'a str,
}

#[derive(Debug, Serialize)]
struct TransferPayload<'a> {
    source_path: &'a str,
    destination_folder: &'a str,
}

#[derive(Debug, Serialize)]
struct CompressPayload<'a> {
    objects: &'a [String],
    destination_folder: &'a str,
    output_base_name: &'a str,
}

pub struct HttpRemoteFs {
    base: reqwest::Url,
    client: reqwest::Client,
}

impl HttpRemoteFs {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let base = reqwest::Url::parse(base_url)
            .map_err(|e| RemoteError::Decode(format!("invalid base url {base_url:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(RemoteError::Decode(format!(
                "invalid base url {base_url:?}: not an http(s) origin"
            )));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base, client })
    }

    /// Join path segments onto the base URL. Segments are percent-encoded,
    /// so an absolute drive path travels as a single segment, the way the
    /// download route expects it.
    fn endpoint(&self, segments: &[&str]) -> reqwest::Url {
        let mut url = self.base.clone();
        if let Ok(mut parts) = url.path_segments_mut() {
            parts.pop_if_empty().extend(segments);
        }
        url
    }

    /// Decode the envelope of a successful response, or map a non-success
    /// status (with its envelope message, when one is present) to
    /// [`RemoteError::Status`].
    async fn read_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RemoteError> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Envelope<serde_json::Value>>(&bytes)
                .map(|envelope| envelope.message)
                .unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> =
            serde_json::from_slice(&bytes).map_err(|e| RemoteError::Decode(e.to_string()))?;
        envelope
            .data
            .ok_or_else(|| RemoteError::Decode("envelope carried no data".to_string()))
    }

    /// Like [`Self::read_envelope`], for operations whose data payload is
    /// irrelevant.
    async fn read_ack(response: reqwest::Response) -> Result<(), RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let bytes = response.bytes().await?;
        let message = serde_json::from_slice::<Envelope<serde_json::Value>>(&bytes)
            .map(|envelope| envelope.message)
            .unwrap_or_default();
        Err(RemoteError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

/// Extract the suggested filename from a `Content-Disposition` header.
///
/// Accepts both `filename="name"` and the RFC 5987 `filename*=UTF-8''name`
/// form, quoted or not.
pub fn content_disposition_filename(value: &str) -> Option<String> {
    let lower = value.to_ascii_lowercase();
    let at = lower.find("filename")?;
    let rest = &value[at + "filename".len()..];
    let rest = rest.strip_prefix('*').unwrap_or(rest);
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();

    let name = if let Some(quoted) = rest.strip_prefix('"') {
        quoted.split('"').next().unwrap_or("")
    } else {
        rest.split(';').next().unwrap_or("").trim()
    };

    // filename*=UTF-8''name carries a charset prefix.
    let name = name.rsplit("''").next().unwrap_or(name);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[async_trait]
impl RemoteFs for HttpRemoteFs {
    async fn list_directory(&self, path: &str) -> Result<DirListing, RemoteError> {
        tracing::debug!(path, "list directory");
        let response = self
            .client
            .get(self.endpoint(&["storage", "tree"]))
            .query(&[("path", path)])
            .send()
            .await?;
        Self::read_envelope(response).await
    }

    async fn resolve_path(&self, path: &str) -> Result<ResolvedPath, RemoteError> {
        tracing::debug!(path, "resolve path");
        let response = self
            .client
            .get(self.endpoint(&["storage", "resolve"]))
            .query(&[("path", path)])
            .send()
            .await?;
        Self::read_envelope(response).await
    }

    async fn stat_object(&self, path: &str) -> Result<FileMetadata, RemoteError> {
        tracing::debug!(path, "stat object");
        let response = self
            .client
            .get(self.endpoint(&["storage", "stats"]))
            .query(&[("object_path", path)])
            .send()
            .await?;
        Self::read_envelope(response).await
    }

    async fn create_folder(&self, parent: &str, name: &str) -> Result<(), RemoteError> {
        tracing::debug!(parent, name, "create folder");
        let response = self
            .client
            .post(self.endpoint(&["storage", "folder"]))
            .json(&CreateFolderPayload {
                current_path: parent,
                folder_path: name,
            })
            .send()
            .await?;
        Self::read_ack(response).await
    }

    async fn delete_object(&self, path: &str) -> Result<(), RemoteError> {
        tracing::debug!(path, "delete object");
        let response = self
            .client
            .delete(self.endpoint(&["storage", "object"]))
            .query(&[("folder_path", path)])
            .send()
            .await?;
        Self::read_ack(response).await
    }

    async fn rename_object(&self, path: &str, new_name: &str) -> Result<(), RemoteError> {
        tracing::debug!(path, new_name, "rename object");
        let response = self
            .client
            .patch(self.endpoint(&["storage", "rename"]))
            .json(&RenamePayload { path, new_name })
            .send()
            .await?;
        Self::read_ack(response).await
    }

    async fn move_object(
        &self,
        source: &str,
        destination_folder: &str,
    ) -> Result<(), RemoteError> {
        tracing::debug!(source, destination_folder, "move object");
        let response = self
            .client
            .post(self.endpoint(&["storage", "move"]))
            .json(&TransferPayload {
                source_path: source,
                destination_folder,
            })
            .send()
            .await?;
        Self::read_ack(response).await
    }

    async fn copy_object(
        &self,
        source: &str,
        destination_folder: &str,
    ) -> Result<(), RemoteError> {
        tracing::debug!(source, destination_folder, "copy object");
        let response = self
            .client
            .post(self.endpoint(&["storage", "copy"]))
            .json(&TransferPayload {
                source_path: source,
                destination_folder,
            })
            .send()
            .await?;
        Self::read_ack(response).await
    }

    async fn upload_file(
        &self,
        file: &PickedFile,
        destination: &str,
        progress: ProgressFn,
    ) -> Result<(), RemoteError> {
        tracing::debug!(name = %file.name, destination, "upload file");
        let bytes = tokio::fs::read(&file.path).await?;
        let total = bytes.len() as u64;

        // Chunked body so the transport reports progress as it drains.
        let chunks: Vec<Result<Vec<u8>, std::io::Error>> = bytes
            .chunks(UPLOAD_CHUNK_BYTES)
            .map(|chunk| Ok(chunk.to_vec()))
            .collect();
        let mut sent = 0u64;
        let stream = futures::stream::iter(chunks).inspect(move |chunk| {
            if let Ok(chunk) = chunk {
                sent += chunk.len() as u64;
                progress(sent);
            }
        });

        let part =
            reqwest::multipart::Part::stream_with_length(reqwest::Body::wrap_stream(stream), total)
                .file_name(file.name.clone())
                .mime_str("application/octet-stream")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint(&["storage", "upload"]))
            .query(&[("path", destination)])
            .multipart(form)
            .send()
            .await?;
        Self::read_ack(response).await
    }

    async fn download_object(&self, path: &str) -> Result<Download, RemoteError> {
        tracing::debug!(path, "download object");
        let response = self
            .client
            .get(self.endpoint(&["storage", "download", path]))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let bytes = response.bytes().await?;
            let message = serde_json::from_slice::<Envelope<serde_json::Value>>(&bytes)
                .map(|envelope| envelope.message)
                .unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let filename = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(content_disposition_filename);
        let body = response.bytes().await?.to_vec();

        Ok(Download { filename, body })
    }

    async fn compress_objects(
        &self,
        paths: &[String],
        destination_folder: &str,
        output_base_name: &str,
    ) -> Result<String, RemoteError> {
        tracing::debug!(?paths, destination_folder, output_base_name, "compress objects");
        let response = self
            .client
            .post(self.endpoint(&["storage", "compress"]))
            .json(&CompressPayload {
                objects: paths,
                destination_folder,
                output_base_name,
            })
            .send()
            .await?;
        let metadata: FileMetadata = Self::read_envelope(response).await?;
        Ok(metadata.object_name)
    }
}
