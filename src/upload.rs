// Multipart upload transport to the collection endpoint

use crate::agent::Agent;
use crate::models::{LogTrackItem, UploadData};
use bytes::Bytes;
use chrono::Utc;
use reqwest::StatusCode;
use reqwest::header::COOKIE;
use reqwest::multipart::{Form, Part};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("encode upload metadata: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("read part {part:?}: {source}")]
    PartIo {
        part: String,
        #[source]
        source: std::io::Error,
    },
    #[error("part {part:?} is {size} bytes, exceeds the {limit} byte upload cap")]
    TooLarge { part: String, size: u64, limit: u64 },
    #[error("send upload request: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upload rejected: {0}")]
    Status(StatusCode),
}

/// One named section of the multipart body. Files become file fields using
/// the path's base name as the declared filename; buffers become plain form
/// fields.
#[derive(Debug, Clone)]
pub enum PartSource {
    File(PathBuf),
    Buffer(Bytes),
}

/// Upload endpoint for daemon artifact files on `host`.
pub fn upload_url(host: &str) -> String {
    format!("https://{host}/v1/daemon/file/upload")
}

impl<P> Agent<P> {
    /// POSTs `parts` to `url` as multipart/form-data, authenticated with the
    /// session token as a `Cookie: Token=<token>` header. Parts are encoded
    /// in part-name order (BTreeMap), so a given call produces the same body
    /// layout every time. No timeout, no retry; a non-success status maps to
    /// [`UploadError::Status`].
    pub async fn upload(
        &self,
        url: &str,
        parts: BTreeMap<String, PartSource>,
    ) -> Result<(), UploadError> {
        let limit = self.config().max_upload_bytes();
        let mut form = Form::new();
        for (name, source) in parts {
            let part = match source {
                PartSource::File(path) => {
                    let size = tokio::fs::metadata(&path)
                        .await
                        .map_err(|e| UploadError::PartIo {
                            part: name.clone(),
                            source: e,
                        })?
                        .len();
                    if size > limit {
                        return Err(UploadError::TooLarge {
                            part: name,
                            size,
                            limit,
                        });
                    }
                    let content =
                        tokio::fs::read(&path)
                            .await
                            .map_err(|e| UploadError::PartIo {
                                part: name.clone(),
                                source: e,
                            })?;
                    let file_name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    Part::bytes(content).file_name(file_name)
                }
                PartSource::Buffer(bytes) => Part::stream(bytes),
            };
            form = form.part(name, part);
        }

        let response = self
            .http()
            .post(url)
            .header(COOKIE, format!("Token={}", self.config().api.token))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UploadError::Status(response.status()));
        }
        Ok(())
    }

    /// Uploads the file at `path` with its JSON-encoded metadata descriptor
    /// as the `data` and `file` parts. Encoding failure short-circuits
    /// before any I/O.
    pub async fn upload_file(&self, path: &Path, data: &UploadData) -> Result<(), UploadError> {
        let encoded = serde_json::to_vec(data)?;
        let mut parts = BTreeMap::new();
        parts.insert("data".to_string(), PartSource::Buffer(encoded.into()));
        parts.insert("file".to_string(), PartSource::File(path.to_path_buf()));
        self.upload(&upload_url(&self.config().api.host), parts)
            .await
    }

    pub async fn upload_database_backup(
        &self,
        database: &str,
        task: &str,
        path: &Path,
    ) -> Result<(), UploadError> {
        let data = UploadData::BackupDatabase {
            database: database.to_string(),
            task: task.to_string(),
        };
        self.upload_file(path, &data).await
    }

    /// Uploads a captured container log and records the task in the
    /// log-tracking map so the next snapshot build starts it fresh.
    pub async fn upload_container_log(
        &self,
        container: &str,
        task: &str,
        path: &Path,
    ) -> Result<(), UploadError> {
        self.track_container_logs(
            container,
            LogTrackItem {
                task: task.to_string(),
                since: Utc::now(),
            },
        )
        .await;
        let data = UploadData::ContainerLog {
            container: container.to_string(),
            task: task.to_string(),
        };
        self.upload_file(path, &data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_url_targets_daemon_file_endpoint() {
        assert_eq!(
            upload_url("collector.example.com"),
            "https://collector.example.com/v1/daemon/file/upload"
        );
    }
}
