// Upload metadata payloads

use serde::{Deserialize, Serialize};

/// Metadata part of a file upload; the tag tells the backend which handler
/// processes the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UploadData {
    #[serde(rename = "BACKUP_DATABASE")]
    BackupDatabase { database: String, task: String },
    #[serde(rename = "CONTAINER_LOG")]
    ContainerLog { container: String, task: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_database_wire_shape() {
        let data = UploadData::BackupDatabase {
            database: "main".into(),
            task: "task-1".into(),
        };
        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(
            json,
            r#"{"type":"BACKUP_DATABASE","database":"main","task":"task-1"}"#
        );
    }

    #[test]
    fn container_log_wire_shape() {
        let data = UploadData::ContainerLog {
            container: "abc123".into(),
            task: "task-2".into(),
        };
        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(
            json,
            r#"{"type":"CONTAINER_LOG","container":"abc123","task":"task-2"}"#
        );
    }

    #[test]
    fn round_trips_through_json() {
        let data = UploadData::ContainerLog {
            container: "c".into(),
            task: "t".into(),
        };
        let back: UploadData = serde_json::from_str(&serde_json::to_string(&data).unwrap()).unwrap();
        assert_eq!(back, data);
    }
}
