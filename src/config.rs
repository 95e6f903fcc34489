use serde::Deserialize;

use crate::util::convert_to_bytes;

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Collection endpoint host, e.g. "collector.example.com".
    pub host: String,
    /// Session token sent as `Cookie: Token=<token>` on uploads.
    pub token: String,
}

/// What to do when individual probes fail during a snapshot build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapshotMode {
    /// Failed probes are logged and contribute empty values; the snapshot
    /// is still published.
    BestEffort,
    /// Any probe failure aborts the build after all probes have run;
    /// neither snapshot nor cache is updated.
    Strict,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default = "default_snapshot_mode")]
    pub mode: SnapshotMode,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            mode: default_snapshot_mode(),
        }
    }
}

fn default_snapshot_mode() -> SnapshotMode {
    SnapshotMode::BestEffort
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Upper bound for file parts, as a human-readable byte string
    /// ("50MiB", "500MB", ...).
    #[serde(default = "default_max_file_size")]
    pub max_file_size: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_max_file_size() -> String {
    "50MiB".to_string()
}

impl AgentConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AgentConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Upload size cap in bytes, from `upload.max_file_size`.
    pub fn max_upload_bytes(&self) -> u64 {
        convert_to_bytes(&self.upload.max_file_size)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.api.host.is_empty(), "api.host must be non-empty");
        anyhow::ensure!(!self.api.token.is_empty(), "api.token must be non-empty");
        anyhow::ensure!(
            self.max_upload_bytes() > 0,
            "upload.max_file_size must be a byte size > 0 (e.g. \"50MiB\"), got {:?}",
            self.upload.max_file_size
        );
        Ok(())
    }
}
