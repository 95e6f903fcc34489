// Agent handle and the snapshot build orchestrator

use crate::config::{AgentConfig, SnapshotMode};
use crate::models::{Cache, LogTrackItem, Snapshot};
use crate::probes::Probes;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

/// Process-wide owner of configuration, the latest snapshot and cache, and
/// the per-container log-tracking map. Created once at startup and passed by
/// reference.
pub struct Agent<P> {
    config: AgentConfig,
    probes: P,
    http: reqwest::Client,
    snapshot: RwLock<Option<Snapshot>>,
    cache: RwLock<Cache>,
    log_tracking: Mutex<HashMap<String, LogTrackItem>>,
}

impl<P> Agent<P> {
    pub fn new(config: AgentConfig, probes: P) -> Self {
        Self {
            config,
            probes,
            // No default timeout: uploads of large artifacts must not be
            // cut off mid-transfer.
            http: reqwest::Client::new(),
            snapshot: RwLock::new(None),
            cache: RwLock::new(Cache::default()),
            log_tracking: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn probes(&self) -> &P {
        &self.probes
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Latest fully built snapshot, None before the first build completes.
    pub async fn snapshot(&self) -> Option<Snapshot> {
        self.snapshot.read().await.clone()
    }

    pub async fn cache(&self) -> Cache {
        self.cache.read().await.clone()
    }

    pub async fn track_container_logs(&self, container_id: &str, item: LogTrackItem) {
        self.log_tracking
            .lock()
            .await
            .insert(container_id.to_string(), item);
    }

    pub async fn tracked_logs(&self) -> HashMap<String, LogTrackItem> {
        self.log_tracking.lock().await.clone()
    }
}

impl<P: Probes> Agent<P> {
    /// Builds a fresh snapshot: resets the log-tracking map, fans out the
    /// five probe units concurrently, and publishes snapshot and cache only
    /// after every unit has finished.
    ///
    /// The five units write disjoint fields, so each future owns its own
    /// output and results are merged after the join. The container unit runs
    /// enumeration before usage collection; everything else is unordered.
    pub async fn build_snapshot(&self) -> anyhow::Result<()> {
        let started = Instant::now();
        let captured_at = Utc::now();
        self.log_tracking.lock().await.clear();

        let container_unit = async {
            let (containers, projects) = self.probes.fetch_containers().await?;
            let usages = self.probes.fetch_container_usages(&containers).await?;
            anyhow::Ok((containers, projects, usages))
        };

        let (cpu, disks, network, containers, docker_info) = tokio::join!(
            self.probes.fetch_cpu_usage(),
            self.probes.fetch_disk_usages(),
            self.probes.fetch_network_usage(),
            container_unit,
            self.probes.fetch_docker_info(),
        );

        let mut failures: Vec<String> = Vec::new();
        let cpu = note_failure(cpu, "cpu_usage", &mut failures);
        let disks = note_failure(disks, "disk_usages", &mut failures);
        let network = note_failure(network, "network_usage", &mut failures);
        let (containers, projects, container_usages) =
            note_failure(containers, "containers", &mut failures);
        let docker_info = note_failure(docker_info, "docker_info", &mut failures);

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            probes_failed = failures.len(),
            "snapshot build finished"
        );

        if self.config.snapshot.mode == SnapshotMode::Strict && !failures.is_empty() {
            anyhow::bail!("snapshot build failed: {}", failures.join("; "));
        }

        *self.cache.write().await = Cache {
            docker_info,
            containers,
            projects,
        };
        *self.snapshot.write().await = Some(Snapshot {
            captured_at,
            cpu,
            disks,
            network,
            container_usages,
        });
        Ok(())
    }
}

fn note_failure<T: Default>(
    result: anyhow::Result<T>,
    probe: &str,
    failures: &mut Vec<String>,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, probe, "probe failed");
            failures.push(format!("{probe}: {e}"));
            T::default()
        }
    }
}
