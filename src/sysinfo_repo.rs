// Host metrics via sysinfo

use crate::models::{CpuUsageRaw, DiskUsageRaw, NetworkUsage};
use std::sync::Arc;
use std::time::Instant;
use sysinfo::{Disks, Networks, System};
use tracing::instrument;

pub struct SysinfoRepo {
    sys: Arc<std::sync::Mutex<System>>,
    disks: Arc<std::sync::Mutex<Disks>>,
    networks: Arc<std::sync::Mutex<Networks>>,
    last_cpu_refresh: Arc<std::sync::Mutex<Option<(Instant, CpuUsageRaw)>>>,
}

impl Default for SysinfoRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoRepo {
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        let disks = Disks::new_with_refreshed_list();
        let networks = Networks::new_with_refreshed_list();
        Self {
            sys: Arc::new(std::sync::Mutex::new(sys)),
            disks: Arc::new(std::sync::Mutex::new(disks)),
            networks: Arc::new(std::sync::Mutex::new(networks)),
            last_cpu_refresh: Arc::new(std::sync::Mutex::new(None)),
        }
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "fetch_cpu_usage"))]
    pub async fn fetch_cpu_usage(&self) -> anyhow::Result<CpuUsageRaw> {
        let sys = self.sys.clone();
        let last_cpu_refresh = self.last_cpu_refresh.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;
            let mut guard = last_cpu_refresh
                .lock()
                .map_err(|e| anyhow::anyhow!("cpu cache lock poisoned: {}", e))?;

            let now = Instant::now();
            let usage = match &*guard {
                Some((prev_ts, prev_usage))
                    if now.duration_since(*prev_ts) < sysinfo::MINIMUM_CPU_UPDATE_INTERVAL =>
                {
                    // Too soon for a meaningful delta, reuse the last reading
                    prev_usage.clone()
                }
                _ => {
                    sys.refresh_cpu_all();
                    let usage = CpuUsageRaw {
                        total_percent: (sys.global_cpu_usage() as f64).clamp(0.0, 100.0),
                        per_core_percent: sys
                            .cpus()
                            .iter()
                            .map(|c| (c.cpu_usage() as f64).clamp(0.0, 100.0))
                            .collect(),
                    };
                    *guard = Some((now, usage.clone()));
                    usage
                }
            };
            Ok(usage)
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "fetch_disk_usages"))]
    pub async fn fetch_disk_usages(&self) -> anyhow::Result<Vec<DiskUsageRaw>> {
        let disks = self.disks.clone();
        tokio::task::spawn_blocking(move || {
            let mut disks_guard = disks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo disks lock poisoned: {}", e))?;
            disks_guard.refresh(false);
            let usages = disks_guard
                .list()
                .iter()
                .map(|d| DiskUsageRaw {
                    mount: d.mount_point().to_string_lossy().into_owned(),
                    name: d.name().to_string_lossy().into_owned(),
                    filesystem: d.file_system().to_string_lossy().into_owned(),
                    total_bytes: d.total_space(),
                    available_bytes: d.available_space(),
                })
                .collect();
            Ok(usages)
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "fetch_network_usage"))]
    pub async fn fetch_network_usage(&self) -> anyhow::Result<NetworkUsage> {
        let networks = self.networks.clone();
        tokio::task::spawn_blocking(move || {
            let mut networks_guard = networks
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo networks lock poisoned: {}", e))?;
            networks_guard.refresh(true);
            let mut usage = NetworkUsage::default();
            for (_, data) in networks_guard.list() {
                usage.rx_bytes += data.total_received();
                usage.tx_bytes += data.total_transmitted();
                usage.rx_packets += data.total_packets_received();
                usage.tx_packets += data.total_packets_transmitted();
            }
            Ok(usage)
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }
}
