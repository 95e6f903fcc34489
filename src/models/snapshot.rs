// Point-in-time snapshot and slower-changing cache

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    Container, ContainerProject, ContainerUsage, CpuUsageRaw, DiskUsageRaw, DockerInfo,
    NetworkUsage,
};

/// One point-in-time aggregate of resource-usage measurements. Published as
/// a whole after all probes have joined; readers never see a partial build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub captured_at: DateTime<Utc>,
    pub cpu: CpuUsageRaw,
    pub disks: Vec<DiskUsageRaw>,
    pub network: NetworkUsage,
    /// Consistent with [`Cache::containers`] from the same build.
    pub container_usages: Vec<ContainerUsage>,
}

/// Auxiliary state refreshed alongside each snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cache {
    pub docker_info: DockerInfo,
    pub containers: Vec<Container>,
    pub projects: Vec<ContainerProject>,
}
