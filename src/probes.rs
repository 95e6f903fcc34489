// Metric probe seam between the snapshot orchestrator and the repos

use crate::docker_repo::DockerRepo;
use crate::models::{
    Container, ContainerProject, ContainerUsage, CpuUsageRaw, DiskUsageRaw, DockerInfo,
    NetworkUsage,
};
use crate::sysinfo_repo::SysinfoRepo;
use std::future::Future;

/// One method per metric source. All probes are safe to call concurrently;
/// `fetch_container_usages` takes the freshly enumerated container list so
/// usage collection can never observe a stale or empty cache.
pub trait Probes: Send + Sync {
    fn fetch_cpu_usage(&self) -> impl Future<Output = anyhow::Result<CpuUsageRaw>> + Send;

    fn fetch_disk_usages(&self) -> impl Future<Output = anyhow::Result<Vec<DiskUsageRaw>>> + Send;

    fn fetch_network_usage(&self) -> impl Future<Output = anyhow::Result<NetworkUsage>> + Send;

    fn fetch_containers(
        &self,
    ) -> impl Future<Output = anyhow::Result<(Vec<Container>, Vec<ContainerProject>)>> + Send;

    fn fetch_container_usages(
        &self,
        containers: &[Container],
    ) -> impl Future<Output = anyhow::Result<Vec<ContainerUsage>>> + Send;

    fn fetch_docker_info(&self) -> impl Future<Output = anyhow::Result<DockerInfo>> + Send;
}

/// Production probes: host metrics from sysinfo, container metrics from the
/// Docker daemon.
pub struct LiveProbes {
    sysinfo: SysinfoRepo,
    docker: DockerRepo,
}

impl LiveProbes {
    pub fn new(sysinfo: SysinfoRepo, docker: DockerRepo) -> Self {
        Self { sysinfo, docker }
    }
}

impl Probes for LiveProbes {
    async fn fetch_cpu_usage(&self) -> anyhow::Result<CpuUsageRaw> {
        self.sysinfo.fetch_cpu_usage().await
    }

    async fn fetch_disk_usages(&self) -> anyhow::Result<Vec<DiskUsageRaw>> {
        self.sysinfo.fetch_disk_usages().await
    }

    async fn fetch_network_usage(&self) -> anyhow::Result<NetworkUsage> {
        self.sysinfo.fetch_network_usage().await
    }

    async fn fetch_containers(&self) -> anyhow::Result<(Vec<Container>, Vec<ContainerProject>)> {
        self.docker.list_containers().await
    }

    async fn fetch_container_usages(
        &self,
        containers: &[Container],
    ) -> anyhow::Result<Vec<ContainerUsage>> {
        self.docker.container_usages(containers).await
    }

    async fn fetch_docker_info(&self) -> anyhow::Result<DockerInfo> {
        self.docker.info().await
    }
}
