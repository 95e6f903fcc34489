// Docker enumeration, one-shot usage and daemon info via bollard

mod stats;

use crate::models::{Container, ContainerProject, ContainerState, ContainerUsage, DockerInfo};
use bollard::Docker;
use bollard::query_parameters::{ListContainersOptions, StatsOptions};
use futures_util::StreamExt;
use futures_util::future::join_all;
use std::collections::BTreeMap;
use tracing::warn;

pub struct DockerRepo {
    docker: Docker,
}

impl DockerRepo {
    pub fn connect() -> anyhow::Result<Self> {
        let docker = Docker::connect_with_unix_defaults()?;
        Ok(Self { docker })
    }

    /// Enumerates all containers plus their compose projects. Projects are
    /// grouped by the `com.docker.compose.project` label and sorted by name.
    pub async fn list_containers(
        &self,
    ) -> anyhow::Result<(Vec<Container>, Vec<ContainerProject>)> {
        let filter = ListContainersOptions {
            all: true,
            ..Default::default()
        };
        let summaries = self.docker.list_containers(Some(filter)).await?;

        let mut containers = Vec::with_capacity(summaries.len());
        let mut by_project: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for c in &summaries {
            let id = c.id.as_ref().cloned().unwrap_or_default();
            let name = c
                .names
                .as_ref()
                .and_then(|n| n.first())
                .map(|n| n.trim_start_matches('/').to_string())
                .unwrap_or_else(|| id.clone());
            let project = c
                .labels
                .as_ref()
                .and_then(|l| l.get("com.docker.compose.project"))
                .cloned()
                .unwrap_or_default();
            let state = c
                .state
                .as_ref()
                .map(|s| ContainerState::from_docker(s.as_ref()))
                .unwrap_or_default();
            if !project.is_empty() {
                by_project.entry(project.clone()).or_default().push(id.clone());
            }
            containers.push(Container {
                id,
                name,
                image: c.image.as_ref().cloned().unwrap_or_default(),
                project,
                state,
            });
        }

        let projects = by_project
            .into_iter()
            .map(|(name, containers)| ContainerProject { name, containers })
            .collect();
        Ok((containers, projects))
    }

    /// One-shot usage sample for every running container in `containers`,
    /// in input order. Containers whose stats call fails are skipped.
    pub async fn container_usages(
        &self,
        containers: &[Container],
    ) -> anyhow::Result<Vec<ContainerUsage>> {
        let samples = containers
            .iter()
            .filter(|c| c.state == ContainerState::Running)
            .map(|c| self.sample_usage(c));
        Ok(join_all(samples).await.into_iter().flatten().collect())
    }

    async fn sample_usage(&self, container: &Container) -> Option<ContainerUsage> {
        // stream=false makes the daemon take the two samples needed for a
        // cpu delta before responding
        let options = StatsOptions {
            stream: false,
            one_shot: false,
            ..Default::default()
        };
        let mut stream = self.docker.stats(&container.id, Some(options));
        match stream.next().await? {
            Ok(s) => stats::usage_from_stats(&s, container),
            Err(e) => {
                warn!("Stats fetch failed for container {}: {}", container.name, e);
                None
            }
        }
    }

    pub async fn info(&self) -> anyhow::Result<DockerInfo> {
        let info = self.docker.info().await?;
        Ok(DockerInfo {
            server_version: info.server_version.unwrap_or_default(),
            operating_system: info.operating_system.unwrap_or_default(),
            kernel_version: info.kernel_version.unwrap_or_default(),
            containers: info.containers.unwrap_or(0).max(0) as u64,
            containers_running: info.containers_running.unwrap_or(0).max(0) as u64,
            images: info.images.unwrap_or(0).max(0) as u64,
            cpus: info.ncpu.unwrap_or(0).max(0) as u64,
            mem_total_bytes: info.mem_total.unwrap_or(0).max(0) as u64,
        })
    }
}
