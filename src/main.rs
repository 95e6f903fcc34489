use anyhow::Result;
use hostwatch::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    tracing::info!(version = version::VERSION, "{} starting", version::NAME);

    let config = config::AgentConfig::load()?;
    let sysinfo_repo = sysinfo_repo::SysinfoRepo::new();
    let docker_repo = docker_repo::DockerRepo::connect()?;
    let agent = agent::Agent::new(config, probes::LiveProbes::new(sysinfo_repo, docker_repo));

    agent.build_snapshot().await?;

    if let Some(snapshot) = agent.snapshot().await {
        let cache = agent.cache().await;
        tracing::info!(
            cpu_percent = snapshot.cpu.total_percent,
            disks = snapshot.disks.len(),
            containers = cache.containers.len(),
            projects = cache.projects.len(),
            container_usages = snapshot.container_usages.len(),
            docker_version = %cache.docker_info.server_version,
            "initial snapshot"
        );
    }

    Ok(())
}
