// Process raw Docker stats API response into ContainerUsage.

use crate::models::{Container, ContainerUsage};
use bollard::models::ContainerStatsResponse;

/// Converts a raw Docker stats response into our per-container usage record.
/// Returns None when the response lacks the cpu samples needed for a delta.
pub(crate) fn usage_from_stats(
    s: &ContainerStatsResponse,
    container: &Container,
) -> Option<ContainerUsage> {
    let cpu_stats = s.cpu_stats.as_ref()?;
    let precpu_stats = s.precpu_stats.as_ref()?;

    let cpu_usage = cpu_stats.cpu_usage.as_ref()?;
    let precpu_usage = precpu_stats.cpu_usage.as_ref()?;

    let cpu_delta =
        cpu_usage.total_usage.unwrap_or(0) as i64 - precpu_usage.total_usage.unwrap_or(0) as i64;
    let system_delta = cpu_stats.system_cpu_usage.unwrap_or(0) as i64
        - precpu_stats.system_cpu_usage.unwrap_or(0) as i64;
    let online = cpu_stats.online_cpus.unwrap_or(1) as f64;
    let cpu_percent = if system_delta > 0 && online > 0.0 {
        (cpu_delta as f64 / system_delta as f64) * online * 100.0
    } else {
        0.0
    };

    let memory_usage_bytes = s.memory_stats.as_ref().and_then(|m| m.usage).unwrap_or(0);
    let memory_limit_bytes = s.memory_stats.as_ref().and_then(|m| m.limit).unwrap_or(0);

    let (network_rx_bytes, network_tx_bytes) =
        s.networks.as_ref().map_or((0u64, 0u64), |n| {
            let mut rx = 0u64;
            let mut tx = 0u64;
            for v in n.values() {
                rx += v.rx_bytes.unwrap_or(0);
                tx += v.tx_bytes.unwrap_or(0);
            }
            (rx, tx)
        });

    let (block_read_bytes, block_write_bytes) = s
        .blkio_stats
        .as_ref()
        .and_then(|b| b.io_service_bytes_recursive.as_ref())
        .map_or((0u64, 0u64), |b| {
            let mut read = 0u64;
            let mut write = 0u64;
            for e in b {
                if e.op
                    .as_ref()
                    .is_some_and(|op| op.eq_ignore_ascii_case("read"))
                {
                    read += e.value.unwrap_or(0);
                } else if e
                    .op
                    .as_ref()
                    .is_some_and(|op| op.eq_ignore_ascii_case("write"))
                {
                    write += e.value.unwrap_or(0);
                }
            }
            (read, write)
        });

    let pids = s.pids_stats.as_ref().and_then(|p| p.current).unwrap_or(0);

    Some(ContainerUsage {
        id: container.id.clone(),
        name: container.name.clone(),
        project: container.project.clone(),
        cpu_percent,
        memory_usage_bytes,
        memory_limit_bytes,
        network_rx_bytes,
        network_tx_bytes,
        block_read_bytes,
        block_write_bytes,
        pids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContainerState;
    use bollard::models::{
        ContainerBlkioStatEntry, ContainerBlkioStats, ContainerCpuStats, ContainerCpuUsage,
        ContainerMemoryStats, ContainerNetworkStats, ContainerPidsStats, ContainerStatsResponse,
    };
    use std::collections::HashMap;

    fn container() -> Container {
        Container {
            id: "abc123".into(),
            name: "web".into(),
            project: "shop".into(),
            image: "nginx".into(),
            state: ContainerState::Running,
        }
    }

    fn minimal_cpu_stats(total_usage: u64, system_cpu_usage: u64) -> ContainerCpuStats {
        ContainerCpuStats {
            cpu_usage: Some(ContainerCpuUsage {
                total_usage: Some(total_usage),
                ..Default::default()
            }),
            system_cpu_usage: Some(system_cpu_usage),
            online_cpus: Some(2),
            throttling_data: None,
        }
    }

    #[test]
    fn returns_none_when_cpu_stats_missing() {
        let s = ContainerStatsResponse {
            cpu_stats: None,
            precpu_stats: Some(minimal_cpu_stats(0, 0)),
            ..Default::default()
        };
        assert!(usage_from_stats(&s, &container()).is_none());
    }

    #[test]
    fn returns_none_when_precpu_stats_missing() {
        let s = ContainerStatsResponse {
            cpu_stats: Some(minimal_cpu_stats(100, 1000)),
            precpu_stats: None,
            ..Default::default()
        };
        assert!(usage_from_stats(&s, &container()).is_none());
    }

    #[test]
    fn computes_cpu_memory_network_and_blkio() {
        let s = ContainerStatsResponse {
            cpu_stats: Some(minimal_cpu_stats(100_000_000, 1_000_000_000)),
            precpu_stats: Some(minimal_cpu_stats(50_000_000, 500_000_000)),
            memory_stats: Some(ContainerMemoryStats {
                usage: Some(256 * 1024 * 1024),
                limit: Some(512 * 1024 * 1024),
                ..Default::default()
            }),
            networks: Some({
                let mut m = HashMap::new();
                m.insert(
                    "eth0".to_string(),
                    ContainerNetworkStats {
                        rx_bytes: Some(1000),
                        tx_bytes: Some(2000),
                        ..Default::default()
                    },
                );
                m
            }),
            pids_stats: Some(ContainerPidsStats {
                current: Some(5),
                ..Default::default()
            }),
            blkio_stats: Some(ContainerBlkioStats {
                io_service_bytes_recursive: Some(vec![
                    ContainerBlkioStatEntry {
                        op: Some("read".to_string()),
                        value: Some(100),
                        ..Default::default()
                    },
                    ContainerBlkioStatEntry {
                        op: Some("write".to_string()),
                        value: Some(200),
                        ..Default::default()
                    },
                ]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let out = usage_from_stats(&s, &container()).unwrap();
        assert_eq!(out.id, "abc123");
        assert_eq!(out.name, "web");
        assert_eq!(out.project, "shop");
        assert!((out.cpu_percent - 20.0).abs() < 0.01);
        assert_eq!(out.memory_usage_bytes, 256 * 1024 * 1024);
        assert_eq!(out.memory_limit_bytes, 512 * 1024 * 1024);
        assert_eq!(out.network_rx_bytes, 1000);
        assert_eq!(out.network_tx_bytes, 2000);
        assert_eq!(out.pids, 5);
        assert_eq!(out.block_read_bytes, 100);
        assert_eq!(out.block_write_bytes, 200);
    }

    #[test]
    fn zero_system_delta_yields_zero_cpu_percent() {
        let s = ContainerStatsResponse {
            cpu_stats: Some(minimal_cpu_stats(100, 500)),
            precpu_stats: Some(minimal_cpu_stats(50, 500)),
            ..Default::default()
        };
        let out = usage_from_stats(&s, &container()).unwrap();
        assert_eq!(out.cpu_percent, 0.0);
    }
}
