// Domain models

mod container;
mod snapshot;
mod upload;
mod usage;

pub use container::{Container, ContainerProject, ContainerState, DockerInfo, LogTrackItem};
pub use snapshot::{Cache, Snapshot};
pub use upload::UploadData;
pub use usage::{ContainerUsage, CpuUsageRaw, DiskUsageRaw, NetworkUsage};
