// Library for tests to access modules

pub mod agent;
pub mod config;
pub mod docker_repo;
pub mod models;
pub mod probes;
pub mod sysinfo_repo;
pub mod upload;
pub mod util;
pub mod version;
