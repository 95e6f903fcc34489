// Shared test helpers

use hostwatch::config::AgentConfig;

pub const VALID_CONFIG: &str = r#"
[api]
host = "collector.example.com"
token = "secret-token"

[snapshot]
mode = "best-effort"

[upload]
max_file_size = "50MiB"
"#;

pub fn test_config() -> AgentConfig {
    AgentConfig::load_from_str(VALID_CONFIG).expect("load_from_str")
}

#[allow(dead_code)]
pub fn strict_config() -> AgentConfig {
    let s = VALID_CONFIG.replace("mode = \"best-effort\"", "mode = \"strict\"");
    AgentConfig::load_from_str(&s).expect("load_from_str")
}
