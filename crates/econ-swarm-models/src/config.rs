use serde::{Deserialize, Serialize};

use crate::role::AgentRole;

/// Top-level configuration, passed explicitly into the agent factory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SwarmConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Configuration for the language-model client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    /// Executable invoked for completions.
    #[serde(default = "default_cli_path")]
    pub cli_path: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Per-call timeout enforced by the client, not the orchestrator.
    #[serde(default = "default_model_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            cli_path: default_cli_path(),
            model: default_model(),
            timeout_seconds: default_model_timeout(),
        }
    }
}

/// Configuration for the economic-data source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    /// Query FRED. When false every indicator comes from the mock source.
    #[serde(default = "default_true")]
    pub use_live: bool,
    #[serde(default = "default_fred_base_url")]
    pub fred_base_url: String,
    /// FRED API key. Usually injected from the environment by the binary.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Maximum number of cached indicator values.
    #[serde(default = "default_cache_capacity")]
    pub cache_max_capacity: u64,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            use_live: true,
            fred_base_url: default_fred_base_url(),
            api_key: None,
            request_timeout_seconds: default_request_timeout(),
            cache_max_capacity: default_cache_capacity(),
            cache_ttl_seconds: default_cache_ttl(),
        }
    }
}

/// Which roles take part and how they are instructed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    #[serde(default = "default_roles")]
    pub roles: Vec<RoleConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            roles: default_roles(),
        }
    }
}

impl PipelineConfig {
    pub fn role(&self, role: AgentRole) -> Option<&RoleConfig> {
        self.roles.iter().find(|r| r.role == role)
    }
}

/// Configuration for a single role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoleConfig {
    pub role: AgentRole,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Replaces the built-in instructions for this role.
    #[serde(default)]
    pub instructions: Option<String>,
}

fn default_cli_path() -> String {
    "claude".to_string()
}
fn default_model() -> String {
    "claude-3-5-haiku-latest".to_string()
}
fn default_model_timeout() -> u64 {
    60
}
fn default_fred_base_url() -> String {
    "https://api.stlouisfed.org/fred".to_string()
}
fn default_request_timeout() -> u64 {
    10
}
fn default_cache_capacity() -> u64 {
    256
}
fn default_cache_ttl() -> u64 {
    3600
}
fn default_true() -> bool {
    true
}
fn default_roles() -> Vec<RoleConfig> {
    AgentRole::ALL
        .iter()
        .map(|&role| RoleConfig {
            role,
            enabled: true,
            instructions: None,
        })
        .collect()
}
