use std::time::Duration;

use async_trait::async_trait;
use econ_swarm_models::{ModelConfig, SharedContext, ToolRef};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::AgentError;
use crate::prompts::user_prompt;

/// Text-generating collaborator behind every specialist. Mockable for testing.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> &str;

    /// Produce free text for one step of a role.
    ///
    /// `tools` lists what the calling role may use, and `context` is the
    /// current snapshot of the shared context.
    async fn invoke(
        &self,
        instructions: &str,
        tools: &[ToolRef],
        query: &str,
        context: &SharedContext,
    ) -> Result<String, AgentError>;
}

/// A language model backed by the `claude` CLI.
#[derive(Debug, Clone)]
pub struct ClaudeCliModel {
    cli_path: String,
    model: String,
    timeout: Duration,
}

impl ClaudeCliModel {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            cli_path: config.cli_path.clone(),
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run the CLI with a system prompt and user prompt and return stdout.
    pub async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, AgentError> {
        debug!(model = %self.model, "Invoking claude CLI");

        let result = tokio::time::timeout(self.timeout, async {
            Command::new(&self.cli_path)
                .args([
                    "-p",
                    user_prompt,
                    "--system-prompt",
                    system_prompt,
                    "--model",
                    &self.model,
                    "--output-format",
                    "text",
                ])
                .kill_on_drop(true)
                .output()
                .await
        })
        .await
        .map_err(|_| {
            AgentError::UpstreamUnavailable(format!(
                "claude timed out after {} seconds",
                self.timeout.as_secs()
            ))
        })?
        .map_err(|e| AgentError::UpstreamUnavailable(format!("Failed to spawn claude: {e}")))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            warn!(status = %result.status, stderr = %stderr, "Claude CLI failed");
            return Err(AgentError::UpstreamUnavailable(format!(
                "claude exited {}: {}",
                result.status, stderr
            )));
        }

        let stdout = String::from_utf8_lossy(&result.stdout).trim().to_string();
        if stdout.is_empty() {
            return Err(AgentError::UpstreamUnavailable(
                "Claude returned empty response".to_string(),
            ));
        }

        Ok(stdout)
    }
}

#[async_trait]
impl LanguageModel for ClaudeCliModel {
    fn name(&self) -> &str {
        "claude-cli"
    }

    async fn invoke(
        &self,
        instructions: &str,
        tools: &[ToolRef],
        query: &str,
        context: &SharedContext,
    ) -> Result<String, AgentError> {
        let prompt = user_prompt(tools, query, context)?;
        self.complete(instructions, &prompt).await
    }
}

/// Check if the given CLI binary is available on the system.
pub async fn check_cli_available(cli_path: &str) -> bool {
    match Command::new(cli_path).arg("--version").output().await {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}
