//! econ-swarm - sequential multi-agent economic analysis
//!
//! A coordinator hands each query to a data collector, a company analyst and
//! a risk assessor in turn. The stages share one write-once context, and the
//! coordinator composes the final recommendation from it.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use econ_swarm::models::SwarmConfig;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let orchestrator = econ_swarm::build_orchestrator(&SwarmConfig::default())?;
//! let query = econ_swarm::analyze_companies_query(&["AAPL", "JPM"]);
//! let report = econ_swarm::analyze(&orchestrator, &query).await?;
//! println!("{}", report.response);
//! # Ok(())
//! # }
//! ```

pub use econ_swarm_agents as agents;
pub use econ_swarm_data as data;
pub use econ_swarm_models as models;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use econ_swarm_agents::{AgentFactory, ClaudeCliModel, Orchestrator, PipelineFailure};
use econ_swarm_data::build_source;
use econ_swarm_models::{AnalysisReport, Portfolio, SwarmConfig};

/// Load a TOML configuration file. Missing sections take their defaults.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<SwarmConfig> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// Load holdings from a TOML file of `[[positions]]` tables.
pub fn load_portfolio(path: impl AsRef<Path>) -> anyhow::Result<Portfolio> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read portfolio: {}", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("Failed to parse portfolio: {}", path.display()))
}

/// Build an Orchestrator backed by the Claude CLI and the configured data
/// source.
pub fn build_orchestrator(config: &SwarmConfig) -> anyhow::Result<Orchestrator> {
    let data = build_source(&config.data).context("Failed to build data source")?;
    let model = Arc::new(ClaudeCliModel::new(&config.model));
    let factory = AgentFactory::new(config, model, data);
    Orchestrator::new(&factory).context("Failed to build pipeline")
}

/// Run one query through the pipeline.
pub async fn analyze(
    orchestrator: &Orchestrator,
    query: &str,
) -> Result<AnalysisReport, PipelineFailure> {
    orchestrator.run(query).await
}

/// Canned query analysing the named companies against current conditions.
///
/// Tickers are `$`-prefixed so that any symbol is recognised as a company.
pub fn analyze_companies_query<S: AsRef<str>>(tickers: &[S]) -> String {
    let tickers: Vec<String> = tickers
        .iter()
        .map(|t| t.as_ref().trim().to_ascii_uppercase())
        .filter(|t| !t.is_empty())
        .map(|t| format!("${t}"))
        .collect();

    format!(
        "Analyze the economic impact on {}. Collect GDP growth, the unemployment rate \
         and the federal funds rate, assess each company's exposure to these conditions, \
         and give risk-adjusted recommendations.",
        tickers.join(", ")
    )
}

/// Canned query assessing market-wide risk from current indicators.
pub fn market_risk_query() -> String {
    "Assess overall market risk. Collect GDP growth, the unemployment rate and the \
     federal funds rate, identify systemic risks, and recommend defensive actions."
        .to_string()
}
