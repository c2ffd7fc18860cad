use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use econ_swarm::models::SwarmConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "econ-swarm", about = "Sequential multi-agent economic analysis")]
struct Cli {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Query to analyze. Read from stdin when no query option is given.
    #[arg(short, long, conflicts_with_all = ["companies", "market_risk"])]
    query: Option<String>,

    /// Analyze the impact of current conditions on these tickers
    #[arg(long, value_delimiter = ',', conflicts_with = "market_risk")]
    companies: Vec<String>,

    /// Assess overall market risk
    #[arg(long)]
    market_risk: bool,

    /// Print risk metrics for the holdings in this TOML file and exit
    #[arg(long, conflicts_with_all = ["query", "companies", "market_risk", "company"])]
    portfolio: Option<PathBuf>,

    /// Print fundamentals and indicator correlations for one company and exit
    #[arg(long, conflicts_with_all = ["query", "companies", "market_risk"])]
    company: Option<String>,

    /// Use placeholder indicators instead of live FRED data
    #[arg(long)]
    mock_data: bool,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    fn query(&self) -> Result<String> {
        if let Some(query) = &self.query {
            return Ok(query.clone());
        }
        if !self.companies.is_empty() {
            return Ok(econ_swarm::analyze_companies_query(&self.companies));
        }
        if self.market_risk {
            return Ok(econ_swarm::market_risk_query());
        }

        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        Ok(buf.trim().to_string())
    }
}

fn init_tracing(json: bool) {
    // Respects RUST_LOG
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    if let Some(path) = &cli.portfolio {
        let portfolio = econ_swarm::load_portfolio(path)?;
        info!(positions = portfolio.positions.len(), "Portfolio loaded");
        let report = econ_swarm::agents::portfolio_report(&portfolio);
        return print_json(&serde_json::to_value(&report)?, cli.pretty);
    }
    if let Some(ticker) = &cli.company {
        let report = econ_swarm::agents::company_report(ticker)?;
        return print_json(&serde_json::to_value(&report)?, cli.pretty);
    }

    let mut config = match &cli.config {
        Some(path) => econ_swarm::load_config(path)?,
        None => SwarmConfig::default(),
    };
    if cli.mock_data {
        config.data.use_live = false;
    }
    if config.data.api_key.is_none() {
        config.data.api_key = std::env::var("FRED_API_KEY").ok();
    }

    let query = cli.query()?;
    if query.is_empty() {
        bail!("No query given");
    }

    let orchestrator = econ_swarm::build_orchestrator(&config)?;

    let output = match econ_swarm::analyze(&orchestrator, &query).await {
        Ok(report) => {
            info!(run_id = %report.run_id, live = report.using_live_data, "Report ready");
            serde_json::to_value(&report)?
        }
        Err(failure) => {
            let output = serde_json::json!({
                "run_id": failure.run_id,
                "status": failure.state(),
                "failed_stage": failure.failed_stage,
                "role": failure.role,
                "error": failure.error.to_string(),
                "context": failure.context,
            });
            print_json(&output, cli.pretty)?;
            bail!("Analysis failed: {failure}");
        }
    };

    print_json(&output, cli.pretty)
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{output}");
    Ok(())
}
