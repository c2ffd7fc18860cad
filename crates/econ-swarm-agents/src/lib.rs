pub mod error;
pub mod factory;
pub mod market_analysis;
pub mod model;
pub mod orchestrator;
pub mod portfolio_risk;
pub mod prompts;
pub mod specialist;
pub mod tools;

pub mod test_support;

pub use error::{AgentError, PipelineFailure};
pub use factory::{AgentFactory, RoleProfile};
pub use market_analysis::{analyze_company_correlation, company_report, CompanyReport};
pub use model::{check_cli_available, ClaudeCliModel, LanguageModel};
pub use orchestrator::{compose_recommendation, Orchestrator};
pub use portfolio_risk::{portfolio_report, PortfolioRiskReport, StressScenario};
pub use specialist::{PartialResult, Specialist, SpecialistAgent};
