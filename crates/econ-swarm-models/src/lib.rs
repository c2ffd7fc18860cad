pub mod config;
pub mod context;
pub mod economics;
pub mod market;
pub mod pipeline;
pub mod portfolio;
pub mod role;

pub use config::{DataConfig, ModelConfig, PipelineConfig, RoleConfig, SwarmConfig};
pub use context::{
    ContextField, ContextStore, ContextSummary, DataSourceStatus, SharedContext, StateConflict,
};
pub use economics::{
    CompanyExposure, Indicator, IndicatorReading, RiskAssessment, RiskLevel, Sensitivity,
    SystemicLevel, SystemicRisk,
};
pub use market::{CompanyFinancials, MarketIndicator, Trend};
pub use pipeline::{AnalysisReport, ExecutionDetails, PipelineEvent, PipelineState};
pub use portfolio::{Concentration, Portfolio, PortfolioSummary, Position, PositionSummary};
pub use role::{AgentRole, ToolRef, UnknownRole};
