use econ_swarm_models::{AgentRole, CompanyExposure, SharedContext, ToolRef};

pub fn data_collector_instructions() -> String {
    "You are the data collection specialist of an economic analysis team. The latest \
     values of GDP growth, the unemployment rate and the federal funds rate have already \
     been written to `shared_context`.\n\n\
     ## TASK\n\n\
     Summarize the indicators in two or three sentences of plain text:\n\
     - State each value with its unit\n\
     - Note any reading that signals economic stress\n\
     - If `data_source_status` is MOCK, say that the values are placeholders\n\n\
     Respond with plain text only."
        .to_string()
}

pub fn analyst_instructions() -> String {
    "You are the company analysis specialist of an economic analysis team. Use the \
     indicators in `shared_context` and the company's exposure profile (if one is \
     listed) to assess how current conditions affect the company.\n\n\
     ## INTERPRETATION RULES\n\n\
     - High interest rate sensitivity: rising rates compress valuations\n\
     - Positive interest rate sensitivity: the company benefits from higher rates\n\
     - High debt to equity: refinancing risk when rates are elevated\n\
     - Large international revenue share: currency and global demand risk\n\n\
     Respond with two or three sentences of plain text about the one company named."
        .to_string()
}

pub fn risk_assessor_instructions() -> String {
    "You are the risk assessment specialist of an economic analysis team. A computed \
     `risk_assessment` (risk level, score, factors and systemic risk) is in \
     `shared_context`.\n\n\
     ## TASK\n\n\
     Write short risk notes for an investor:\n\
     - Explain the main drivers behind the risk level\n\
     - Name the companies most exposed\n\
     - Suggest concrete mitigation steps\n\n\
     Respond with plain text only, at most one paragraph."
        .to_string()
}

/// Built-in instructions for a role. The coordinator composes its answer
/// without the model and has none.
pub fn default_instructions(role: AgentRole) -> Option<String> {
    match role {
        AgentRole::Coordinator => None,
        AgentRole::DataCollector => Some(data_collector_instructions()),
        AgentRole::Analyst => Some(analyst_instructions()),
        AgentRole::RiskAssessor => Some(risk_assessor_instructions()),
    }
}

/// User prompt: the query, the tools the role may use and the shared context.
pub fn user_prompt(
    tools: &[ToolRef],
    query: &str,
    context: &SharedContext,
) -> Result<String, serde_json::Error> {
    let tool_names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
    let input = serde_json::json!({
        "query": query,
        "tools": tool_names,
        "shared_context": context,
    });
    serde_json::to_string_pretty(&input)
}

/// Per-company query handed to the analyst's model.
///
/// The first line always reads `Company: <TICKER>`.
pub fn company_impact_query(
    query: &str,
    ticker: &str,
    exposure: Option<&CompanyExposure>,
) -> Result<String, serde_json::Error> {
    let profile = match exposure {
        Some(exposure) => serde_json::to_string(exposure)?,
        None => "no exposure profile on file".to_string(),
    };
    Ok(format!(
        "Company: {ticker}\n\
         Exposure profile: {profile}\n\n\
         Original question: {query}\n\n\
         Assess the impact of current economic conditions on {ticker}."
    ))
}
