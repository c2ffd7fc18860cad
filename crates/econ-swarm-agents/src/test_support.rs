//! Test support: a scripted language model that answers without the CLI.
//!
//! Replies are built from the role and the shared context the model is
//! shown, so runs are reproducible. The calling role is recognised by the
//! tool list each role passes.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use econ_swarm_models::{AgentRole, SharedContext, ToolRef};

use crate::error::AgentError;
use crate::model::LanguageModel;

/// One recorded model call.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub role: Option<AgentRole>,
    pub query: String,
}

/// A deterministic stand-in for the language model.
pub struct ScriptedModel {
    failing: HashSet<AgentRole>,
    numbered: bool,
    counter: AtomicUsize,
    calls: Mutex<Vec<Invocation>>,
}

impl Default for ScriptedModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self {
            failing: HashSet::new(),
            numbered: false,
            counter: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Calls from `role` fail with `UpstreamUnavailable`.
    pub fn failing_at(mut self, role: AgentRole) -> Self {
        self.failing.insert(role);
        self
    }

    /// Append a call counter to each reply so free text differs between
    /// otherwise identical runs.
    pub fn numbered(mut self) -> Self {
        self.numbered = true;
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn calls_for(&self, role: AgentRole) -> usize {
        self.invocations()
            .iter()
            .filter(|i| i.role == Some(role))
            .count()
    }

    /// Roles in the order they called the model, consecutive repeats collapsed.
    pub fn role_order(&self) -> Vec<AgentRole> {
        let mut order: Vec<AgentRole> = Vec::new();
        for role in self.invocations().into_iter().filter_map(|i| i.role) {
            if order.last() != Some(&role) {
                order.push(role);
            }
        }
        order
    }
}

/// Recognise the calling role by the tools it was granted.
fn role_for_tools(tools: &[ToolRef]) -> Option<AgentRole> {
    AgentRole::ALL.into_iter().find(|role| {
        role.tools().len() == tools.len() && role.tools().iter().all(|t| tools.contains(t))
    })
}

fn reply(role: Option<AgentRole>, query: &str, context: &SharedContext) -> String {
    match role {
        Some(AgentRole::DataCollector) => {
            let fmt = |v: Option<rust_decimal::Decimal>| {
                v.map_or_else(|| "n/a".to_string(), |v| v.to_string())
            };
            format!(
                "GDP growth {}%, unemployment {}%, interest rate {}%.",
                fmt(context.gdp),
                fmt(context.unemployment_rate),
                fmt(context.interest_rate)
            )
        }
        Some(AgentRole::Analyst) => {
            let ticker = query
                .lines()
                .find_map(|l| l.strip_prefix("Company: "))
                .unwrap_or("unknown");
            let rate = context
                .interest_rate
                .map_or_else(|| "n/a".to_string(), |v| v.to_string());
            format!("{ticker} is exposed to a {rate}% policy rate.")
        }
        Some(AgentRole::RiskAssessor) => match &context.risk_assessment {
            Some(a) => format!("Overall risk is {} with score {}.", a.risk_level, a.risk_score),
            None => "Risk could not be scored.".to_string(),
        },
        Some(AgentRole::Coordinator) | None => "Acknowledged.".to_string(),
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn invoke(
        &self,
        _instructions: &str,
        tools: &[ToolRef],
        query: &str,
        context: &SharedContext,
    ) -> Result<String, AgentError> {
        let role = role_for_tools(tools);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(Invocation {
                role,
                query: query.to_string(),
            });
        }

        if let Some(role) = role.filter(|r| self.failing.contains(r)) {
            return Err(AgentError::UpstreamUnavailable(format!(
                "scripted outage for {role}"
            )));
        }

        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let text = reply(role, query, context);
        Ok(if self.numbered {
            format!("{text} (call {n})")
        } else {
            text
        })
    }
}
