use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use econ_swarm_data::EconomicDataSource;
use econ_swarm_models::{AgentRole, SwarmConfig, ToolRef};
use tracing::{debug, warn};

use crate::error::AgentError;
use crate::model::LanguageModel;
use crate::prompts::default_instructions;
use crate::specialist::Specialist;

/// Immutable description of a role: its instructions and permitted tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleProfile {
    pub role: AgentRole,
    /// `None` for roles that never prompt the model.
    pub instructions: Option<String>,
    pub tools: BTreeSet<ToolRef>,
}

impl RoleProfile {
    /// An override replaces the built-in instructions. The coordinator never
    /// prompts the model, so an override for it is dropped.
    pub fn new(role: AgentRole, instructions: Option<&str>) -> Self {
        let instructions = match role {
            AgentRole::Coordinator => {
                if instructions.is_some() {
                    warn!(role = %role, "Instructions override ignored, role does not use the model");
                }
                None
            }
            _ => instructions
                .map(str::to_string)
                .or_else(|| default_instructions(role)),
        };
        Self {
            role,
            instructions,
            tools: role.tools().iter().copied().collect(),
        }
    }

    pub fn allows(&self, tool: ToolRef) -> bool {
        self.tools.contains(&tool)
    }

    pub fn tool_list(&self) -> Vec<ToolRef> {
        self.tools.iter().copied().collect()
    }
}

/// Builds specialists bound to their role profile and collaborators.
pub struct AgentFactory {
    profiles: BTreeMap<AgentRole, Arc<RoleProfile>>,
    model: Arc<dyn LanguageModel>,
    data: Arc<dyn EconomicDataSource>,
}

impl AgentFactory {
    /// Profiles are built once here for every enabled role.
    pub fn new(
        config: &SwarmConfig,
        model: Arc<dyn LanguageModel>,
        data: Arc<dyn EconomicDataSource>,
    ) -> Self {
        let profiles = AgentRole::ALL
            .iter()
            .filter_map(|&role| {
                let role_config = config.pipeline.role(role)?;
                if !role_config.enabled {
                    debug!(role = %role, "Role disabled in config");
                    return None;
                }
                let profile = RoleProfile::new(role, role_config.instructions.as_deref());
                Some((role, Arc::new(profile)))
            })
            .collect();

        Self {
            profiles,
            model,
            data,
        }
    }

    pub fn profile(&self, role: AgentRole) -> Option<&RoleProfile> {
        self.profiles.get(&role).map(|p| p.as_ref())
    }

    pub fn create(&self, role: AgentRole) -> Result<Specialist, AgentError> {
        let profile = self.profiles.get(&role).ok_or_else(|| {
            AgentError::Configuration(format!("role {role} is not enabled in the pipeline"))
        })?;

        // Only roles granted the retrieval tool get a handle on the data source.
        let data = profile
            .allows(ToolRef::EconomicIndicator)
            .then(|| Arc::clone(&self.data));

        Ok(Specialist::new(
            Arc::clone(profile),
            Arc::clone(&self.model),
            data,
        ))
    }

    pub fn create_by_name(&self, name: &str) -> Result<Specialist, AgentError> {
        let role: AgentRole = name
            .parse()
            .map_err(|e: econ_swarm_models::UnknownRole| AgentError::Configuration(e.to_string()))?;
        self.create(role)
    }
}
