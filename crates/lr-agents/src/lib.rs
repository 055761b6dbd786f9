//! Agent definitions for the LinkedIn researcher.
//!
//! This crate provides:
//! - `InternalAgent` trait for defining agent behavior
//! - The built-in LinkedIn researcher agent
//! - `AgentManifest`, the configuration record handed to an agent runtime

mod linkedin_researcher;
mod manifest;

pub use linkedin_researcher::LinkedInResearcherAgent;
pub use manifest::{
    AgentManifest, AgentOptions, StorageRef, DEFAULT_HISTORY_RESPONSES, DEFAULT_MODEL_ID,
};

use lr_core::ToolRegistry;

/// Trait for internal agents.
///
/// Internal agents are declarative: a system prompt, a description, and the
/// names of the tools they need. Running them is the runtime's job.
pub trait InternalAgent: Send + Sync {
    /// Get the agent identifier (e.g., "linkedin_researcher")
    fn name(&self) -> &str;

    /// Human-readable name shown in the UI
    fn display_name(&self) -> &str {
        self.name()
    }

    /// Get the agent description
    fn description(&self) -> &str;

    /// Get the system prompt for this agent
    fn system_prompt(&self) -> &str;

    /// Get the tool names this agent needs
    fn tool_names(&self) -> &[&str];

    /// Get the default max iterations for the agentic loop
    fn max_turns(&self) -> usize {
        20
    }

    /// Table the runtime stores this agent's sessions in.
    fn storage_table(&self) -> String {
        format!("{}_sessions", self.name())
    }
}

/// Tool names an agent needs that `registry` does not provide.
///
/// These must be supplied by the runtime (web search, for instance).
pub fn missing_tools<'a>(agent: &'a dyn InternalAgent, registry: &ToolRegistry) -> Vec<&'a str> {
    agent
        .tool_names()
        .iter()
        .copied()
        .filter(|name| registry.get(name).is_none())
        .collect()
}

/// All built-in agent types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentType {
    LinkedInResearcher,
}

impl AgentType {
    pub fn all() -> Vec<Self> {
        vec![Self::LinkedInResearcher]
    }

    /// Get the agent id.
    pub fn id(&self) -> &'static str {
        match self {
            Self::LinkedInResearcher => "linkedin_researcher",
        }
    }

    /// Create the internal agent instance.
    pub fn create(&self) -> Box<dyn InternalAgent> {
        match self {
            Self::LinkedInResearcher => Box::new(LinkedInResearcherAgent::new()),
        }
    }

    /// Parse an id into an agent type.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "linkedin_researcher" | "linkedin-researcher" => Some(Self::LinkedInResearcher),
            _ => None,
        }
    }
}

/// Ids of every available agent.
pub fn available_agents() -> Vec<&'static str> {
    AgentType::all().iter().map(|t| t.id()).collect()
}

/// Build the runtime configuration for `agent_type`.
pub fn get_agent(agent_type: AgentType, options: AgentOptions) -> AgentManifest {
    AgentManifest::build(agent_type.create().as_ref(), options)
}
