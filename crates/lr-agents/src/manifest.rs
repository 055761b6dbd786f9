//! Runtime-agnostic agent configuration.
//!
//! An [`AgentManifest`] is everything an external agent runtime needs to host one
//! of our agents: prompts, tool names, model, and where to persist sessions.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::InternalAgent;

pub const DEFAULT_MODEL_ID: &str = "gpt-4o";

/// Number of prior responses replayed into each request.
pub const DEFAULT_HISTORY_RESPONSES: usize = 3;

/// Caller-supplied knobs for building an [`AgentManifest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentOptions {
    pub model_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    /// Connection string of the session store, if any
    #[serde(default)]
    pub db_url: Option<String>,
    #[serde(default = "default_true")]
    pub debug_mode: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            user_id: None,
            session_id: None,
            db_url: None,
            debug_mode: true,
        }
    }
}

impl AgentOptions {
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_db_url(mut self, db_url: impl Into<String>) -> Self {
        self.db_url = Some(db_url.into());
        self
    }
}

/// Session storage location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageRef {
    pub table_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentManifest {
    pub agent_id: String,
    pub name: String,
    pub model_id: String,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub description: String,
    pub instructions: String,
    pub additional_context: String,
    pub tools: Vec<String>,
    pub storage: StorageRef,
    pub max_turns: usize,
    pub markdown: bool,
    pub add_datetime_to_instructions: bool,
    pub add_history_to_messages: bool,
    pub num_history_responses: usize,
    pub read_chat_history: bool,
    pub debug_mode: bool,
}

impl AgentManifest {
    pub fn build(agent: &dyn InternalAgent, options: AgentOptions) -> Self {
        let additional_context = options
            .user_id
            .as_deref()
            .map(|user| format!("<context>You are interacting with the user: {}</context>", user))
            .unwrap_or_default();

        Self {
            agent_id: agent.name().to_string(),
            name: agent.display_name().to_string(),
            model_id: options.model_id,
            user_id: options.user_id,
            session_id: options.session_id,
            description: agent.description().to_string(),
            instructions: agent.system_prompt().to_string(),
            additional_context,
            tools: agent.tool_names().iter().map(|t| t.to_string()).collect(),
            storage: StorageRef {
                table_name: agent.storage_table(),
                db_url: options.db_url,
            },
            max_turns: agent.max_turns(),
            markdown: true,
            add_datetime_to_instructions: true,
            add_history_to_messages: true,
            num_history_responses: DEFAULT_HISTORY_RESPONSES,
            read_chat_history: true,
            debug_mode: options.debug_mode,
        }
    }

    /// Assemble the system message a runtime would send, stamped with `now`.
    pub fn system_message<Tz>(&self, now: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let mut sections = vec![self.description.clone(), self.instructions.clone()];
        if self.markdown {
            sections.push("Use markdown to format your answers.".to_string());
        }
        if self.add_datetime_to_instructions {
            sections.push(format!("The current time is {}.", now.format("%Y-%m-%d %H:%M:%S %Z")));
        }
        if !self.additional_context.is_empty() {
            sections.push(self.additional_context.clone());
        }
        sections.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LinkedInResearcherAgent;
    use chrono::Utc;

    #[test]
    fn test_defaults() {
        let manifest = AgentManifest::build(&LinkedInResearcherAgent::new(), AgentOptions::default());
        assert_eq!(manifest.agent_id, "linkedin_researcher");
        assert_eq!(manifest.name, "LinkedIn Researcher");
        assert_eq!(manifest.model_id, "gpt-4o");
        assert_eq!(manifest.additional_context, "");
        assert_eq!(manifest.storage.table_name, "linkedin_researcher_sessions");
        assert_eq!(manifest.num_history_responses, 3);
        assert!(manifest.read_chat_history);
        assert!(manifest.debug_mode);
    }

    #[test]
    fn test_user_context() {
        let options = AgentOptions::default()
            .with_user("alice")
            .with_session("s-1")
            .with_model("gpt-4o-mini")
            .with_db_url("postgresql://localhost/ai");
        let manifest = AgentManifest::build(&LinkedInResearcherAgent::new(), options);
        assert_eq!(
            manifest.additional_context,
            "<context>You are interacting with the user: alice</context>"
        );
        assert_eq!(manifest.session_id.as_deref(), Some("s-1"));
        assert_eq!(manifest.model_id, "gpt-4o-mini");
        assert_eq!(manifest.storage.db_url.as_deref(), Some("postgresql://localhost/ai"));
    }

    #[test]
    fn test_system_message() {
        let manifest = AgentManifest::build(
            &LinkedInResearcherAgent::new(),
            AgentOptions::default().with_user("alice"),
        );
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let message = manifest.system_message(&now);
        assert!(message.starts_with("You are LinkedIn Researcher"));
        assert!(message.contains("The current time is 2024-05-01 09:30:00 UTC."));
        assert!(message.ends_with("</context>"));
    }

    #[test]
    fn test_manifest_serializes() {
        let manifest = AgentManifest::build(&LinkedInResearcherAgent::new(), AgentOptions::default());
        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(value["storage"]["table_name"], "linkedin_researcher_sessions");
        assert!(value["storage"].get("db_url").is_none());
        assert_eq!(value["tools"].as_array().unwrap().len(), 3);
    }
}
