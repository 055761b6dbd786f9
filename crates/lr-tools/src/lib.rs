//! lr-tools: Agent-facing tools for the LinkedIn researcher
//!
//! This crate provides the tools the researcher agent can call:
//! - ContactOut: enrich a LinkedIn profile from its URL or an email address
//!
//! Web search is supplied by the agent runtime and is not implemented here.

pub mod contactout;

pub use contactout::{
    create_contactout_tools, ContactOutClient, ContactOutConfig, EnrichProfileByEmailTool,
    EnrichProfileByUrlTool, EnrichmentError, EnrichmentQuery, LinkedInProfile, API_TOKEN_ENV,
    DEFAULT_BASE_URL,
};
