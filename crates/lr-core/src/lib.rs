//! lr-core: Core types and traits for the LinkedIn researcher
//!
//! This crate provides the shared error type and the tool abstraction
//! that every agent-facing capability implements.

pub mod error;
pub mod tool;

pub use error::Error;
pub use tool::{PropertySchema, Tool, ToolDefinition, ToolOutput, ToolParameters, ToolRegistry};

pub type Result<T> = std::result::Result<T, Error>;
