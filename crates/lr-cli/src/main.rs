use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lr_agents::{available_agents, get_agent, missing_tools, AgentType};
use lr_core::ToolRegistry;
use lr_tools::{create_contactout_tools, ContactOutClient, EnrichmentQuery};

mod config;
mod setup;

use config::Config;

/// Log level for tracing output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Most verbose: everything including HTTP client internals
    Trace,
    /// Verbose: outgoing requests and tool execution
    Debug,
    /// Standard: high-level flow
    Info,
    /// Quiet: only warnings and errors (enrichment failures are warnings)
    Warn,
    /// Minimal: only errors
    Error,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Parser)]
#[command(name = "lr")]
#[command(author, version, about = "LinkedIn researcher: ContactOut profile enrichment for LLM agents", long_about = None)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Enable debug logging (shorthand for --log-level debug)
    #[arg(short, long)]
    pub debug: bool,

    /// Write logs to file (JSON-lines format)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// ContactOut API root (overrides config)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich a regular LinkedIn profile URL
    EnrichUrl {
        /// e.g. https://www.linkedin.com/in/janedoe
        linkedin_url: String,
    },
    /// Find and enrich the LinkedIn profile behind an email address
    EnrichEmail { email: String },
    /// Invoke a tool by name with JSON arguments, exactly as an agent would
    Call {
        /// Tool name (see `lr tools`)
        tool: String,
        /// Tool arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },
    /// Print tool definitions as JSON
    Tools,
    /// List available agents
    Agents,
    /// Print the runtime configuration of an agent as JSON
    Agent {
        /// Agent id (defaults to config)
        #[arg(short = 'A', long)]
        agent: Option<String>,
        /// User the agent is talking to
        #[arg(long)]
        user_id: Option<String>,
        /// Session to resume
        #[arg(long)]
        session_id: Option<String>,
        /// Model override
        #[arg(short, long)]
        model: Option<String>,
        /// Print the assembled system message instead of the JSON record
        #[arg(long)]
        system_message: bool,
    },
    /// Show current configuration
    Config,
    /// Initialize the configuration file in ~/.config/lr
    Setup,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Resolve log level: --debug overrides --log-level
    let log_level = if cli.debug {
        LogLevel::Debug
    } else {
        cli.log_level
    };

    // Set up logging
    let filter = EnvFilter::new(log_level.as_filter());

    if let Some(log_path) = &cli.log_file {
        // Log file specified: write JSON to file
        let file = std::fs::File::create(log_path)
            .with_context(|| format!("Failed to create log file: {:?}", log_path))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::sync::Mutex::new(file)))
            .init();
    } else {
        // Write to stderr so stdout stays machine-readable
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match &cli.command {
        Commands::Setup => setup::run(),
        Commands::EnrichUrl { linkedin_url } => {
            let config = load_config(&cli)?;
            enrich(&config, EnrichmentQuery::ByUrl(linkedin_url.clone())).await
        }
        Commands::EnrichEmail { email } => {
            let config = load_config(&cli)?;
            enrich(&config, EnrichmentQuery::ByEmail(email.clone())).await
        }
        Commands::Call { tool, args } => call_tool(&load_config(&cli)?, tool, args).await,
        Commands::Tools => list_tools(&load_config(&cli)?),
        Commands::Agents => list_agents(),
        Commands::Agent {
            agent,
            user_id,
            session_id,
            model,
            system_message,
        } => {
            let config = load_config(&cli)?;
            let agent_id = agent.as_deref().unwrap_or(&config.agent.default_agent);
            let mut options = config.agent_options();
            options.user_id = user_id.clone();
            options.session_id = session_id.clone();
            if let Some(model) = model {
                options.model_id = model.clone();
            }
            show_agent(&config, agent_id, options, *system_message)
        }
        Commands::Config => show_config(&load_config(&cli)?),
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load()?;
    apply_overrides(&mut config, cli);
    Ok(config)
}

/// CLI flags take precedence over file and environment.
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(base_url) = &cli.base_url {
        config.contactout.base_url = base_url.clone();
    }
    if let Some(timeout) = cli.timeout_secs {
        config.contactout.timeout_secs = timeout;
    }
}

/// Build the registry of tools this binary provides.
fn build_tools_registry(config: &Config) -> ToolRegistry {
    let contactout = config.contactout_config();
    if !contactout.has_token() {
        tracing::warn!("CONTACTOUT_API_TOKEN is not set; enrichment tools will report a configuration error");
    }

    let mut registry = ToolRegistry::new();
    registry.register_all(create_contactout_tools(contactout));
    registry
}

/// Run one lookup directly. The mapping goes to stdout; failures also exit non-zero.
async fn enrich(config: &Config, query: EnrichmentQuery) -> Result<()> {
    let client = ContactOutClient::new(config.contactout_config());

    match client.enrich(&query).await {
        Ok(profile) => {
            println!("{}", serde_json::to_string_pretty(&profile.to_tool_value())?);
            Ok(())
        }
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&err.to_tool_value())?);
            let err = lr_core::Error::from(err);
            if err.is_retryable() {
                return Err(anyhow::Error::new(err).context("Transient failure, try again later"));
            }
            Err(err.into())
        }
    }
}

async fn call_tool(config: &Config, tool: &str, args: &str) -> Result<()> {
    let arguments: serde_json::Value =
        serde_json::from_str(args).context("--args must be a JSON object")?;

    let registry = build_tools_registry(config);
    let output = registry.execute(tool, arguments).await?;

    if output.is_error {
        tracing::info!(tool = %tool, "Tool returned an error mapping");
    }
    println!("{}", output.content);
    Ok(())
}

fn list_tools(config: &Config) -> Result<()> {
    let registry = build_tools_registry(config);
    println!("{}", serde_json::to_string_pretty(&registry.definitions())?);
    Ok(())
}

fn list_agents() -> Result<()> {
    println!("Available agents:");
    for id in available_agents() {
        if let Some(agent) = AgentType::from_id(id).map(|t| t.create()) {
            println!("  {:<24} {}", id, agent.display_name());
        }
    }
    Ok(())
}

fn show_agent(
    config: &Config,
    agent_id: &str,
    options: lr_agents::AgentOptions,
    system_message: bool,
) -> Result<()> {
    let agent_type = AgentType::from_id(agent_id).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown agent '{}'. Available: {}",
            agent_id,
            available_agents().join(", ")
        )
    })?;

    let registry = build_tools_registry(config);
    let agent = agent_type.create();
    for name in missing_tools(agent.as_ref(), &registry) {
        tracing::info!(tool = %name, "Tool must be supplied by the agent runtime");
    }

    let manifest = get_agent(agent_type, options);
    if system_message {
        println!("{}", manifest.system_message(&chrono::Local::now()));
    } else {
        println!("{}", serde_json::to_string_pretty(&manifest)?);
    }
    Ok(())
}

fn show_config(config: &Config) -> Result<()> {
    if let Ok(path) = Config::config_path() {
        let status = if path.exists() { "" } else { " (not found, using defaults)" };
        println!("# {}{}", path.display(), status);
    }
    print!("{}", toml::to_string_pretty(&config.redacted())?);
    Ok(())
}
