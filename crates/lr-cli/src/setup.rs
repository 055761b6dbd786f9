use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;

pub const CONFIG_TEMPLATE: &str = r#"# lr configuration
#
# The ContactOut API token is read from CONTACTOUT_API_TOKEN by default.
# You can also set it directly in this file (not recommended).
# Any key can be overridden with LR_<SECTION>__<KEY>, e.g. LR_AGENT__MODEL_ID.

# ── ContactOut ───────────────────────────────────────────────────
[contactout]
# api_token = "..."                # or set CONTACTOUT_API_TOKEN env var
base_url = "https://api.contactout.com/v1"
timeout_secs = 30

# ── Agent ────────────────────────────────────────────────────────
# Handed to the agent runtime by `lr agent`.

[agent]
default_agent = "linkedin_researcher"
model_id = "gpt-4o"
# db_url = "postgresql://ai:ai@localhost:5432/ai"
debug_mode = true
"#;

pub fn run() -> Result<()> {
    let config_dir = Config::config_dir()?;
    let config_path = config_dir.join("config.toml");

    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create config directory: {}", config_dir.display()))?;

    if config_path.exists() {
        println!("Existing config file found:\n  {}", config_path.display());
        print!("\nOverwrite? (The existing file will be backed up) [y/N] ");

        use std::io::Write;
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Setup cancelled.");
            return Ok(());
        }

        backup_file(&config_path)?;
    }

    std::fs::write(&config_path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created {}", config_path.display());

    println!("\nNext steps:");
    println!("  1. Set your API token:  export CONTACTOUT_API_TOKEN=\"...\"");
    println!("  2. Enrich a profile:    lr enrich-url https://www.linkedin.com/in/<handle>");
    println!("  3. Inspect the agent:   lr agent");

    Ok(())
}

/// Back up a file to <name>.bak, appending a timestamp if .bak already exists.
fn backup_file(path: &Path) -> Result<()> {
    let mut backup = path.with_extension("toml.bak");

    if backup.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        backup = path.with_extension(format!("toml.bak.{}", timestamp));
    }

    std::fs::rename(path, &backup)
        .with_context(|| format!("Failed to back up {} to {}", path.display(), backup.display()))?;
    println!("  Backed up to {}", backup.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.contactout.base_url, "https://api.contactout.com/v1");
        assert_eq!(config.contactout.api_token, None);
        assert_eq!(config.agent.model_id, "gpt-4o");
    }
}
