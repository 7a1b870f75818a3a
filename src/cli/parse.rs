//! CLI parse: clap types for registry-admin. Definitions plus the `KEY=VALUE` parser.

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

/// Registry admin CLI - catalog configuration and role administration
#[derive(Parser)]
#[command(name = "registry-admin")]
#[command(about = "Resolve catalog configuration and administer registry roles")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file path (overrides default settings loading)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch, inspect and edit the persisted catalog configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Inspect effective client settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Manage registry roles
    Roles {
        #[command(subcommand)]
        command: RoleCommands,
    },
    /// Manage registry users
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Fetch config.json from a catalog and persist the reconciled result
    Fetch {
        /// Catalog URL (defaults to the configured default source)
        source: Option<String>,
    },
    /// Show the persisted configuration
    Show {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Set configuration values locally
    Set {
        /// Assignments in KEY=VALUE form; values are read as YAML scalars
        #[arg(required = true, value_parser = parse_assignment)]
        values: Vec<(String, Value)>,
    },
    /// Reset the configuration to local defaults
    Reset,
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show effective settings (credential masked)
    Show,
}

#[derive(Subcommand)]
pub enum RoleCommands {
    /// List roles
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show a single role
    Get {
        /// Role ID
        id: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Create a role
    Create {
        /// Role name
        name: String,
        /// IAM role ARN
        arn: String,
    },
    /// Replace a role's name and ARN
    Edit {
        /// Role ID
        id: String,
        /// New role name
        name: String,
        /// New IAM role ARN
        arn: String,
    },
    /// Delete a role
    Delete {
        /// Role ID
        id: String,
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Assign a role to a user
    SetRole {
        /// User name
        user: String,
        /// Role name
        role: String,
    },
}

/// Parse `KEY=VALUE`. The value is read as a YAML scalar so `true`, `null` and
/// numbers keep their type; anything else (including `KEY=`) stays a string.
pub fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{}'", raw));
    }

    let value = match serde_yaml::from_str::<Value>(value) {
        Ok(parsed @ (Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)))
            if !value.trim().is_empty() =>
        {
            parsed
        }
        _ => Value::String(value.to_string()),
    };
    Ok((key.to_string(), value))
}
