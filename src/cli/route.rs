//! CLI route: single route table and run context. Dispatches to the config resolver,
//! the admin client and presentation.

use crate::admin::AdminClient;
use crate::config::{ConfigDocument, ConfigResolver, ResolverConfig};
use crate::error::{Error, Result};
use crate::settings::Settings;
use crate::store::FileStore;
use crate::transport::{HttpTransport, Transport};
use owo_colors::OwoColorize;
use std::sync::Arc;
use tracing::info;

use crate::cli::parse::{
    Commands, ConfigCommands, RoleCommands, SettingsCommands, UserCommands,
};
use crate::cli::presentation::{
    format_config_json, format_config_text, format_role_json, format_role_list_json,
    format_role_list_text, format_role_text,
};

/// Runtime context for CLI execution: effective settings and the two transports.
///
/// Catalog fetches go out without the credential; admin calls carry it.
pub struct RunContext {
    settings: Settings,
    catalog_transport: Arc<dyn Transport>,
    admin_transport: Arc<dyn Transport>,
}

impl RunContext {
    /// Create run context with reqwest-backed transports.
    pub fn new(settings: Settings) -> Result<Self> {
        let catalog_transport = Arc::new(HttpTransport::new(&settings.http, None)?);
        let admin_transport = Arc::new(HttpTransport::new(
            &settings.http,
            settings.credential.clone(),
        )?);
        Ok(Self::with_transports(
            settings,
            catalog_transport,
            admin_transport,
        ))
    }

    pub fn with_transports(
        settings: Settings,
        catalog_transport: Arc<dyn Transport>,
        admin_transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            settings,
            catalog_transport,
            admin_transport,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String> {
        match command {
            Commands::Config { command } => self.handle_config(command),
            Commands::Settings { command } => match command {
                SettingsCommands::Show => self.settings.to_toml(),
            },
            Commands::Roles { command } => self.handle_roles(command),
            Commands::Users { command } => match command {
                UserCommands::SetRole { user, role } => {
                    self.admin()?.set_role(user, role)?;
                    Ok(format!(
                        "{} Assigned role '{}' to user '{}'",
                        "✓".green(),
                        role,
                        user
                    ))
                }
            },
        }
    }

    fn handle_config(&self, command: &ConfigCommands) -> Result<String> {
        let resolver = self.resolver()?;
        let path = resolver.config().config_path.display().to_string();
        match command {
            ConfigCommands::Fetch { source } => {
                let document = resolver.configure(source.as_deref())?;
                Ok(format!(
                    "{} Configuration written to {}\n\n{}",
                    "✓".green(),
                    path,
                    format_config_text(&document)
                ))
            }
            ConfigCommands::Show { format } => {
                let document = resolver.load()?;
                if format == "json" {
                    Ok(format_config_json(&document))
                } else {
                    Ok(format!("Configuration: {}\n\n{}", path, format_config_text(&document)))
                }
            }
            ConfigCommands::Set { values } => {
                let document = resolver.set(values.iter().cloned())?;
                Ok(format!(
                    "{} Updated {} key(s) in {}\n\n{}",
                    "✓".green(),
                    values.len(),
                    path,
                    format_config_text(&document)
                ))
            }
            ConfigCommands::Reset => {
                resolver.reset()?;
                Ok(format!("{} Configuration reset: {}", "✓".green(), path))
            }
        }
    }

    fn handle_roles(&self, command: &RoleCommands) -> Result<String> {
        let admin = self.admin()?;
        match command {
            RoleCommands::List { format } => {
                let roles = admin.list_roles()?;
                if format == "json" {
                    Ok(format_role_list_json(&roles))
                } else {
                    Ok(format_role_list_text(&roles))
                }
            }
            RoleCommands::Get { id, format } => {
                let role = admin.get_role(id)?;
                if format == "json" {
                    Ok(format_role_json(&role))
                } else {
                    Ok(format_role_text(&role))
                }
            }
            RoleCommands::Create { name, arn } => {
                let role = admin.create_role(name, arn)?;
                Ok(format!("{} Created role\n{}", "✓".green(), format_role_text(&role)))
            }
            RoleCommands::Edit { id, name, arn } => {
                let role = admin.edit_role(id, name, arn)?;
                Ok(format!("{} Updated role\n{}", "✓".green(), format_role_text(&role)))
            }
            RoleCommands::Delete { id, yes } => {
                if !yes {
                    use dialoguer::Confirm;
                    let confirmed = Confirm::new()
                        .with_prompt(format!("Delete role '{}'?", id))
                        .default(false)
                        .interact()
                        .map_err(|e| {
                            Error::Settings(format!("Failed to get user input: {}", e))
                        })?;
                    if !confirmed {
                        return Ok("Deletion cancelled".to_string());
                    }
                }
                admin.delete_role(id)?;
                info!(role_id = %id, "Role deleted");
                Ok(format!("{} Deleted role: {}", "✓".green(), id))
            }
        }
    }

    fn resolver(&self) -> Result<ConfigResolver<Arc<dyn Transport>, FileStore>> {
        Ok(ConfigResolver::new(
            Arc::clone(&self.catalog_transport),
            FileStore::new(),
            ResolverConfig::from_settings(&self.settings)?,
        ))
    }

    /// Admin client; reads the persisted config only when settings lack a registry URL.
    fn admin(&self) -> Result<AdminClient<Arc<dyn Transport>>> {
        let document = if self.settings.registry_url.is_some() {
            ConfigDocument::new()
        } else {
            self.resolver()?.load()?
        };
        AdminClient::from_settings(
            Arc::clone(&self.admin_transport),
            &self.settings,
            &document,
        )
    }
}
