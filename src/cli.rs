//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; single route table dispatches to the resolver and admin client.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{parse_assignment, Cli, Commands, ConfigCommands, RoleCommands, SettingsCommands, UserCommands};
pub use presentation::{
    format_config_json, format_config_text, format_role_json, format_role_list_json,
    format_role_list_text, format_role_text,
};
pub use route::RunContext;
