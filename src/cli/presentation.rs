//! CLI presentation: text and json formatters for roles and the persisted config.

use crate::admin::Role;
use crate::config::ConfigDocument;
use comfy_table::Table;
use serde_json::{json, Value};

pub fn format_role_list_text(roles: &[Role]) -> String {
    if roles.is_empty() {
        return "No roles found.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["ID", "Name", "ARN"]);
    for role in roles {
        table.add_row(vec![&role.id, &role.name, &role.arn]);
    }
    format!("{}\n\nTotal: {} role(s)", table, roles.len())
}

pub fn format_role_list_json(roles: &[Role]) -> String {
    let out = json!({ "roles": roles, "total": roles.len() });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_role_text(role: &Role) -> String {
    format!("Role: {}\nID: {}\nARN: {}", role.name, role.id, role.arn)
}

pub fn format_role_json(role: &Role) -> String {
    serde_json::to_string_pretty(role).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_config_text(document: &ConfigDocument) -> String {
    if document.is_empty() {
        return "No configuration values.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Key", "Value"]);
    for (key, value) in document.iter() {
        let shown = match value {
            Value::Null => "-".to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        table.add_row(vec![key.clone(), shown]);
    }
    table.to_string()
}

pub fn format_config_json(document: &ConfigDocument) -> String {
    serde_json::to_string_pretty(document).unwrap_or_else(|_| "{}".to_string())
}
