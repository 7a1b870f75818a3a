//! Integration tests for registry-admin

mod admin_client;
mod cli_routing;
mod config_resolver;
mod test_utils;
