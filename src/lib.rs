//! Registry Admin: Configuration Resolution and Role Administration
//!
//! Fetches a data catalog's published configuration, reconciles it with local
//! defaults and persists the result. Also wraps the registry's role administration
//! API for the `registry-admin` command line tool.

pub mod admin;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod settings;
pub mod store;
pub mod transport;

pub use admin::{AdminClient, Role};
pub use config::{ConfigDocument, ConfigResolver, MergePolicy, ResolverConfig};
pub use error::{Error, ErrorKind, Result};
