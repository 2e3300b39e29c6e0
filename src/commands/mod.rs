//! Command-line interface and orchestration for get-documents
//!
//! This module implements the CLI commands and ties the document client, the
//! flattener, and the exporters together into end-to-end workflows.
//!
//! ## Commands
//!
//! - **fetch**: List the documents of a project by state, fetch each one with the
//!   selected metadata and entity fields, and write the spreadsheet
//! - **projects**: Show the projects known to the configuration
//! - **init**: Generate a default configuration file
//! - **validate**: Check a configuration file
//!
//! Configuration is managed through a TOML file that names the API root, the known
//! projects, and the default field selection used when the command line is silent.

mod common;
mod config;
mod fetch;
mod host;
mod init;
mod progress_reporter;
mod projects;
mod run;
mod validate;

pub use common::{ColorMode, LogLevel};
pub use config::{Config, Project};
pub use fetch::{FetchArgs, default_output_name, fetch_documents};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use progress_reporter::ProgressReporter;
pub use projects::{ProjectsArgs, list_projects};
pub use run::run;
pub use validate::{ValidateArgs, validate_config};
