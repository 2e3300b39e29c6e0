use super::Host;
use super::config::Config;
use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ProjectsArgs {
    /// Path to configuration file (default is `documents.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,
}

/// Print the configured projects, marking the default one.
pub fn list_projects<H: Host>(host: &mut H, args: &ProjectsArgs) -> Result<()> {
    let config = Config::load(Utf8Path::new("."), args.config.as_ref())?;
    let width = config.projects.iter().map(|p| p.name.len()).max().unwrap_or(0);

    let mut out = host.output();
    for (i, project) in config.projects.iter().enumerate() {
        let marker = if i == 0 { "*" } else { " " };
        let _ = writeln!(out, "{marker} {:<width$}  {}", project.name, project.id);
    }

    Ok(())
}
