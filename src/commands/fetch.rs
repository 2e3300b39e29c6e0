use super::Host;
use super::ProgressReporter;
use super::common::{ColorMode, LogLevel, init_logging};
use super::config::Config;
use crate::Result;
use crate::documents::{Credentials, DocumentClient, DocumentState, EntityField, FieldSelection, MetadataField, dedup, fetch_records};
use crate::export::{Table, assemble, serialize, write_csv};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ohno::{IntoAppError, app_err};
use owo_colors::OwoColorize;
use std::fs;
use std::io::Write;

const LOG_TARGET: &str = "     fetch";

#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Name of a configured project (default is the first configured project)
    #[arg(long, short = 'p', value_name = "NAME", conflicts_with = "project_id")]
    pub project: Option<String>,

    /// Raw project id, bypassing the configured project names
    #[arg(long, value_name = "ID")]
    pub project_id: Option<String>,

    /// Document states to export (default comes from the configuration)
    #[arg(long, short = 's', value_name = "STATES", value_delimiter = ',')]
    pub state: Vec<DocumentState>,

    /// Metadata columns to export (default comes from the configuration)
    #[arg(long, short = 'm', value_name = "FIELDS", value_delimiter = ',')]
    pub metadata: Vec<MetadataField>,

    /// Entity fields to export (default comes from the configuration)
    #[arg(long, short = 'e', value_name = "FIELDS", value_delimiter = ',')]
    pub entity: Vec<EntityField>,

    /// API user name
    #[arg(long, short = 'u', value_name = "USER", env = "DOCUMENTS_USERNAME")]
    pub username: Option<String>,

    /// API password
    #[arg(long, value_name = "PASSWORD", env = "DOCUMENTS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Root URL of the document API (overrides the configuration)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Path to configuration file (default is `documents.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Spreadsheet to write (default is `<project id>_documents.xlsx`)
    #[arg(long, short = 'o', value_name = "PATH", help_heading = "Report Output")]
    pub output: Option<Utf8PathBuf>,

    /// Also write the documents to a CSV file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub csv: Option<Utf8PathBuf>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,
}

/// Everything one export needs, resolved from the command line and the configuration.
#[derive(Debug)]
struct FetchPlan {
    base_url: String,
    project_id: String,
    states: Vec<DocumentState>,
    selection: FieldSelection,
    credentials: Credentials,
    output: Utf8PathBuf,
}

/// Default file name of the exported spreadsheet.
#[must_use]
pub fn default_output_name(project_id: &str) -> String {
    format!("{project_id}_documents.xlsx")
}

pub async fn fetch_documents<H: Host>(host: &mut H, args: &FetchArgs) -> Result<()> {
    init_logging(args.log_level);

    let config = Config::load(Utf8Path::new("."), args.config.as_ref())?;
    let plan = match plan(args, &config) {
        Ok(plan) => plan,
        Err(missing) => {
            let warning = format!("Please provide all the required inputs: missing {}", missing.join(", "));
            let _ = writeln!(host.error(), "{}", paint(&warning, args.color.for_stderr(), Tone::Warning));
            host.exit(2);
            return Err(app_err!("missing required inputs: {}", missing.join(", ")));
        }
    };

    log::debug!(target: LOG_TARGET, "Exporting project {} from {}", plan.project_id, plan.base_url);

    let client = DocumentClient::new(&plan.base_url, plan.credentials.clone(), config.request_timeout())?;
    let show_progress = args.log_level == LogLevel::None && std::io::IsTerminal::is_terminal(&std::io::stderr());
    let progress = ProgressReporter::new(show_progress, args.color.for_stderr());

    let records = match fetch_records(&client, &plan.project_id, &plan.states, &plan.selection, &progress).await {
        Ok(records) => records,
        Err(e) => {
            let message = format!("Error fetching data: {e}");
            let _ = writeln!(host.error(), "{}", paint(&message, args.color.for_stderr(), Tone::Error));
            host.exit(1);
            return Err(e.into());
        }
    };

    let table = assemble(records);
    if let Err(e) = write_outputs(&table, &plan.output, args.csv.as_deref()) {
        let message = format!("Error writing output: {e}");
        let _ = writeln!(host.error(), "{}", paint(&message, args.color.for_stderr(), Tone::Error));
        host.exit(1);
        return Err(e);
    }

    let summary = format!("Fetched {} document(s), wrote {}", table.row_count(), plan.output);
    let _ = writeln!(host.output(), "{}", paint(&summary, args.color.for_stdout(), Tone::Success));
    Ok(())
}

/// Render the spreadsheet and the optional CSV, then write both.
///
/// Nothing is left on disk unless every requested file was written.
fn write_outputs(table: &Table, output: &Utf8Path, csv_path: Option<&Utf8Path>) -> Result<()> {
    let xlsx = serialize(table)?;
    let csv = match csv_path {
        Some(_) => {
            let mut buf = Vec::new();
            write_csv(table, &mut buf)?;
            Some(buf)
        }
        None => None,
    };

    fs::write(output, xlsx).into_app_err_with(|| format!("writing spreadsheet '{output}'"))?;

    if let (Some(path), Some(bytes)) = (csv_path, csv)
        && let Err(e) = fs::write(path, bytes)
    {
        if let Err(cleanup) = fs::remove_file(output) {
            log::warn!(target: LOG_TARGET, "Could not remove '{output}' after the CSV write failed: {cleanup}");
        }
        return Err(e).into_app_err_with(|| format!("writing CSV file '{path}'"));
    }

    Ok(())
}

/// Resolve the export plan, or report the names of the inputs that are missing.
fn plan(args: &FetchArgs, config: &Config) -> Result<FetchPlan, Vec<&'static str>> {
    let mut missing = Vec::new();

    let username = non_empty(args.username.as_deref());
    let password = non_empty(args.password.as_deref());
    if username.is_none() {
        missing.push("username");
    }
    if password.is_none() {
        missing.push("password");
    }

    let project_id = resolve_project_id(args, config);
    if project_id.is_none() {
        missing.push("project");
    }

    let states = dedup(pick(&args.state, &config.default_states));
    if states.is_empty() {
        missing.push("document states");
    }

    let (Some(username), Some(password), Some(project_id)) = (username, password, project_id) else {
        return Err(missing);
    };
    if !missing.is_empty() {
        return Err(missing);
    }

    let selection = FieldSelection::new(pick(&args.metadata, &config.default_metadata), pick(&args.entity, &config.default_entities));
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| Utf8PathBuf::from(default_output_name(&project_id)));

    Ok(FetchPlan {
        base_url: args.base_url.clone().unwrap_or_else(|| config.base_url.clone()),
        project_id,
        states,
        selection,
        credentials: Credentials::new(username, password),
        output,
    })
}

fn resolve_project_id(args: &FetchArgs, config: &Config) -> Option<String> {
    if let Some(id) = non_empty(args.project_id.as_deref()) {
        return Some(id.to_string());
    }

    match &args.project {
        Some(name) => config.project(name).map(|p| p.id.clone()),
        None => config.default_project().map(|p| p.id.clone()),
    }
}

fn pick<T: Copy>(given: &[T], fallback: &[T]) -> Vec<T> {
    if given.is_empty() { fallback.to_vec() } else { given.to_vec() }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Success,
    Warning,
    Error,
}

fn paint(text: &str, use_colors: bool, tone: Tone) -> String {
    if !use_colors {
        return text.to_string();
    }

    match tone {
        Tone::Success => text.green().to_string(),
        Tone::Warning => text.yellow().to_string(),
        Tone::Error => text.red().bold().to_string(),
    }
}
