//! Command-line surface of the workflow engine
//!
//! Exit codes: 0 on success or dry-run, the failing node's exit code when a node
//! fails, 1 on any config or validation error.

use anyhow::{Context, Result};
use clap::Parser;
use multipowers_sdk::DEFAULT_EVENT_LOG_DIR;
use std::io::Write;
use std::path::PathBuf;

use crate::document::load_object;
use crate::error::WorkflowError;
use crate::roles::{resolve_roles, RoleSources};
use crate::workflow::catalog::{validate_workflow, WorkflowCatalog};
use crate::workflow::dispatch::{run_workflow, RunContext};
use crate::workflow::events::EventEmitter;
use crate::workflow::executor::ProcessExecutor;
use crate::workflow::types::{ExecutionSummary, WorkflowRun};

/// Prefix for every line this command writes to stderr
pub const LOG_PREFIX: &str = "[WORKFLOW]";

/// Run a multipowers workflow with node-level role dispatch
#[derive(Parser, Debug, Clone)]
#[command(name = "execute-workflow")]
#[command(about = "Run a multipowers workflow with node-level role dispatch")]
#[command(version)]
pub struct Args {
    /// Workflow catalog path (JSON, or YAML by .yaml/.yml extension)
    #[arg(long, value_name = "PATH")]
    pub config: PathBuf,

    /// Name of the workflow to run
    #[arg(long)]
    pub workflow: String,

    /// Task text substituted into node prompts
    #[arg(long)]
    pub task: String,

    /// Role executor invoked as `<executor> <role> <prompt>`
    #[arg(long, alias = "ask-role", value_name = "PATH", default_value = "bin/ask-role")]
    pub executor: PathBuf,

    /// Roles config path
    ///
    /// Defaults to conductor/config/roles.json, then config/roles.default.json.
    #[arg(long, value_name = "PATH")]
    pub roles_config: Option<PathBuf>,

    /// Request identifier, exported to executors and recorded on events
    #[arg(long, env = "MULTIPOWERS_REQUEST_ID", default_value = "")]
    pub request_id: String,

    /// Track identifier recorded on events
    #[arg(long, env = "MULTIPOWERS_TRACK_ID", default_value = "")]
    pub track_id: String,

    /// Emit the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Resolve nodes without executing them
    #[arg(long)]
    pub dry_run: bool,

    /// Directory for dated JSONL event logs
    #[arg(long, value_name = "DIR", default_value = DEFAULT_EVENT_LOG_DIR)]
    pub event_log_dir: PathBuf,

    /// Do not record node events
    #[arg(long)]
    pub no_events: bool,

    /// Diagnostic log filter, overridden by MULTIPOWERS_LOG
    #[arg(long, value_name = "FILTER", default_value = "warn")]
    pub log_level: String,
}

/// Engine configuration derived from CLI arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub catalog_path: PathBuf,
    pub workflow: String,
    pub task: String,
    pub executor_path: PathBuf,
    pub roles_config: Option<PathBuf>,
    pub role_sources: RoleSources,
    pub request_id: Option<String>,
    pub track_id: Option<String>,
    pub json: bool,
    pub dry_run: bool,
    /// `None` disables event recording
    pub event_log_dir: Option<PathBuf>,
}

impl From<Args> for RunConfig {
    fn from(args: Args) -> Self {
        RunConfig {
            catalog_path: args.config,
            workflow: args.workflow,
            task: args.task,
            executor_path: args.executor,
            roles_config: args.roles_config.filter(|p| !p.as_os_str().is_empty()),
            role_sources: RoleSources::default(),
            request_id: non_empty(args.request_id),
            track_id: non_empty(args.track_id),
            json: args.json,
            dry_run: args.dry_run,
            event_log_dir: (!args.no_events).then_some(args.event_log_dir),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl RunConfig {
    fn emitter(&self) -> EventEmitter {
        match &self.event_log_dir {
            Some(dir) => EventEmitter::jsonl(dir.clone()),
            None => EventEmitter::disabled(),
        }
    }

    fn context(&self) -> RunContext {
        RunContext {
            workflow: self.workflow.clone(),
            request_id: self.request_id.clone(),
            track_id: self.track_id.clone(),
            dry_run: self.dry_run,
        }
    }
}

/// Load, validate, and dispatch the configured workflow
pub async fn execute(config: &RunConfig) -> Result<WorkflowRun, WorkflowError> {
    let document = load_object(&config.catalog_path)?;
    let roles = resolve_roles(config.roles_config.as_deref(), &config.role_sources).map_err(WorkflowError::Roles)?;
    let catalog = WorkflowCatalog::from_document(document)?;
    let compiled = validate_workflow(&catalog, &config.workflow, &config.task, &roles)?;

    tracing::info!(
        workflow = %compiled.name,
        nodes = compiled.nodes.len(),
        dry_run = config.dry_run,
        "Starting workflow"
    );

    let executor = ProcessExecutor::new(config.executor_path.clone());
    run_workflow(&compiled.nodes, &executor, &config.emitter(), &config.context()).await
}

/// Summary as one line of JSON with sorted keys
pub fn render_json(summary: &ExecutionSummary) -> Result<String> {
    // Round-tripping through `Value` sorts object keys
    let value = serde_json::to_value(summary).context("Failed to serialize execution summary")?;
    serde_json::to_string(&value).context("Failed to serialize execution summary")
}

/// Human-readable summary, one line per node
pub fn render_text(summary: &ExecutionSummary) -> String {
    let mut text = format!("Workflow: {}\n", summary.workflow);
    for node in &summary.nodes {
        text.push_str(&format!(
            "- [{}] {} ({}) exit_code={}\n",
            node.status,
            node.id,
            node.role,
            node.exit_code.unwrap_or(0)
        ));
    }
    text
}

/// Write the outcome of a run and return the process exit code
pub fn report<O, E>(run: &WorkflowRun, json: bool, out: &mut O, err: &mut E) -> Result<i32>
where
    O: Write,
    E: Write,
{
    if json {
        writeln!(out, "{}", render_json(&run.summary)?)?;
        return Ok(run.exit_code());
    }

    match &run.failure {
        Some(failure) => {
            writeln!(
                err,
                "{} Node '{}' failed (role={}, exit_code={})",
                LOG_PREFIX, failure.node_id, failure.role, failure.exit_code
            )?;
            if !failure.stderr.trim().is_empty() {
                writeln!(err, "{}", failure.stderr.trim_end())?;
            }
        }
        None => write!(out, "{}", render_text(&run.summary))?,
    }

    Ok(run.exit_code())
}

/// Entry point for the `execute-workflow` binary
pub async fn run(args: Args) -> i32 {
    let config = RunConfig::from(args);

    let outcome = match execute(&config).await {
        Ok(run) => run,
        Err(e) => {
            eprintln!("{} {}", LOG_PREFIX, e);
            return 1;
        }
    };

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    match report(&outcome, config.json, &mut stdout.lock(), &mut stderr.lock()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", LOG_PREFIX, e);
            1
        }
    }
}
