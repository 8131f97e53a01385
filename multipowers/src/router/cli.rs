//! Command-line surface of the task router

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;

use crate::router::scoring::route;
use crate::router::types::{Lane, RiskHint, RouteDecision, RoutePayload};

pub const LOG_PREFIX: &str = "[ROUTE]";

/// Route a task to the fast or standard lane
#[derive(Parser, Debug, Clone)]
#[command(name = "route-task")]
#[command(about = "Route a task to the fast or standard lane")]
#[command(version)]
pub struct Args {
    /// Task description
    #[arg(long)]
    pub task: String,

    /// Optional risk hint from the caller
    #[arg(long, value_enum)]
    pub risk_hint: Option<RiskHint>,

    /// Force the lane instead of scoring
    #[arg(long, value_enum)]
    pub force_lane: Option<Lane>,

    /// Emit JSON output
    #[arg(long)]
    pub json: bool,

    /// Diagnostic log filter, overridden by MULTIPOWERS_LOG
    #[arg(long, value_name = "FILTER", default_value = "warn")]
    pub log_level: String,
}

impl Args {
    pub fn payload<'a>(&'a self, decision: &'a RouteDecision) -> RoutePayload<'a> {
        RoutePayload {
            task: &self.task,
            decision,
            risk_hint: self.risk_hint,
            force_lane: self.force_lane,
        }
    }
}

/// Payload as one line of JSON with sorted keys
pub fn render_json(payload: &RoutePayload<'_>) -> Result<String> {
    let value = serde_json::to_value(payload).context("Failed to serialize route decision")?;
    serde_json::to_string(&value).context("Failed to serialize route decision")
}

pub fn render_text(decision: &RouteDecision) -> String {
    format!(
        "lane={}\nreason={}\nsuggested_workflow={}\nsuggested_role={}\n",
        decision.lane, decision.reason, decision.suggested_workflow, decision.suggested_role
    )
}

/// Route and print; returns the process exit code
pub fn run_with<O, E>(args: &Args, out: &mut O, err: &mut E) -> Result<i32>
where
    O: Write,
    E: Write,
{
    let decision = match route(&args.task, args.risk_hint, args.force_lane) {
        Ok(decision) => decision,
        Err(e) => {
            writeln!(err, "{} {}", LOG_PREFIX, e)?;
            return Ok(1);
        }
    };

    tracing::info!(lane = %decision.lane, workflow = %decision.suggested_workflow, "Task routed");

    if args.json {
        writeln!(out, "{}", render_json(&args.payload(&decision))?)?;
    } else {
        write!(out, "{}", render_text(&decision))?;
    }
    Ok(0)
}

/// Entry point for the `route-task` binary
pub fn run(args: Args) -> i32 {
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();

    match run_with(&args, &mut stdout.lock(), &mut stderr.lock()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", LOG_PREFIX, e);
            1
        }
    }
}
