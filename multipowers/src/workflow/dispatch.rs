//! Sequential, fail-fast dispatch of compiled nodes
//!
//! Nodes run one at a time in declaration order; each is awaited to completion
//! before the next starts. The first non-zero exit stops the run.

use std::time::Instant;

use crate::error::WorkflowError;
use crate::workflow::events::{EventEmitter, NodeEvent};
use crate::workflow::executor::{ExecutionOutput, RoleExecutor};
use crate::workflow::types::{DispatchFailure, ExecutionSummary, NodeResult, WorkflowNode, WorkflowRun};

/// Identity and mode of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunContext {
    pub workflow: String,
    pub request_id: Option<String>,
    pub track_id: Option<String>,
    pub dry_run: bool,
}

impl RunContext {
    pub fn new(workflow: impl Into<String>) -> Self {
        Self {
            workflow: workflow.into(),
            ..Default::default()
        }
    }

    fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref().filter(|id| !id.is_empty())
    }

    fn empty_summary(&self) -> ExecutionSummary {
        ExecutionSummary {
            workflow: self.workflow.clone(),
            request_id: self.request_id.clone().unwrap_or_default(),
            track_id: self.track_id.clone().unwrap_or_default(),
            dry_run: self.dry_run,
            nodes: Vec::new(),
        }
    }
}

/// Dispatch `nodes` in order.
///
/// In dry-run mode every node is recorded as skipped; the executor is neither
/// checked nor invoked and no events are emitted. Otherwise the executor must be
/// available before anything runs.
pub async fn run_workflow<E>(
    nodes: &[WorkflowNode],
    executor: &E,
    emitter: &EventEmitter,
    ctx: &RunContext,
) -> Result<WorkflowRun, WorkflowError>
where
    E: RoleExecutor + ?Sized,
{
    let mut summary = ctx.empty_summary();

    if ctx.dry_run {
        summary.nodes = nodes
            .iter()
            .enumerate()
            .map(|(offset, node)| NodeResult::skipped(offset + 1, node))
            .collect();
        return Ok(WorkflowRun {
            summary,
            failure: None,
        });
    }

    executor.ensure_available()?;

    for (offset, node) in nodes.iter().enumerate() {
        let index = offset + 1;
        tracing::info!(
            workflow = %ctx.workflow,
            node = %node.node_id,
            role = %node.role,
            index,
            total = nodes.len(),
            "Dispatching node"
        );

        let started = Instant::now();
        let output = match executor.execute(&node.role, &node.prompt, ctx.request_id()).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(node = %node.node_id, error = %e, "Role executor failed to start");
                ExecutionOutput::spawn_failure(&e)
            }
        };
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        summary.nodes.push(NodeResult::attempted(
            index,
            node,
            output.exit_code,
            &output.stdout,
            &output.stderr,
        ));

        emitter.emit(&NodeEvent {
            role: node.role.clone(),
            workflow: ctx.workflow.clone(),
            node: node.node_id.clone(),
            index,
            exit_code: output.exit_code,
            duration_ms,
            request_id: ctx.request_id.clone(),
            track_id: ctx.track_id.clone(),
        });

        if output.exit_code != 0 {
            tracing::info!(
                node = %node.node_id,
                role = %node.role,
                exit_code = output.exit_code,
                duration_ms,
                "Node failed, halting workflow"
            );
            return Ok(WorkflowRun {
                summary,
                failure: Some(DispatchFailure {
                    index,
                    node_id: node.node_id.clone(),
                    role: node.role.clone(),
                    exit_code: output.exit_code,
                    stderr: output.stderr,
                }),
            });
        }

        tracing::debug!(node = %node.node_id, duration_ms, "Node completed");
    }

    Ok(WorkflowRun {
        summary,
        failure: None,
    })
}
