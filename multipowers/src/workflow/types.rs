//! Data types for workflow definitions, compiled nodes, and run summaries

use serde::{Deserialize, Serialize};

/// Maximum number of stderr lines carried in a node result
pub const STDERR_SUMMARY_LINES: usize = 8;

// ============================================================================
// Definition Types
// ============================================================================

/// A validated workflow definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowDefinition {
    pub default_role: String,

    /// Nodes in declaration order
    pub nodes: Vec<NodeSpec>,
}

/// A validated node before prompt rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpec {
    pub id: String,

    /// Resolved role (the definition's default role when the node names none)
    pub role: String,

    pub prompt_template: String,
}

/// A node ready for dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub node_id: String,
    pub role: String,
    pub prompt: String,
}

/// Output of validation: every node rendered, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledWorkflow {
    pub name: String,
    pub default_role: String,
    pub nodes: Vec<WorkflowNode>,
}

// ============================================================================
// Run Summary Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Ok,
    Failed,
    Skipped,
}

impl NodeStatus {
    pub fn from_exit_code(exit_code: i32) -> Self {
        if exit_code == 0 {
            NodeStatus::Ok
        } else {
            NodeStatus::Failed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Ok => "ok",
            NodeStatus::Failed => "failed",
            NodeStatus::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-node record in an execution summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeResult {
    /// 1-based position in the workflow
    pub index: usize,
    pub id: String,
    pub role: String,
    pub status: NodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    /// First [`STDERR_SUMMARY_LINES`] lines only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

impl NodeResult {
    pub fn skipped(index: usize, node: &WorkflowNode) -> Self {
        Self {
            index,
            id: node.node_id.clone(),
            role: node.role.clone(),
            status: NodeStatus::Skipped,
            exit_code: None,
            stdout: None,
            stderr: None,
        }
    }

    /// Record for an attempted node; blank streams are omitted
    pub fn attempted(index: usize, node: &WorkflowNode, exit_code: i32, stdout: &str, stderr: &str) -> Self {
        let stdout = stdout.trim();
        Self {
            index,
            id: node.node_id.clone(),
            role: node.role.clone(),
            status: NodeStatus::from_exit_code(exit_code),
            exit_code: Some(exit_code),
            stdout: (!stdout.is_empty()).then(|| stdout.to_string()),
            stderr: summarize_stderr(stderr),
        }
    }
}

/// Trim and keep the first [`STDERR_SUMMARY_LINES`] lines; `None` when blank
pub fn summarize_stderr(stderr: &str) -> Option<String> {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        return None;
    }

    Some(
        stderr
            .lines()
            .take(STDERR_SUMMARY_LINES)
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

/// Everything a run attempted, in dispatch order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSummary {
    pub workflow: String,
    pub request_id: String,
    pub track_id: String,
    pub dry_run: bool,
    pub nodes: Vec<NodeResult>,
}

/// The node that halted a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchFailure {
    pub index: usize,
    pub node_id: String,
    pub role: String,
    pub exit_code: i32,
    /// Untruncated stderr of the failing node
    pub stderr: String,
}

/// Outcome of dispatching a compiled workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRun {
    pub summary: ExecutionSummary,
    pub failure: Option<DispatchFailure>,
}

impl WorkflowRun {
    /// Process exit code: the failing node's code, otherwise 0
    pub fn exit_code(&self) -> i32 {
        self.failure.as_ref().map(|f| f.exit_code).unwrap_or(0)
    }

    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}
