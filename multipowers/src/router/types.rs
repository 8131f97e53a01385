//! Data types for lane routing

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Execution lane for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    /// Low-overhead, single-role execution
    Fast,
    /// Full multi-node workflow
    Standard,
}

impl Lane {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lane::Fast => "fast",
            Lane::Standard => "standard",
        }
    }
}

impl std::fmt::Display for Lane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied risk estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RiskHint {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskHint::Low => "low",
            RiskHint::Medium => "medium",
            RiskHint::High => "high",
            RiskHint::Critical => "critical",
        }
    }
}

impl std::fmt::Display for RiskHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of routing one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDecision {
    pub lane: Lane,
    pub reason: String,
    pub suggested_workflow: String,
    pub suggested_role: String,
}

/// Decision plus the inputs it was made from, as printed by `route-task --json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutePayload<'a> {
    pub task: &'a str,
    #[serde(flatten)]
    pub decision: &'a RouteDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_hint: Option<RiskHint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_lane: Option<Lane>,
}
