//! Deterministic scoring of task text into a lane

use crate::error::RouteError;
use crate::router::types::{Lane, RiskHint, RouteDecision};

/// Keywords that signal a task needs the standard lane
pub const STANDARD_KEYWORDS: [&str; 13] = [
    "architecture",
    "breaking",
    "compliance",
    "database",
    "design",
    "governance",
    "major",
    "migrate",
    "migration",
    "refactor",
    "review",
    "security",
    "workflow",
];

/// Keywords that steer a standard task to the planning workflow
pub const PLANNING_KEYWORDS: [&str; 5] = ["plan", "architecture", "design", "proposal", "spec"];

/// Keywords that steer a standard task to an architect-led review
pub const REVIEW_KEYWORDS: [&str; 4] = ["review", "audit", "verify", "validation"];

/// Tasks at least this many words long score an extra point
pub const LONG_TASK_WORDS: usize = 28;

/// Score at which a task goes to the standard lane
pub const STANDARD_THRESHOLD: u32 = 2;

pub const FAST_WORKFLOW: &str = "fast-execution";
pub const PLANNING_WORKFLOW: &str = "writing-plans";
pub const DEVELOPMENT_WORKFLOW: &str = "subagent-driven-development";

const OVERRIDE_REASON: &str = "force_lane override requested";
const FAST_REASON: &str = "bounded low-risk task";

/// Number of maximal runs of ASCII alphanumerics or `_`
pub fn word_count(text: &str) -> usize {
    let mut count = 0;
    let mut in_word = false;

    for c in text.chars() {
        let is_word_char = c.is_ascii_alphanumeric() || c == '_';
        if is_word_char && !in_word {
            count += 1;
        }
        in_word = is_word_char;
    }

    count
}

/// Workflow and role for a standard-lane task. Planning keywords win over review.
pub fn suggest_standard_workflow(task_lower: &str) -> (&'static str, &'static str) {
    if PLANNING_KEYWORDS.iter().any(|k| task_lower.contains(k)) {
        (PLANNING_WORKFLOW, "architect")
    } else if REVIEW_KEYWORDS.iter().any(|k| task_lower.contains(k)) {
        (DEVELOPMENT_WORKFLOW, "architect")
    } else {
        (DEVELOPMENT_WORKFLOW, "coder")
    }
}

fn fast_decision(reason: &str) -> RouteDecision {
    RouteDecision {
        lane: Lane::Fast,
        reason: reason.to_string(),
        suggested_workflow: FAST_WORKFLOW.to_string(),
        suggested_role: "coder".to_string(),
    }
}

fn standard_decision(task_lower: &str, reason: String) -> RouteDecision {
    let (workflow, role) = suggest_standard_workflow(task_lower);
    RouteDecision {
        lane: Lane::Standard,
        reason,
        suggested_workflow: workflow.to_string(),
        suggested_role: role.to_string(),
    }
}

/// Choose a lane for `task`.
///
/// `force_lane` always wins. Otherwise points are added for the risk hint
/// (high/critical +3, medium +1), any standard keyword (+2) and length (+1); a
/// score of [`STANDARD_THRESHOLD`] or more selects the standard lane. Reasons are
/// joined with `"; "` in that same order.
pub fn route(task: &str, risk_hint: Option<RiskHint>, force_lane: Option<Lane>) -> Result<RouteDecision, RouteError> {
    let task = task.trim();
    if task.is_empty() {
        return Err(RouteError::BlankTask);
    }
    let task_lower = task.to_lowercase();

    match force_lane {
        Some(Lane::Fast) => return Ok(fast_decision(OVERRIDE_REASON)),
        Some(Lane::Standard) => return Ok(standard_decision(&task_lower, OVERRIDE_REASON.to_string())),
        None => {}
    }

    let mut score = 0;
    let mut reasons: Vec<String> = Vec::new();

    match risk_hint {
        Some(hint @ (RiskHint::High | RiskHint::Critical)) => {
            score += 3;
            reasons.push(format!("risk hint is {}", hint));
        }
        Some(RiskHint::Medium) => {
            score += 1;
            reasons.push("risk hint is medium".to_string());
        }
        Some(RiskHint::Low) | None => {}
    }

    let mut matched: Vec<&str> = STANDARD_KEYWORDS
        .iter()
        .copied()
        .filter(|k| task_lower.contains(k))
        .collect();
    matched.sort_unstable();
    if !matched.is_empty() {
        score += 2;
        reasons.push(format!("contains standard keywords: {}", matched.join(", ")));
    }

    let words = word_count(&task_lower);
    if words >= LONG_TASK_WORDS {
        score += 1;
        reasons.push(format!("task length is {} words", words));
    }

    tracing::debug!(score, words, keywords = matched.len(), "Task scored");

    if score >= STANDARD_THRESHOLD {
        Ok(standard_decision(&task_lower, reasons.join("; ")))
    } else {
        Ok(fast_decision(FAST_REASON))
    }
}
