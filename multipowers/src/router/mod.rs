//! Fast/standard lane routing for incoming tasks.
//!
//! Routing is a pure function of the task text and optional hints; it is consulted
//! before a workflow is chosen and never dispatches anything itself.

pub mod cli;
pub mod scoring;
pub mod types;

pub use scoring::{route, suggest_standard_workflow, word_count};
pub use types::{Lane, RiskHint, RouteDecision, RoutePayload};
