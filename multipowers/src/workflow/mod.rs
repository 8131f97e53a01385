//! Workflow execution engine.
//!
//! A run moves through a fixed pipeline:
//!
//! - `catalog` - Load the catalog and validate the requested workflow
//! - `prompt` - Render each node's prompt template
//! - `dispatch` - Execute compiled nodes in order, halting on the first failure
//! - `events` - Record one event per attempted node
//!
//! `executor` holds the seam to whatever carries out a node, `types` the shared
//! data structures and `cli` the `execute-workflow` command.

pub mod catalog;
pub mod cli;
pub mod dispatch;
pub mod events;
pub mod executor;
pub mod prompt;
pub mod types;

pub use catalog::{validate_workflow, WorkflowCatalog};
pub use dispatch::{run_workflow, RunContext};
pub use events::{EventEmitter, NodeEvent};
pub use executor::{ExecutionOutput, ProcessExecutor, RoleExecutor};
pub use types::*;
