// Config document loading
pub mod document;

// Error types
pub mod error;

// Diagnostic logging setup
pub mod logging;

// Role registry
pub mod roles;

// Workflow execution engine
pub mod workflow;

// Fast/standard lane router
pub mod router;
