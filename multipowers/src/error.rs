//! Error types for role resolution, workflow validation, and routing

use std::path::PathBuf;

/// Malformed or missing configuration documents
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("config must be a JSON object: {}", path.display())]
    NotAnObject { path: PathBuf },
    #[error("roles config missing non-empty object field 'roles': {}", path.display())]
    MissingRoles { path: PathBuf },
    #[error("roles config contains no valid role names: {}", path.display())]
    NoValidRoles { path: PathBuf },
}

/// A workflow definition that cannot be compiled.
///
/// Variants follow the order checks are made in; validation stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("workflow config missing object field: workflows")]
    MissingWorkflows,
    #[error("workflow '{name}' not found. Available workflows: {}", available.join(", "))]
    UnknownWorkflow { name: String, available: Vec<String> },
    #[error("workflow '{workflow}' must be an object")]
    WorkflowNotObject { workflow: String },
    #[error("workflow '{workflow}' missing non-empty default_role")]
    MissingDefaultRole { workflow: String },
    #[error("workflow '{workflow}' unknown role '{role}' (node=default_role)")]
    UnknownDefaultRole { workflow: String, role: String },
    #[error("workflow '{workflow}' must define a non-empty nodes array")]
    EmptyNodes { workflow: String },
    #[error("workflow '{workflow}' node[{index}] must be an object")]
    NodeNotObject { workflow: String, index: usize },
    #[error("workflow '{workflow}' node[{index}] missing non-empty id")]
    MissingNodeId { workflow: String, index: usize },
    #[error("workflow '{workflow}' node '{node}' has invalid role override")]
    InvalidRoleOverride { workflow: String, node: String },
    #[error("workflow '{workflow}' unknown role '{role}' (node='{node}')")]
    UnknownNodeRole {
        workflow: String,
        node: String,
        role: String,
    },
    #[error("workflow '{workflow}' node '{node}' missing non-empty prompt_template")]
    MissingPromptTemplate { workflow: String, node: String },
}

/// Anything that stops a workflow before its first node is dispatched
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("invalid roles config: {0}")]
    Roles(#[source] ConfigError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("role executor not found: {}", path.display())]
    ExecutorNotFound { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("task must not be empty")]
    BlankTask,
}
