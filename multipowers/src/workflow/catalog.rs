//! Workflow catalog loading and validation
//!
//! A catalog is an object whose `workflows` field maps names to definitions:
//!
//! ```json
//! {
//!   "workflows": {
//!     "subagent-driven-development": {
//!       "default_role": "coder",
//!       "nodes": [
//!         { "id": "plan", "role": "architect", "prompt_template": "Plan {task}" },
//!         { "id": "build", "prompt_template": "Implement {task} as {role}" }
//!       ]
//!     }
//!   }
//! }
//! ```
//!
//! Only the requested workflow is validated. Checks run in a fixed order and stop at
//! the first violation, so a caller always gets exactly one error.

use serde_json::{Map, Value};
use std::path::Path;

use crate::document::load_object;
use crate::error::{ValidationError, WorkflowError};
use crate::roles::RoleSet;
use crate::workflow::prompt::render;
use crate::workflow::types::{CompiledWorkflow, NodeSpec, WorkflowDefinition, WorkflowNode};

/// Raw workflow definitions keyed by name, as loaded from disk
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowCatalog {
    workflows: Map<String, Value>,
}

impl WorkflowCatalog {
    /// Load a catalog file (JSON, or YAML by extension)
    pub fn load(path: &Path) -> Result<Self, WorkflowError> {
        let document = load_object(path)?;
        Self::from_document(document).map_err(WorkflowError::from)
    }

    /// Check that the document carries a `workflows` object
    pub fn from_document(mut document: Map<String, Value>) -> Result<Self, ValidationError> {
        match document.remove("workflows") {
            Some(Value::Object(workflows)) => Ok(Self { workflows }),
            _ => Err(ValidationError::MissingWorkflows),
        }
    }

    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(document) => Self::from_document(document),
            _ => Err(ValidationError::MissingWorkflows),
        }
    }

    /// Workflow names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.workflows.keys().cloned().collect();
        names.sort();
        names
    }

    /// Validate the named definition against the available roles.
    ///
    /// A name mapped to `null` counts as absent.
    pub fn definition(&self, name: &str, roles: &RoleSet) -> Result<WorkflowDefinition, ValidationError> {
        let raw = self
            .workflows
            .get(name)
            .filter(|raw| !raw.is_null())
            .ok_or_else(|| ValidationError::UnknownWorkflow {
                name: name.to_string(),
                available: self.names(),
            })?;

        WorkflowDefinition::parse(name, raw, roles)
    }
}

impl WorkflowDefinition {
    /// Validate one raw definition.
    ///
    /// Order: object shape, `default_role`, `nodes` array, then each node's
    /// shape, `id`, `role`, and `prompt_template`.
    pub fn parse(workflow: &str, raw: &Value, roles: &RoleSet) -> Result<Self, ValidationError> {
        let raw = raw
            .as_object()
            .ok_or_else(|| ValidationError::WorkflowNotObject {
                workflow: workflow.to_string(),
            })?;

        let default_role = non_blank_str(raw.get("default_role")).ok_or_else(|| {
            ValidationError::MissingDefaultRole {
                workflow: workflow.to_string(),
            }
        })?;
        if !roles.contains(default_role) {
            return Err(ValidationError::UnknownDefaultRole {
                workflow: workflow.to_string(),
                role: default_role.to_string(),
            });
        }

        let raw_nodes = match raw.get("nodes") {
            Some(Value::Array(nodes)) if !nodes.is_empty() => nodes,
            _ => {
                return Err(ValidationError::EmptyNodes {
                    workflow: workflow.to_string(),
                })
            }
        };

        let nodes = raw_nodes
            .iter()
            .enumerate()
            .map(|(offset, raw_node)| parse_node(workflow, offset + 1, raw_node, default_role, roles))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            default_role: default_role.to_string(),
            nodes,
        })
    }

    /// Render every node's prompt for `task`
    pub fn compile(&self, workflow: &str, task: &str) -> Vec<WorkflowNode> {
        self.nodes
            .iter()
            .map(|node| WorkflowNode {
                node_id: node.id.clone(),
                role: node.role.clone(),
                prompt: render(&node.prompt_template, task, workflow, &node.id, &node.role),
            })
            .collect()
    }
}

fn parse_node(
    workflow: &str,
    index: usize,
    raw: &Value,
    default_role: &str,
    roles: &RoleSet,
) -> Result<NodeSpec, ValidationError> {
    let raw = raw.as_object().ok_or_else(|| ValidationError::NodeNotObject {
        workflow: workflow.to_string(),
        index,
    })?;

    let id = non_blank_str(raw.get("id")).ok_or_else(|| ValidationError::MissingNodeId {
        workflow: workflow.to_string(),
        index,
    })?;

    let role = match raw.get("role") {
        None => default_role,
        Some(value) => non_blank_str(Some(value)).ok_or_else(|| ValidationError::InvalidRoleOverride {
            workflow: workflow.to_string(),
            node: id.to_string(),
        })?,
    };
    if !roles.contains(role) {
        return Err(ValidationError::UnknownNodeRole {
            workflow: workflow.to_string(),
            node: id.to_string(),
            role: role.to_string(),
        });
    }

    let prompt_template =
        non_blank_str(raw.get("prompt_template")).ok_or_else(|| ValidationError::MissingPromptTemplate {
            workflow: workflow.to_string(),
            node: id.to_string(),
        })?;

    Ok(NodeSpec {
        id: id.to_string(),
        role: role.to_string(),
        prompt_template: prompt_template.to_string(),
    })
}

/// The string value, if present and not blank. The original (untrimmed) text is kept.
fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Validate `workflow_name` and compile its nodes for `task`
pub fn validate_workflow(
    catalog: &WorkflowCatalog,
    workflow_name: &str,
    task: &str,
    roles: &RoleSet,
) -> Result<CompiledWorkflow, ValidationError> {
    let definition = catalog.definition(workflow_name, roles)?;
    let nodes = definition.compile(workflow_name, task);

    tracing::debug!(
        workflow = workflow_name,
        nodes = nodes.len(),
        default_role = %definition.default_role,
        "Workflow validated"
    );

    Ok(CompiledWorkflow {
        name: workflow_name.to_string(),
        default_role: definition.default_role,
        nodes,
    })
}
