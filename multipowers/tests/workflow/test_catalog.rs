//! Tests for catalog loading and workflow validation

use super::common::*;
use multipowers::error::{ConfigError, ValidationError, WorkflowError};
use multipowers::workflow::{validate_workflow, WorkflowCatalog};
use serde_json::json;

#[test]
fn test_compiles_nodes_in_declaration_order() {
    let compiled = validate_workflow(
        &sample_catalog(),
        "subagent-driven-development",
        "add caching",
        &sample_roles(),
    )
    .unwrap();

    let ids: Vec<&str> = compiled.nodes.iter().map(|n| n.node_id.as_str()).collect();
    assert_eq!(ids, vec!["plan", "implement", "review"]);

    assert_eq!(compiled.nodes[0].prompt, "Plan add caching in subagent-driven-development");
    assert_eq!(compiled.nodes[1].role, "coder");
    assert_eq!(compiled.nodes[1].prompt, "Implement add caching as coder");
    assert_eq!(compiled.nodes[2].prompt, "Review review for add caching");
}

#[test]
fn test_validation_is_deterministic() {
    let catalog = sample_catalog();
    let roles = sample_roles();

    let first = validate_workflow(&catalog, "subagent-driven-development", "t", &roles).unwrap();
    let second = validate_workflow(&catalog, "subagent-driven-development", "t", &roles).unwrap();

    assert_eq!(
        serde_json::to_string(&first.nodes).unwrap(),
        serde_json::to_string(&second.nodes).unwrap()
    );
}

#[test]
fn test_reordering_nodes_reorders_compilation() {
    let catalog = WorkflowCatalog::from_value(json!({
        "workflows": {
            "wf": {
                "default_role": "coder",
                "nodes": [
                    { "id": "c", "prompt_template": "c" },
                    { "id": "a", "prompt_template": "a" },
                    { "id": "b", "prompt_template": "b" }
                ]
            }
        }
    }))
    .unwrap();

    let compiled = validate_workflow(&catalog, "wf", "t", &sample_roles()).unwrap();
    let ids: Vec<&str> = compiled.nodes.iter().map(|n| n.node_id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
}

#[test]
fn test_task_is_not_reexpanded() {
    let compiled = validate_workflow(&sample_catalog(), "fast-execution", "say {role} in {workflow}", &sample_roles())
        .unwrap();

    assert_eq!(compiled.nodes[0].prompt, "say {role} in {workflow}");
}

#[test]
fn test_unknown_workflow_message() {
    let err = validate_workflow(&sample_catalog(), "writing-plans", "t", &sample_roles()).unwrap_err();

    assert_eq!(
        err.to_string(),
        "workflow 'writing-plans' not found. Available workflows: fast-execution, subagent-driven-development"
    );
}

#[test]
fn test_unknown_override_role_names_node() {
    let catalog = WorkflowCatalog::from_value(json!({
        "workflows": {
            "wf": {
                "default_role": "coder",
                "nodes": [
                    { "id": "ok", "prompt_template": "fine" },
                    { "id": "ship", "role": "deployer", "prompt_template": "ship it" }
                ]
            }
        }
    }))
    .unwrap();

    let err = validate_workflow(&catalog, "wf", "t", &sample_roles()).unwrap_err();
    assert_eq!(
        err,
        ValidationError::UnknownNodeRole {
            workflow: "wf".to_string(),
            node: "ship".to_string(),
            role: "deployer".to_string(),
        }
    );
    assert_eq!(err.to_string(), "workflow 'wf' unknown role 'deployer' (node='ship')");
}

#[test]
fn test_other_malformed_workflows_are_ignored() {
    let catalog = WorkflowCatalog::from_value(json!({
        "workflows": {
            "broken": { "nodes": "nope" },
            "good": {
                "default_role": "librarian",
                "nodes": [{ "id": "index", "prompt_template": "index {task}" }]
            }
        }
    }))
    .unwrap();

    let compiled = validate_workflow(&catalog, "good", "docs", &sample_roles()).unwrap();
    assert_eq!(compiled.nodes[0].prompt, "index docs");
}

#[test]
fn test_load_json_catalog_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workflows.json");
    write_file(&path, &sample_catalog_json().to_string());

    let catalog = WorkflowCatalog::load(&path).unwrap();
    assert_eq!(catalog.names(), vec!["fast-execution", "subagent-driven-development"]);
}

#[test]
fn test_load_yaml_catalog_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workflows.yaml");
    write_file(
        &path,
        r#"
workflows:
  quick:
    default_role: coder
    nodes:
      - id: run
        prompt_template: "Run {task}"
"#,
    );

    let catalog = WorkflowCatalog::load(&path).unwrap();
    let compiled = validate_workflow(&catalog, "quick", "tests", &sample_roles()).unwrap();
    assert_eq!(compiled.nodes[0].prompt, "Run tests");
}

#[test]
fn test_load_missing_catalog_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = WorkflowCatalog::load(&dir.path().join("missing.json")).unwrap_err();

    assert!(matches!(err, WorkflowError::Config(ConfigError::NotFound { .. })));
}

#[test]
fn test_load_catalog_without_workflows_is_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workflows.json");
    write_file(&path, r#"{"pipelines": {}}"#);

    let err = WorkflowCatalog::load(&path).unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(ValidationError::MissingWorkflows)));
}
