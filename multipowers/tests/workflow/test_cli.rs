//! End-to-end tests for the execute-workflow command surface

use super::common::*;
use multipowers::error::{ConfigError, ValidationError, WorkflowError};
use multipowers::roles::RoleSources;
use clap::Parser;
use multipowers::workflow::cli::{execute, render_json, report, run, Args, RunConfig};
use multipowers::workflow::{DispatchFailure, ExecutionSummary, NodeResult, NodeStatus, WorkflowRun};
use std::path::Path;

fn config_in(dir: &Path, workflow: &str) -> RunConfig {
    let catalog_path = dir.join("workflows.json");
    write_file(&catalog_path, &sample_catalog_json().to_string());
    write_file(
        &dir.join("config/roles.default.json"),
        r#"{"roles": {"architect": {}, "coder": {}, "librarian": {}}}"#,
    );

    RunConfig {
        catalog_path,
        workflow: workflow.to_string(),
        task: "add caching".to_string(),
        executor_path: dir.join("bin/ask-role"),
        roles_config: None,
        role_sources: RoleSources::rooted_at(dir),
        request_id: None,
        track_id: None,
        json: true,
        dry_run: false,
        event_log_dir: None,
    }
}

fn ok_node(index: usize, id: &str) -> NodeResult {
    NodeResult {
        index,
        id: id.to_string(),
        role: "coder".to_string(),
        status: NodeStatus::Ok,
        exit_code: Some(0),
        stdout: None,
        stderr: None,
    }
}

fn summary(nodes: Vec<NodeResult>) -> ExecutionSummary {
    ExecutionSummary {
        workflow: "wf".to_string(),
        request_id: String::new(),
        track_id: String::new(),
        dry_run: false,
        nodes,
    }
}

#[tokio::test]
async fn test_dry_run_needs_no_executor() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig {
        dry_run: true,
        ..config_in(dir.path(), "subagent-driven-development")
    };

    let run = execute(&config).await.unwrap();

    assert_eq!(run.exit_code(), 0);
    let ids: Vec<&str> = run.summary.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["plan", "implement", "review"]);
}

#[tokio::test]
async fn test_missing_executor_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), "fast-execution");

    let err = execute(&config).await.unwrap_err();
    assert!(matches!(err, WorkflowError::ExecutorNotFound { .. }));
    assert!(err.to_string().starts_with("role executor not found: "));
}

#[tokio::test]
async fn test_unknown_workflow_is_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), "nope");

    let err = execute(&config).await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Validation(ValidationError::UnknownWorkflow { .. })
    ));
}

#[tokio::test]
async fn test_missing_roles_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig {
        roles_config: Some(dir.path().join("absent.json")),
        ..config_in(dir.path(), "fast-execution")
    };

    let err = execute(&config).await.unwrap_err();
    assert!(matches!(err, WorkflowError::Roles(ConfigError::NotFound { .. })));
}

fn args_for(config: &RunConfig, extra: &[&str]) -> Args {
    let catalog = config.catalog_path.to_string_lossy().into_owned();
    let roles = config
        .role_sources
        .fallback
        .to_string_lossy()
        .into_owned();
    let mut argv = vec![
        "execute-workflow",
        "--config",
        catalog.as_str(),
        "--workflow",
        config.workflow.as_str(),
        "--task",
        config.task.as_str(),
        "--roles-config",
        roles.as_str(),
        "--no-events",
    ];
    argv.extend_from_slice(extra);
    Args::try_parse_from(argv).unwrap()
}

#[tokio::test]
async fn test_run_exits_one_on_unknown_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), "nope");

    assert_eq!(run(args_for(&config, &[])).await, 1);
}

#[tokio::test]
async fn test_run_exits_one_on_missing_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig {
        catalog_path: dir.path().join("absent.json"),
        ..config_in(dir.path(), "fast-execution")
    };

    assert_eq!(run(args_for(&config, &[])).await, 1);
}

#[tokio::test]
async fn test_run_exits_zero_on_dry_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), "subagent-driven-development");

    assert_eq!(run(args_for(&config, &["--dry-run", "--json"])).await, 0);
}

#[test]
fn test_success_text_report() {
    let run = WorkflowRun {
        summary: summary(vec![ok_node(1, "plan"), ok_node(2, "build")]),
        failure: None,
    };
    let mut out = Vec::new();
    let mut err = Vec::new();

    let code = report(&run, false, &mut out, &mut err).unwrap();

    assert_eq!(code, 0);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Workflow: wf\n- [ok] plan (coder) exit_code=0\n- [ok] build (coder) exit_code=0\n"
    );
    assert!(err.is_empty());
}

#[test]
fn test_failure_text_report() {
    let mut failed = ok_node(1, "build");
    failed.status = NodeStatus::Failed;
    failed.exit_code = Some(2);
    let run = WorkflowRun {
        summary: summary(vec![failed]),
        failure: Some(DispatchFailure {
            index: 1,
            node_id: "build".to_string(),
            role: "coder".to_string(),
            exit_code: 2,
            stderr: "compile error\n".to_string(),
        }),
    };
    let mut out = Vec::new();
    let mut err = Vec::new();

    let code = report(&run, false, &mut out, &mut err).unwrap();

    assert_eq!(code, 2);
    assert!(out.is_empty());
    assert_eq!(
        String::from_utf8(err).unwrap(),
        "[WORKFLOW] Node 'build' failed (role=coder, exit_code=2)\ncompile error\n"
    );
}

#[test]
fn test_json_report_has_sorted_keys() {
    let run = WorkflowRun {
        summary: summary(vec![ok_node(1, "plan")]),
        failure: None,
    };

    assert_eq!(
        render_json(&run.summary).unwrap(),
        r#"{"dry_run":false,"nodes":[{"exit_code":0,"id":"plan","index":1,"role":"coder","status":"ok"}],"request_id":"","track_id":"","workflow":"wf"}"#
    );

    let mut out = Vec::new();
    let mut err = Vec::new();
    report(&run, true, &mut out, &mut err).unwrap();
    assert!(String::from_utf8(out).unwrap().ends_with("}\n"));
}

#[cfg(unix)]
mod with_script {
    use super::*;

    const ECHO_SCRIPT: &str = r#"echo "$1|$2|${MULTIPOWERS_REQUEST_ID:-none}"
if [ "$1" = "architect" ] && [ "$2" = "Review review for add caching" ]; then
  echo "review rejected" >&2
  exit 4
fi
"#;

    #[tokio::test]
    async fn test_script_receives_role_prompt_and_request_id() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            request_id: Some("req-1".to_string()),
            ..config_in(dir.path(), "fast-execution")
        };
        let _guard = script_lock();
        write_script(&config.executor_path, ECHO_SCRIPT);

        let run = execute(&config).await.unwrap();

        assert!(run.succeeded());
        assert_eq!(
            run.summary.nodes[0].stdout.as_deref(),
            Some("coder|add caching|req-1")
        );
    }

    #[tokio::test]
    async fn test_script_failure_halts_and_logs_events() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("outputs/runs");
        let config = RunConfig {
            event_log_dir: Some(log_dir.clone()),
            ..config_in(dir.path(), "subagent-driven-development")
        };
        let _guard = script_lock();
        write_script(&config.executor_path, ECHO_SCRIPT);

        let run = execute(&config).await.unwrap();

        assert_eq!(run.exit_code(), 4);
        assert_eq!(run.summary.nodes.len(), 3);
        assert_eq!(run.summary.nodes[2].status, NodeStatus::Failed);
        assert_eq!(run.summary.nodes[2].stderr.as_deref(), Some("review rejected"));
        assert!(run.summary.nodes[0]
            .stdout
            .as_deref()
            .unwrap()
            .starts_with("architect|Plan add caching in subagent-driven-development|"));

        let files: Vec<_> = std::fs::read_dir(&log_dir).unwrap().flatten().collect();
        assert_eq!(files.len(), 1);
        let content = std::fs::read_to_string(files[0].path()).unwrap();
        assert_eq!(content.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_non_executable_file_is_not_an_executor() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "fast-execution");
        write_file(&config.executor_path, "#!/bin/sh\nexit 0\n");

        let err = execute(&config).await.unwrap_err();
        assert!(matches!(err, WorkflowError::ExecutorNotFound { .. }));
    }
}
