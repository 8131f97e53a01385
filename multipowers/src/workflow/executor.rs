//! Role executors: whatever actually carries out a node for a role
//!
//! The process executor runs `<executor_path> <role> <prompt>` and waits for it to
//! exit. No timeout is applied; an executor that never exits blocks the run.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

use crate::error::WorkflowError;

/// Environment variable carrying the request id into executor processes
pub const REQUEST_ID_ENV: &str = "MULTIPOWERS_REQUEST_ID";

/// Captured result of one executor invocation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionOutput {
    /// Output for an executor that could not be started at all
    pub fn spawn_failure(err: &io::Error) -> Self {
        let exit_code = if err.kind() == io::ErrorKind::NotFound {
            127
        } else {
            126
        };

        Self {
            exit_code,
            stdout: String::new(),
            stderr: format!("failed to start role executor: {}", err),
        }
    }
}

#[async_trait]
pub trait RoleExecutor: Send + Sync {
    /// Checked once before the first node is dispatched
    fn ensure_available(&self) -> Result<(), WorkflowError> {
        Ok(())
    }

    /// Run one node to completion
    async fn execute(&self, role: &str, prompt: &str, request_id: Option<&str>) -> io::Result<ExecutionOutput>;
}

/// Runs an external executable per node
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    path: PathBuf,
    request_id_var: String,
}

impl ProcessExecutor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            request_id_var: REQUEST_ID_ENV.to_string(),
        }
    }

    /// Override the variable name the request id is exported under
    pub fn with_request_id_var(mut self, name: impl Into<String>) -> Self {
        self.request_id_var = name.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RoleExecutor for ProcessExecutor {
    fn ensure_available(&self) -> Result<(), WorkflowError> {
        if self.path.is_file() && is_executable(&self.path) {
            Ok(())
        } else {
            Err(WorkflowError::ExecutorNotFound {
                path: self.path.clone(),
            })
        }
    }

    async fn execute(&self, role: &str, prompt: &str, request_id: Option<&str>) -> io::Result<ExecutionOutput> {
        let mut cmd = Command::new(&self.path);
        cmd.arg(role)
            .arg(prompt)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(request_id) = request_id.filter(|id| !id.is_empty()) {
            cmd.env(&self.request_id_var, request_id);
        }

        let output = cmd.output().await?;

        Ok(ExecutionOutput {
            exit_code: exit_code_of(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Numeric exit code; a signal-terminated child maps to 128 + signal
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

/// Check if a file is executable
fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        path.exists()
    }
}
