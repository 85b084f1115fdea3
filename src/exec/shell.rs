// src/exec/shell.rs

//! Runs product commands through the platform shell.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::{anyhow, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::exec::backend::{CommandExecutor, CommandJob};

/// Lines of stderr kept for the error message of a failed command.
const STDERR_TAIL: usize = 5;

/// Executor that runs each command with `sh -c` (`cmd /C` on Windows).
///
/// Output is forwarded to the log line by line: stdout at info, stderr at
/// warn.
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for ShellExecutor {
    fn execute<'a>(
        &'a self,
        job: &'a CommandJob,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(run_command(job))
    }
}

async fn run_command(job: &CommandJob) -> Result<()> {
    debug!(output = %job.target.display(), cmd = %job.command, "starting command");

    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&job.command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&job.command);
        c
    };

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning command for {}", job.product))?;

    let stdout_task = child.stdout.take().map(|stdout| {
        let product = job.product.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!(product = %product, "{}", line);
            }
        })
    });

    let stderr_task = child.stderr.take().map(|stderr| {
        let product = job.product.clone();
        tokio::spawn(async move {
            let mut tail = VecDeque::with_capacity(STDERR_TAIL);
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                warn!(product = %product, "{}", line);
                if tail.len() == STDERR_TAIL {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
            tail
        })
    });

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for command of {}", job.product))?;

    if let Some(task) = stdout_task {
        let _ = task.await;
    }
    let tail = match stderr_task {
        Some(task) => task.await.unwrap_or_default(),
        None => VecDeque::new(),
    };

    debug!(
        output = %job.target.display(),
        exit_code = status.code().unwrap_or(-1),
        success = status.success(),
        "command exited"
    );

    if status.success() {
        return Ok(());
    }

    let code = status
        .code()
        .map_or_else(|| "a signal".to_string(), |c| format!("status {c}"));
    if tail.is_empty() {
        Err(anyhow!("command exited with {code}"))
    } else {
        let tail: Vec<String> = tail.into_iter().collect();
        Err(anyhow!("command exited with {code}: {}", tail.join(" | ")))
    }
}
