use super::query::GitQuery;
use crate::error::{CodeTimeError, Result};
use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, trace};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Runs version-control queries. Failures of any kind surface as "no data".
pub trait CommandRunner {
    /// Output lines, or `None` if the command could not produce any.
    fn run(&self, query: &GitQuery, cwd: &Path) -> Option<Vec<String>>;

    /// First non-empty output line, trimmed, or `""`.
    fn run_line(&self, query: &GitQuery, cwd: &Path) -> String {
        self.run(query, cwd)
            .and_then(|lines| lines.into_iter().map(|l| l.trim().to_string()).find(|l| !l.is_empty()))
            .unwrap_or_default()
    }

    /// Awaitable form of [`CommandRunner::run`] for callers that fan out
    /// several queries at once. Falls back to the blocking call.
    fn run_async<'a>(
        &'a self,
        query: &'a GitQuery,
        cwd: &'a Path,
    ) -> impl Future<Output = Option<Vec<String>>> + 'a {
        async move { self.run(query, cwd) }
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, query: &GitQuery, cwd: &Path) -> Option<Vec<String>> {
        (**self).run(query, cwd)
    }

    fn run_async<'a>(
        &'a self,
        query: &'a GitQuery,
        cwd: &'a Path,
    ) -> impl Future<Output = Option<Vec<String>>> + 'a {
        (**self).run_async(query, cwd)
    }
}

/// Spawns the `git` binary directly, bounded by a timeout.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    timeout: Duration,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl GitCli {
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: "git".to_string(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Blocking form of [`GitCli::output`] on a current-thread runtime.
    pub fn exec(&self, query: &GitQuery, cwd: &Path) -> Result<Vec<String>> {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(self.output(query, cwd))
    }

    /// Runs `query` in `cwd`. The child is killed if it outlives the timeout.
    pub async fn output(&self, query: &GitQuery, cwd: &Path) -> Result<Vec<String>> {
        let command = query.to_string();
        let child = Command::new(&self.program)
            .args(query.args())
            .current_dir(cwd)
            // Clear GIT_DIR so hook environments don't redirect the query
            .env_remove("GIT_DIR")
            .env_remove("GIT_WORK_TREE")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, child).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => return Err(CodeTimeError::Spawn { command, source }),
            Err(_) => {
                return Err(CodeTimeError::Timeout {
                    command,
                    timeout: self.timeout,
                })
            }
        };

        if !output.status.success() {
            return Err(CodeTimeError::Exit {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8(output.stdout).map_err(|_| CodeTimeError::Utf8(command))?;
        Ok(query.pipeline().apply(split_lines(&text)))
    }

    fn report(query: &GitQuery, cwd: &Path, result: Result<Vec<String>>) -> Option<Vec<String>> {
        match result {
            Ok(lines) => {
                trace!(command = %query, cwd = %cwd.display(), lines = lines.len(), "git query finished");
                Some(lines)
            }
            Err(e) => {
                debug!(cwd = %cwd.display(), error = %e, "git query produced no data");
                None
            }
        }
    }
}

impl CommandRunner for GitCli {
    fn run(&self, query: &GitQuery, cwd: &Path) -> Option<Vec<String>> {
        Self::report(query, cwd, self.exec(query, cwd))
    }

    fn run_async<'a>(
        &'a self,
        query: &'a GitQuery,
        cwd: &'a Path,
    ) -> impl Future<Output = Option<Vec<String>>> + 'a {
        async move { Self::report(query, cwd, self.output(query, cwd).await) }
    }
}

/// Splits on `\n`, strips `\r`, and drops whitespace-only lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect()
}
