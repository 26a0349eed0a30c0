use crate::common::{CohoError, CohoResult};
use async_trait::async_trait;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::process::Command as TokioCommand;
use tracing::debug;

/// How the child's standard streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioMode {
    /// Capture stdout/stderr and hand them back to the caller.
    Capture,
    /// Stream straight to the terminal; needed for commands that prompt.
    Inherit,
}

/// Whether the command line and its output are echoed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Print the command and its output
    Loud,
    /// Print neither
    Silent,
    /// Print the output only
    OutputOnly,
    /// Print the command only
    CommandOnly,
}

impl Verbosity {
    pub fn prints_command(&self) -> bool {
        matches!(self, Verbosity::Loud | Verbosity::CommandOnly)
    }

    pub fn prints_output(&self) -> bool {
        matches!(self, Verbosity::Loud | Verbosity::OutputOnly)
    }
}

/// Per-call execution options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOptions {
    pub verbosity: Verbosity,
    /// Swallow a non-zero exit and return `None` instead of failing the run
    pub allow_error: bool,
    pub stdio: StdioMode,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Loud,
            allow_error: false,
            stdio: StdioMode::Capture,
        }
    }
}

impl ExecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for probes: nothing echoed.
    pub fn silent() -> Self {
        Self::default().with_verbosity(Verbosity::Silent)
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn allowing_error(mut self) -> Self {
        self.allow_error = true;
        self
    }

    pub fn inherit_stdio(mut self) -> Self {
        self.stdio = StdioMode::Inherit;
        self
    }
}

/// Result of a single subprocess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Spawns processes. The seam tests replace with a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, dir: &Path, argv: &[String], stdio: StdioMode) -> CohoResult<ExecOutput>;
}

/// [`CommandRunner`] backed by real child processes
#[derive(Debug, Default)]
pub struct SystemCommandRunner;

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, dir: &Path, argv: &[String], stdio: StdioMode) -> CohoResult<ExecOutput> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| CohoError::internal_error("Command is empty"))?;
        let command_line = argv.join(" ");

        let mut cmd = TokioCommand::new(program);
        cmd.args(args).current_dir(dir);

        match stdio {
            StdioMode::Capture => {
                cmd.stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped());
                let output = cmd
                    .output()
                    .await
                    .map_err(|e| CohoError::command_error_with_source(command_line, e))?;
                Ok(ExecOutput::new(
                    output.status.code().unwrap_or(-1),
                    String::from_utf8_lossy(&output.stdout),
                    String::from_utf8_lossy(&output.stderr),
                ))
            }
            StdioMode::Inherit => {
                cmd.stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
                let status = cmd
                    .status()
                    .await
                    .map_err(|e| CohoError::command_error_with_source(command_line, e))?;
                Ok(ExecOutput::new(status.code().unwrap_or(-1), "", ""))
            }
        }
    }
}

/// Number of `git commit` invocations made during one command.
#[derive(Debug, Clone, Default)]
pub struct CommitCounter(Arc<AtomicUsize>);

impl CommitCounter {
    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// One entry of a concurrent batch
#[derive(Debug, Clone)]
pub struct ExecTask {
    pub dir: PathBuf,
    pub argv: Vec<String>,
    pub options: ExecOptions,
}

impl ExecTask {
    pub fn new<S: AsRef<str>>(dir: impl Into<PathBuf>, argv: &[S], options: ExecOptions) -> Self {
        Self {
            dir: dir.into(),
            argv: argv.iter().map(|s| s.as_ref().to_string()).collect(),
            options,
        }
    }
}

fn is_git_commit(argv: &[String]) -> bool {
    argv.len() >= 2 && argv[0] == "git" && argv[1] == "commit"
}

/// Runs external commands with coho's failure policy: any unexpected
/// non-zero exit is fatal to the whole run unless the caller allowed it.
#[derive(Clone)]
pub struct Executor {
    runner: Arc<dyn CommandRunner>,
    commits: CommitCounter,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new(Arc::new(SystemCommandRunner))
    }
}

impl Executor {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            commits: CommitCounter::default(),
        }
    }

    /// Counter of commits made through this executor.
    pub fn commits(&self) -> &CommitCounter {
        &self.commits
    }

    /// Run `argv` in `dir`.
    ///
    /// Returns the captured stdout with trailing whitespace removed (empty for
    /// [`StdioMode::Inherit`]), or `None` when the command failed and
    /// `allow_error` was set.
    pub async fn exec<S: AsRef<str>>(
        &self,
        dir: &Path,
        argv: &[S],
        options: ExecOptions,
    ) -> CohoResult<Option<String>> {
        let argv: Vec<String> = argv.iter().map(|s| s.as_ref().to_string()).collect();
        let command_line = argv.join(" ");

        if is_git_commit(&argv) {
            self.commits.increment();
        }
        if options.verbosity.prints_command() {
            println!("{} {}", "Executing:".dimmed(), command_line);
        }
        debug!(dir = %dir.display(), command = %command_line, "executing");

        let output = match self.runner.run(dir, &argv, options.stdio).await {
            Ok(output) => output,
            Err(e) if options.allow_error => {
                debug!(command = %command_line, error = %e, "spawn failed, error allowed");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if output.success() {
            let stdout = output.stdout.trim_end().to_string();
            if options.verbosity.prints_output() && !stdout.is_empty() {
                println!("{}", stdout);
            }
            return Ok(Some(stdout));
        }

        if options.allow_error {
            debug!(command = %command_line, exit_code = output.exit_code, "command failed, error allowed");
            return Ok(None);
        }

        if !output.stdout.trim().is_empty() {
            eprintln!("{}", output.stdout.trim_end());
        }
        if !output.stderr.trim().is_empty() {
            eprintln!("{}", output.stderr.trim_end().red());
        }
        Err(CohoError::command_error(
            command_line,
            Some(output.exit_code),
            output.stderr.trim_end(),
        ))
    }

    /// Run every task concurrently and wait for the whole batch.
    ///
    /// All tasks run to completion; the first failure, in task order, is
    /// returned afterwards.
    pub async fn exec_parallel(&self, tasks: Vec<ExecTask>) -> CohoResult<Vec<Option<String>>> {
        let futures = tasks
            .iter()
            .map(|task| self.exec(&task.dir, task.argv.as_slice(), task.options));
        futures::future::join_all(futures)
            .await
            .into_iter()
            .collect()
    }

    /// Fail unless `program --version` runs.
    pub async fn ensure_installed(&self, program: &str, dir: &Path) -> CohoResult<()> {
        let probe = self
            .exec(dir, &[program, "--version"], ExecOptions::silent().allowing_error())
            .await?;
        match probe {
            Some(_) => Ok(()),
            None => Err(CohoError::internal_error(format!(
                "`{}` is required but was not found on PATH",
                program
            ))),
        }
    }
}
