//! Subprocess execution for build steps and fixture runs

use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::error::{hints, BrickbuildError};

/// Result of a subprocess execution
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,

    /// Process exit code (-1 when terminated by a signal)
    pub exit_code: i32,

    /// Captured standard output (empty when IO was inherited)
    pub stdout: String,

    /// Captured standard error (empty when IO was inherited)
    pub stderr: String,

    /// Execution duration
    pub duration: Duration,
}

impl CommandResult {
    /// Create a CommandResult from an exit status
    pub fn from_status(
        status: ExitStatus,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        let exit_code = status.code().unwrap_or(-1);
        Self {
            success: status.success(),
            exit_code,
            stdout,
            stderr,
            duration,
        }
    }
}

/// External process collaborator.
///
/// The pipeline and the fixture runner only ever see this interface: an
/// argument vector, a working directory, and an exit code back. Tests
/// substitute a scripted implementation.
pub trait ProcessRunner {
    /// Check that `program` can be found at all before anything runs
    fn ensure_available(&self, program: &str) -> Result<()>;

    /// Run `argv` in `cwd`. With `capture` the child's output is returned
    /// in the result; otherwise the child inherits this process's stdio.
    fn run(&self, argv: &[String], cwd: &Path, capture: bool) -> Result<CommandResult>;
}

/// Real runner backed by `std::process::Command`
pub struct CommandRunner;

impl ProcessRunner for CommandRunner {
    fn ensure_available(&self, program: &str) -> Result<()> {
        if which::which(program).is_err() {
            return Err(BrickbuildError::missing_tool(
                program,
                "compiling and linking the build steps",
                hints::visual_studio(),
            )
            .into());
        }
        Ok(())
    }

    fn run(&self, argv: &[String], cwd: &Path, capture: bool) -> Result<CommandResult> {
        let (program, args) = argv.split_first().context("empty argument vector")?;
        let start = Instant::now();

        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(cwd);

        if capture {
            let output = cmd
                .output()
                .with_context(|| format!("Failed to execute {}", program))?;

            let duration = start.elapsed();
            let stdout = String::from_utf8_lossy(&output.stdout).to_string();
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();

            Ok(CommandResult::from_status(
                output.status,
                stdout,
                stderr,
                duration,
            ))
        } else {
            // Inherit stdin/stdout/stderr so compiler output streams through
            cmd.stdin(Stdio::inherit());
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());

            let status = cmd
                .status()
                .with_context(|| format!("Failed to execute {}", program))?;

            let duration = start.elapsed();
            Ok(CommandResult::from_status(
                status,
                String::new(),
                String::new(),
                duration,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_argv_is_an_error() {
        let runner = CommandRunner;
        assert!(runner.run(&[], Path::new("."), true).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_captures_output_and_exit_code() {
        let runner = CommandRunner;
        let argv = vec![
            "sh".to_string(),
            "-c".to_string(),
            "echo out; echo err >&2; exit 3".to_string(),
        ];

        let result = runner.run(&argv, Path::new("."), true).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, 3);
        assert_eq!(result.stdout, "out\n");
        assert_eq!(result.stderr, "err\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_uses_the_given_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let runner = CommandRunner;
        let argv = vec!["sh".to_string(), "-c".to_string(), "pwd".to_string()];

        let result = runner.run(&argv, dir.path(), true).unwrap();

        assert!(result.success);
        let cwd = std::path::PathBuf::from(result.stdout.trim());
        assert_eq!(
            cwd.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_ensure_available_reports_missing_tools() {
        let runner = CommandRunner;
        let err = runner
            .ensure_available("definitely-not-a-real-compiler.exe")
            .unwrap_err();
        let err = err.downcast::<BrickbuildError>().unwrap();
        assert!(matches!(err, BrickbuildError::MissingTool { .. }));
    }
}
