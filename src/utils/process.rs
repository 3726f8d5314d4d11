use crate::aea::Invocation;
use crate::error::{Result, TacSetupError};
use crate::provision::Executor;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// Status a shell would report for `status`: the exit code, or
/// `128 + signal` when the child was killed by a signal.
pub fn status_code(status: ExitStatus) -> i32 {
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

/// Runs steps for real: creates directories and spawns the tool with
/// inherited stdio so its own diagnostics reach the user untouched.
#[derive(Debug, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn create_dir(&mut self, path: &Path) -> Result<()> {
        // Single level, like mkdir without -p: an existing path is an error
        std::fs::create_dir(path).map_err(|source| TacSetupError::DataDir {
            path: path.to_path_buf(),
            source,
        })
    }

    fn run(&mut self, invocation: &Invocation) -> Result<()> {
        tracing::debug!(
            cwd = %invocation.cwd.display(),
            command = %invocation.command_line(),
            "spawning"
        );

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| {
                TacSetupError::CommandFailed(format!(
                    "Failed to execute '{}' in {}: {}",
                    invocation.command_line(),
                    invocation.cwd.display(),
                    e
                ))
            })?;

        if !status.success() {
            return Err(TacSetupError::StepFailed {
                step: invocation.step_name(),
                code: status_code(status),
            });
        }

        Ok(())
    }
}
