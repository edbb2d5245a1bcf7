//! Status-checked invocation of OS networking commands.
//!
//! The wiring code never parses free-form command output for correctness;
//! commands either succeed or fail by exit status, and the only output ever
//! decoded is `ip -j` JSON.

use std::process::Command;

use weft_common::error::{Result, WeftError};

/// Runs a command, discarding output, failing on nonzero exit.
pub(crate) fn run(program: &str, args: &[&str]) -> Result<()> {
    let _ = run_capture(program, args)?;
    Ok(())
}

/// Runs a command and returns its standard output, failing on nonzero exit.
pub(crate) fn run_capture(program: &str, args: &[&str]) -> Result<String> {
    tracing::debug!(program, ?args, "running command");
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| WeftError::Io {
            path: program.into(),
            source: e,
        })?;
    if !output.status.success() {
        return Err(WeftError::Command {
            command: format!("{program} {}", args.join(" ")),
            status: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
