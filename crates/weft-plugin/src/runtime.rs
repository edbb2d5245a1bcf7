//! Container runtime collaborator.
//!
//! The only question asked of the runtime is which OS process anchors a
//! container, so its network namespace can be found under `/proc`.

use std::process::Command;

use weft_common::error::{Result, WeftError};
use weft_common::types::ContainerId;

/// Resolves a container's root OS process.
pub trait ContainerRuntime {
    /// Returns the container's root process id.
    ///
    /// A pid of zero means the container exists but has not started; the
    /// caller decides whether that is fatal.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be queried.
    fn container_pid(&self, id: &ContainerId) -> Result<u32>;
}

/// Docker-backed runtime lookup via `docker inspect`.
#[derive(Debug, Default)]
pub struct Docker;

impl ContainerRuntime for Docker {
    fn container_pid(&self, id: &ContainerId) -> Result<u32> {
        let output = Command::new("docker")
            .args(["inspect", "-f", "{{.State.Pid}}", id.as_str()])
            .output()
            .map_err(|e| WeftError::Io {
                path: "docker".into(),
                source: e,
            })?;
        if !output.status.success() {
            return Err(WeftError::Command {
                command: format!("docker inspect {id}"),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let text = String::from_utf8_lossy(&output.stdout);
        text.trim().parse().map_err(|_| WeftError::Config {
            message: format!("unparsable pid `{}` for container {id}", text.trim()),
        })
    }
}
