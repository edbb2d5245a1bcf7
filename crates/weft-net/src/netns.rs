//! Network namespace links and veth wiring.
//!
//! A container's kernel namespace is made addressable by name through a
//! symlink in the well-known namespace directory, keyed by the truncated
//! container id. The veth pair carries traffic between the host dataplane
//! and the container; the host-side device name is derived from the same id
//! so teardown can find it without any extra index.

use std::path::{Path, PathBuf};

use weft_common::constants::SHORT_ID_LEN;
use weft_common::error::{Result, WeftError};
use weft_common::types::ShortId;

use crate::command::run;

// host device name must fit IFNAMSIZ including the trailing NUL
const _: () = assert!("veth".len() + SHORT_ID_LEN < libc::IFNAMSIZ);

/// Stable host-side veth device name for a container.
#[must_use]
pub fn host_device(id: &ShortId) -> String {
    format!("veth{id}")
}

fn temp_peer(id: &ShortId) -> String {
    format!("tmp{id}")
}

/// Namespace and veth operations the orchestrator depends on.
///
/// `clear_interfaces` and `remove_namespace` are idempotent with respect to
/// "already absent" so teardown can always run them.
pub trait NamespaceManager {
    /// Links a process's network namespace into the namespace directory
    /// under the container's short id.
    ///
    /// A pre-existing link for the same id is overwritten; re-running setup
    /// without a prior teardown replaces a stale link.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or link cannot be created.
    fn link_namespace(&self, id: &ShortId, pid: u32) -> Result<()>;

    /// Creates a veth pair, moves one end into the container's namespace
    /// under the logical name, and returns the host-side device name.
    ///
    /// # Errors
    ///
    /// Returns an error if any link operation fails.
    fn create_interface(&self, id: &ShortId, ifname: &str) -> Result<String>;

    /// Assigns an address to the namespace-side device and brings it up.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-namespace configuration fails.
    fn configure_interface(
        &self,
        id: &ShortId,
        ifname: &str,
        ip: std::net::Ipv4Addr,
        prefix_len: u8,
    ) -> Result<()>;

    /// Removes the veth devices associated with the namespace.
    /// An already-absent device is success.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing device cannot be deleted.
    fn clear_interfaces(&self, id: &ShortId) -> Result<()>;

    /// Removes the namespace link. A missing link is success.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing link cannot be removed.
    fn remove_namespace(&self, id: &ShortId) -> Result<()>;
}

/// Namespace manager operating on this host via `ip(8)` and the filesystem.
#[derive(Debug)]
pub struct NetnsManager {
    netns_dir: PathBuf,
}

impl NetnsManager {
    /// Creates a manager rooted at the given namespace directory.
    #[must_use]
    pub fn new(netns_dir: impl Into<PathBuf>) -> Self {
        Self {
            netns_dir: netns_dir.into(),
        }
    }

    /// Verifies that the iproute2 tooling is installed.
    ///
    /// # Errors
    ///
    /// Returns an error if `ip` is not on the search path.
    pub fn verify_tools() -> Result<()> {
        let _ = which::which("ip").map_err(|e| WeftError::Config {
            message: format!("iproute2 not found: {e}"),
        })?;
        Ok(())
    }

    fn link_path(&self, id: &ShortId) -> PathBuf {
        self.netns_dir.join(id.as_str())
    }

    fn io_error(path: &Path, source: std::io::Error) -> WeftError {
        WeftError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl NamespaceManager for NetnsManager {
    fn link_namespace(&self, id: &ShortId, pid: u32) -> Result<()> {
        if !self.netns_dir.exists() {
            std::fs::create_dir_all(&self.netns_dir)
                .map_err(|e| Self::io_error(&self.netns_dir, e))?;
        }
        let link = self.link_path(id);
        match std::fs::remove_file(&link) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Self::io_error(&link, e)),
        }
        let target = format!("/proc/{pid}/ns/net");
        tracing::debug!(%id, pid, "linking network namespace");
        std::os::unix::fs::symlink(&target, &link).map_err(|e| Self::io_error(&link, e))
    }

    fn create_interface(&self, id: &ShortId, ifname: &str) -> Result<String> {
        let host = host_device(id);
        let peer = temp_peer(id);
        tracing::debug!(%id, host, ifname, "creating veth pair");
        run("ip", &["link", "add", &host, "type", "veth", "peer", "name", &peer])?;
        run("ip", &["link", "set", &peer, "netns", id.as_str()])?;
        run(
            "ip",
            &["netns", "exec", id.as_str(), "ip", "link", "set", &peer, "name", ifname],
        )?;
        run("ip", &["link", "set", &host, "up"])?;
        Ok(host)
    }

    fn configure_interface(
        &self,
        id: &ShortId,
        ifname: &str,
        ip: std::net::Ipv4Addr,
        prefix_len: u8,
    ) -> Result<()> {
        let cidr = format!("{ip}/{prefix_len}");
        tracing::debug!(%id, ifname, %cidr, "configuring namespace device");
        run(
            "ip",
            &["netns", "exec", id.as_str(), "ip", "addr", "add", &cidr, "dev", ifname],
        )?;
        run(
            "ip",
            &["netns", "exec", id.as_str(), "ip", "link", "set", ifname, "up"],
        )
    }

    fn clear_interfaces(&self, id: &ShortId) -> Result<()> {
        let host = host_device(id);
        // deleting the host side removes the pair; absent means already cleared
        if !Path::new("/sys/class/net").join(&host).exists() {
            return Ok(());
        }
        tracing::debug!(%id, host, "deleting veth pair");
        run("ip", &["link", "del", &host])
    }

    fn remove_namespace(&self, id: &ShortId) -> Result<()> {
        let link = self.link_path(id);
        match std::fs::remove_file(&link) {
            Ok(()) => {
                tracing::debug!(%id, "namespace link removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(&link, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use weft_common::types::ContainerId;

    use super::*;

    fn short_id() -> ShortId {
        ContainerId::new("abcdef0123456789")
            .short()
            .expect("short id")
    }

    #[test]
    fn host_device_name_fits_ifnamsiz() {
        let host = host_device(&short_id());
        assert_eq!(host, "vethabcdef01234");
        assert!(host.len() < libc::IFNAMSIZ);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn namespace_link_lifecycle() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = NetnsManager::new(dir.path().join("netns"));
        let id = short_id();
        let pid = std::process::id();

        manager.link_namespace(&id, pid).expect("link");
        let link = dir.path().join("netns").join(id.as_str());
        assert!(std::fs::symlink_metadata(&link).expect("metadata").file_type().is_symlink());

        // re-linking replaces a stale link rather than failing
        manager.link_namespace(&id, pid).expect("relink");

        manager.remove_namespace(&id).expect("remove");
        assert!(std::fs::symlink_metadata(&link).is_err());
    }

    #[test]
    fn remove_namespace_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = NetnsManager::new(dir.path());
        manager
            .remove_namespace(&short_id())
            .expect("missing link is success");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn clear_interfaces_with_no_device_is_success() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = NetnsManager::new(dir.path());
        manager
            .clear_interfaces(&short_id())
            .expect("absent device is success");
    }
}
