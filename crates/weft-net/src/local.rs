//! Detection of this node's identity on the overlay.
//!
//! `init` registers the host as a compute node under its hostname and the
//! address of the overlay-facing device. Address discovery decodes
//! `ip -j addr` JSON output rather than scraping text.

use std::net::Ipv4Addr;

use serde::Deserialize;

use weft_common::error::{Result, WeftError};

use crate::command::run_capture;

/// Returns this host's name.
///
/// # Errors
///
/// Returns an error if the hostname cannot be read.
pub fn hostname() -> Result<String> {
    let name = nix::unistd::gethostname().map_err(|e| WeftError::Config {
        message: format!("unable to read hostname: {e}"),
    })?;
    Ok(name.to_string_lossy().into_owned())
}

/// Returns the IPv4 address of the overlay-facing device.
///
/// # Errors
///
/// Fails when the device is absent or carries no IPv4 address; this is a
/// resolution error and aborts before any resource mutation.
pub fn overlay_address(device: &str) -> Result<Ipv4Addr> {
    let output = run_capture("ip", &["-j", "addr", "show", device])?;
    parse_overlay_address(&output, device)
}

#[derive(Debug, Deserialize)]
struct LinkEntry {
    #[serde(default)]
    addr_info: Vec<AddrEntry>,
}

#[derive(Debug, Deserialize)]
struct AddrEntry {
    family: String,
    local: String,
}

fn parse_overlay_address(json: &str, device: &str) -> Result<Ipv4Addr> {
    let links: Vec<LinkEntry> = serde_json::from_str(json)?;
    links
        .iter()
        .flat_map(|link| &link.addr_info)
        .find(|addr| addr.family == "inet")
        .and_then(|addr| addr.local.parse().ok())
        .ok_or_else(|| WeftError::Config {
            message: format!("unable to determine local address on {device}"),
        })
}
