//! Dataplane forwarding registration.
//!
//! The local agent owns the forwarding table; registering a port tells it
//! which host device carries a given interface's traffic. Registration
//! state is independent of controller resource existence: unregistering is
//! safe after the interface resource is already gone.

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Serialize;

use weft_common::error::{Result, WeftError};
use weft_controller::resources::{Interface, Resource, Workload};

/// Forwarding-table registration keyed by interface identity.
pub trait ForwardingRegistrar {
    /// Registers the host device carrying an interface's traffic.
    ///
    /// # Errors
    ///
    /// Returns an error if the agent rejects the registration.
    fn register(&self, workload: &Workload, iface: &Interface, host_device: &str) -> Result<()>;

    /// Drops the forwarding entry for an interface. An unknown interface
    /// is success.
    ///
    /// # Errors
    ///
    /// Returns an error for agent failures other than "not found".
    fn unregister(&self, iface_uuid: &str) -> Result<()>;
}

/// Port record sent to the dataplane agent.
#[derive(Debug, Serialize)]
struct PortRequest<'a> {
    /// Interface UUID, the port's identity.
    id: &'a str,
    /// Owning workload UUID.
    instance_id: &'a str,
    /// Host-side device name.
    system_name: &'a str,
    /// Fully-qualified network name, for diagnostics on the agent side.
    network: String,
}

/// Blocking HTTP client against the local dataplane agent.
#[derive(Debug)]
pub struct AgentClient {
    client: Client,
    base: String,
}

impl AgentClient {
    /// Creates a client for the given agent endpoint.
    #[must_use]
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            base: endpoint.trim_end_matches('/').to_string(),
        }
    }

    fn api_error(err: &reqwest::Error) -> WeftError {
        WeftError::Api {
            message: format!("dataplane agent: {err}"),
        }
    }
}

impl ForwardingRegistrar for AgentClient {
    fn register(&self, workload: &Workload, iface: &Interface, host_device: &str) -> Result<()> {
        let request = PortRequest {
            id: iface.require_uuid()?,
            instance_id: workload.require_uuid()?,
            system_name: host_device,
            network: iface.network_ref.to_string(),
        };
        tracing::debug!(port = request.id, device = host_device, "registering port");
        let _ = self
            .client
            .post(format!("{}/port", self.base))
            .json(&request)
            .send()
            .map_err(|e| Self::api_error(&e))?
            .error_for_status()
            .map_err(|e| Self::api_error(&e))?;
        Ok(())
    }

    fn unregister(&self, iface_uuid: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/port/{iface_uuid}", self.base))
            .send()
            .map_err(|e| Self::api_error(&e))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        let _ = response.error_for_status().map_err(|e| Self::api_error(&e))?;
        tracing::debug!(port = iface_uuid, "port unregistered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_request_serializes_expected_shape() {
        let request = PortRequest {
            id: "iface-uuid",
            instance_id: "workload-uuid",
            system_name: "vethabcdef01234",
            network: "default-domain:team-a:default".to_string(),
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["id"], "iface-uuid");
        assert_eq!(value["instance_id"], "workload-uuid");
        assert_eq!(value["system_name"], "vethabcdef01234");
        assert_eq!(value["network"], "default-domain:team-a:default");
    }

    #[test]
    fn register_requires_persisted_resources() {
        let client = AgentClient::new("http://127.0.0.1:9091");
        let id = weft_common::types::ContainerId::new("abcdef0123456789")
            .short()
            .expect("short id");
        let workload = Workload::new(&id);
        let project = weft_controller::resources::Project::new("team-a");
        let network = weft_controller::resources::VirtualNetwork::new(&project, "default");
        let iface = Interface::new(&workload, &network, "veth0");

        // no uuid assigned yet, so the request must fail before any I/O
        assert!(client.register(&workload, &iface, "veth0").is_err());
    }
}
