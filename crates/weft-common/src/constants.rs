//! System-wide constants and well-known names.

/// Domain under which all projects are parented.
pub const ROOT_DOMAIN: &str = "default-domain";

/// Global configuration scope under which compute nodes are registered.
pub const GLOBAL_SYSTEM_CONFIG: &str = "default-global-system-config";

/// Name of the per-project address-management object.
pub const DEFAULT_ADDRESS_MANAGER: &str = "default-network-ipam";

/// Logical network name every pod attaches to.
pub const DEFAULT_NETWORK: &str = "default";

/// Subnet attached to a network on first creation.
pub const DEFAULT_SUBNET: &str = "10.0.0.0/8";

/// Logical interface name inside the container namespace.
pub const CONTAINER_IFNAME: &str = "veth0";

/// Length of the truncated container identifier.
pub const SHORT_ID_LEN: usize = 11;

/// Well-known directory of named network namespace links.
pub const NETNS_DIR: &str = "/var/run/netns";

/// Host device that carries overlay traffic; its address identifies this node.
pub const OVERLAY_DEVICE: &str = "vhost0";

/// Default controller API endpoint.
pub const DEFAULT_API_ENDPOINT: &str = "http://127.0.0.1:8082";

/// Default dataplane agent endpoint for port registration.
pub const DEFAULT_AGENT_ENDPOINT: &str = "http://127.0.0.1:9091";

/// Application name used in CLI output.
pub const APP_NAME: &str = "weft";
