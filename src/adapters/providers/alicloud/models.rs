//! Alibaba Cloud API response models.
//!
//! These structs mirror the SLB, ESS and ECS `Describe*` payloads the caching
//! agents consume. Field names serialize in the API's camelCase so cached
//! attributes match what the console and SDKs show.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A Server Load Balancer instance from `DescribeLoadBalancers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancer {
    pub load_balancer_id: String,
    pub load_balancer_name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub address_type: Option<String>,
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub load_balancer_status: Option<String>,
    #[serde(default)]
    pub create_time: Option<String>,
}

/// Listener summary inside a load balancer attribute response.
///
/// `listenerProtocal` is the API's own spelling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerPortAndProtocol {
    pub listener_port: u16,
    #[serde(rename = "listenerProtocal")]
    pub listener_protocol: String,
}

impl ListenerPortAndProtocol {
    pub fn protocol(&self) -> ListenerProtocol {
        ListenerProtocol::from_api(&self.listener_protocol)
    }
}

/// Listener protocols with their own `Describe*ListenerAttribute` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerProtocol {
    Http,
    Https,
    Tcp,
    Udp,
}

impl ListenerProtocol {
    /// Case-insensitive; anything unrecognised is described as HTTP.
    pub fn from_api(protocol: &str) -> Self {
        match protocol.to_ascii_uppercase().as_str() {
            "HTTPS" => Self::Https,
            "TCP" => Self::Tcp,
            "UDP" => Self::Udp,
            _ => Self::Http,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "HTTP",
            Self::Https => "HTTPS",
            Self::Tcp => "TCP",
            Self::Udp => "UDP",
        }
    }
}

/// Per-protocol listener detail. Each protocol returns a different shape,
/// so the payload is kept as the raw object.
pub type ListenerAttribute = Map<String, Value>;

/// A backend ECS instance attached to a load balancer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendServer {
    pub server_id: String,
    #[serde(default)]
    pub weight: Option<u32>,
}

/// Detail from `DescribeLoadBalancerAttribute`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerAttribute {
    #[serde(default, rename = "listenerPortsAndProtocal")]
    pub listener_ports_and_protocol: Vec<ListenerPortAndProtocol>,
    #[serde(default)]
    pub backend_servers: Vec<BackendServer>,
}

/// A virtual server group from `DescribeVServerGroups`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VServerGroup {
    pub v_server_group_id: String,
    #[serde(default)]
    pub v_server_group_name: Option<String>,
}

/// An auto scaling group from `DescribeScalingGroups`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalingGroup {
    pub scaling_group_id: String,
    pub scaling_group_name: String,
    #[serde(default)]
    pub lifecycle_state: Option<String>,
    #[serde(default)]
    pub min_size: u32,
    #[serde(default)]
    pub max_size: u32,
    #[serde(default)]
    pub active_capacity: u32,
    #[serde(default)]
    pub active_scaling_configuration_id: Option<String>,
    #[serde(default)]
    pub load_balancer_ids: Vec<String>,
    #[serde(default)]
    pub v_switch_ids: Vec<String>,
    #[serde(default)]
    pub creation_time: Option<String>,
}

/// An instance inside a scaling group from `DescribeScalingInstances`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalingInstance {
    pub instance_id: String,
    #[serde(default)]
    pub health_status: Option<String>,
    #[serde(default)]
    pub lifecycle_state: Option<String>,
    #[serde(default)]
    pub zone_id: Option<String>,
}

/// An ECS security group from `DescribeSecurityGroups`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroup {
    pub security_group_id: String,
    pub security_group_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub creation_time: Option<String>,
}

/// An ECS image from `DescribeImages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub image_id: String,
    pub image_name: String,
    #[serde(default)]
    pub os_name: Option<String>,
    #[serde(default)]
    pub architecture: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub image_owner_alias: Option<String>,
    #[serde(default)]
    pub creation_time: Option<String>,
}

/// An ECS key pair from `DescribeKeyPairs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPair {
    pub key_pair_name: String,
    #[serde(default)]
    pub key_pair_finger_print: Option<String>,
}
