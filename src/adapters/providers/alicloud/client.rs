//! Alibaba Cloud read client port.

use async_trait::async_trait;

use super::models::{
    Image, KeyPair, ListenerAttribute, ListenerProtocol, LoadBalancer, LoadBalancerAttribute,
    ScalingGroup, ScalingInstance, SecurityGroup, VServerGroup,
};
use crate::domain::errors::AgentError;

/// Read-only Alibaba Cloud operations, bound to one account and region.
///
/// Implementations wrap the SDK; paging is handled inside each call.
#[async_trait]
pub trait AlicloudClient: Send + Sync {
    async fn describe_load_balancers(&self) -> Result<Vec<LoadBalancer>, AgentError>;

    /// Load balancers whose name is exactly `name`.
    async fn describe_load_balancers_named(
        &self,
        name: &str,
    ) -> Result<Vec<LoadBalancer>, AgentError>;

    async fn describe_load_balancer_attribute(
        &self,
        load_balancer_id: &str,
    ) -> Result<LoadBalancerAttribute, AgentError>;

    async fn describe_listener_attribute(
        &self,
        load_balancer_id: &str,
        protocol: ListenerProtocol,
        listener_port: u16,
    ) -> Result<ListenerAttribute, AgentError>;

    async fn describe_v_server_groups(
        &self,
        load_balancer_id: &str,
    ) -> Result<Vec<VServerGroup>, AgentError>;

    async fn describe_scaling_groups(&self) -> Result<Vec<ScalingGroup>, AgentError>;

    async fn describe_scaling_instances(
        &self,
        scaling_group_id: &str,
    ) -> Result<Vec<ScalingInstance>, AgentError>;

    async fn describe_security_groups(&self) -> Result<Vec<SecurityGroup>, AgentError>;

    async fn describe_images(&self) -> Result<Vec<Image>, AgentError>;

    async fn describe_key_pairs(&self) -> Result<Vec<KeyPair>, AgentError>;
}
