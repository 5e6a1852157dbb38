//! Canned Alibaba Cloud client for agent tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use super::client::AlicloudClient;
use super::models::{
    Image, KeyPair, ListenerAttribute, ListenerProtocol, LoadBalancer, LoadBalancerAttribute,
    ScalingGroup, ScalingInstance, SecurityGroup, VServerGroup,
};
use crate::domain::errors::AgentError;
use crate::domain::models::AccountCredentials;
use crate::domain::ports::ClientFactory;

#[derive(Default)]
pub(crate) struct FakeAlicloud {
    pub load_balancers: Vec<LoadBalancer>,
    pub attributes: HashMap<String, LoadBalancerAttribute>,
    /// (load balancer id, port) -> listener detail
    pub listeners: HashMap<(String, u16), ListenerAttribute>,
    pub v_server_groups: HashMap<String, Vec<VServerGroup>>,
    pub scaling_groups: Vec<ScalingGroup>,
    pub scaling_instances: HashMap<String, Vec<ScalingInstance>>,
    pub security_groups: Vec<SecurityGroup>,
    pub images: Vec<Image>,
    pub key_pairs: Vec<KeyPair>,
    pub fail: Option<&'static str>,
}

impl FakeAlicloud {
    fn check(&self, operation: &'static str) -> Result<(), AgentError> {
        match self.fail {
            Some(op) if op == operation => Err(AgentError::client(operation, "injected failure")),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl AlicloudClient for FakeAlicloud {
    async fn describe_load_balancers(&self) -> Result<Vec<LoadBalancer>, AgentError> {
        self.check("DescribeLoadBalancers")?;
        Ok(self.load_balancers.clone())
    }

    async fn describe_load_balancers_named(
        &self,
        name: &str,
    ) -> Result<Vec<LoadBalancer>, AgentError> {
        self.check("DescribeLoadBalancers")?;
        Ok(self
            .load_balancers
            .iter()
            .filter(|lb| lb.load_balancer_name == name)
            .cloned()
            .collect())
    }

    async fn describe_listener_attribute(
        &self,
        load_balancer_id: &str,
        protocol: ListenerProtocol,
        listener_port: u16,
    ) -> Result<ListenerAttribute, AgentError> {
        self.check("DescribeListenerAttribute")?;
        let mut detail = self
            .listeners
            .get(&(load_balancer_id.to_string(), listener_port))
            .cloned()
            .unwrap_or_default();
        detail.insert("describedAs".into(), protocol.as_str().into());
        Ok(detail)
    }

    async fn describe_v_server_groups(
        &self,
        load_balancer_id: &str,
    ) -> Result<Vec<VServerGroup>, AgentError> {
        self.check("DescribeVServerGroups")?;
        Ok(self
            .v_server_groups
            .get(load_balancer_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn describe_load_balancer_attribute(
        &self,
        load_balancer_id: &str,
    ) -> Result<LoadBalancerAttribute, AgentError> {
        self.check("DescribeLoadBalancerAttribute")?;
        Ok(self
            .attributes
            .get(load_balancer_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn describe_scaling_groups(&self) -> Result<Vec<ScalingGroup>, AgentError> {
        self.check("DescribeScalingGroups")?;
        Ok(self.scaling_groups.clone())
    }

    async fn describe_scaling_instances(
        &self,
        scaling_group_id: &str,
    ) -> Result<Vec<ScalingInstance>, AgentError> {
        self.check("DescribeScalingInstances")?;
        Ok(self
            .scaling_instances
            .get(scaling_group_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn describe_security_groups(&self) -> Result<Vec<SecurityGroup>, AgentError> {
        self.check("DescribeSecurityGroups")?;
        Ok(self.security_groups.clone())
    }

    async fn describe_images(&self) -> Result<Vec<Image>, AgentError> {
        self.check("DescribeImages")?;
        Ok(self.images.clone())
    }

    async fn describe_key_pairs(&self) -> Result<Vec<KeyPair>, AgentError> {
        self.check("DescribeKeyPairs")?;
        Ok(self.key_pairs.clone())
    }
}

pub(crate) struct FakeAlicloudFactory(pub Arc<FakeAlicloud>);

impl ClientFactory<dyn AlicloudClient> for FakeAlicloudFactory {
    fn client_for(&self, _account: &AccountCredentials, _region: &str) -> Arc<dyn AlicloudClient> {
        self.0.clone()
    }
}

pub(crate) fn load_balancer(id: &str, name: &str) -> LoadBalancer {
    LoadBalancer {
        load_balancer_id: id.to_string(),
        load_balancer_name: name.to_string(),
        address: Some("10.0.0.10".to_string()),
        address_type: Some("intranet".to_string()),
        vpc_id: Some("vpc-1".to_string()),
        load_balancer_status: Some("active".to_string()),
        create_time: None,
    }
}

pub(crate) fn scaling_group(id: &str, name: &str, load_balancer_ids: &[&str]) -> ScalingGroup {
    ScalingGroup {
        scaling_group_id: id.to_string(),
        scaling_group_name: name.to_string(),
        lifecycle_state: Some("Active".to_string()),
        min_size: 1,
        max_size: 3,
        active_capacity: 1,
        active_scaling_configuration_id: None,
        load_balancer_ids: load_balancer_ids.iter().map(|s| (*s).to_string()).collect(),
        v_switch_ids: Vec::new(),
        creation_time: None,
    }
}

pub(crate) fn scaling_instance(id: &str) -> ScalingInstance {
    ScalingInstance {
        instance_id: id.to_string(),
        health_status: Some("Healthy".to_string()),
        lifecycle_state: Some("InService".to_string()),
        zone_id: None,
    }
}
