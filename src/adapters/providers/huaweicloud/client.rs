//! Huawei Cloud read client port.

use async_trait::async_trait;

use super::models::{Flavor, Image, SecurityGroup, Subnet, Vpc};
use crate::domain::errors::AgentError;

/// Read-only Huawei Cloud operations, bound to one account and region.
#[async_trait]
pub trait HuaweiCloudClient: Send + Sync {
    async fn list_vpcs(&self) -> Result<Vec<Vpc>, AgentError>;

    async fn list_subnets(&self) -> Result<Vec<Subnet>, AgentError>;

    async fn list_security_groups(&self) -> Result<Vec<SecurityGroup>, AgentError>;

    async fn list_images(&self) -> Result<Vec<Image>, AgentError>;

    async fn list_flavors(&self) -> Result<Vec<Flavor>, AgentError>;
}
