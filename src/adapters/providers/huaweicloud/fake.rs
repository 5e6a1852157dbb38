//! Canned Huawei Cloud client for agent tests.

use async_trait::async_trait;
use std::sync::Arc;

use super::client::HuaweiCloudClient;
use super::models::{Flavor, Image, SecurityGroup, Subnet, Vpc};
use crate::domain::errors::AgentError;
use crate::domain::models::AccountCredentials;
use crate::domain::ports::ClientFactory;

#[derive(Default)]
pub(crate) struct FakeHuaweiCloud {
    pub vpcs: Vec<Vpc>,
    pub subnets: Vec<Subnet>,
    pub security_groups: Vec<SecurityGroup>,
    pub images: Vec<Image>,
    pub flavors: Vec<Flavor>,
}

#[async_trait]
impl HuaweiCloudClient for FakeHuaweiCloud {
    async fn list_vpcs(&self) -> Result<Vec<Vpc>, AgentError> {
        Ok(self.vpcs.clone())
    }

    async fn list_subnets(&self) -> Result<Vec<Subnet>, AgentError> {
        Ok(self.subnets.clone())
    }

    async fn list_security_groups(&self) -> Result<Vec<SecurityGroup>, AgentError> {
        Ok(self.security_groups.clone())
    }

    async fn list_images(&self) -> Result<Vec<Image>, AgentError> {
        Ok(self.images.clone())
    }

    async fn list_flavors(&self) -> Result<Vec<Flavor>, AgentError> {
        Ok(self.flavors.clone())
    }
}

pub(crate) struct FakeHuaweiCloudFactory(pub Arc<FakeHuaweiCloud>);

impl ClientFactory<dyn HuaweiCloudClient> for FakeHuaweiCloudFactory {
    fn client_for(
        &self,
        _account: &AccountCredentials,
        _region: &str,
    ) -> Arc<dyn HuaweiCloudClient> {
        self.0.clone()
    }
}
