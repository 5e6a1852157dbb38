//! Huawei Cloud caching agents.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::client::HuaweiCloudClient;
use super::KEYS;
use crate::adapters::keys::HUAWEICLOUD;
use crate::adapters::providers::{key_safe, mirror, named_key_safe};
use crate::domain::errors::AgentError;
use crate::domain::models::{AgentDataType, Authority, CacheData, CacheResult, Namespace};
use crate::domain::ports::{AgentIdentity, CacheStore, CachingAgent};

const HOUR: Duration = Duration::from_secs(60 * 60);

/// Caches VPCs as networks together with their subnets.
pub struct NetworkCachingAgent {
    identity: AgentIdentity,
    client: Arc<dyn HuaweiCloudClient>,
}

impl NetworkCachingAgent {
    pub const CLASS: &'static str = "HuaweiCloudNetworkCachingAgent";

    const TYPES: &'static [AgentDataType] = &[
        Authority::Authoritative.for_type(Namespace::Networks),
        Authority::Authoritative.for_type(Namespace::Subnets),
    ];

    pub fn new(identity: AgentIdentity, client: Arc<dyn HuaweiCloudClient>) -> Self {
        Self { identity, client }
    }
}

#[async_trait]
impl CachingAgent for NetworkCachingAgent {
    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    fn provider_name(&self) -> &str {
        HUAWEICLOUD
    }

    fn provided_data_types(&self) -> &[AgentDataType] {
        Self::TYPES
    }

    async fn load_data(&self, _cache: &dyn CacheStore) -> Result<CacheResult, AgentError> {
        let AgentIdentity {
            account, region, ..
        } = &self.identity;
        let vpcs = self.client.list_vpcs().await?;
        let subnets = self.client.list_subnets().await?;

        let mut result = CacheResult::new();
        result.touch(Namespace::Networks);
        result.touch(Namespace::Subnets);

        let mut networks: Vec<CacheData> = Vec::with_capacity(vpcs.len());
        for vpc in vpcs.iter().filter(|v| key_safe(&v.id)) {
            let key = KEYS.network(&vpc.id, account, region);
            networks.push(mirror(&key, vpc, &self.identity)?);
        }

        for subnet in subnets.iter().filter(|s| key_safe(&s.id)) {
            let key = KEYS.subnet(&subnet.id, account, region);
            let mut data = mirror(&key, subnet, &self.identity)?;
            let network_key = KEYS.network(&subnet.vpc_id, account, region);
            if let Some(network) = networks.iter_mut().find(|n| n.id == network_key) {
                network.add_relationship(Namespace::Subnets, key.clone());
                data.add_relationship(Namespace::Networks, network_key);
            }
            result.add(Namespace::Subnets, data);
        }
        result.extend(Namespace::Networks, networks);
        Ok(result)
    }
}

/// Caches VPC security groups.
pub struct SecurityGroupCachingAgent {
    identity: AgentIdentity,
    client: Arc<dyn HuaweiCloudClient>,
}

impl SecurityGroupCachingAgent {
    pub const CLASS: &'static str = "HuaweiCloudSecurityGroupCachingAgent";

    const TYPES: &'static [AgentDataType] =
        &[Authority::Authoritative.for_type(Namespace::SecurityGroups)];

    pub fn new(identity: AgentIdentity, client: Arc<dyn HuaweiCloudClient>) -> Self {
        Self { identity, client }
    }
}

#[async_trait]
impl CachingAgent for SecurityGroupCachingAgent {
    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    fn provider_name(&self) -> &str {
        HUAWEICLOUD
    }

    fn provided_data_types(&self) -> &[AgentDataType] {
        Self::TYPES
    }

    async fn load_data(&self, _cache: &dyn CacheStore) -> Result<CacheResult, AgentError> {
        let groups = self.client.list_security_groups().await?;

        let mut result = CacheResult::new();
        result.touch(Namespace::SecurityGroups);
        for group in groups.iter().filter(|g| key_safe(&g.id)) {
            if !named_key_safe(&group.name) {
                tracing::warn!(
                    agent_type = %self.identity,
                    security_group = %group.id,
                    name = %group.name,
                    "Skipping security group whose name does not follow app-stack-detail"
                );
                continue;
            }
            let key = KEYS.security_group(
                &group.name,
                &group.id,
                &self.identity.region,
                &self.identity.account,
            );
            result.add(Namespace::SecurityGroups, mirror(&key, group, &self.identity)?);
        }
        Ok(result)
    }
}

/// Caches private and shared images, plus an account-wide name index.
pub struct ImageCachingAgent {
    identity: AgentIdentity,
    client: Arc<dyn HuaweiCloudClient>,
}

impl ImageCachingAgent {
    pub const CLASS: &'static str = "HuaweiCloudImageCachingAgent";

    const TYPES: &'static [AgentDataType] = &[
        Authority::Authoritative.for_type(Namespace::Images),
        Authority::Authoritative.for_type(Namespace::NamedImages),
    ];

    pub fn new(identity: AgentIdentity, client: Arc<dyn HuaweiCloudClient>) -> Self {
        Self { identity, client }
    }
}

#[async_trait]
impl CachingAgent for ImageCachingAgent {
    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    fn provider_name(&self) -> &str {
        HUAWEICLOUD
    }

    fn provided_data_types(&self) -> &[AgentDataType] {
        Self::TYPES
    }

    fn poll_interval(&self) -> Duration {
        2 * HOUR
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(10 * 60)
    }

    async fn load_data(&self, _cache: &dyn CacheStore) -> Result<CacheResult, AgentError> {
        let AgentIdentity {
            account, region, ..
        } = &self.identity;
        let images = self.client.list_images().await?;

        let mut result = CacheResult::new();
        result.touch(Namespace::Images);
        result.touch(Namespace::NamedImages);
        for image in images.iter().filter(|i| key_safe(&i.id)) {
            let key = KEYS.image(&image.id, account, region);
            let mut data = mirror(&key, image, &self.identity)?;
            if key_safe(&image.name) {
                let named = KEYS.named_image(account, &image.name);
                data.add_relationship(Namespace::NamedImages, named.clone());
                result.add(
                    Namespace::NamedImages,
                    CacheData::new(named)
                        .with_attribute("imageName", image.name.as_str())
                        .with_attribute("account", account.as_str())
                        .relate(Namespace::Images, key),
                );
            }
            result.add(Namespace::Images, data);
        }
        Ok(result)
    }
}

/// Caches ECS flavors as instance types.
pub struct InstanceTypeCachingAgent {
    identity: AgentIdentity,
    client: Arc<dyn HuaweiCloudClient>,
}

impl InstanceTypeCachingAgent {
    pub const CLASS: &'static str = "HuaweiCloudInstanceTypeCachingAgent";

    const TYPES: &'static [AgentDataType] =
        &[Authority::Authoritative.for_type(Namespace::InstanceTypes)];

    pub fn new(identity: AgentIdentity, client: Arc<dyn HuaweiCloudClient>) -> Self {
        Self { identity, client }
    }
}

#[async_trait]
impl CachingAgent for InstanceTypeCachingAgent {
    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    fn provider_name(&self) -> &str {
        HUAWEICLOUD
    }

    fn provided_data_types(&self) -> &[AgentDataType] {
        Self::TYPES
    }

    fn poll_interval(&self) -> Duration {
        HOUR
    }

    async fn load_data(&self, _cache: &dyn CacheStore) -> Result<CacheResult, AgentError> {
        let flavors = self.client.list_flavors().await?;

        let mut result = CacheResult::new();
        result.touch(Namespace::InstanceTypes);
        for flavor in flavors.iter().filter(|f| key_safe(&f.name)) {
            let key = KEYS.instance_type(&flavor.name, &self.identity.account, &self.identity.region);
            result.add(Namespace::InstanceTypes, mirror(&key, flavor, &self.identity)?);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCacheStore;
    use crate::adapters::providers::huaweicloud::fake::FakeHuaweiCloud;
    use crate::adapters::providers::huaweicloud::models::{Flavor, SecurityGroup, Subnet, Vpc};
    use crate::domain::ports::KeyCodec;

    fn identity(class: &str) -> AgentIdentity {
        AgentIdentity::new("acct", "cn-test", class)
    }

    #[tokio::test]
    async fn test_subnets_link_to_their_vpc() {
        let fake = FakeHuaweiCloud {
            vpcs: vec![Vpc {
                id: "vpc-1".into(),
                name: "main".into(),
                cidr: Some("10.0.0.0/16".into()),
                status: Some("OK".into()),
            }],
            subnets: vec![
                Subnet {
                    id: "subnet-1".into(),
                    name: "web".into(),
                    vpc_id: "vpc-1".into(),
                    cidr: Some("10.0.1.0/24".into()),
                    gateway_ip: None,
                    availability_zone: None,
                    status: None,
                },
                Subnet {
                    id: "subnet-2".into(),
                    name: "orphan".into(),
                    vpc_id: "vpc-gone".into(),
                    cidr: None,
                    gateway_ip: None,
                    availability_zone: None,
                    status: None,
                },
            ],
            ..Default::default()
        };
        let agent = NetworkCachingAgent::new(identity(NetworkCachingAgent::CLASS), Arc::new(fake));
        let result = agent.load_data(&InMemoryCacheStore::new()).await.unwrap();

        let networks = result.get(Namespace::Networks);
        assert_eq!(networks.len(), 1);
        assert_eq!(
            networks[0].related(Namespace::Subnets).collect::<Vec<_>>(),
            vec!["huaweicloud:subnets:acct:cn-test:subnet-1"]
        );

        let subnets = result.get(Namespace::Subnets);
        assert_eq!(subnets.len(), 2);
        let orphan = subnets.iter().find(|s| s.id.ends_with("subnet-2")).unwrap();
        assert!(orphan.relationships.is_empty());
    }

    #[tokio::test]
    async fn test_security_groups_need_an_application_prefix() {
        let group = |id: &str, name: &str| SecurityGroup {
            id: id.into(),
            name: name.into(),
            description: None,
            vpc_id: None,
        };
        let fake = FakeHuaweiCloud {
            security_groups: vec![group("sg-1", "api-internal"), group("sg-2", "default group")],
            ..Default::default()
        };
        let agent = SecurityGroupCachingAgent::new(
            identity(SecurityGroupCachingAgent::CLASS),
            Arc::new(fake),
        );

        let result = agent.load_data(&InMemoryCacheStore::new()).await.unwrap();
        let groups = result.get(Namespace::SecurityGroups);
        assert_eq!(groups.len(), 1);
        let fields = KEYS.parse(&groups[0].id);
        assert_eq!(fields["application"], "api");
        assert_eq!(fields["id"], "sg-1");
    }

    #[tokio::test]
    async fn test_instance_types_keyed_by_flavor_name() {
        let fake = FakeHuaweiCloud {
            flavors: vec![Flavor {
                id: "s6.large.2".into(),
                name: "s6.large.2".into(),
                vcpus: 2,
                ram: 4096,
                disk: 0,
            }],
            ..Default::default()
        };
        let agent = InstanceTypeCachingAgent::new(
            identity(InstanceTypeCachingAgent::CLASS),
            Arc::new(fake),
        );
        assert_eq!(agent.poll_interval(), Duration::from_secs(3600));

        let result = agent.load_data(&InMemoryCacheStore::new()).await.unwrap();
        let types = result.get(Namespace::InstanceTypes);
        assert_eq!(types[0].id, "huaweicloud:instanceTypes:acct:cn-test:s6.large.2");
        assert_eq!(types[0].attributes["vcpus"], 2);
    }

    #[test]
    fn test_image_agent_schedule() {
        let agent = ImageCachingAgent::new(
            identity(ImageCachingAgent::CLASS),
            Arc::new(FakeHuaweiCloud::default()),
        );
        assert_eq!(agent.poll_interval(), Duration::from_secs(7200));
        assert_eq!(agent.timeout(), Duration::from_secs(600));
        assert!(agent.is_authoritative_for(Namespace::NamedImages));
    }
}
