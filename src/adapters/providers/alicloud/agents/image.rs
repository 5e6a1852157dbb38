use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::keys::ALICLOUD;
use crate::adapters::providers::alicloud::{AlicloudClient, KEYS};
use crate::adapters::providers::{key_safe, mirror};
use crate::domain::errors::AgentError;
use crate::domain::models::{AgentDataType, Authority, CacheData, CacheResult, Namespace};
use crate::domain::ports::{AgentIdentity, CacheStore, CachingAgent};

const TYPES: &[AgentDataType] = &[
    Authority::Authoritative.for_type(Namespace::Images),
    Authority::Authoritative.for_type(Namespace::NamedImages),
];

/// Image catalogs change slowly; poll every two hours.
const POLL_INTERVAL: Duration = Duration::from_secs(2 * 60 * 60);
const TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Caches ECS images, plus an account-wide index by image name.
pub struct ImageCachingAgent {
    identity: AgentIdentity,
    client: Arc<dyn AlicloudClient>,
}

impl ImageCachingAgent {
    pub const CLASS: &'static str = "AliCloudImageCachingAgent";

    pub fn new(identity: AgentIdentity, client: Arc<dyn AlicloudClient>) -> Self {
        Self { identity, client }
    }
}

#[async_trait]
impl CachingAgent for ImageCachingAgent {
    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    fn provider_name(&self) -> &str {
        ALICLOUD
    }

    fn provided_data_types(&self) -> &[AgentDataType] {
        TYPES
    }

    fn poll_interval(&self) -> Duration {
        POLL_INTERVAL
    }

    fn timeout(&self) -> Duration {
        TIMEOUT
    }

    async fn load_data(&self, _cache: &dyn CacheStore) -> Result<CacheResult, AgentError> {
        let AgentIdentity {
            account, region, ..
        } = &self.identity;
        let images = self.client.describe_images().await?;

        let mut result = CacheResult::new();
        result.touch(Namespace::Images);
        result.touch(Namespace::NamedImages);

        for image in images.iter().filter(|i| key_safe(&i.image_id)) {
            let key = KEYS.image(&image.image_id, account, region);
            let mut data = mirror(&key, image, &self.identity)?;

            if key_safe(&image.image_name) {
                let named = KEYS.named_image(account, &image.image_name);
                data.add_relationship(Namespace::NamedImages, named.clone());
                result.add(
                    Namespace::NamedImages,
                    CacheData::new(named)
                        .with_attribute("imageName", image.image_name.as_str())
                        .with_attribute("account", account.as_str())
                        .relate(Namespace::Images, key),
                );
            }
            result.add(Namespace::Images, data);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCacheStore;
    use crate::adapters::providers::alicloud::fake::FakeAlicloud;
    use crate::adapters::providers::alicloud::models::Image;

    fn image(id: &str, name: &str) -> Image {
        Image {
            image_id: id.into(),
            image_name: name.into(),
            os_name: Some("Ubuntu 22.04".into()),
            architecture: Some("x86_64".into()),
            status: Some("Available".into()),
            image_owner_alias: Some("self".into()),
            creation_time: None,
        }
    }

    #[test]
    fn test_slow_schedule() {
        let agent = ImageCachingAgent::new(
            AgentIdentity::new("acct", "cn-test", ImageCachingAgent::CLASS),
            Arc::new(FakeAlicloud::default()),
        );
        assert_eq!(agent.poll_interval(), Duration::from_secs(7200));
        assert_eq!(agent.timeout(), Duration::from_secs(600));
        assert_eq!(agent.error_interval(), agent.poll_interval());
    }

    #[tokio::test]
    async fn test_images_in_two_regions_share_named_image() {
        let store = InMemoryCacheStore::new();
        let mut named = Vec::new();
        for region in ["cn-a", "cn-b"] {
            let agent = ImageCachingAgent::new(
                AgentIdentity::new("acct", region, ImageCachingAgent::CLASS),
                Arc::new(FakeAlicloud {
                    images: vec![image(&format!("m-{region}"), "base-ubuntu")],
                    ..Default::default()
                }),
            );
            let result = agent.load_data(&store).await.unwrap();
            named.extend(result.get(Namespace::NamedImages).iter().map(|d| d.id.clone()));
        }
        assert_eq!(named, vec!["alicloud:namedImages:acct:base-ubuntu"; 2]);
    }
}
