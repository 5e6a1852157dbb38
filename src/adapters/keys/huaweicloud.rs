//! Cache keys for Huawei Cloud.

use super::layout::{Derived, KeyLayout, LayoutCodec};
use crate::domain::errors::KeyError;
use crate::domain::models::{CacheKey, KeyFields, Namespace};
use crate::domain::ports::KeyCodec;

pub const HUAWEICLOUD: &str = "huaweicloud";

pub const LAYOUTS: &[KeyLayout] = &[
    KeyLayout::plain(Namespace::Applications, &["application"]),
    KeyLayout::plain(Namespace::Clusters, &["application", "account", "cluster"]),
    KeyLayout::derived(
        Namespace::ServerGroups,
        &["cluster", "account", "region", "serverGroup"],
        Derived::NameComponents { from: "serverGroup" },
    ),
    KeyLayout::plain(Namespace::Instances, &["account", "region", "id"]),
    KeyLayout::plain(Namespace::LoadBalancers, &["account", "region", "name"]),
    KeyLayout::derived(
        Namespace::SecurityGroups,
        &["account", "region", "name", "id"],
        Derived::Application { from: "name" },
    ),
    KeyLayout::plain(Namespace::Subnets, &["account", "region", "id"]),
    KeyLayout::plain(Namespace::Networks, &["account", "region", "id"]),
    KeyLayout::plain(Namespace::Images, &["account", "region", "id"]),
    KeyLayout::plain(Namespace::NamedImages, &["account", "name"]),
    KeyLayout::plain(Namespace::InstanceTypes, &["account", "region", "name"]),
];

/// Huawei Cloud key codec.
#[derive(Debug, Clone, Copy)]
pub struct HuaweiCloudKeys {
    codec: LayoutCodec,
}

impl Default for HuaweiCloudKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl HuaweiCloudKeys {
    pub const fn new() -> Self {
        Self {
            codec: LayoutCodec::new(HUAWEICLOUD, LAYOUTS),
        }
    }

    pub fn application(&self, application: &str) -> CacheKey {
        self.codec.join(Namespace::Applications, &[application])
    }

    pub fn cluster(&self, cluster: &str, application: &str, account: &str) -> CacheKey {
        self.codec
            .join(Namespace::Clusters, &[application, account, cluster])
    }

    pub fn server_group(
        &self,
        cluster: &str,
        account: &str,
        region: &str,
        server_group: &str,
    ) -> CacheKey {
        self.codec.join(
            Namespace::ServerGroups,
            &[cluster, account, region, server_group],
        )
    }

    pub fn instance(&self, id: &str, account: &str, region: &str) -> CacheKey {
        self.codec.join(Namespace::Instances, &[account, region, id])
    }

    pub fn load_balancer(&self, name: &str, account: &str, region: &str) -> CacheKey {
        self.codec
            .join(Namespace::LoadBalancers, &[account, region, name])
    }

    pub fn security_group(&self, name: &str, id: &str, region: &str, account: &str) -> CacheKey {
        self.codec
            .join(Namespace::SecurityGroups, &[account, region, name, id])
    }

    pub fn subnet(&self, id: &str, account: &str, region: &str) -> CacheKey {
        self.codec.join(Namespace::Subnets, &[account, region, id])
    }

    pub fn network(&self, id: &str, account: &str, region: &str) -> CacheKey {
        self.codec.join(Namespace::Networks, &[account, region, id])
    }

    pub fn image(&self, id: &str, account: &str, region: &str) -> CacheKey {
        self.codec.join(Namespace::Images, &[account, region, id])
    }

    pub fn named_image(&self, account: &str, name: &str) -> CacheKey {
        self.codec.join(Namespace::NamedImages, &[account, name])
    }

    pub fn instance_type(&self, name: &str, account: &str, region: &str) -> CacheKey {
        self.codec
            .join(Namespace::InstanceTypes, &[account, region, name])
    }
}

impl KeyCodec for HuaweiCloudKeys {
    fn provider_id(&self) -> &'static str {
        HUAWEICLOUD
    }

    fn namespaces(&self) -> Vec<Namespace> {
        self.codec.namespaces()
    }

    fn encode(&self, namespace: Namespace, fields: &KeyFields) -> Result<CacheKey, KeyError> {
        self.codec.encode(namespace, fields)
    }

    fn parse(&self, key: &str) -> KeyFields {
        self.codec.parse(key)
    }

    fn can_parse_type(&self, type_name: &str) -> bool {
        self.codec.can_parse_type(type_name)
    }

    fn can_parse_field(&self, field: &str) -> bool {
        self.codec.can_parse_field(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subnet_exact_fields() {
        let keys = HuaweiCloudKeys::new();
        let parsed = keys.parse("huaweicloud:subnets:acct:cn-test:subnet-1");
        let expected: KeyFields = [
            ("provider", "huaweicloud"),
            ("type", "subnets"),
            ("account", "acct"),
            ("region", "cn-test"),
            ("id", "subnet-1"),
        ]
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_typed_constructors() {
        let keys = HuaweiCloudKeys::new();
        assert_eq!(
            keys.subnet("subnet-1", "acct", "cn-test"),
            "huaweicloud:subnets:acct:cn-test:subnet-1"
        );
        assert_eq!(
            keys.network("vpc-1", "acct", "cn-test"),
            "huaweicloud:networks:acct:cn-test:vpc-1"
        );
        assert_eq!(
            keys.instance_type("s3.large.2", "acct", "cn-test"),
            "huaweicloud:instanceTypes:acct:cn-test:s3.large.2"
        );
        assert_eq!(
            keys.named_image("acct", "ubuntu-22"),
            "huaweicloud:namedImages:acct:ubuntu-22"
        );
    }

    #[test]
    fn test_unsupported_namespaces() {
        let keys = HuaweiCloudKeys::new();
        assert!(!keys.can_parse_type("keyPairs"));
        assert!(!keys.can_parse_type("launchConfigs"));
        assert!(keys.can_parse_type("networks"));
        assert!(keys
            .parse("huaweicloud:keyPairs:acct:cn-test:kp-1")
            .is_empty());
        assert!(matches!(
            keys.encode(Namespace::KeyPairs, &KeyFields::new()),
            Err(KeyError::UnsupportedNamespace { .. })
        ));
    }

    #[test]
    fn test_foreign_and_malformed() {
        let keys = HuaweiCloudKeys::new();
        assert!(keys.parse("").is_empty());
        assert!(keys.parse("garbage").is_empty());
        assert!(keys.parse("huaweicloud:unknownNamespace:x").is_empty());
        assert!(keys
            .parse("alicloud:loadBalancers:a:r:lb")
            .is_empty());
    }
}
