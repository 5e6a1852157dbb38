//! Cache keys for Alibaba Cloud.

use super::layout::{Derived, KeyLayout, LayoutCodec};
use crate::domain::errors::KeyError;
use crate::domain::models::{CacheKey, KeyFields, Namespace};
use crate::domain::ports::KeyCodec;

pub const ALICLOUD: &str = "alicloud";

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
    KeyLayout::plain(Namespace::Images, &["account", "region", "id"]),
    KeyLayout::plain(Namespace::NamedImages, &["account", "name"]),
    KeyLayout::plain(Namespace::KeyPairs, &["account", "region", "name"]),
    KeyLayout::plain(Namespace::LaunchConfigs, &["account", "region", "name"]),
    KeyLayout::plain(Namespace::InstanceTypes, &["account", "region", "zone"]),
];

/// Alibaba Cloud key codec.
#[derive(Debug, Clone, Copy)]
pub struct AlicloudKeys {
    codec: LayoutCodec,
}

impl Default for AlicloudKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl AlicloudKeys {
    pub const fn new() -> Self {
        Self {
            codec: LayoutCodec::new(ALICLOUD, LAYOUTS),
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

    pub fn image(&self, id: &str, account: &str, region: &str) -> CacheKey {
        self.codec.join(Namespace::Images, &[account, region, id])
    }

    pub fn named_image(&self, account: &str, name: &str) -> CacheKey {
        self.codec.join(Namespace::NamedImages, &[account, name])
    }

    pub fn key_pair(&self, name: &str, account: &str, region: &str) -> CacheKey {
        self.codec.join(Namespace::KeyPairs, &[account, region, name])
    }

    pub fn launch_config(&self, name: &str, account: &str, region: &str) -> CacheKey {
        self.codec
            .join(Namespace::LaunchConfigs, &[account, region, name])
    }

    pub fn instance_type(&self, account: &str, region: &str, zone: &str) -> CacheKey {
        self.codec
            .join(Namespace::InstanceTypes, &[account, region, zone])
    }
}

impl KeyCodec for AlicloudKeys {
    fn provider_id(&self) -> &'static str {
        ALICLOUD
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

    fn fields(pairs: &[(&str, &str)]) -> KeyFields {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_load_balancer_key() {
        let keys = AlicloudKeys::new();
        assert_eq!(
            keys.load_balancer("test-loadBalancer", "test-account", "cn-test"),
            "alicloud:loadBalancers:test-account:cn-test:test-loadBalancer"
        );
    }

    #[test]
    fn test_security_group_key() {
        let keys = AlicloudKeys::new();
        assert_eq!(
            keys.security_group(
                "test-SecurityGroupName",
                "test-SecurityGroupId",
                "cn-test",
                "test-account"
            ),
            "alicloud:securityGroups:test-account:cn-test:test-SecurityGroupName:test-SecurityGroupId"
        );
    }

    #[test]
    fn test_generic_encode_matches_typed() {
        let keys = AlicloudKeys::new();
        let encoded = keys
            .encode(
                Namespace::LoadBalancers,
                &fields(&[
                    ("name", "test-loadBalancer"),
                    ("account", "test-account"),
                    ("region", "cn-test"),
                ]),
            )
            .unwrap();
        assert_eq!(
            encoded,
            keys.load_balancer("test-loadBalancer", "test-account", "cn-test")
        );
    }

    #[test]
    fn test_parse_security_group_derives_application() {
        let keys = AlicloudKeys::new();
        let parsed = keys.parse(
            "alicloud:securityGroups:test-account:cn-test:test-SecurityGroupName:test-SecurityGroupId",
        );
        assert_eq!(
            parsed,
            fields(&[
                ("provider", "alicloud"),
                ("type", "securityGroups"),
                ("account", "test-account"),
                ("region", "cn-test"),
                ("name", "test-SecurityGroupName"),
                ("id", "test-SecurityGroupId"),
                ("application", "test"),
            ])
        );
    }

    #[test]
    fn test_parse_server_group_components() {
        let keys = AlicloudKeys::new();
        let key = keys.server_group("myapp-prod", "acct", "cn-test", "myapp-prod-v007");
        let parsed = keys.parse(&key);
        assert_eq!(parsed["cluster"], "myapp-prod");
        assert_eq!(parsed["serverGroup"], "myapp-prod-v007");
        assert_eq!(parsed["application"], "myapp");
        assert_eq!(parsed["stack"], "prod");
        assert_eq!(parsed["sequence"], "7");
        assert!(!parsed.contains_key("detail"));
    }

    #[test]
    fn test_parse_cluster() {
        let keys = AlicloudKeys::new();
        let parsed = keys.parse("alicloud:clusters:myapp:acct1:c1");
        assert_eq!(parsed["application"], "myapp");
        assert_eq!(parsed["account"], "acct1");
        assert_eq!(parsed["cluster"], "c1");
    }

    #[test]
    fn test_malformed_keys_are_empty() {
        let keys = AlicloudKeys::new();
        assert!(keys.parse("").is_empty());
        assert!(keys.parse("garbage").is_empty());
        assert!(keys.parse("alicloud:unknownNamespace:x").is_empty());
        assert!(keys.parse("alicloud:networks:a:r:vpc-1").is_empty());
        assert!(keys.parse("huaweicloud:subnets:acct:cn-test:subnet-1").is_empty());
    }

    #[test]
    fn test_encode_of_parse_is_identity() {
        let keys = AlicloudKeys::new();
        let key = "alicloud:securityGroups:acct:cn-test:web-prod:sg-123";
        let parsed = keys.parse(key);
        assert_eq!(keys.encode(Namespace::SecurityGroups, &parsed).unwrap(), key);
    }
}
