use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of cached entity.
///
/// The wire name (`as_str`) is the second segment of every cache key and must
/// stay byte-for-byte stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Namespace {
    Applications,
    Clusters,
    ServerGroups,
    Instances,
    LoadBalancers,
    SecurityGroups,
    Subnets,
    Networks,
    Images,
    NamedImages,
    KeyPairs,
    LaunchConfigs,
    InstanceTypes,
    /// Snapshots written by on-demand refreshes, keyed by the refreshed
    /// entity's own key
    OnDemand,
}

impl Namespace {
    pub const ALL: [Self; 14] = [
        Self::Applications,
        Self::Clusters,
        Self::ServerGroups,
        Self::Instances,
        Self::LoadBalancers,
        Self::SecurityGroups,
        Self::Subnets,
        Self::Networks,
        Self::Images,
        Self::NamedImages,
        Self::KeyPairs,
        Self::LaunchConfigs,
        Self::InstanceTypes,
        Self::OnDemand,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Applications => "applications",
            Self::Clusters => "clusters",
            Self::ServerGroups => "serverGroups",
            Self::Instances => "instances",
            Self::LoadBalancers => "loadBalancers",
            Self::SecurityGroups => "securityGroups",
            Self::Subnets => "subnets",
            Self::Networks => "networks",
            Self::Images => "images",
            Self::NamedImages => "namedImages",
            Self::KeyPairs => "keyPairs",
            Self::LaunchConfigs => "launchConfigs",
            Self::InstanceTypes => "instanceTypes",
            Self::OnDemand => "onDemand",
        }
    }

    /// Look up a namespace by its wire name. Returns `None` for foreign names.
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|ns| ns.as_str() == name)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s).ok_or_else(|| format!("unknown namespace: {s}"))
    }
}
