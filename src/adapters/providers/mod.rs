//! Cloud provider adapters: native models, client ports and caching agents.

pub mod alicloud;
pub mod huaweicloud;

use serde::Serialize;

use crate::adapters::keys::{ALICLOUD, HUAWEICLOUD};
use crate::domain::errors::AgentError;
use crate::domain::models::{CacheData, Names, KEY_SEPARATOR};
use crate::domain::ports::AgentIdentity;

pub use alicloud::AlicloudProvider;
pub use huaweicloud::HuaweiCloudProvider;

/// Agent classes scheduled for every (account, region), by provider id.
pub const AGENT_CATALOG: &[(&str, &[&str])] = &[
    (ALICLOUD, alicloud::AGENT_CLASSES),
    (HUAWEICLOUD, huaweicloud::AGENT_CLASSES),
];

/// Cache data whose attributes mirror `object`, tagged with the owning
/// account and region.
pub(crate) fn mirror<T: Serialize>(
    key: &str,
    object: &T,
    identity: &AgentIdentity,
) -> Result<CacheData, AgentError> {
    Ok(CacheData::from_object(key, object)?
        .with_attribute("account", identity.account.as_str())
        .with_attribute("region", identity.region.as_str()))
}

/// Whether a provider value can be used as a key segment.
pub(crate) fn key_safe(value: &str) -> bool {
    !value.is_empty() && !value.contains(KEY_SEPARATOR)
}

/// Whether a name can be used in a key segment that is decomposed with the
/// `app-stack-detail` convention.
pub(crate) fn named_key_safe(name: &str) -> bool {
    key_safe(name) && Names::parse(name).is_some()
}
