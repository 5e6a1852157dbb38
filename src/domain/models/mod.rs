pub mod cache_data;
pub mod config;
pub mod credentials;
pub mod names;
pub mod namespace;
pub mod parsed_key;

pub use cache_data::{
    AgentDataType, Attributes, Authority, CacheData, CacheKey, CacheResult, Relationships,
    KEY_SEPARATOR,
};
pub use config::{Config, LoggingConfig, SchedulerConfig};
pub use credentials::AccountCredentials;
pub use names::Names;
pub use namespace::Namespace;
pub use parsed_key::{KeyFields, ParsedKey, PROVIDER_FIELD, TYPE_FIELD};
