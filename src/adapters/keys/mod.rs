//! Per-provider cache key codecs.

pub mod alicloud;
pub mod huaweicloud;
pub mod layout;
pub mod registry;

pub use alicloud::{AlicloudKeys, ALICLOUD};
pub use huaweicloud::{HuaweiCloudKeys, HUAWEICLOUD};
pub use registry::KeyCodecRegistry;
