//! Alibaba Cloud caching agents.

mod cluster;
mod image;
mod key_pair;
mod load_balancer;
mod security_group;

pub use cluster::ClusterCachingAgent;
pub use image::ImageCachingAgent;
pub use key_pair::KeyPairCachingAgent;
pub use load_balancer::LoadBalancerCachingAgent;
pub use security_group::SecurityGroupCachingAgent;
