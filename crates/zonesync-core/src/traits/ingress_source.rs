// # Ingress Source Trait
//
// Defines the interface to the cluster's ingress listing facility.
//
// The engine only needs a sequence of hostname strings, one per ingress rule.
// Order is irrelevant and duplicates are tolerated; the desired-state builder
// collapses them.

use async_trait::async_trait;

/// Trait for ingress host listing implementations
#[async_trait]
pub trait IngressSource: Send + Sync {
    /// List the hostnames currently exposed by ingress rules
    async fn hosts(&self) -> Result<Vec<String>, crate::Error>;
}
