// # Ingress Source Implementations
//
// Simple in-tree implementations of the IngressSource seam.
//
// ## Purpose
//
// The cluster's real ingress listing facility is an external collaborator;
// these implementations cover deployments where the host list comes from
// configuration or from a file maintained by another process, and they back
// the daemon and tests.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::traits::IngressSource;

/// Fixed host list, handed over at construction
#[derive(Debug, Clone, Default)]
pub struct StaticIngressSource {
    hosts: Vec<String>,
}

impl StaticIngressSource {
    /// Create a source over a fixed host list
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl IngressSource for StaticIngressSource {
    async fn hosts(&self) -> Result<Vec<String>, crate::Error> {
        Ok(self.hosts.clone())
    }
}

/// Host list read from a newline-separated file on every pass
///
/// Blank lines and `#` comments are skipped. Re-reading per pass means an
/// external process can rewrite the file and the next pass picks it up.
#[derive(Debug, Clone)]
pub struct FileIngressSource {
    path: PathBuf,
}

impl FileIngressSource {
    /// Create a source reading from `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl IngressSource for FileIngressSource {
    async fn hosts(&self) -> Result<Vec<String>, crate::Error> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect())
    }
}
