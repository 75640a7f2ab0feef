use crate::error::Error;
use crate::fetcher::Fetcher;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use std::path::{Path, PathBuf};

/// Reads delivery files from a local directory.
pub struct FileFetcher {
    config: FileFetcherConfig,
}

#[derive(Clone, Deserialize)]
pub struct FileFetcherConfig {
    pub directory: PathBuf,
}

impl FileFetcher {
    pub fn new(config: FileFetcherConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Fetcher for FileFetcher {
    async fn fetch(&self, file: &Path) -> Result<Vec<u8>, Error> {
        let path = self.config.directory.join(file);
        debug!("Reading {}", path.display());
        Ok(tokio::fs::read(path).await?)
    }
}
