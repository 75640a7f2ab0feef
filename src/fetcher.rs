use crate::error::Error;

use async_trait::async_trait;

use std::path::Path;

#[async_trait]
pub trait Fetcher {
    /// Raw bytes of one delivery file, still in its single-byte encoding.
    async fn fetch(&self, file: &Path) -> Result<Vec<u8>, Error>;
}
