use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug)]
pub struct AssetError(pub String);

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for AssetError {}

/// Upload boundary for receipt and license images. The real image host sits
/// behind this trait; its storage/CDN behavior is out of scope here.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store the bytes and return a public URL for the asset.
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String, AssetError>;
}

/// Filesystem-backed asset store used by the binary.
pub struct FsAssetStore {
    root: PathBuf,
    public_base: String,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
        }
    }
}

#[async_trait]
impl AssetStore for FsAssetStore {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String, AssetError> {
        let safe: String = filename
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let name = format!("{}-{safe}", Uuid::new_v4());

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AssetError(e.to_string()))?;
        tokio::fs::write(self.root.join(&name), bytes)
            .await
            .map_err(|e| AssetError(e.to_string()))?;

        Ok(format!("{}/{name}", self.public_base.trim_end_matches('/')))
    }
}
