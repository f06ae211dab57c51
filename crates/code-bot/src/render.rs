//! Image renderer boundary.

use crate::error::AppResult;
use async_trait::async_trait;
use contact_registry::SENTINEL_IMAGE;
use std::path::PathBuf;
use tracing::debug;

/// Produces the shareable image for a freshly registered code.
#[async_trait]
pub trait ImageRenderer: Send + Sync {
    /// Render the image for `code` and return its path.
    async fn render(&self, code: &str) -> AppResult<PathBuf>;
}

/// Renderer that stamps out per-code copies of the stock image.
///
/// The registry only needs a per-code file whose lifecycle it can own; the
/// stock placeholder itself stays untouched.
pub struct StockImageRenderer {
    stock_path: PathBuf,
    output_dir: PathBuf,
}

impl StockImageRenderer {
    pub fn new(images_dir: impl Into<PathBuf>) -> Self {
        let output_dir = images_dir.into();
        Self {
            stock_path: output_dir.join(SENTINEL_IMAGE),
            output_dir,
        }
    }
}

#[async_trait]
impl ImageRenderer for StockImageRenderer {
    async fn render(&self, code: &str) -> AppResult<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let output = self
            .output_dir
            .join(format!("stock_image_with_code_{code}.png"));
        tokio::fs::copy(&self.stock_path, &output).await?;

        debug!(code, path = %output.display(), "code image rendered");
        Ok(output)
    }
}
