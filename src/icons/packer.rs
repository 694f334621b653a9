//! Multi-resolution favicon container

use ico::{IconDir, IconDirEntry, IconImage, ResourceType};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::errors::{IconError, IconResult};

/// Favicon sizes bundled into the container
pub const FAVICON_SIZES: [u32; 3] = [16, 32, 48];

/// Base name of the favicon variants in the catalog
pub const FAVICON_BASE_NAME: &str = "favicon";

/// Name of the packed container in an output directory
pub const ICO_FILENAME: &str = "favicon.ico";

/// Packs already rendered favicon PNGs into `favicon.ico`
#[derive(Debug, Clone)]
pub struct IconPacker {
    sizes: Vec<u32>,
}

impl Default for IconPacker {
    fn default() -> Self {
        Self::new(FAVICON_SIZES.to_vec())
    }
}

impl IconPacker {
    pub fn new(sizes: Vec<u32>) -> Self {
        Self { sizes }
    }

    fn favicon_name(size: u32) -> String {
        format!("{FAVICON_BASE_NAME}-{size}x{size}.png")
    }

    /// Read `favicon-<s>x<s>.png` for every size from `output_dir` and write
    /// the container next to them
    pub async fn pack(&self, output_dir: &Path) -> IconResult<PathBuf> {
        info!("Favicon.ico creation ongoing - please wait ...");

        let mut icon_dir = IconDir::new(ResourceType::Icon);
        for &size in &self.sizes {
            let name = Self::favicon_name(size);
            let png_bytes = fs::read(output_dir.join(&name)).await.map_err(|e| {
                IconError::pack(format!("Cannot find {name} in hash cache folder: {e}"))
            })?;

            let image = IconImage::read_png(Cursor::new(png_bytes))
                .map_err(|e| IconError::pack(format!("Failed to read {name}: {e}")))?;
            if image.width() != size || image.height() != size {
                return Err(IconError::pack(format!(
                    "{name} is {}x{}, expected {size}x{size}",
                    image.width(),
                    image.height()
                )));
            }

            let entry = IconDirEntry::encode(&image)
                .map_err(|e| IconError::pack(format!("Failed to encode {name}: {e}")))?;
            icon_dir.add_entry(entry);
        }

        let mut ico_bytes = Vec::new();
        icon_dir
            .write(&mut ico_bytes)
            .map_err(|e| IconError::pack(format!("Failed to encode {ICO_FILENAME}: {e}")))?;

        let ico_path = output_dir.join(ICO_FILENAME);
        fs::write(&ico_path, &ico_bytes).await.map_err(|e| {
            IconError::pack(format!("Failed to save {ICO_FILENAME} to hash cache folder: {e}"))
        })?;

        info!("Favicon.ico creation done ({} sizes)", self.sizes.len());
        Ok(ico_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use tempfile::TempDir;

    async fn write_favicon(dir: &Path, size: u32) {
        let pixels = RgbaImage::from_pixel(size, size, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        pixels
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        tokio::fs::write(dir.join(IconPacker::favicon_name(size)), bytes)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_pack_bundles_all_sizes() {
        let temp_dir = TempDir::new().unwrap();
        for size in FAVICON_SIZES {
            write_favicon(temp_dir.path(), size).await;
        }

        let ico_path = IconPacker::default().pack(temp_dir.path()).await.unwrap();
        assert_eq!(ico_path, temp_dir.path().join("favicon.ico"));

        let file = std::fs::File::open(&ico_path).unwrap();
        let icon_dir = IconDir::read(file).unwrap();
        let mut sizes: Vec<u32> = icon_dir.entries().iter().map(|e| e.width()).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![16, 32, 48]);
    }

    #[tokio::test]
    async fn test_pack_fails_when_a_size_is_missing() {
        let temp_dir = TempDir::new().unwrap();
        write_favicon(temp_dir.path(), 16).await;
        write_favicon(temp_dir.path(), 48).await;

        let err = IconPacker::default().pack(temp_dir.path()).await.unwrap_err();
        assert!(matches!(err, IconError::Pack { .. }));
        assert!(err.to_string().contains("favicon-32x32.png"));
        assert!(!temp_dir.path().join(ICO_FILENAME).exists());
    }

    #[tokio::test]
    async fn test_pack_rejects_wrong_dimensions() {
        let temp_dir = TempDir::new().unwrap();
        write_favicon(temp_dir.path(), 16).await;
        let wrong = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 255]));
        wrong.save(temp_dir.path().join("favicon-32x32.png")).unwrap();

        let err = IconPacker::new(vec![16, 32]).pack(temp_dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("expected 32x32"));
    }
}
