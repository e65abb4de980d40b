use anyhow::{Context, Result};
use fast_image_resize::{images::Image, ResizeOptions, Resizer};
use image::{DynamicImage, RgbaImage};
use std::collections::hash_map::DefaultHasher;
use std::fs::{self, File};
use std::hash::{Hash, Hasher};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Bounds and encoding of cached previews.
#[derive(Debug, Clone, Copy)]
pub struct PreviewSize {
    pub width: u32,
    pub height: u32,
    pub quality: u8,
}

/// Downscaled copies of browsed images, kept on disk between runs.
pub struct PreviewCache {
    cache_dir: PathBuf,
    size: PreviewSize,
}

impl PreviewCache {
    pub fn new(size: PreviewSize) -> Self {
        let cache_dir = directories::ProjectDirs::from("com", "tagdeck", "tagdeck")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("tagdeck"))
            .join("previews");
        Self::with_dir(cache_dir, size)
    }

    pub fn with_dir(cache_dir: PathBuf, size: PreviewSize) -> Self {
        if let Err(e) = fs::create_dir_all(&cache_dir) {
            tracing::warn!(dir = %cache_dir.display(), error = %e, "cannot create preview cache");
        }
        Self { cache_dir, size }
    }

    /// Cache file name: source path, mtime, preview bounds and JPEG quality
    /// hashed together.
    fn cache_filename(&self, source_path: &Path) -> PathBuf {
        let mut hasher = DefaultHasher::new();
        source_path.to_string_lossy().hash(&mut hasher);
        (self.size.width, self.size.height, self.size.quality).hash(&mut hasher);

        if let Ok(metadata) = fs::metadata(source_path) {
            if let Ok(modified) = metadata.modified() {
                modified.hash(&mut hasher);
            }
        }

        self.cache_dir.join(format!("{:016x}.jpg", hasher.finish()))
    }

    /// Load the preview for `source_path`, building and caching it if needed.
    pub fn load(&self, source_path: &Path) -> Result<DynamicImage> {
        let cached = self.cache_filename(source_path);
        if cached.exists() {
            match image::open(&cached) {
                Ok(img) => return Ok(img),
                Err(e) => {
                    tracing::warn!(path = %cached.display(), error = %e, "discarding corrupt preview");
                    let _ = fs::remove_file(&cached);
                }
            }
        }

        let preview = self.build_preview(source_path)?;
        if let Err(e) = save_as_jpeg(&preview, &cached, self.size.quality) {
            // Display still works without the cache.
            tracing::warn!(path = %cached.display(), error = %e, "cannot persist preview");
        }

        Ok(DynamicImage::ImageRgba8(preview))
    }

    /// Fit `src` inside `max` while keeping the aspect ratio. Never upscales.
    fn fit_dimensions(src_w: u32, src_h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
        if src_w == 0 || src_h == 0 {
            return (max_w.max(1), max_h.max(1));
        }
        let ratio_w = max_w as f32 / src_w as f32;
        let ratio_h = max_h as f32 / src_h as f32;
        let ratio = ratio_w.min(ratio_h).min(1.0);

        let dst_w = (src_w as f32 * ratio).round() as u32;
        let dst_h = (src_h as f32 * ratio).round() as u32;

        (dst_w.max(1), dst_h.max(1))
    }

    fn build_preview(&self, source_path: &Path) -> Result<RgbaImage> {
        let src_image = image::open(source_path)
            .with_context(|| format!("Failed to open image: {}", source_path.display()))?;

        let src_rgba = src_image.to_rgba8();
        let (src_width, src_height) = (src_rgba.width(), src_rgba.height());
        let (dst_width, dst_height) =
            Self::fit_dimensions(src_width, src_height, self.size.width, self.size.height);

        if (dst_width, dst_height) == (src_width, src_height) {
            return Ok(src_rgba);
        }

        let src_fir = Image::from_vec_u8(
            src_width,
            src_height,
            src_rgba.into_raw(),
            fast_image_resize::PixelType::U8x4,
        )?;
        let mut dst_fir = Image::new(dst_width, dst_height, fast_image_resize::PixelType::U8x4);

        let mut resizer = Resizer::new();
        resizer.resize(
            &src_fir,
            &mut dst_fir,
            &ResizeOptions::new().resize_alg(fast_image_resize::ResizeAlg::Convolution(
                fast_image_resize::FilterType::Lanczos3,
            )),
        )?;

        RgbaImage::from_raw(dst_width, dst_height, dst_fir.into_vec())
            .context("Failed to create preview image")
    }
}

/// Save RGBA image as JPEG with specified quality
fn save_as_jpeg(img: &RgbaImage, path: &Path, quality: u8) -> Result<()> {
    let rgb_img = DynamicImage::ImageRgba8(img.clone()).to_rgb8();

    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality);
    encoder
        .encode_image(&rgb_img)
        .with_context(|| format!("Failed to encode JPEG: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    const SIZE: PreviewSize = PreviewSize {
        width: 80,
        height: 60,
        quality: 90,
    };

    #[test]
    fn fit_dimensions_preserves_aspect_ratio() {
        assert_eq!(PreviewCache::fit_dimensions(3840, 2160, 800, 600), (800, 450));
        assert_eq!(PreviewCache::fit_dimensions(1080, 1920, 800, 600), (338, 600));
    }

    #[test]
    fn fit_dimensions_never_upscales() {
        assert_eq!(PreviewCache::fit_dimensions(40, 30, 800, 600), (40, 30));
    }

    #[test]
    fn load_builds_and_caches_preview() -> Result<()> {
        let root = tempfile::tempdir()?;
        let source_path = root.path().join("photo.png");
        RgbImage::from_pixel(160, 90, Rgb([30, 120, 200])).save(&source_path)?;

        let cache = PreviewCache::with_dir(root.path().join("cache"), SIZE);
        let loaded = cache.load(&source_path)?;
        assert_eq!((loaded.width(), loaded.height()), (80, 45));
        assert!(cache.cache_filename(&source_path).exists());
        Ok(())
    }

    #[test]
    fn load_regenerates_corrupted_cached_preview() -> Result<()> {
        let root = tempfile::tempdir()?;
        let source_path = root.path().join("image.png");
        RgbImage::from_pixel(64, 64, Rgb([240, 80, 80])).save(&source_path)?;

        let cache = PreviewCache::with_dir(root.path().join("cache"), SIZE);
        let cached = cache.cache_filename(&source_path);
        fs::write(&cached, b"not-a-valid-jpeg")?;

        let loaded = cache.load(&source_path)?;
        assert_eq!((loaded.width(), loaded.height()), (60, 60));
        assert!(image::open(&cached).is_ok());
        Ok(())
    }

    #[test]
    fn cache_key_tracks_quality() {
        let root = tempfile::tempdir().unwrap();
        let source_path = root.path().join("photo.png");
        let dir = root.path().join("cache");

        let high = PreviewCache::with_dir(dir.clone(), SIZE);
        let low = PreviewCache::with_dir(dir, PreviewSize { quality: 40, ..SIZE });
        assert_ne!(high.cache_filename(&source_path), low.cache_filename(&source_path));
        assert_eq!(
            high.cache_filename(&source_path),
            PreviewCache::with_dir(root.path().join("cache"), SIZE).cache_filename(&source_path)
        );
    }

    #[test]
    fn unreadable_source_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let cache = PreviewCache::with_dir(root.path().join("cache"), SIZE);
        assert!(cache.load(&root.path().join("missing.png")).is_err());
    }
}
