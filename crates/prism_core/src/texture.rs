//! Texture maps for material parameters.
//!
//! Textures are decoded with the `image` crate into 8-bit RGB and stored
//! bottom row first, so texture `v = 0` is the bottom edge of the image.
//! The cache shares decoded maps between every material that names them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use prism_math::Vec2;
use thiserror::Error;

use crate::Color;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported texture format: {0}")]
    UnsupportedFormat(String),

    #[error("Texture data is {actual} bytes, expected {expected} for {width}x{height} RGB")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded RGB texture.
#[derive(Clone, Debug)]
pub struct TextureMap {
    width: u32,
    height: u32,
    /// RGB bytes, row-major, bottom row first
    data: Vec<u8>,
    /// Source file path (for debugging)
    path: String,
}

impl TextureMap {
    /// Wrap already decoded RGB bytes (bottom row first).
    pub fn from_rgb(
        width: u32,
        height: u32,
        data: Vec<u8>,
        path: impl Into<String>,
    ) -> TextureResult<Self> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
            path: path.into(),
        })
    }

    /// A map with no pixel data. Every lookup returns opaque white.
    pub fn empty(path: impl Into<String>) -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
            path: path.into(),
        }
    }

    /// Decode a `.png` or `.bmp` file.
    pub fn load(path: &Path) -> TextureResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if !matches!(ext.as_deref(), Some("png") | Some("bmp")) {
            return Err(TextureError::UnsupportedFormat(path.display().to_string()));
        }

        let mut rgb = image::open(path)?.to_rgb8();
        image::imageops::flip_vertical_in_place(&mut rgb);
        let (width, height) = rgb.dimensions();

        Self::from_rgb(width, height, rgb.into_raw(), path.to_string_lossy())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Nearest pixel lookup. Coordinates past the last column / row are
    /// clamped to it.
    pub fn pixel_at(&self, x: u32, y: u32) -> Color {
        if self.is_empty() {
            return Color::ONE;
        }

        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let pos = (y * self.width as usize + x) * 3;

        Color::new(
            self.data[pos] as f32 / 255.0,
            self.data[pos + 1] as f32 / 255.0,
            self.data[pos + 2] as f32 / 255.0,
        )
    }

    /// Bilinear sample at parametric coordinates in the unit square.
    ///
    /// Coordinates outside `[0, 1]` are clamped to the edge.
    pub fn mapped_value(&self, uv: Vec2) -> Color {
        if self.is_empty() {
            return Color::ONE;
        }

        let uv = uv.clamp(Vec2::ZERO, Vec2::ONE);
        let x = uv.x * (self.width - 1) as f32;
        let y = uv.y * (self.height - 1) as f32;

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let bottom = self.pixel_at(x0, y0).lerp(self.pixel_at(x0 + 1, y0), fx);
        let top = self.pixel_at(x0, y0 + 1).lerp(self.pixel_at(x0 + 1, y0 + 1), fx);
        bottom.lerp(top, fy)
    }

    /// Get total size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Cache for loaded textures.
///
/// Textures are loaded on-demand and cached for reuse.
pub struct TextureCache {
    /// Cached textures by file path
    textures: HashMap<String, Arc<TextureMap>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    /// Create a new empty texture cache.
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create a texture cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load a texture from file, using cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<TextureMap>> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }

        let full_path = self.resolve_path(path);
        let texture = Arc::new(TextureMap::load(&full_path)?);
        self.textures.insert(path.to_string(), texture.clone());

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            texture.path(),
            texture.width(),
            texture.height(),
            texture.size_bytes() as f32 / 1024.0
        );

        Ok(texture)
    }

    /// Get the number of cached textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        match &self.base_dir {
            Some(base) if !path.is_absolute() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2 map: bottom row red, green; top row blue, white.
    fn quad() -> TextureMap {
        #[rustfmt::skip]
        let data = vec![
            255, 0, 0,    0, 255, 0,
            0, 0, 255,    255, 255, 255,
        ];
        TextureMap::from_rgb(2, 2, data, "<quad>").unwrap()
    }

    #[test]
    fn test_pixel_at_reads_rows_bottom_first() {
        let tex = quad();

        assert_eq!(tex.pixel_at(0, 0), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.pixel_at(1, 0), Color::new(0.0, 1.0, 0.0));
        assert_eq!(tex.pixel_at(0, 1), Color::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_pixel_at_clamps_to_last_row_and_column() {
        let tex = quad();

        assert_eq!(tex.pixel_at(7, 0), tex.pixel_at(1, 0));
        assert_eq!(tex.pixel_at(0, 9), tex.pixel_at(0, 1));
        assert_eq!(tex.pixel_at(100, 100), Color::ONE);
    }

    #[test]
    fn test_empty_texture_is_white() {
        let tex = TextureMap::empty("<missing>");

        assert_eq!(tex.pixel_at(0, 0), Color::ONE);
        assert_eq!(tex.mapped_value(Vec2::new(0.3, 0.7)), Color::ONE);
    }

    #[test]
    fn test_mapped_value_corners_and_center() {
        let tex = quad();

        assert_eq!(tex.mapped_value(Vec2::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.mapped_value(Vec2::ONE), Color::ONE);

        let center = tex.mapped_value(Vec2::splat(0.5));
        let expected = Color::new(0.5, 0.5, 0.5);
        assert!((center - expected).length() < 1e-6);
    }

    #[test]
    fn test_mapped_value_clamps_outside_unit_square() {
        let tex = quad();

        assert_eq!(tex.mapped_value(Vec2::new(-3.0, -1.0)), tex.mapped_value(Vec2::ZERO));
        assert_eq!(tex.mapped_value(Vec2::new(4.0, 2.0)), tex.mapped_value(Vec2::ONE));
    }

    #[test]
    fn test_from_rgb_rejects_short_data() {
        let err = TextureMap::from_rgb(2, 2, vec![0; 5], "<short>").unwrap_err();
        assert!(matches!(err, TextureError::SizeMismatch { expected: 12, actual: 5, .. }));
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let err = TextureMap::load(Path::new("wood.tga")).unwrap_err();
        assert!(matches!(err, TextureError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_load_png_flips_rows() {
        let dir = std::env::temp_dir().join(format!("prism_texture_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("stripe.png");

        // Top row white, bottom row black in image (top-down) order.
        let mut img = image::RgbImage::new(1, 2);
        img.put_pixel(0, 0, image::Rgb([255, 255, 255]));
        img.put_pixel(0, 1, image::Rgb([0, 0, 0]));
        img.save(&path).unwrap();

        let tex = TextureMap::load(&path).unwrap();
        assert_eq!(tex.width(), 1);
        assert_eq!(tex.height(), 2);
        assert_eq!(tex.pixel_at(0, 0), Color::ZERO);
        assert_eq!(tex.pixel_at(0, 1), Color::ONE);

        let mut cache = TextureCache::with_base_dir(&dir);
        let a = cache.load("stripe.png").unwrap();
        let b = cache.load("stripe.png").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        // Relative names resolve against the base directory
        assert_eq!(a.path(), path.to_string_lossy());

        std::fs::remove_dir_all(&dir).ok();
    }
}
