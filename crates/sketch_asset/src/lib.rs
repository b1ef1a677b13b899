//! Sketch Asset Pipeline
//!
//! Resolves asset paths against a configured root and decodes the file
//! formats script loader capabilities accept: raster images (via `image`),
//! PCM/float WAV audio, and raw font bytes.

mod wav;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub use wav::{decode_wav, DecodedAudio};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("pixel buffer of {len} bytes does not match {width}x{height} RGBA")]
    PixelSize { width: u32, height: u32, len: usize },

    #[error("unsupported audio in {path}: {reason}")]
    Audio { path: PathBuf, reason: String },
}

/// Decoded RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Loads files relative to an asset root.
#[derive(Debug, Clone)]
pub struct AssetLoader {
    root: PathBuf,
}

impl AssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute paths pass through untouched.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn read_bytes(&self, path: impl AsRef<Path>) -> Result<Vec<u8>, AssetError> {
        let path = self.resolve(path);
        std::fs::read(&path).map_err(|source| AssetError::Io { path, source })
    }

    pub fn load_image(&self, path: impl AsRef<Path>) -> Result<DecodedImage, AssetError> {
        let path = self.resolve(path);
        let decoded = image::open(&path).map_err(|source| AssetError::Image {
            path: path.clone(),
            source,
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        tracing::debug!(path = %path.display(), width, height, "decoded image");
        Ok(DecodedImage {
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }

    /// Encode RGBA8 pixels; the format follows the file extension.
    pub fn save_image(
        &self,
        path: impl AsRef<Path>,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<(), AssetError> {
        let path = self.resolve(path);
        let len = rgba.len();
        let buffer = image::RgbaImage::from_raw(width, height, rgba.to_vec())
            .ok_or(AssetError::PixelSize { width, height, len })?;
        buffer
            .save(&path)
            .map_err(|source| AssetError::Image { path, source })
    }

    pub fn load_wav(&self, path: impl AsRef<Path>) -> Result<DecodedAudio, AssetError> {
        let path = self.resolve(path);
        let bytes = std::fs::read(&path).map_err(|source| AssetError::Io {
            path: path.clone(),
            source,
        })?;
        decode_wav(&bytes).map_err(|reason| AssetError::Audio { path, reason })
    }
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_join_root() {
        let loader = AssetLoader::new("/data");
        assert_eq!(loader.resolve("img/a.png"), PathBuf::from("/data/img/a.png"));
        assert_eq!(loader.resolve("/abs/b.png"), PathBuf::from("/abs/b.png"));
    }

    #[test]
    fn image_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let loader = AssetLoader::new(dir.path());
        let pixels = vec![255, 0, 0, 255, 0, 255, 0, 255];
        loader.save_image("pair.png", 2, 1, &pixels).unwrap();
        let decoded = loader.load_image("pair.png").unwrap();
        assert_eq!((decoded.width, decoded.height), (2, 1));
        assert_eq!(decoded.rgba, pixels);
    }

    #[test]
    fn missing_and_corrupt_files_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let loader = AssetLoader::new(dir.path());
        assert!(matches!(loader.load_image("nope.png"), Err(AssetError::Image { .. })));
        std::fs::write(dir.path().join("bad.png"), b"not a png").unwrap();
        assert!(loader.load_image("bad.png").is_err());
        assert!(matches!(loader.load_wav("nope.wav"), Err(AssetError::Io { .. })));
    }

    #[test]
    fn mismatched_pixel_buffer_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let loader = AssetLoader::new(dir.path());
        let err = loader.save_image("x.png", 4, 4, &[0; 3]).unwrap_err();
        assert!(matches!(err, AssetError::PixelSize { .. }));
    }
}
