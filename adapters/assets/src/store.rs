use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tileslide_core::{PuzzleImage, IMAGE_SIDE};

use crate::{Catalog, CatalogEntry};

/// Size in bytes of one raw 480x480 RGB565 image.
pub const IMAGE_BYTES: usize = (IMAGE_SIDE * IMAGE_SIDE * 2) as usize;

/// Reasons a puzzle image could not be loaded.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The file could not be opened or read.
    #[error("failed to read puzzle image {}", .path.display())]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file does not hold exactly one raw image.
    #[error("puzzle image {} is {actual} bytes, expected {expected}", .path.display())]
    WrongSize {
        /// File that was requested.
        path: PathBuf,
        /// Required byte count.
        expected: usize,
        /// Byte count found.
        actual: usize,
    },
}

/// Storage collaborator that produces decoded puzzle images.
pub trait AssetStore {
    /// Loads the picture behind a catalog entry.
    fn load_image(&mut self, entry: &CatalogEntry) -> Result<PuzzleImage, AssetError>;
}

impl<S: AssetStore + ?Sized> AssetStore for &mut S {
    fn load_image(&mut self, entry: &CatalogEntry) -> Result<PuzzleImage, AssetError> {
        (**self).load_image(entry)
    }
}

/// Reads raw RGB565 images from a directory tree.
#[derive(Clone, Debug)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Creates a store rooted at the provided directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory catalog paths are resolved against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing the catalog entry.
    #[must_use]
    pub fn resolve(&self, entry: &CatalogEntry) -> PathBuf {
        self.root.join(entry.path.trim_start_matches('/'))
    }

    /// Lists catalog files that are missing under the root.
    pub fn verify(&self, catalog: &Catalog) -> Vec<PathBuf> {
        let missing: Vec<PathBuf> = catalog
            .iter()
            .map(|entry| self.resolve(entry))
            .filter(|path| !path.is_file())
            .collect();

        for path in &missing {
            log::warn!("missing puzzle image {}", path.display());
        }
        log::info!(
            "puzzle files found: {} / {}",
            catalog.len() - missing.len(),
            catalog.len()
        );
        missing
    }
}

impl AssetStore for DirectoryStore {
    fn load_image(&mut self, entry: &CatalogEntry) -> Result<PuzzleImage, AssetError> {
        let path = self.resolve(entry);
        let bytes = fs::read(&path).map_err(|source| AssetError::Io {
            path: path.clone(),
            source,
        })?;
        let image = decode_rgb565(&bytes).ok_or(AssetError::WrongSize {
            path: path.clone(),
            expected: IMAGE_BYTES,
            actual: bytes.len(),
        })?;
        log::info!("loaded puzzle image {}", path.display());
        Ok(image)
    }
}

/// Decodes a raw little-endian RGB565 image of exactly [`IMAGE_BYTES`] bytes.
#[must_use]
pub fn decode_rgb565(bytes: &[u8]) -> Option<PuzzleImage> {
    if bytes.len() != IMAGE_BYTES {
        return None;
    }
    let pixels = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    PuzzleImage::from_pixels(IMAGE_SIDE, pixels)
}
