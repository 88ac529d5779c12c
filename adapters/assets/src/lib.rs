#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Puzzle catalog and image storage for Tile Slide adapters.

pub mod catalog;
mod store;

pub use catalog::{Catalog, CatalogEntry, CatalogManifest, EntrySpec};
pub use store::{decode_rgb565, AssetError, AssetStore, DirectoryStore, IMAGE_BYTES};
