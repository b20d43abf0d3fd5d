//! Album browsing over a [`PhotoSource`](eventdigest_providers::PhotoSource).
//!
//! [`PhotoLibrary`] pages photos in on demand, either one album at a time or
//! in fixed-size batches across the visible albums, and tells subscribers
//! what changed through [`LibraryUpdate`].

mod library;

use eventdigest_core::{GooglePhoto, PhotoAlbum};

pub use library::{DEFAULT_PAGE_SIZE, PhotoLibrary};

/// What an album looks like after a page landed.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumSnapshot {
    pub album_id: String,
    pub photos: Vec<GooglePhoto>,
    /// Photos announced by the service but not fetched yet. Zero once the
    /// album is complete.
    pub placeholders: usize,
}

impl AlbumSnapshot {
    pub fn of(album: &PhotoAlbum) -> Self {
        Self {
            album_id: album.id.clone(),
            photos: album.photos.clone().unwrap_or_default(),
            placeholders: if album.photos_fetched() {
                0
            } else {
                album.pending_count()
            },
        }
    }
}

/// Change notifications of a [`PhotoLibrary`].
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryUpdate {
    /// The album list was replaced.
    Reloaded,
    AlbumUpdated(AlbumSnapshot),
    AlbumHidden(String),
    AlbumShown(String),
}
