//! Photos and albums from the remote photo library.
//!
//! [`GooglePhoto`] knows how to build a sized fetch URL: Google Photos base
//! URLs accept a `=w{width}-h{height}` suffix selecting the served size.

use serde::{Deserialize, Serialize};
use url::Url;

/// Largest size requested from the photo service by [`GooglePhoto::url`].
pub const MAX_PHOTO_SIZE: PhotoSize = PhotoSize::new(2048.0, 2048.0);

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhotoSize {
    pub width: f64,
    pub height: f64,
}

impl PhotoSize {
    /// Creates a size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Multiplies both dimensions, e.g. by a display scale factor.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// Scales `self` so that it keeps the aspect ratio of `photo` and neither
    /// dimension ends up below the requested one.
    pub fn fitted_to_aspect_of(&self, photo: PhotoSize) -> Self {
        let aspect_ratio = photo.aspect_ratio();
        let scaled_width = self.height * aspect_ratio;
        let scaled_height = self.width / aspect_ratio;

        let width = scaled_width.max(self.width);
        let height = scaled_height.max(self.height);

        if width / height > aspect_ratio {
            Self::new(height * aspect_ratio, height)
        } else {
            Self::new(width, width / aspect_ratio)
        }
    }

    /// Shrinks `self` on its own aspect ratio until it fits inside `bound`.
    /// A size already inside is returned unchanged.
    pub fn fitted_within(&self, bound: PhotoSize) -> Self {
        if !self.exceeds(bound) {
            return *self;
        }
        if self.width * bound.height >= self.height * bound.width {
            Self::new(bound.width, self.height * bound.width / self.width)
        } else {
            Self::new(self.width * bound.height / self.height, bound.height)
        }
    }

    fn exceeds(&self, other: PhotoSize) -> bool {
        self.width > other.width || self.height > other.height
    }
}

/// Photo orientation derived from its pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
}

/// A media item from Google Photos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GooglePhoto {
    pub id: String,
    pub filename: String,
    pub mime_type: String,
    pub size: PhotoSize,
    base_url: Url,
    product_url: Url,
}

impl GooglePhoto {
    /// Creates a photo.
    pub fn new(
        id: impl Into<String>,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        size: PhotoSize,
        base_url: Url,
        product_url: Url,
    ) -> Self {
        Self {
            id: id.into(),
            filename: filename.into(),
            mime_type: mime_type.into(),
            size,
            base_url,
            product_url,
        }
    }

    /// Orientation of the original photo.
    pub fn orientation(&self) -> Orientation {
        if self.size.width > self.size.height {
            Orientation::Landscape
        } else if self.size.width < self.size.height {
            Orientation::Portrait
        } else {
            Orientation::Square
        }
    }

    /// Link to the photo in the Google Photos web UI.
    pub fn product_url(&self) -> &Url {
        &self.product_url
    }

    /// URL of the photo at its native size, scaled down on its aspect ratio
    /// to fit [`MAX_PHOTO_SIZE`] when larger.
    pub fn url(&self) -> Url {
        self.url_for(self.size.fitted_within(MAX_PHOTO_SIZE), false)
    }

    /// URL of the photo served at `size`.
    ///
    /// With `maintaining_aspect_ratio` the requested box is grown to the
    /// photo's aspect ratio so that the served image covers the box.
    /// Dimensions are truncated to whole pixels.
    pub fn url_for(&self, size: PhotoSize, maintaining_aspect_ratio: bool) -> Url {
        let size = if maintaining_aspect_ratio {
            size.fitted_to_aspect_of(self.size)
        } else {
            size
        };

        let mut url = self.base_url.clone();
        let path = format!(
            "{}=w{}-h{}",
            self.base_url.path(),
            size.width as u32,
            size.height as u32
        );
        url.set_path(&path);
        url
    }
}

/// An album and the photos fetched for it so far.
///
/// Equality is by id only; the photo list changes while pages arrive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoAlbum {
    pub id: String,
    pub title: String,
    /// Number of media items the service reports for the album.
    pub photos_count: usize,
    pub cover_photo_base_url: Url,
    pub product_url: Url,
    /// `None` until the first page of photos arrives.
    pub photos: Option<Vec<GooglePhoto>>,
    #[serde(default)]
    fetch_complete: bool,
}

impl PartialEq for PhotoAlbum {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PhotoAlbum {}

impl PhotoAlbum {
    /// Creates an album with no photos fetched.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        photos_count: usize,
        cover_photo_base_url: Url,
        product_url: Url,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            photos_count,
            cover_photo_base_url,
            product_url,
            photos: None,
            fetch_complete: false,
        }
    }

    /// Returns true once a fetch of this album ran to completion.
    pub fn photos_fetched(&self) -> bool {
        self.fetch_complete
    }

    /// Marks the album as fully fetched. An album that never received a page
    /// gets an empty photo list.
    pub fn mark_fetched(&mut self) {
        self.photos.get_or_insert_with(Vec::new);
        self.fetch_complete = true;
    }

    /// Number of photos fetched so far.
    pub fn fetched_count(&self) -> usize {
        self.photos.as_ref().map_or(0, Vec::len)
    }

    /// Number of photos the service announced but that are not fetched yet.
    pub fn pending_count(&self) -> usize {
        self.photos_count.saturating_sub(self.fetched_count())
    }

    /// Appends photos not already present, returning how many were added.
    pub fn merge_photos(&mut self, incoming: Vec<GooglePhoto>) -> usize {
        let photos = self.photos.get_or_insert_with(Vec::new);
        let before = photos.len();
        for photo in incoming {
            if !photos.iter().any(|existing| existing.id == photo.id) {
                photos.push(photo);
            }
        }
        photos.len() - before
    }
}
