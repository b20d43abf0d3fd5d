use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use eventdigest_core::PhotoAlbum;
use eventdigest_providers::{PhotoPage, PhotoSource};
use tracing::{debug, info, warn};

use super::{AlbumSnapshot, LibraryUpdate};
use crate::error::LibraryError;
use crate::routes::{Subscribers, Subscription, SubscriptionId};

/// Photos fetched per [`PhotoLibrary::fetch_next_batch`] call by default.
pub const DEFAULT_PAGE_SIZE: usize = 25;

#[derive(Debug, Default)]
struct LibraryState {
    /// Albums in the order the source listed them.
    albums: Vec<PhotoAlbum>,
    /// Ids of visible albums in display order.
    visible: Vec<String>,
    hidden: HashSet<String>,
    /// Continuation token of each partially fetched album.
    resume_tokens: HashMap<String, String>,
    /// Bumped by every reload; fetches started before it discard their pages.
    generation: u64,
}

impl LibraryState {
    fn album(&self, id: &str) -> Option<&PhotoAlbum> {
        self.albums.iter().find(|album| album.id == id)
    }
}

/// Albums of a photo source and the photos paged in so far.
///
/// The library is driven from a single task. Fetches suspend at each call to
/// the source, so several of them may be interleaved; an in-flight set keeps
/// two fetches off the same album and a flag keeps batches one at a time.
/// No borrow of the internal state is held across a suspension point.
pub struct PhotoLibrary<S> {
    source: S,
    page_size: usize,
    state: RefCell<LibraryState>,
    in_flight: RefCell<HashSet<String>>,
    batch_in_flight: Cell<bool>,
    updates: Subscribers<LibraryUpdate>,
}

impl<S> std::fmt::Debug for PhotoLibrary<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoLibrary")
            .field("page_size", &self.page_size)
            .field("state", &self.state)
            .field("in_flight", &self.in_flight)
            .field("batch_in_flight", &self.batch_in_flight)
            .finish_non_exhaustive()
    }
}

impl<S: PhotoSource> PhotoLibrary<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            page_size: DEFAULT_PAGE_SIZE,
            state: RefCell::new(LibraryState::default()),
            in_flight: RefCell::new(HashSet::new()),
            batch_in_flight: Cell::new(false),
            updates: Subscribers::new(),
        }
    }

    /// Builder method to change the batch size. Zero is raised to one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Replaces the album list with the one from the source.
    ///
    /// Returns false and keeps the current albums if the source has none to
    /// offer. On success every album is visible again, partial fetches are
    /// forgotten and fetches still running drop their pages.
    pub async fn load_albums(&self) -> bool {
        let Some(albums) = self.source.get_albums().await else {
            warn!("album list unavailable, keeping current albums");
            return false;
        };

        let mut seen = HashSet::new();
        let albums: Vec<PhotoAlbum> = albums
            .into_iter()
            .filter(|album| seen.insert(album.id.clone()))
            .collect();
        let count = albums.len();

        {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            state.visible = albums.iter().map(|album| album.id.clone()).collect();
            state.albums = albums;
            state.hidden.clear();
            state.resume_tokens.clear();
        }
        self.in_flight.borrow_mut().clear();
        self.batch_in_flight.set(false);

        info!(albums = count, "albums loaded");
        self.updates.publish(&LibraryUpdate::Reloaded);
        true
    }

    /// Fetches every remaining page of one album.
    ///
    /// Does nothing for an unknown album, a complete one, or one another
    /// fetch is already working on. A partially fetched album resumes where
    /// it stopped. Returns the number of new photos.
    pub async fn fetch_all_photos(&self, album_id: &str) -> usize {
        let (generation, mut token) = {
            let state = self.state.borrow();
            match state.album(album_id) {
                None => {
                    debug!(album = album_id, "fetch of unknown album ignored");
                    return 0;
                }
                Some(album) if album.photos_fetched() => {
                    debug!(album = album_id, "album already complete");
                    return 0;
                }
                Some(_) => {}
            }
            (state.generation, state.resume_tokens.get(album_id).cloned())
        };

        if !self.in_flight.borrow_mut().insert(album_id.to_string()) {
            debug!(album = album_id, "album fetch already running");
            return 0;
        }

        let mut fetched = 0;
        loop {
            let page = self.source.get_photos(album_id, token.as_deref()).await;
            if self.generation() != generation {
                debug!(album = album_id, "library reloaded, page dropped");
                return fetched;
            }

            token = page.next_page_token.clone();
            fetched += self.merge_page(album_id, page);
            if token.is_none() {
                break;
            }
        }

        self.in_flight.borrow_mut().remove(album_id);
        debug!(album = album_id, fetched, "album fetch complete");
        fetched
    }

    /// Fetches about one page worth of photos across the visible albums.
    ///
    /// Albums are taken in display order, each from where it last stopped.
    /// The batch moves on to the next album once one is exhausted and stops
    /// as soon as the page size is reached. Complete albums and albums with
    /// a running fetch are skipped. Does nothing while another batch runs.
    /// Returns the number of new photos.
    pub async fn fetch_next_batch(&self) -> usize {
        if self.batch_in_flight.replace(true) {
            debug!("batch already running");
            return 0;
        }

        let generation = self.generation();
        let mut fetched = 0;
        while fetched < self.page_size {
            let Some((album_id, token)) = self.next_batch_album() else {
                debug!("no album left to fetch");
                break;
            };

            self.in_flight.borrow_mut().insert(album_id.clone());
            let page = self.source.get_photos(&album_id, token.as_deref()).await;
            if self.generation() != generation {
                debug!(album = %album_id, "library reloaded, batch dropped");
                return fetched;
            }
            self.in_flight.borrow_mut().remove(&album_id);

            fetched += self.merge_page(&album_id, page);
        }

        self.batch_in_flight.set(false);
        debug!(fetched, "batch complete");
        fetched
    }

    /// Removes an album from the visible order.
    pub fn hide_album(&self, album_id: &str) -> Result<(), LibraryError> {
        {
            let mut state = self.state.borrow_mut();
            if state.album(album_id).is_none() {
                return Err(LibraryError::AlbumNotFound {
                    id: album_id.to_string(),
                });
            }
            if !state.hidden.insert(album_id.to_string()) {
                return Err(LibraryError::AlbumAlreadyHidden {
                    id: album_id.to_string(),
                });
            }
            state.visible.retain(|id| id != album_id);
        }

        debug!(album = album_id, "album hidden");
        self.updates
            .publish(&LibraryUpdate::AlbumHidden(album_id.to_string()));
        Ok(())
    }

    /// Puts a hidden album back in front of the closest visible album that
    /// followed it in the source order, or last if there is none.
    pub fn show_album(&self, album_id: &str) -> Result<(), LibraryError> {
        let snapshot = {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;

            let Some(position) = state.albums.iter().position(|album| album.id == album_id) else {
                return Err(LibraryError::AlbumNotFound {
                    id: album_id.to_string(),
                });
            };
            if !state.hidden.remove(album_id) {
                return Err(LibraryError::AlbumAlreadyVisible {
                    id: album_id.to_string(),
                });
            }

            let insert_at = state.albums[position + 1..]
                .iter()
                .find_map(|later| state.visible.iter().position(|id| *id == later.id))
                .unwrap_or(state.visible.len());
            state.visible.insert(insert_at, album_id.to_string());

            let album = &state.albums[position];
            album.photos.is_some().then(|| AlbumSnapshot::of(album))
        };

        debug!(album = album_id, "album shown");
        self.updates
            .publish(&LibraryUpdate::AlbumShown(album_id.to_string()));
        if let Some(snapshot) = snapshot {
            self.updates.publish(&LibraryUpdate::AlbumUpdated(snapshot));
        }
        Ok(())
    }

    /// All albums in source order.
    pub fn albums(&self) -> Vec<PhotoAlbum> {
        self.state.borrow().albums.clone()
    }

    /// Visible albums in display order.
    pub fn visible_albums(&self) -> Vec<PhotoAlbum> {
        let state = self.state.borrow();
        state
            .visible
            .iter()
            .filter_map(|id| state.album(id))
            .cloned()
            .collect()
    }

    /// Hidden albums in source order.
    pub fn hidden_albums(&self) -> Vec<PhotoAlbum> {
        let state = self.state.borrow();
        state
            .albums
            .iter()
            .filter(|album| state.hidden.contains(&album.id))
            .cloned()
            .collect()
    }

    pub fn album(&self, album_id: &str) -> Option<PhotoAlbum> {
        self.state.borrow().album(album_id).cloned()
    }

    pub fn is_hidden(&self, album_id: &str) -> bool {
        self.state.borrow().hidden.contains(album_id)
    }

    /// Returns true while a fetch is waiting on the source for `album_id`.
    pub fn is_fetching(&self, album_id: &str) -> bool {
        self.in_flight.borrow().contains(album_id)
    }

    pub fn is_batch_in_flight(&self) -> bool {
        self.batch_in_flight.get()
    }

    pub fn subscribe(&self) -> Subscription<LibraryUpdate> {
        self.updates.subscribe()
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.updates.unsubscribe(id)
    }

    fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    fn next_batch_album(&self) -> Option<(String, Option<String>)> {
        let state = self.state.borrow();
        let in_flight = self.in_flight.borrow();
        state
            .visible
            .iter()
            .filter_map(|id| state.album(id))
            .find(|album| !album.photos_fetched() && !in_flight.contains(&album.id))
            .map(|album| {
                (
                    album.id.clone(),
                    state.resume_tokens.get(&album.id).cloned(),
                )
            })
    }

    /// Merges a page into its album and publishes the result unless the
    /// album is hidden. Returns the number of new photos.
    fn merge_page(&self, album_id: &str, page: PhotoPage) -> usize {
        let (added, snapshot) = {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            let hidden = state.hidden.contains(album_id);

            let Some(album) = state.albums.iter_mut().find(|album| album.id == album_id) else {
                return 0;
            };
            let added = album.merge_photos(page.photos);
            match page.next_page_token {
                Some(token) => {
                    state.resume_tokens.insert(album_id.to_string(), token);
                }
                None => {
                    album.mark_fetched();
                    state.resume_tokens.remove(album_id);
                }
            }

            (added, (!hidden).then(|| AlbumSnapshot::of(album)))
        };

        debug!(album = album_id, added, "page merged");
        if let Some(snapshot) = snapshot {
            self.updates.publish(&LibraryUpdate::AlbumUpdated(snapshot));
        }
        added
    }
}
