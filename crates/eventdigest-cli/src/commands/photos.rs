//! Google Photos browsing.
//!
//! Album visibility lives only as long as the command: `browse --hide`
//! leaves albums out of that run.

use std::fmt::Write;

use eventdigest_app::{LibraryUpdate, PhotoLibrary, Subscription};
use eventdigest_core::{CalendarKind, PhotoAlbum};
use eventdigest_providers::{GooglePhotos, LoginService};
use tracing::debug;

use crate::context::Context;
use crate::error::{CliError, CliResult};

/// Opens the photo library of the Google sign in.
async fn open_library(ctx: &Context, page_size: Option<usize>) -> CliResult<PhotoLibrary<GooglePhotos>> {
    let login = ctx.login_for(CalendarKind::Google);
    if !login.restore_previous_sign_in().await {
        return Err(CliError::NotLoggedIn);
    }

    let source = GooglePhotos::new(login).with_timeout(ctx.config.providers.timeout());
    let library = PhotoLibrary::new(source)
        .with_page_size(page_size.unwrap_or(ctx.config.photos.page_size));
    if !library.load_albums().await {
        return Err(CliError::provider("albums unavailable"));
    }
    Ok(library)
}

/// One line per album with fetched and announced photo counts.
pub fn format_albums(albums: &[PhotoAlbum]) -> String {
    let mut out = String::new();
    for album in albums {
        let _ = write!(out, "{}  {}  ", album.id, album.title);
        if album.photos_fetched() {
            let _ = writeln!(out, "{} photos", album.fetched_count());
        } else {
            let _ = writeln!(out, "{}/{} photos", album.fetched_count(), album.photos_count);
        }
    }
    out
}

pub async fn albums(ctx: &Context) -> CliResult<()> {
    let library = open_library(ctx, None).await?;
    print!("{}", format_albums(&library.visible_albums()));
    Ok(())
}

/// Fetches a whole album and prints one URL per photo.
pub async fn fetch(ctx: &Context, album_id: &str) -> CliResult<()> {
    let library = open_library(ctx, None).await?;
    if library.album(album_id).is_none() {
        return Err(CliError::usage(format!("unknown album '{album_id}'")));
    }

    let fetched = library.fetch_all_photos(album_id).await;
    debug!(album = album_id, fetched, "album fetched");

    let photos = library
        .album(album_id)
        .and_then(|album| album.photos)
        .unwrap_or_default();
    for photo in photos {
        println!("{}", photo.url());
    }
    Ok(())
}

/// Runs up to `batches` batch fetches over the visible albums.
pub async fn browse(
    ctx: &Context,
    batches: usize,
    page_size: Option<usize>,
    hide: &[String],
) -> CliResult<()> {
    let library = open_library(ctx, page_size).await?;
    for album_id in hide {
        library.hide_album(album_id)?;
    }

    let mut updates = library.subscribe();
    for batch in 1..=batches {
        let fetched = library.fetch_next_batch().await;
        let updated = drain_updated(&mut updates);
        println!("batch {batch}: {fetched} photos from {updated} album updates");
        if fetched == 0 {
            break;
        }
    }
    library.unsubscribe(updates.id);

    print!("{}", format_albums(&library.visible_albums()));
    let hidden = library.hidden_albums();
    if !hidden.is_empty() {
        println!("hidden:");
        print!("{}", format_albums(&hidden));
    }
    Ok(())
}

fn drain_updated(updates: &mut Subscription<LibraryUpdate>) -> usize {
    let mut count = 0;
    while let Ok(update) = updates.receiver.try_recv() {
        if matches!(update, LibraryUpdate::AlbumUpdated(_)) {
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventdigest_core::{GooglePhoto, PhotoSize};
    use url::Url;

    fn album(id: &str, count: usize) -> PhotoAlbum {
        PhotoAlbum::new(
            id,
            format!("Album {id}"),
            count,
            Url::parse("https://lh3.googleusercontent.com/lr/cover").unwrap(),
            Url::parse("https://photos.google.com/lr/album").unwrap(),
        )
    }

    #[test]
    fn formats_progress() {
        let partial = {
            let mut album = album("a", 3);
            album.merge_photos(vec![GooglePhoto::new(
                "p1",
                "p1.jpg",
                "image/jpeg",
                PhotoSize::new(10.0, 10.0),
                Url::parse("https://lh3.googleusercontent.com/lr/p1").unwrap(),
                Url::parse("https://photos.google.com/lr/photo/p1").unwrap(),
            )]);
            album
        };
        let complete = {
            let mut album = album("b", 5);
            album.mark_fetched();
            album
        };

        assert_eq!(
            format_albums(&[partial, complete]),
            "a  Album a  1/3 photos\nb  Album b  0 photos\n"
        );
    }
}
