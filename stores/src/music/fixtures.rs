//! Demo catalog served under [`FallbackPolicy::Fixtures`].
//!
//! [`FallbackPolicy::Fixtures`]: crate::config::FallbackPolicy::Fixtures

use cadence_api::{CatalogEntry, EntityId, Page, Track};

/// Fixture tracks marked as favorite.
pub const FAVORITES: [EntityId; 1] = [2];

fn track(id: EntityId, title: &str, artist: &str, album: &str, genre: &str, year: i32, duration: u32) -> Track {
    Track {
        id,
        title: title.into(),
        artist: artist.into(),
        album: Some(album.into()),
        genre: Some(genre.into()),
        year: Some(year),
        duration: Some(duration),
        duration_formatted: Some(format!("{}:{:02}", duration / 60, duration % 60)),
        is_public: true,
        ..Track::default()
    }
}

/// The three demo tracks.
#[must_use]
pub fn tracks() -> Vec<Track> {
    vec![
        track(1, "Shape of You", "Ed Sheeran", "÷ (Divide)", "Pop", 2017, 233),
        track(2, "Blinding Lights", "The Weeknd", "After Hours", "Synthpop", 2020, 200),
        track(3, "Watermelon Sugar", "Harry Styles", "Fine Line", "Pop Rock", 2020, 174),
    ]
}

/// The demo tracks as a single page.
#[must_use]
pub fn page() -> Page<Track> {
    let items = tracks();
    let total = items.len() as u64;
    Page {
        items,
        total,
        pages: 1,
        current_page: 1,
        per_page: total,
        has_next: false,
        has_prev: false,
    }
}

/// Two catalog entries echoing `query`.
#[must_use]
pub fn search_results(query: &str) -> Vec<CatalogEntry> {
    vec![
        CatalogEntry {
            spotify_id: "fixture-1".into(),
            title: format!("Resultado para: {query}"),
            artist: "Artista Encontrado".into(),
            album: Some("Album Encontrado".into()),
            genre: Some("Pop".into()),
            year: Some(2024),
            ..CatalogEntry::default()
        },
        CatalogEntry {
            spotify_id: "fixture-2".into(),
            title: format!("{query} - Extended Version"),
            artist: "Outro Artista".into(),
            album: Some("Single".into()),
            genre: Some("Rock".into()),
            year: Some(2023),
            ..CatalogEntry::default()
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_page_is_complete() {
        let page = page();
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total, 3);
        assert!(!page.has_next);
        assert_eq!(page.items[0].duration_formatted.as_deref(), Some("3:53"));
    }

    #[test]
    fn test_search_results_echo_query() {
        let results = search_results("lofi");
        assert_eq!(results[0].title, "Resultado para: lofi");
        assert_eq!(results[1].title, "lofi - Extended Version");
    }
}
