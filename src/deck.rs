use std::collections::BTreeMap;
use std::fmt;

use sha2::{Digest, Sha256};

use crate::track::Track;

/// The cards printed on one sheet, in reading order of the title side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    tracks: Vec<Track>,
    capacity: usize,
}

impl Page {
    fn new(capacity: usize) -> Self {
        Self {
            tracks: Vec::with_capacity(capacity),
            capacity,
        }
    }

    fn push(&mut self, track: Track) {
        debug_assert!(!self.is_full());
        self.tracks.push(track);
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tracks.len() >= self.capacity
    }
}

/// Bucket tracks into pages of `capacity` cards, keeping the input order.
///
/// Only the last page can be partially filled; an input of zero tracks yields
/// no pages at all.
///
/// # Panics
///
/// Panics if `capacity` is zero. A validated configuration always has at
/// least one column and one row.
pub fn paginate<I>(tracks: I, capacity: usize) -> Vec<Page>
where
    I: IntoIterator<Item = Track>,
{
    assert!(capacity > 0, "page capacity must be positive");
    let mut pages = Vec::new();
    let mut page = Page::new(capacity);
    for track in tracks {
        page.push(track);
        if page.is_full() {
            pages.push(std::mem::replace(&mut page, Page::new(capacity)));
        }
    }
    if !page.is_empty() {
        pages.push(page);
    }
    pages
}

/// Distribution of the deck over years and decades.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckStats {
    pub by_year: BTreeMap<i32, usize>,
    pub by_decade: BTreeMap<i32, usize>,
    pub total: usize,
}

impl DeckStats {
    pub fn collect<'a, I>(tracks: I) -> Self
    where
        I: IntoIterator<Item = &'a Track>,
    {
        let mut stats = Self::default();
        for track in tracks {
            *stats.by_year.entry(track.year).or_default() += 1;
            *stats.by_decade.entry(track.decade()).or_default() += 1;
            stats.total += 1;
        }
        stats
    }
}

impl fmt::Display for DeckStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "YEAR STATISTICS")?;
        for (year, count) in &self.by_year {
            writeln!(f, "{year}: {count:2} {}", "#".repeat(*count))?;
        }
        writeln!(f)?;
        writeln!(f, "DECADE STATISTICS")?;
        for (decade, count) in &self.by_decade {
            writeln!(f, "{decade}s: {count:2} {}", "#".repeat(*count))?;
        }
        writeln!(f)?;
        write!(f, "TOTAL: {} tracks", self.total)
    }
}

/// SHA-256 over the ordered track identities and their printed text.
///
/// Two runs that would print the same cards in the same order share a
/// fingerprint.
pub fn fingerprint(tracks: &[Track]) -> String {
    let mut hasher = Sha256::new();
    for track in tracks {
        hasher.update(track.md5sum.as_bytes());
        hasher.update(b"\0");
        hasher.update(track.year.to_string().as_bytes());
        hasher.update(b"\0");
        hasher.update(track.artist.as_bytes());
        hasher.update(b"\0");
        hasher.update(track.title.as_bytes());
        hasher.update(b"\0");
        hasher.update(track.url.as_bytes());
        hasher.update(b"\n");
    }
    let digest = hasher.finalize();
    format!("{digest:x}")
}
