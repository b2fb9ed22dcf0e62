use std::collections::HashSet;

use super::model::{SourceUrl, Track};

/// Ordered list of playable tracks. Insertion order drives next/previous.
#[derive(Debug, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `incoming`, skipping any track whose url is already present
    /// (in the catalog or earlier in the same batch). Returns how many were added.
    pub fn merge<I>(&mut self, incoming: I) -> usize
    where
        I: IntoIterator<Item = Track>,
    {
        let mut seen: HashSet<SourceUrl> = self.tracks.iter().map(|t| t.url.clone()).collect();
        let before = self.tracks.len();
        for track in incoming {
            if seen.insert(track.url.clone()) {
                self.tracks.push(track);
            } else {
                log::trace!("skipping duplicate {}", track.url);
            }
        }
        self.tracks.len() - before
    }

    /// Remove the track with `url`; dropping the returned value releases its source.
    pub fn remove(&mut self, url: &SourceUrl) -> Option<Track> {
        let idx = self.position(url)?;
        Some(self.tracks.remove(idx))
    }

    pub fn position(&self, url: &SourceUrl) -> Option<usize> {
        self.tracks.iter().position(|t| &t.url == url)
    }

    pub fn get(&self, idx: usize) -> Option<&Track> {
        self.tracks.get(idx)
    }

    pub fn get_by_url(&self, url: &SourceUrl) -> Option<&Track> {
        self.tracks.iter().find(|t| &t.url == url)
    }

    /// Tracks after `url`, i.e. what plays next without shuffle.
    pub fn after(&self, url: &SourceUrl) -> &[Track] {
        match self.position(url) {
            Some(i) => &self.tracks[i + 1..],
            None => &[],
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
