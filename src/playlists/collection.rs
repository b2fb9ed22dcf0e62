use serde::{Deserialize, Serialize};

use crate::library::SourceUrl;

pub const RECENTLY_PLAYED: &str = "Recently Played";
pub const FAVORITES: &str = "Favorites";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<SourceUrl>,
}

impl Playlist {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tracks: Vec::new(),
        }
    }

    pub fn contains(&self, url: &SourceUrl) -> bool {
        self.tracks.contains(url)
    }
}

/// The built-in playlists plus any extra ones found in the store.
#[derive(Debug, Clone)]
pub struct Playlists {
    lists: Vec<Playlist>,
    history_limit: usize,
}

impl Playlists {
    pub fn new(history_limit: usize) -> Self {
        Self::from_stored(Vec::new(), history_limit)
    }

    /// Rebuild from stored playlists. Missing built-ins are created, duplicate
    /// entries collapsed and the history trimmed to `history_limit`.
    pub fn from_stored(stored: Vec<Playlist>, history_limit: usize) -> Self {
        let history_limit = history_limit.max(1);
        let mut lists: Vec<Playlist> = Vec::new();

        for mut list in stored {
            if lists.iter().any(|l| l.name == list.name) {
                log::warn!("duplicate playlist {:?} in store, keeping the first", list.name);
                continue;
            }
            let mut seen = std::collections::HashSet::new();
            list.tracks.retain(|u| seen.insert(u.clone()));
            lists.push(list);
        }

        for name in [RECENTLY_PLAYED, FAVORITES] {
            if !lists.iter().any(|l| l.name == name) {
                lists.push(Playlist::new(name));
            }
        }

        let mut playlists = Self {
            lists,
            history_limit,
        };
        if let Some(history) = playlists.get_mut(RECENTLY_PLAYED) {
            history.tracks.truncate(history_limit);
        }
        playlists
    }

    pub fn all(&self) -> &[Playlist] {
        &self.lists
    }

    pub fn get(&self, name: &str) -> Option<&Playlist> {
        self.lists.iter().find(|l| l.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Playlist> {
        self.lists.iter_mut().find(|l| l.name == name)
    }

    /// Most recent first.
    pub fn recently_played(&self) -> &[SourceUrl] {
        self.get(RECENTLY_PLAYED).map_or(&[], |l| &l.tracks)
    }

    pub fn favorites(&self) -> &[SourceUrl] {
        self.get(FAVORITES).map_or(&[], |l| &l.tracks)
    }

    /// Put `url` at the front of the history unless it is already there
    /// somewhere. Returns whether it was added.
    pub fn record_played(&mut self, url: &SourceUrl) -> bool {
        let limit = self.history_limit;
        let Some(history) = self.get_mut(RECENTLY_PLAYED) else {
            return false;
        };
        if history.contains(url) {
            return false;
        }
        history.tracks.insert(0, url.clone());
        history.tracks.truncate(limit);
        true
    }

    pub fn is_favorite(&self, url: &SourceUrl) -> bool {
        self.get(FAVORITES).is_some_and(|l| l.contains(url))
    }

    /// Returns whether `url` is a favorite afterwards.
    pub fn toggle_favorite(&mut self, url: &SourceUrl) -> bool {
        let Some(favorites) = self.get_mut(FAVORITES) else {
            return false;
        };
        if let Some(i) = favorites.tracks.iter().position(|u| u == url) {
            favorites.tracks.remove(i);
            false
        } else {
            favorites.tracks.push(url.clone());
            true
        }
    }

    /// Drop `url` from every playlist.
    pub fn forget(&mut self, url: &SourceUrl) {
        for list in &mut self.lists {
            list.tracks.retain(|u| u != url);
        }
    }

    /// Copy suitable for writing out: blob urls only live as long as the process.
    pub fn persistable(&self) -> Vec<Playlist> {
        self.lists
            .iter()
            .map(|l| Playlist {
                name: l.name.clone(),
                tracks: l.tracks.iter().filter(|u| !u.is_blob()).cloned().collect(),
            })
            .collect()
    }
}
