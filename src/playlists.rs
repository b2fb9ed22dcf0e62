//! Named groups of track identities ("Recently Played", "Favorites") and
//! their on-disk store.

mod collection;
mod store;

pub use collection::{FAVORITES, Playlist, Playlists, RECENTLY_PLAYED};
pub use store::{StoreError, load_playlists, save_playlists};
