//! Application module: the state behind the TUI.
//!
//! `App` wraps the playback controller with the things only a front end
//! cares about: which list is shown, the cursor, the open prompt, notices.

mod model;
mod notices;

pub use model::*;
pub use notices::{Notice, NoticeLevel, Notices};

#[cfg(test)]
mod tests;
