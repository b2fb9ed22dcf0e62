//! Song catalog: track model, directory scanning, explicit picks and the
//! ordered catalog that playback walks through.

mod blob;
mod catalog;
mod display;
mod model;
mod picker;
mod scan;

pub use blob::{Blob, BlobStore};
pub use catalog::Catalog;
pub use model::{Source, SourceUrl, Track, UNKNOWN_ARTIST, title_from_name};
pub use picker::{PickError, import_reader, pick_files};
pub use scan::{ScanFailure, ScanReport, default_folders, scan_folders};
