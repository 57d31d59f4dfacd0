//! Library intake: turning paths on disk into playlist candidates.
//!
//! `scan` walks directories and tags each file with a declared media type,
//! `display` derives display names, and `locator` mints the transient
//! references the playback primitive resolves.

mod display;
mod locator;
mod model;
mod scan;

pub use display::display_name_for;
pub use locator::{LocatorRegistry, SourceLocator};
pub use model::{IncomingFile, Track, TrackId};
pub use scan::collect;

#[cfg(test)]
mod tests;
