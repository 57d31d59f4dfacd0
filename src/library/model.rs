use std::fmt;
use std::path::PathBuf;

use super::locator::SourceLocator;

/// Identity of a track, stable for the track's lifetime.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
pub struct Track {
    pub id: TrackId,
    pub display_name: String,
    pub locator: SourceLocator,
}

/// A file offered for intake, as a file picker would hand it over: its name,
/// where it lives, and the media type it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingFile {
    pub name: String,
    pub path: PathBuf,
    pub media_type: String,
}

impl IncomingFile {
    pub fn is_audio(&self) -> bool {
        self.media_type.starts_with("audio/")
    }
}
