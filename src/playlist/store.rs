use thiserror::Error;
use tracing::{debug, info};

use crate::library::{IncomingFile, LocatorRegistry, Track, TrackId, display_name_for};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaylistError {
    #[error("track index {index} is out of range (playlist has {len} tracks)")]
    OutOfRange { index: usize, len: usize },
}

/// Ordered, append-only list of tracks.
///
/// Tracks own their locators, so dropping the store releases every locator it
/// minted.
#[derive(Debug)]
pub struct PlaylistStore {
    tracks: Vec<Track>,
    registry: LocatorRegistry,
    next_id: u64,
}

impl PlaylistStore {
    pub fn new(registry: LocatorRegistry) -> Self {
        Self {
            tracks: Vec::new(),
            registry,
            next_id: 0,
        }
    }

    /// Append every audio item of `files` in order and return the new ids.
    ///
    /// Items whose declared media type is not `audio/*` are dropped silently.
    pub fn add_tracks<I>(&mut self, files: I) -> Vec<TrackId>
    where
        I: IntoIterator<Item = IncomingFile>,
    {
        let mut added = Vec::new();

        for file in files {
            if !file.is_audio() {
                debug!(name = %file.name, media_type = %file.media_type, "ignoring non-audio file");
                continue;
            }

            let Some(display_name) = name_for(&file) else {
                debug!(path = %file.path.display(), "ignoring file without a name");
                continue;
            };

            self.next_id += 1;
            let id = TrackId(self.next_id);
            let locator = self.registry.mint(&file.path);
            debug!(%id, %locator, path = %file.path.display(), "track added");

            self.tracks.push(Track {
                id,
                display_name,
                locator,
            });
            added.push(id);
        }

        if !added.is_empty() {
            info!(added = added.len(), total = self.tracks.len(), "playlist grew");
        }
        added
    }

    pub fn get(&self, index: usize) -> Result<&Track, PlaylistError> {
        self.tracks.get(index).ok_or(PlaylistError::OutOfRange {
            index,
            len: self.tracks.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }
}

/// Display name from the offered name, or from the path's file name when the
/// offered one is blank.
fn name_for(file: &IncomingFile) -> Option<String> {
    let name = if file.name.trim().is_empty() {
        file.path.file_name()?.to_str()?
    } else {
        file.name.as_str()
    };

    if name.trim().is_empty() {
        return None;
    }
    Some(display_name_for(name))
}
