use std::path::PathBuf;

use tracing::info;

use crate::audio::PlaybackPrimitive;
use crate::config;
use crate::library;
use crate::player::PlaybackController;

/// Feed the paths given on the command line through intake.
///
/// Returns how many tracks were accepted.
pub fn add_initial_paths<P: PlaybackPrimitive>(
    controller: &mut PlaybackController<P>,
    paths: &[PathBuf],
    settings: &config::Settings,
) -> usize {
    if paths.is_empty() {
        return 0;
    }

    let files = library::collect(paths, &settings.library);
    let added = controller.add_tracks(files).len();
    info!(paths = paths.len(), added, "initial intake");
    added
}
