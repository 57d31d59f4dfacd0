use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::IncomingFile;

const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Declared media type for `path`, looked up by extension in the configured table.
pub fn media_type_for(path: &Path, settings: &LibrarySettings) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.trim().to_ascii_lowercase())
        .and_then(|ext| {
            settings
                .media_types
                .iter()
                .find(|(known, _)| known.trim().trim_start_matches('.').eq_ignore_ascii_case(&ext))
                .map(|(_, mime)| mime.clone())
        })
        .unwrap_or_else(|| UNKNOWN_MEDIA_TYPE.to_string())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn incoming(path: &Path, settings: &LibrarySettings) -> Option<IncomingFile> {
    let name = path.file_name()?.to_string_lossy().into_owned();
    Some(IncomingFile {
        name,
        path: path.to_path_buf(),
        media_type: media_type_for(path, settings),
    })
}

fn walk_dir(dir: &Path, settings: &LibrarySettings, out: &mut Vec<IncomingFile>) {
    let mut walker = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file() {
            out.extend(incoming(path, settings));
        }
    }
}

/// Turn command-line or prompt paths into intake candidates.
///
/// Files are taken as given (whatever their type; filtering is the playlist's
/// job), directories are walked in file-name order. Missing paths are skipped.
pub fn collect(paths: &[PathBuf], settings: &LibrarySettings) -> Vec<IncomingFile> {
    let mut files: Vec<IncomingFile> = Vec::new();

    for path in paths {
        if path.is_dir() {
            walk_dir(path, settings, &mut files);
        } else if path.is_file() {
            files.extend(incoming(path, settings));
        } else {
            warn!(path = %path.display(), "skipping path that is neither file nor directory");
        }
    }

    debug!(count = files.len(), "collected intake candidates");
    files
}
