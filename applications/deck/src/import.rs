/// File import: local paths become queue entries
use soul_transport::NewTrack;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Build an imported track for each path
///
/// The file name is the display name; the full path is the playable source.
pub fn import_paths(paths: &[PathBuf], cover: Option<&str>) -> Vec<NewTrack> {
    paths
        .iter()
        .map(|path| {
            let track = NewTrack::imported(
                display_name(path),
                path.to_string_lossy(),
                cover.map(String::from),
            );
            debug!("Imported {}", track.source);
            track
        })
        .collect()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
