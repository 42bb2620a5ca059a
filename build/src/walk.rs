use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Lazily yields every file below `source_root`, relative to it.
///
/// Directories are descended into but never yielded. The order is whatever
/// the filesystem enumerates and must not be relied upon. `exclude` prunes a
/// directory, which keeps an output tree nested inside the sources out of the
/// walk.
pub fn walk_sources(
    source_root: &Path,
    exclude: Option<&Path>,
) -> impl Iterator<Item = Result<PathBuf, walkdir::Error>> {
    let root = source_root.to_path_buf();
    let exclude = exclude.map(Path::to_path_buf);
    WalkDir::new(&root)
        .follow_links(false)
        .into_iter()
        .filter_entry(move |entry| exclude.as_deref() != Some(entry.path()))
        .filter_map(move |entry| match entry {
            Ok(entry) if entry.file_type().is_dir() => None,
            Ok(entry) => entry
                .path()
                .strip_prefix(&root)
                .ok()
                .map(|relative| Ok(relative.to_path_buf())),
            Err(error) => Some(Err(error)),
        })
}
