//! Directory entry counting.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{Error, Result};

/// Count every non-directory entry reachable from `path`.
///
/// The walk is depth-first over a worklist; traversal order carries no
/// meaning because only a count is produced. Symlinks are counted, not
/// followed, and a non-directory root counts as one entry. The first
/// traversal error aborts the walk, so a partial count is never returned.
pub async fn count_entries(path: &Path) -> Result<u64> {
    let mut pending: Vec<PathBuf> = vec![path.to_path_buf()];
    let mut count: u64 = 0;

    while let Some(current) = pending.pop() {
        let meta = fs::symlink_metadata(&current)
            .await
            .map_err(|e| Error::measurement(&current, e))?;

        if !meta.is_dir() {
            count += 1;
            continue;
        }

        let mut entries = fs::read_dir(&current)
            .await
            .map_err(|e| Error::measurement(&current, e))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::measurement(&current, e))?
        {
            pending.push(entry.path());
        }
    }

    Ok(count)
}
