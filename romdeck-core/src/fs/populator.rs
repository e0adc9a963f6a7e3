//! ``src/fs/populator.rs``
//!
//! # `Populator`: Games folder scan
//!
//! Lists the games folder through a [`FileLister`], keeps the names accepted by
//! a [`RomFilter`] and appends them to the [`EntryStore`]. A folder that cannot
//! be listed is an empty library, never an error.

use std::{
    io,
    path::Path,
    time::{Duration, Instant},
};

use compact_str::CompactString;
use tracing::{debug, info, trace, warn};
use walkdir::{DirEntry, WalkDir};

use crate::{
    error::AppError,
    host::{FileLister, Names},
    model::entry_store::EntryStore,
};

/// Accepts visible files carrying the ROM suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomFilter {
    suffix: CompactString,
}

impl RomFilter {
    pub fn new(suffix: impl Into<CompactString>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Names starting with `.` are hidden; the suffix match is case-sensitive.
    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        !name.starts_with('.') && name.ends_with(self.suffix.as_str())
    }
}

impl Default for RomFilter {
    fn default() -> Self {
        Self::new(".gb")
    }
}

/// Fills `store` with the accepted names of `dir` and returns how many were
/// added. Listing failures are logged and count as zero entries.
pub fn populate<L: FileLister + ?Sized>(
    lister: &L,
    dir: &Path,
    filter: &RomFilter,
    store: &mut EntryStore,
) -> usize {
    let start_time: Instant = Instant::now();

    let names: Names<'_> = match lister.list_files(dir) {
        Ok(names) => names,

        Err(e) if e.is_not_found() => {
            info!(
                marker = "POPULATE_DIR_MISSING",
                operation_type = "populate",
                "Games directory {} does not exist, library is empty",
                dir.display()
            );
            return 0;
        }

        Err(e) => {
            warn!(
                marker = "POPULATE_LIST_FAILED",
                operation_type = "populate",
                "Listing {} failed, library is empty: {}",
                dir.display(),
                e
            );
            return 0;
        }
    };

    let mut accepted: usize = 0;
    let mut rejected: usize = 0;

    for name in names {
        if filter.accepts(&name) {
            store.append(&name);
            accepted += 1;
        } else {
            trace!("Skipping {name:?}");
            rejected += 1;
        }
    }

    let duration: Duration = start_time.elapsed();
    info!(
        marker = "POPULATE_COMPLETE",
        operation_type = "populate",
        accepted = accepted,
        rejected = rejected,
        duration_us = duration.as_micros() as u64,
        "Found {} ROMs in {}",
        accepted,
        dir.display()
    );

    accepted
}

/// Lists a real directory with `walkdir`, one level deep, skipping
/// sub-directories, links to directories and entries that cannot be read.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkDirLister;

impl WalkDirLister {
    fn entry_name(entry: DirEntry) -> Option<String> {
        if entry.file_type().is_dir() {
            return None;
        }

        // walkdir reports links as links; a link to a directory is not a ROM.
        if entry.path_is_symlink() {
            match std::fs::metadata(entry.path()) {
                Ok(target) if target.is_dir() => {
                    trace!("Skipping link to directory {:?}", entry.file_name());
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    debug!("Skipping dangling link {:?}: {}", entry.file_name(), e);
                    return None;
                }
            }
        }

        match entry.file_name().to_str() {
            Some(name) => Some(name.to_owned()),
            None => {
                debug!("Skipping non UTF-8 name {:?}", entry.file_name());
                None
            }
        }
    }
}

impl FileLister for WalkDirLister {
    fn list_files(&self, dir: &Path) -> Result<Names<'_>, AppError> {
        let metadata = std::fs::metadata(dir).map_err(|e| AppError::listing_failed(dir, e))?;
        if !metadata.is_dir() {
            return Err(AppError::listing_failed(
                dir,
                io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
            ));
        }

        let names = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Skipping unreadable directory entry: {}", e);
                    None
                }
            })
            .filter_map(Self::entry_name);

        Ok(Box::new(names))
    }
}
