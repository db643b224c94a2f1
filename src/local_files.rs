use std::backtrace::Backtrace;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::config::LocalFilesConfig;
use crate::directory::collaborators::{CascadeError, LocalFileStore};

/// cached file contents on disk. Everything cached for a directory lives under `<root>/<object id>`
pub struct DiskLocalFileStore {
    root: PathBuf,
}

impl DiskLocalFileStore {
    pub fn new(config: &LocalFilesConfig) -> Self {
        Self {
            root: PathBuf::from(&config.location),
        }
    }

    /// where the cached files of the directory with `object_id` are kept
    pub fn location_of(&self, object_id: &str) -> Result<PathBuf, CascadeError> {
        let is_plain_name = !object_id.is_empty()
            && object_id != "."
            && object_id != ".."
            && !object_id.contains(['/', '\\']);
        if is_plain_name {
            Ok(self.root.join(object_id))
        } else {
            Err(CascadeError::InvalidIdentifier)
        }
    }
}

impl LocalFileStore for DiskLocalFileStore {
    fn delete_local_file(&self, object_id: &str) -> Result<(), CascadeError> {
        let location = self.location_of(object_id)?;
        let removed = match fs::symlink_metadata(&location) {
            Ok(metadata) if metadata.is_dir() => fs::remove_dir_all(&location),
            Ok(_) => fs::remove_file(&location),
            // nothing was ever cached
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => Err(e),
        };
        removed.map_err(|e| {
            log::error!(
                "Failed to delete local files at {}! Error is {e:?}\n{}",
                location.display(),
                Backtrace::force_capture()
            );
            CascadeError::FileSystemFailure
        })
    }
}
