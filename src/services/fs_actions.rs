use std::fs;
use std::path::Path;

use filetime::FileTime;

use crate::ports::actions::SyncActions;
use crate::sync::error::{SyncError, SyncResult};

/// Performs sync actions against the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsActions;

impl SyncActions for FsActions {
    fn remove_file(&self, path: &Path) -> SyncResult<()> {
        fs::remove_file(path).map_err(|e| SyncError::file_system("remove file", path, e))
    }

    fn remove_dir(&self, path: &Path) -> SyncResult<()> {
        fs::remove_dir(path).map_err(|e| SyncError::file_system("remove directory", path, e))
    }

    fn create_dir_all(&self, path: &Path) -> SyncResult<()> {
        fs::create_dir_all(path).map_err(|e| SyncError::file_system("create directory", path, e))
    }

    fn copy_file(&self, source: &Path, destination: &Path) -> SyncResult<()> {
        // fs::copy carries the permission bits over; the mtime has to be set by hand.
        fs::copy(source, destination)
            .map_err(|e| SyncError::file_system("copy file", destination, e))?;

        let modified = fs::metadata(source)
            .map(|meta| FileTime::from_last_modification_time(&meta))
            .map_err(|e| SyncError::file_system("read modification time", source, e))?;

        // Setting times by path only needs ownership, so read-only copies work too.
        match filetime::set_file_mtime(destination, modified) {
            Ok(()) => Ok(()),
            // Some filesystems (FAT on a music player, say) refuse to set times.
            Err(e) if e.kind() == std::io::ErrorKind::Unsupported => {
                log::debug!(
                    "Could not preserve modification time of {}: {}",
                    destination.display(),
                    e
                );
                Ok(())
            }
            Err(e) => Err(SyncError::file_system(
                "set modification time",
                destination,
                e,
            )),
        }
    }
}
