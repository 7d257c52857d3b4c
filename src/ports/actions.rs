use std::path::Path;

use crate::sync::error::SyncResult;

/// Port trait for every mutating filesystem call a sync pass makes.
///
/// Implementations live in `services::fs_actions` (real filesystem) and
/// `services::dry_run` (prints the intended action), or test mocks.
#[cfg_attr(test, mockall::automock)]
pub trait SyncActions {
    fn remove_file(&self, path: &Path) -> SyncResult<()>;

    fn remove_dir(&self, path: &Path) -> SyncResult<()>;

    /// Create `path` and every missing ancestor. Succeeds if it already exists.
    fn create_dir_all(&self, path: &Path) -> SyncResult<()>;

    fn copy_file(&self, source: &Path, destination: &Path) -> SyncResult<()>;
}
