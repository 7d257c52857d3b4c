use std::cell::RefCell;
use std::io::{self, Write};
use std::path::Path;

use crate::ports::actions::SyncActions;
use crate::sync::error::{SyncError, SyncResult};

/// Prints one line per action instead of touching the filesystem.
///
/// Output format, one operation per line:
///
/// ```text
/// remove-file <path>
/// remove-dir <path>
/// create-dir <path>
/// copy <source> -> <destination>
/// ```
pub struct DryRunActions<W: Write> {
    out: RefCell<W>,
}

impl DryRunActions<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> DryRunActions<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn print(&self, line: std::fmt::Arguments<'_>) -> SyncResult<()> {
        let mut out = self.out.borrow_mut();
        out.write_fmt(line)
            .and_then(|_| out.write_all(b"\n"))
            .map_err(SyncError::Report)
    }
}

impl<W: Write> SyncActions for DryRunActions<W> {
    fn remove_file(&self, path: &Path) -> SyncResult<()> {
        self.print(format_args!("remove-file {}", path.display()))
    }

    fn remove_dir(&self, path: &Path) -> SyncResult<()> {
        self.print(format_args!("remove-dir {}", path.display()))
    }

    fn create_dir_all(&self, path: &Path) -> SyncResult<()> {
        self.print(format_args!("create-dir {}", path.display()))
    }

    fn copy_file(&self, source: &Path, destination: &Path) -> SyncResult<()> {
        self.print(format_args!(
            "copy {} -> {}",
            source.display(),
            destination.display()
        ))
    }
}
