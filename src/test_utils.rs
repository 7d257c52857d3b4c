use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tempfile::TempDir;

use crate::ports::reporter::MockReporter;

/// A throwaway `source/` + `dest/` pair under a temp dir.
///
/// `dest/` is not created up front so tests can cover a missing destination.
pub struct TestTree {
    root: TempDir,
    source: PathBuf,
    dest: PathBuf,
}

impl TestTree {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("source");
        let dest = root.path().join("dest");
        fs::create_dir_all(&source).unwrap();
        Self { root, source, dest }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    pub fn write_source(&self, relative: &str, contents: &[u8]) -> PathBuf {
        write_file(&self.source.join(relative), contents)
    }

    pub fn write_dest(&self, relative: &str, contents: &[u8]) -> PathBuf {
        write_file(&self.dest.join(relative), contents)
    }

    pub fn set_mtime(&self, path: &Path, mtime: SystemTime) {
        fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
    }

    /// Sorted paths under `dest/`, relative, with a trailing `/` on directories.
    pub fn dest_snapshot(&self) -> Vec<String> {
        if !self.dest.exists() {
            return Vec::new();
        }

        let mut paths: Vec<String> = walkdir::WalkDir::new(&self.dest)
            .min_depth(1)
            .into_iter()
            .map(|entry| {
                let entry = entry.unwrap();
                let relative = entry
                    .path()
                    .strip_prefix(&self.dest)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/");
                if entry.file_type().is_dir() {
                    format!("{}/", relative)
                } else {
                    relative
                }
            })
            .collect();
        paths.sort();
        paths
    }
}

fn write_file(path: &Path, contents: &[u8]) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
    path.to_path_buf()
}

/// A reporter that accepts any message.
pub fn quiet_reporter() -> MockReporter {
    let mut reporter = MockReporter::new();
    reporter.expect_report().return_const(());
    reporter
}
