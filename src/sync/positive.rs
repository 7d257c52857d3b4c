use std::collections::HashSet;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};

use crate::ports::actions::SyncActions;
use crate::ports::reporter::{Reporter, ReporterExt};
use crate::sync::error::{SyncError, SyncResult};
use crate::sync::resolver::{SyncMapping, relative_to};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PositiveSummary {
    pub copied: usize,
    pub up_to_date: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Copied,
    UpToDate,
    Skipped,
}

/// A destination is fresh when it has the source's size and is at least as
/// new. Contents are never compared.
pub fn is_up_to_date(source: &Metadata, destination: &Metadata) -> bool {
    if destination.len() != source.len() {
        return false;
    }
    match (destination.modified(), source.modified()) {
        (Ok(destination_mtime), Ok(source_mtime)) => destination_mtime >= source_mtime,
        _ => false,
    }
}

/// Make sure every mapped destination exists and is at least as fresh as its
/// source, copying in destination order.
pub fn positive_sync(
    mapping: &SyncMapping,
    source_root: &Path,
    actions: &dyn SyncActions,
    reporter: &dyn Reporter,
) -> SyncResult<PositiveSummary> {
    let mut summary = PositiveSummary::default();
    // Directories made (or, in a dry-run, announced) so far, ancestors included.
    let mut created: HashSet<PathBuf> = HashSet::new();

    for (destination, source) in mapping {
        let outcome = sync_one(
            source,
            destination,
            source_root,
            &mut created,
            actions,
            reporter,
        )?;
        match outcome {
            Outcome::Copied => summary.copied += 1,
            Outcome::UpToDate => summary.up_to_date += 1,
            Outcome::Skipped => summary.skipped += 1,
        }
    }

    Ok(summary)
}

fn sync_one(
    source: &Path,
    destination: &Path,
    source_root: &Path,
    created: &mut HashSet<PathBuf>,
    actions: &dyn SyncActions,
    reporter: &dyn Reporter,
) -> SyncResult<Outcome> {
    let relative = relative_to(source, source_root);

    let source_meta =
        fs::metadata(source).map_err(|e| SyncError::file_system("stat source", source, e))?;

    if !source_meta.is_file() {
        reporter.warning(&format!("\"{}\" is not a regular file.", relative.display()));
        return Ok(Outcome::Skipped);
    }

    if let Ok(destination_meta) = fs::metadata(destination)
        && is_up_to_date(&source_meta, &destination_meta)
    {
        reporter.debug(&format!("Skipping \"{}\".", relative.display()));
        return Ok(Outcome::UpToDate);
    }

    reporter.debug(&format!("Copying \"{}\".", relative.display()));

    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
        && !created.contains(parent)
        && !parent.is_dir()
    {
        actions.create_dir_all(parent)?;
        created.extend(parent.ancestors().map(Path::to_path_buf));
    }
    actions.copy_file(source, destination)?;

    Ok(Outcome::Copied)
}
