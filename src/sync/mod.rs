pub mod error;
pub mod negative;
pub mod normalize;
pub mod positive;
pub mod resolver;

use std::path::{Path, PathBuf};

use crate::ports::actions::SyncActions;
use crate::ports::reporter::{Reporter, ReporterExt};
use crate::services::dry_run::DryRunActions;
use crate::services::fs_actions::FsActions;

use self::error::SyncResult;
use self::negative::{NegativeSummary, negative_sync};
use self::positive::{PositiveSummary, positive_sync};
use self::resolver::{NameNormalizer, SyncMapping, resolve};

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub dry_run: bool,
    pub normalize_names: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncSummary {
    pub negative: Option<NegativeSummary>,
    pub positive: PositiveSummary,
}

/// One synchronization run: the resolved mapping plus the executor and
/// reporter every pass goes through.
pub struct SyncSession {
    mapping: SyncMapping,
    source_root: PathBuf,
    destination_root: PathBuf,
    actions: Box<dyn SyncActions>,
    reporter: Box<dyn Reporter>,
}

impl SyncSession {
    /// Resolve the playlist and pick the executor for this run.
    pub fn new<I, S>(
        entries: I,
        source_root: PathBuf,
        destination_root: PathBuf,
        options: &SyncOptions,
        reporter: Box<dyn Reporter>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let actions: Box<dyn SyncActions> = if options.dry_run {
            Box::new(DryRunActions::stdout())
        } else {
            Box::new(FsActions)
        };
        let normalizer: Option<NameNormalizer> = if options.normalize_names {
            Some(normalize::normalize_name)
        } else {
            None
        };

        Self::with_actions(
            entries,
            source_root,
            destination_root,
            normalizer,
            actions,
            reporter,
        )
    }

    pub fn with_actions<I, S>(
        entries: I,
        source_root: PathBuf,
        destination_root: PathBuf,
        normalizer: Option<NameNormalizer>,
        actions: Box<dyn SyncActions>,
        reporter: Box<dyn Reporter>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mapping = resolve(
            entries,
            &source_root,
            &destination_root,
            normalizer,
            reporter.as_ref(),
        );
        reporter.debug(&format!("Resolved {} playlist entries.", mapping.len()));

        Self {
            mapping,
            source_root,
            destination_root,
            actions,
            reporter,
        }
    }

    pub fn mapping(&self) -> &SyncMapping {
        &self.mapping
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    /// Delete files that aren't in the playlist.
    pub fn negative_sync(&self) -> SyncResult<NegativeSummary> {
        negative_sync(
            &self.mapping,
            &self.destination_root,
            self.actions.as_ref(),
            self.reporter.as_ref(),
        )
    }

    /// Ensure that all files in the playlist are in the destination.
    pub fn positive_sync(&self) -> SyncResult<PositiveSummary> {
        positive_sync(
            &self.mapping,
            &self.source_root,
            self.actions.as_ref(),
            self.reporter.as_ref(),
        )
    }

    /// Negative pass (unless `skip_delete`), then positive pass.
    ///
    /// The first failure stops the run. The reporter only learns which pass
    /// aborted; the error itself is returned to the caller.
    pub fn run(&self, skip_delete: bool) -> SyncResult<SyncSummary> {
        let negative = if skip_delete {
            None
        } else {
            self.reporter.info("Deleting unwanted files.");
            let negative = self
                .negative_sync()
                .inspect_err(|_| self.reporter.fatal("Aborted while deleting files."))?;
            Some(negative)
        };

        self.reporter.info("Copying files.");
        let positive = self
            .positive_sync()
            .inspect_err(|_| self.reporter.fatal("Aborted while copying files."))?;

        Ok(SyncSummary { negative, positive })
    }
}
