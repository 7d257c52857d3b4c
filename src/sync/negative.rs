use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::ports::actions::SyncActions;
use crate::ports::reporter::{Reporter, ReporterExt};
use crate::sync::error::{SyncError, SyncResult};
use crate::sync::resolver::SyncMapping;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NegativeSummary {
    pub removed_files: usize,
    pub removed_dirs: usize,
}

/// Delete every file under `destination_root` that the mapping doesn't list,
/// then prune the directories that leaves empty.
///
/// The walk is post-order, so a directory is judged after all of its
/// children. Removed paths are tracked here rather than re-read from disk,
/// which lets a dry-run report the same directory removals a real run makes.
pub fn negative_sync(
    mapping: &SyncMapping,
    destination_root: &Path,
    actions: &dyn SyncActions,
    reporter: &dyn Reporter,
) -> SyncResult<NegativeSummary> {
    let mut summary = NegativeSummary::default();

    if !destination_root.exists() {
        reporter.debug(&format!(
            "Destination \"{}\" does not exist, nothing to delete.",
            destination_root.display()
        ));
        return Ok(summary);
    }

    let mut removed: HashSet<PathBuf> = HashSet::new();

    for entry in WalkDir::new(destination_root)
        .follow_links(true)
        .contents_first(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => match dangling_link(&err) {
                // A broken link can't be followed, but it is still a stray file.
                Some(path) => {
                    let path = path.to_path_buf();
                    if remove_if_unlisted(&path, mapping, actions, reporter)? {
                        removed.insert(path);
                        summary.removed_files += 1;
                    }
                    continue;
                }
                None => return Err(err.into()),
            },
        };
        let path = entry.path();

        if !entry.file_type().is_dir() {
            if remove_if_unlisted(path, mapping, actions, reporter)? {
                removed.insert(path.to_path_buf());
                summary.removed_files += 1;
            }
            continue;
        }

        // Never prune the root itself, nor a linked directory that lives elsewhere.
        if entry.depth() == 0 || entry.path_is_symlink() {
            continue;
        }

        if is_empty_after(path, &removed)? {
            reporter.debug(&format!("Removing directory \"{}\".", path.display()));
            actions.remove_dir(path)?;
            removed.insert(path.to_path_buf());
            summary.removed_dirs += 1;
        }
    }

    Ok(summary)
}

fn remove_if_unlisted(
    path: &Path,
    mapping: &SyncMapping,
    actions: &dyn SyncActions,
    reporter: &dyn Reporter,
) -> SyncResult<bool> {
    if mapping.contains_key(path) {
        return Ok(false);
    }
    reporter.debug(&format!("Removing file \"{}\".", path.display()));
    actions.remove_file(path)?;
    Ok(true)
}

/// The path of a symlink whose target is gone, if that is what the walk tripped on.
fn dangling_link(err: &walkdir::Error) -> Option<&Path> {
    let path = err.path()?;
    if err.loop_ancestor().is_some() {
        return None;
    }
    let is_link = fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    (is_link && fs::metadata(path).is_err()).then_some(path)
}

fn is_empty_after(dir: &Path, removed: &HashSet<PathBuf>) -> SyncResult<bool> {
    let entries = fs::read_dir(dir).map_err(|e| SyncError::file_system("read directory", dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| SyncError::file_system("read directory", dir, e))?;
        if !removed.contains(&entry.path()) {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::actions::MockSyncActions;
    use crate::ports::reporter::MockReporter;
    use crate::services::dry_run::DryRunActions;
    use crate::services::fs_actions::FsActions;
    use crate::test_utils::{TestTree, quiet_reporter};

    fn mapping_for(tree: &TestTree, relative: &[&str]) -> SyncMapping {
        relative
            .iter()
            .map(|rel| (tree.dest().join(rel), tree.source().join(rel)))
            .collect()
    }

    #[test]
    fn test_removes_stray_file_and_emptied_parent() {
        let tree = TestTree::new();
        tree.write_dest("keep/a.mp3", b"a");
        tree.write_dest("stale/old.mp3", b"old");
        let mapping = mapping_for(&tree, &["keep/a.mp3"]);

        let summary =
            negative_sync(&mapping, tree.dest(), &FsActions, &quiet_reporter()).unwrap();

        assert_eq!(
            summary,
            NegativeSummary {
                removed_files: 1,
                removed_dirs: 1
            }
        );
        assert!(tree.dest().join("keep/a.mp3").is_file());
        assert!(!tree.dest().join("stale").exists());
    }

    #[test]
    fn test_leaves_only_mapped_files_and_no_empty_dirs() {
        let tree = TestTree::new();
        tree.write_dest("a/b/c/deep.mp3", b"x");
        tree.write_dest("a/b/keep.mp3", b"x");
        tree.write_dest("a/other.mp3", b"x");
        tree.write_dest("top.mp3", b"x");
        fs::create_dir_all(tree.dest().join("empty/nested")).unwrap();
        let mapping = mapping_for(&tree, &["a/b/keep.mp3", "top.mp3"]);

        negative_sync(&mapping, tree.dest(), &FsActions, &quiet_reporter()).unwrap();

        assert_eq!(
            tree.dest_snapshot(),
            vec![
                "a/".to_string(),
                "a/b/".to_string(),
                "a/b/keep.mp3".to_string(),
                "top.mp3".to_string(),
            ]
        );
    }

    #[test]
    fn test_keeps_destination_root_even_when_emptied() {
        let tree = TestTree::new();
        tree.write_dest("old.mp3", b"old");

        negative_sync(&SyncMapping::new(), tree.dest(), &FsActions, &quiet_reporter()).unwrap();

        assert!(tree.dest().is_dir());
        assert!(tree.dest_snapshot().is_empty());
    }

    #[test]
    fn test_missing_destination_is_a_no_op() {
        let tree = TestTree::new();
        let missing = tree.dest().join("nope");
        let mut actions = MockSyncActions::new();
        actions.expect_remove_file().never();
        actions.expect_remove_dir().never();

        let summary =
            negative_sync(&SyncMapping::new(), &missing, &actions, &quiet_reporter()).unwrap();

        assert_eq!(summary, NegativeSummary::default());
    }

    #[test]
    fn test_dry_run_leaves_tree_untouched_but_reports_removals() {
        let tree = TestTree::new();
        tree.write_dest("keep.mp3", b"a");
        tree.write_dest("stale/old.mp3", b"old");
        let mapping = mapping_for(&tree, &["keep.mp3"]);
        let before = tree.dest_snapshot();

        let actions = DryRunActions::new(Vec::new());
        let summary = negative_sync(&mapping, tree.dest(), &actions, &quiet_reporter()).unwrap();

        assert_eq!(tree.dest_snapshot(), before);
        assert_eq!(summary.removed_files, 1);
        assert_eq!(summary.removed_dirs, 1);
        let output = String::from_utf8(actions.into_inner()).unwrap();
        assert_eq!(
            output,
            format!(
                "remove-file {}\nremove-dir {}\n",
                tree.dest().join("stale/old.mp3").display(),
                tree.dest().join("stale").display()
            )
        );
    }

    #[test]
    fn test_removal_failure_is_fatal() {
        let tree = TestTree::new();
        tree.write_dest("old.mp3", b"old");
        let mut actions = MockSyncActions::new();
        actions.expect_remove_file().times(1).returning(|path| {
            Err(SyncError::file_system(
                "remove file",
                path,
                std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            ))
        });

        let result = negative_sync(&SyncMapping::new(), tree.dest(), &actions, &quiet_reporter());

        assert!(matches!(result, Err(SyncError::FileSystem { .. })));
    }

    #[test]
    fn test_reports_each_removal_at_debug() {
        let tree = TestTree::new();
        tree.write_dest("old.mp3", b"old");
        let mut reporter = MockReporter::new();
        reporter
            .expect_report()
            .withf(|level, message| {
                *level == crate::ports::reporter::ReportLevel::Debug
                    && message.starts_with("Removing file")
            })
            .times(1)
            .return_const(());

        negative_sync(&SyncMapping::new(), tree.dest(), &FsActions, &reporter).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_link_is_removed_like_a_stray_file() {
        let tree = TestTree::new();
        tree.write_dest("keep.mp3", b"a");
        let missing = tree.root().join("missing.mp3");
        std::os::unix::fs::symlink(&missing, tree.dest().join("dangling.mp3")).unwrap();
        let mapping = mapping_for(&tree, &["keep.mp3"]);

        let summary =
            negative_sync(&mapping, tree.dest(), &FsActions, &quiet_reporter()).unwrap();

        assert_eq!(summary.removed_files, 1);
        assert!(fs::symlink_metadata(tree.dest().join("dangling.mp3")).is_err());
        assert!(tree.dest().join("keep.mp3").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_mapped_dangling_link_is_kept() {
        let tree = TestTree::new();
        fs::create_dir_all(tree.dest()).unwrap();
        let link = tree.dest().join("pending.mp3");
        std::os::unix::fs::symlink(tree.root().join("missing.mp3"), &link).unwrap();
        let mapping = mapping_for(&tree, &["pending.mp3"]);

        let summary =
            negative_sync(&mapping, tree.dest(), &FsActions, &quiet_reporter()).unwrap();

        assert_eq!(summary, NegativeSummary::default());
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_link_in_subdirectory_lets_parent_be_pruned() {
        let tree = TestTree::new();
        fs::create_dir_all(tree.dest().join("gone")).unwrap();
        let missing = tree.root().join("missing.mp3");
        std::os::unix::fs::symlink(&missing, tree.dest().join("gone/x.mp3")).unwrap();

        let summary =
            negative_sync(&SyncMapping::new(), tree.dest(), &FsActions, &quiet_reporter())
                .unwrap();

        assert_eq!(
            summary,
            NegativeSummary {
                removed_files: 1,
                removed_dirs: 1
            }
        );
        assert!(!tree.dest().join("gone").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_live_file_link_is_judged_by_its_own_path() {
        let tree = TestTree::new();
        let target = tree.write_source("real.mp3", b"x");
        tree.write_dest("keep.mp3", b"a");
        std::os::unix::fs::symlink(&target, tree.dest().join("listed.mp3")).unwrap();
        std::os::unix::fs::symlink(&target, tree.dest().join("unlisted.mp3")).unwrap();
        let mapping = mapping_for(&tree, &["keep.mp3", "listed.mp3"]);

        let summary =
            negative_sync(&mapping, tree.dest(), &FsActions, &quiet_reporter()).unwrap();

        assert_eq!(summary.removed_files, 1);
        assert!(fs::symlink_metadata(tree.dest().join("listed.mp3")).is_ok());
        assert!(fs::symlink_metadata(tree.dest().join("unlisted.mp3")).is_err());
        // Removing the link must leave its target alone.
        assert!(target.is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_mapped_file_under_linked_directory_is_kept() {
        let tree = TestTree::new();
        let outside = tree.root().join("outside");
        fs::create_dir_all(&outside).unwrap();
        fs::write(outside.join("wanted.mp3"), b"w").unwrap();
        fs::write(outside.join("stray.mp3"), b"s").unwrap();
        fs::create_dir_all(tree.dest()).unwrap();
        std::os::unix::fs::symlink(&outside, tree.dest().join("linked")).unwrap();
        let mapping = mapping_for(&tree, &["linked/wanted.mp3"]);

        let summary =
            negative_sync(&mapping, tree.dest(), &FsActions, &quiet_reporter()).unwrap();

        assert_eq!(summary.removed_files, 1);
        assert!(outside.join("wanted.mp3").is_file());
        assert!(!outside.join("stray.mp3").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_follows_linked_directory_without_pruning_it() {
        let tree = TestTree::new();
        let outside = tree.root().join("outside");
        fs::create_dir_all(&outside).unwrap();
        fs::write(outside.join("stray.mp3"), b"x").unwrap();
        fs::create_dir_all(tree.dest()).unwrap();
        std::os::unix::fs::symlink(&outside, tree.dest().join("linked")).unwrap();

        negative_sync(&SyncMapping::new(), tree.dest(), &FsActions, &quiet_reporter()).unwrap();

        assert!(!outside.join("stray.mp3").exists());
        assert!(tree.dest().join("linked").exists());
    }
}
