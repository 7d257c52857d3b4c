use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::ports::reporter::{Reporter, ReporterExt};

/// Destination path → source path, sorted by destination.
pub type SyncMapping = BTreeMap<PathBuf, PathBuf>;

/// Maps a single file or directory name to its destination-side form.
pub type NameNormalizer = fn(&str) -> String;

/// Collapse `.`, `..` and repeated separators without touching the filesystem.
///
/// Leading `..` segments of a relative path are kept, as are the root and
/// any prefix of an absolute one (`..` directly under the root is dropped).
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        PathBuf::from(".")
    } else {
        out.iter().collect()
    }
}

/// Lexical `path` relative to `base`. Both are normalized first; when `path`
/// is not under `base` the result climbs out with `..` segments.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path = normalize_path(path);
    let base = normalize_path(base);

    let path_components: Vec<_> = path.components().collect();
    let base_components: Vec<_> = base.components().collect();
    let common = path_components
        .iter()
        .zip(&base_components)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_components.len() {
        relative.push("..");
    }
    for component in &path_components[common..] {
        relative.push(component);
    }

    if relative.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        relative
    }
}

/// Turn one playlist line into its canonical path relative to `source_root`.
pub fn canonical_relative_path(entry: &str, source_root: &Path) -> PathBuf {
    let entry = Path::new(entry.trim());
    if entry.is_absolute() {
        relative_to(entry, source_root)
    } else {
        normalize_path(entry)
    }
}

fn destination_relative_path(canonical: &Path, normalizer: Option<NameNormalizer>) -> PathBuf {
    let Some(normalizer) = normalizer else {
        return canonical.to_path_buf();
    };

    canonical
        .components()
        .map(|component| match component {
            Component::Normal(name) => PathBuf::from(normalizer(&name.to_string_lossy())),
            other => PathBuf::from(other.as_os_str()),
        })
        .collect()
}

/// Build the destination → source mapping for a whole playlist.
///
/// A later entry landing on the same destination replaces the earlier one.
pub fn resolve<I, S>(
    entries: I,
    source_root: &Path,
    destination_root: &Path,
    normalizer: Option<NameNormalizer>,
    reporter: &dyn Reporter,
) -> SyncMapping
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut mapping = SyncMapping::new();

    for entry in entries {
        let canonical = canonical_relative_path(entry.as_ref(), source_root);
        let destination_relative = destination_relative_path(&canonical, normalizer);

        let destination = destination_root.join(&destination_relative);
        let source = source_root.join(&canonical);

        if let Some(previous) = mapping.insert(destination.clone(), source.clone()) {
            reporter.debug(&format!(
                "\"{}\" replaces \"{}\" as the source of \"{}\".",
                source.display(),
                previous.display(),
                destination.display()
            ));
        }
    }

    mapping
}
