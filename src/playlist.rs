use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use color_eyre::{Result, eyre::Context};

/// Read playlist entries from any line source.
///
/// Lines are trimmed; blank lines and `#` lines (M3U headers such as
/// `#EXTM3U` and `#EXTINF`) are dropped.
pub fn read_entries(reader: impl BufRead) -> io::Result<Vec<String>> {
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim_start_matches('\u{feff}').trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        entries.push(line.to_string());
    }
    Ok(entries)
}

/// Load a playlist file, or stdin when `path` is `-`.
pub fn load(path: &Path) -> Result<Vec<String>> {
    if path == Path::new("-") {
        log::debug!("Reading playlist from stdin");
        return read_entries(io::stdin().lock()).wrap_err("Failed to read playlist from stdin");
    }

    log::debug!("Reading playlist: {}", path.display());
    let file =
        File::open(path).with_context(|| format!("Failed to open playlist: {}", path.display()))?;
    read_entries(BufReader::new(file))
        .with_context(|| format!("Failed to read playlist: {}", path.display()))
}
