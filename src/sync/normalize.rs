use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

static PUNCTUATION_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[!@#$%^&*()'"<>~_ ]+"#).expect("punctuation pattern is valid")
});

static UNDERSCORE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_{2,}").expect("underscore pattern is valid"));

static UNDERSCORE_AROUND_DOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_*\._*").expect("dot pattern is valid"));

/// Turn a file or directory name into a punctuation-free, lowercase,
/// diacritic-free form suitable for dumb players and FAT filesystems.
///
/// `"My Song (Live)!.mp3"` becomes `"my_song_live.mp3"`.
pub fn normalize_name(name: &str) -> String {
    let collapsed = PUNCTUATION_RUN.replace_all(name, "_");
    let lowered = collapsed.to_lowercase();
    let stripped: String = lowered.nfd().filter(|c| !is_combining_mark(*c)).collect();

    // Dropping a mark can leave two underscores touching.
    let tidy = UNDERSCORE_RUN.replace_all(&stripped, "_");
    let tidy = UNDERSCORE_AROUND_DOT.replace_all(&tidy, ".");
    let tidy = tidy.trim_matches('_');

    // `.` and `..` would climb out of the directory the name lives in.
    match tidy {
        "" | "." | ".." => "_".to_string(),
        _ => tidy.to_string(),
    }
}
