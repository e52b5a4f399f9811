//! Naming conventions shared by the generator and the loader.
//!
//! Project folders and image files carry all of their identity in their
//! names. This module is the single place those names are interpreted:
//!
//! - **Folder titles**: `RU-SM` → "Ru Sm", `casa_de_campo` → "Casa De Campo".
//!   Dashes and underscores become spaces and every word is capitalized.
//! - **Cover images**: a file named `cover.<ext>` (any case) leads its project.
//! - **Numbered images**: the first run of digits in a file name orders it
//!   (`foto-2.jpg` before `foto-10.jpg`).
//! - **Public paths**: `prefix/folder/file`, always with forward slashes.

/// Turn a folder name into a display title.
///
/// - `"RU-SM"` → `"Ru Sm"`
/// - `"casa_de--campo"` → `"Casa De Campo"`
/// - `"LM-H-1"` → `"Lm H 1"`
pub fn humanize(folder: &str) -> String {
    folder
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Whether a bare file name is a cover image (`cover.jpg`, `COVER.webp`, ...).
pub fn is_cover_file(name: &str) -> bool {
    name.get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("cover."))
}

/// Whether a public image path points at a cover image (`.../cover.<ext>`).
pub fn is_cover_path(path: &str) -> bool {
    path.to_ascii_lowercase().contains("/cover.")
}

/// First run of ASCII digits in a file name, parsed as a number.
///
/// Runs too long for `u64` saturate so they still sort after every
/// representable number.
pub fn numeric_key(name: &str) -> Option<u64> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let digits: &str = name[start..]
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .unwrap_or_default();
    Some(digits.parse().unwrap_or(u64::MAX))
}

/// Build the public path of an image: `prefix/folder/file`.
///
/// Backslashes are normalized to forward slashes and a trailing slash on the
/// prefix is not doubled. An empty prefix yields `folder/file`.
pub fn image_path(prefix: &str, folder: &str, file: &str) -> String {
    let prefix = prefix.trim_end_matches(['/', '\\']);
    let joined = if prefix.is_empty() {
        format!("{folder}/{file}")
    } else {
        format!("{prefix}/{folder}/{file}")
    };
    joined.replace('\\', "/")
}
