//! Project folder scanning and manifest generation.
//!
//! Walks the immediate subdirectories of a projects root and describes each
//! one as a [`Project`], producing the [`Manifest`] the browser gallery reads.
//!
//! ## Directory Structure
//!
//! ```text
//! assets/projects/                 # Projects root
//! ├── manifest.json                # Written by this module
//! ├── CASA-XD/                     # Project folder → one Project
//! │   ├── metadata.json            # Optional title/area/blurb/text
//! │   ├── cover.jpg                # Lead image (any case, any image ext)
//! │   ├── 01.jpg
//! │   ├── 02.jpg
//! │   └── 10.jpg
//! └── RU-SM/
//!     ├── foto-2.png
//!     └── foto-10.png              # No cover: foto-2.png leads
//! ```
//!
//! ## Image Order
//!
//! Only `jpg`, `jpeg`, `png`, `webp` and `avif` files (any case) directly
//! inside a project folder are listed. They are ordered by:
//!
//! 1. `cover.<ext>` files first
//! 2. files with digits, ascending by their first number (`2` before `10`)
//! 3. files without digits
//!
//! with the file name as the final tie-break. When a folder has no cover
//! file, the first image in that order leads the list and acts as cover.
//!
//! ## Failure Handling
//!
//! An unreadable root or project folder aborts the scan. A missing or broken
//! `metadata.json` never does: the project just falls back to defaults.

use crate::metadata::{self, MetadataLookup};
use crate::naming;
use crate::types::{MANIFEST_FILE, Manifest, Project};
use chrono::{SecondsFormat, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Projects root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "avif"];

/// Scan `root` and describe every project folder, with image paths under
/// the URL `prefix`.
pub fn scan(root: &Path, prefix: &str) -> Result<Manifest, ScanError> {
    let mut projects = Vec::new();
    for folder in list_project_folders(root)? {
        projects.push(scan_folder(root, &folder, prefix)?);
    }

    Ok(Manifest {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        root: prefix.to_string(),
        projects,
    })
}

/// Write the manifest as pretty-printed JSON to `<root>/manifest.json`,
/// replacing any previous file. Returns the written path.
pub fn write_manifest(root: &Path, manifest: &Manifest) -> Result<PathBuf, ScanError> {
    let path = root.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(&path, json)?;
    Ok(path)
}

/// Names of every immediate subdirectory of `root`, sorted by name.
pub fn list_project_folders(root: &Path) -> Result<Vec<String>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    let mut folders: Vec<String> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    folders.sort();
    Ok(folders)
}

/// Image file names directly inside `dir`, in display order.
pub fn list_images(dir: &Path) -> Result<Vec<String>, ScanError> {
    let files: Vec<String> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| is_image(&e.path()))
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    Ok(order_images(files))
}

/// Sort image file names into display order, lead image first.
pub fn order_images(mut files: Vec<String>) -> Vec<String> {
    files.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
    files
}

/// `(not a cover, has no number, number, folded name, name)`: covers first,
/// then numbered files ascending, then the rest, each group tie-broken by
/// name ignoring case and then by the exact name.
fn sort_key(name: &str) -> (bool, bool, u64, String, &str) {
    let number = naming::numeric_key(name);
    (
        !naming::is_cover_file(name),
        number.is_none(),
        number.unwrap_or(0),
        name.to_lowercase(),
        name,
    )
}

fn is_image(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

fn scan_folder(root: &Path, folder: &str, prefix: &str) -> Result<Project, ScanError> {
    let dir = root.join(folder);
    let lookup = metadata::read_metadata(&dir);
    if let MetadataLookup::Invalid(reason) = &lookup {
        warn!(folder, %reason, "ignoring unreadable metadata.json");
    }
    let meta = lookup.into_metadata();

    let files = list_images(&dir)?;
    if !files.iter().any(|f| naming::is_cover_file(f))
        && let Some(lead) = files.first()
    {
        debug!(folder, lead = %lead, "no cover file, leading with first image");
    }
    let images = files
        .iter()
        .map(|file| naming::image_path(prefix, folder, file))
        .collect::<Vec<_>>();
    debug!(folder, images = images.len(), "scanned project");

    let humanized = naming::humanize(folder);
    Ok(Project {
        folder: folder.to_string(),
        title: metadata::resolve(&[meta.title.as_deref(), Some(humanized.as_str())])
            .unwrap_or_default(),
        area: meta.area,
        blurb: meta.blurb.unwrap_or_default(),
        text: meta.text.unwrap_or_default(),
        images,
    })
}
