//! Per-folder sidecar files and the homepage hero listing.
//!
//! The loader's last-resort tier knows nothing but a list of folder names.
//! It reads two optional files from each folder to do better than guessing:
//!
//! - `index.json`: the folder's image file names minus any `cover.<ext>` file
//!   (the loader always puts `cover.jpg` in front itself). Folders without a
//!   cover keep every image, so none is hidden behind a missing cover.
//! - `metadata.json`: title, area, blurb and text.
//!
//! [`write_sidecars`] produces both from the same scan the manifest uses.
//! Existing metadata is left alone unless it is unreadable or `force` is set,
//! because it is usually hand-edited after the first run.
//!
//! [`write_hero_manifest`] lists a homepage hero folder as
//! `{"images": [...]}` for the landing-page slideshow.

use crate::metadata::{self, MetadataLookup};
use crate::naming;
use crate::scan::{self, ScanError};
use crate::types::{HeroManifest, INDEX_FILE, MANIFEST_FILE, METADATA_FILE};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What [`write_sidecars`] did to one project folder.
#[derive(Debug, Clone, PartialEq)]
pub struct SidecarReport {
    pub folder: String,
    /// Number of entries written to `index.json`.
    pub indexed: usize,
    /// Whether `metadata.json` was (re)written.
    pub metadata_written: bool,
}

/// Write `index.json` and, where needed, a `metadata.json` template into every
/// project folder under `root` that contains at least one image.
pub fn write_sidecars(root: &Path, force: bool) -> Result<Vec<SidecarReport>, ScanError> {
    let mut reports = Vec::new();
    for folder in scan::list_project_folders(root)? {
        let dir = root.join(&folder);
        let images = scan::list_images(&dir)?;
        if images.is_empty() {
            debug!(folder, "no images, skipping sidecars");
            continue;
        }

        let index = index_entries(&images);
        write_json(&dir.join(INDEX_FILE), &json!(index))?;

        let metadata_written = match metadata::read_metadata(&dir) {
            MetadataLookup::Present(_) if !force => false,
            _ => {
                let template = json!({
                    "title": naming::humanize(&folder),
                    "area": null,
                    "blurb": "",
                    "text": "",
                });
                write_json(&dir.join(METADATA_FILE), &template)?;
                true
            }
        };

        info!(folder, indexed = index.len(), metadata_written, "wrote sidecars");
        reports.push(SidecarReport {
            folder,
            indexed: index.len(),
            metadata_written,
        });
    }
    Ok(reports)
}

/// Image names for `index.json`: display order minus the first
/// `cover.<ext>` file. Without a cover every image is listed.
pub fn index_entries(ordered: &[String]) -> Vec<String> {
    let cover = ordered.iter().position(|name| naming::is_cover_file(name));
    ordered
        .iter()
        .enumerate()
        .filter(|&(i, _)| Some(i) != cover)
        .map(|(_, name)| name.clone())
        .collect()
}

/// List the images of a hero folder into `<dir>/manifest.json`.
pub fn write_hero_manifest(dir: &Path) -> Result<(PathBuf, HeroManifest), ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }
    let hero = HeroManifest {
        images: scan::list_images(dir)?,
    };
    let path = dir.join(MANIFEST_FILE);
    fs::write(&path, serde_json::to_string_pretty(&hero)?)?;
    Ok((path, hero))
}

fn write_json(path: &Path, value: &serde_json::Value) -> Result<(), ScanError> {
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}
