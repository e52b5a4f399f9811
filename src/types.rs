//! Shared types written by the generator and read back by the loader.
//!
//! These serialize to the `manifest.json` format consumed by the browser
//! gallery, so field names follow its camelCase wire format.

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Name of the aggregated manifest inside the projects root.
pub const MANIFEST_FILE: &str = "manifest.json";
/// Optional per-folder metadata file.
pub const METADATA_FILE: &str = "metadata.json";
/// Optional per-folder explicit image listing.
pub const INDEX_FILE: &str = "index.json";

/// One project folder and everything needed to display it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Folder name; unique within a manifest.
    pub folder: String,
    /// Metadata title, or the humanized folder name.
    pub title: String,
    /// Surface area in square metres. Kept as the JSON number that was
    /// written so `120` does not turn into `120.0`.
    pub area: Option<Number>,
    #[serde(default)]
    pub blurb: String,
    #[serde(default)]
    pub text: String,
    /// Public image paths, lead/cover image first.
    #[serde(default)]
    pub images: Vec<String>,
}

/// The generator's output artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// ISO-8601 UTC timestamp of the generator run.
    pub generated_at: String,
    /// URL prefix every image path starts with.
    pub root: String,
    pub projects: Vec<Project>,
}

/// Homepage hero listing: bare file names in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroManifest {
    pub images: Vec<String>,
}
