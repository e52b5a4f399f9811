//! # Portfolio Gal
//!
//! The data layer of a small portfolio site. Project folders full of images
//! are the data source: each folder is a project, a `cover.<ext>` file leads
//! it, and an optional `metadata.json` supplies the caption.
//!
//! # Architecture: Generate Once, Load Anywhere
//!
//! ```text
//! generate   assets/projects/<folder>/*  →  assets/projects/manifest.json
//! load       API  →  manifest.json  →  configured folders  →  Vec<Project>
//! ```
//!
//! The generator runs at build time and writes one aggregated manifest. The
//! loader runs wherever the gallery is shown and has to cope with whatever the
//! deployment provides: an API, the generated manifest, or nothing but the
//! folders themselves. It tries each source in order and keeps the first
//! answer, so a site keeps showing projects while parts of it are missing.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Generator: walks project folders, orders images, writes `manifest.json` |
//! | [`sidecars`] | Generator extras: per-folder `index.json`/`metadata.json` and hero listings |
//! | [`loader`] | Three-tier fallback cascade producing the project list |
//! | [`fetch`] | The `Fetch` seam: HTTP and on-disk JSON retrieval |
//! | [`metadata`] | Tolerant `metadata.json` decoding |
//! | [`naming`] | Folder titles, cover detection, numeric ordering, public paths |
//! | [`config`] | `config.toml` loading, validation, and merging over stock defaults |
//! | [`types`] | Shared serialized types (`Project`, `Manifest`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Images Are Referenced, Never Decoded
//!
//! Both halves work on file names only. The generator lists files by
//! extension and the loader guesses `01.jpg`, `02.jpg`, ... when it knows
//! nothing else. Whether a guessed image exists is discovered by whoever
//! renders it.
//!
//! ## Tolerant Reads
//!
//! Metadata and index files are hand-edited. A broken one degrades that
//! project to defaults and is logged; it never stops a scan or a load.

pub mod config;
pub mod fetch;
pub mod loader;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod scan;
pub mod sidecars;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
