//! Project loading with a three-tier fallback cascade.
//!
//! A gallery page needs a list of [`Project`]s. Where that list comes from
//! depends on how the site is deployed, so the loader tries every source it
//! knows, best first, and keeps the first answer:
//!
//! ```text
//! 1. Api       GET <api_endpoint>                      { "projects": [...] }
//! 2. Manifest  GET <assets_root>/manifest.json?<ms>    written by `generate`
//! 3. Fallback  per configured folder: metadata.json + index.json, else guess
//! ```
//!
//! A tier fails as a whole: an unreachable source, a body that is not JSON,
//! or JSON without a `projects` array all move on to the next tier and keep
//! nothing from the failed one. The fallback tier cannot fail; with nothing to
//! read it still produces one guessed project per configured folder. Errors
//! are logged and never reach the caller.
//!
//! ## Guessing
//!
//! Folders without an `index.json` get a conventional `cover.jpg` followed by
//! [`NumberedCandidates`] (`01.jpg` … `12.jpg`). These paths are guesses: the
//! renderer finds out which exist when it tries to display them.
//!
//! ## Caching
//!
//! [`ProjectLoader::ensure_loaded`] runs the cascade once per loader and
//! serves the cached list afterwards. The cache is never refreshed; build a new
//! loader to see new data. Taking `&mut self` means a second load cannot start
//! while the first is still running.

use crate::config::LoaderConfig;
use crate::fetch::{Fetch, FetchError};
use crate::metadata::{self, MetadataLookup, ProjectMetadata};
use crate::naming;
use crate::types::{INDEX_FILE, MANIFEST_FILE, METADATA_FILE, Project};
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Conventional cover file name used when nothing better is known.
pub const COVER_FILE: &str = "cover.jpg";
/// Extension of guessed image names.
pub const GUESS_EXTENSION: &str = "jpg";

/// One stage of the fallback cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Api,
    Manifest,
    Fallback,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Api => "api",
            Tier::Manifest => "manifest",
            Tier::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

/// Why a tier produced nothing.
#[derive(Error, Debug)]
pub enum TierError {
    #[error("not configured")]
    Disabled,
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("{0}")]
    Shape(String),
}

/// What happened when a project's metadata was refreshed on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataState {
    /// Metadata was found and merged into the project.
    Applied,
    /// The project folder has no metadata.
    Missing,
    /// Metadata exists but could not be used.
    Failed(String),
}

/// Lazily generated `NN.jpg` image guesses for one folder.
///
/// Iterating borrows the generator, so the same sequence can be walked again
/// from the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedCandidates {
    base: String,
    count: u32,
}

impl NumberedCandidates {
    /// Guesses `<assets_root>/<folder>/01.jpg` up to `count`.
    pub fn new(assets_root: &str, folder: &str, count: u32) -> Self {
        Self {
            base: naming::image_path(assets_root, folder, ""),
            count,
        }
    }

    pub fn len(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = String> + '_ {
        (1..=self.count).map(move |n| format!("{}{n:02}.{GUESS_EXTENSION}", self.base))
    }
}

impl<'a> IntoIterator for &'a NumberedCandidates {
    type Item = String;
    type IntoIter = Box<dyn Iterator<Item = String> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Loads projects through the fallback cascade and caches the result.
pub struct ProjectLoader<F> {
    fetcher: F,
    config: LoaderConfig,
    projects: Option<Vec<Project>>,
    served_by: Option<Tier>,
    metadata_states: HashMap<String, MetadataState>,
}

impl<F: Fetch> ProjectLoader<F> {
    pub fn new(fetcher: F, config: LoaderConfig) -> Self {
        Self {
            fetcher,
            config,
            projects: None,
            served_by: None,
            metadata_states: HashMap::new(),
        }
    }

    /// The project list, loading it on first use.
    pub fn ensure_loaded(&mut self) -> &[Project] {
        if self.projects.is_none() {
            let (tier, projects) = self.run_cascade();
            info!(tier = %tier, projects = projects.len(), "projects loaded");
            self.served_by = Some(tier);
            self.projects = Some(projects);
        }
        self.projects.as_deref().unwrap_or_default()
    }

    /// The cached list, if a load has completed.
    pub fn projects(&self) -> Option<&[Project]> {
        self.projects.as_deref()
    }

    /// Which tier produced the cached list.
    pub fn served_by(&self) -> Option<Tier> {
        self.served_by
    }

    fn run_cascade(&self) -> (Tier, Vec<Project>) {
        match self.load_from_api() {
            Ok(projects) => return (Tier::Api, projects),
            Err(e) => debug!(tier = %Tier::Api, error = %e, "tier failed"),
        }
        match self.load_from_manifest() {
            Ok(projects) => return (Tier::Manifest, projects),
            Err(e) => warn!(tier = %Tier::Manifest, error = %e, "tier failed"),
        }
        (Tier::Fallback, self.load_from_fallback())
    }

    /// Tier 1: the configured API endpoint.
    pub fn load_from_api(&self) -> Result<Vec<Project>, TierError> {
        let endpoint = self.config.api_endpoint().ok_or(TierError::Disabled)?;
        let body = self.fetcher.get_json(endpoint)?;
        Ok(normalize_records(projects_array(&body, "API")?))
    }

    /// Tier 2: the generated `manifest.json`, fetched past any cache.
    pub fn load_from_manifest(&self) -> Result<Vec<Project>, TierError> {
        let url = format!(
            "{}/{MANIFEST_FILE}?{}",
            self.config.assets_root.trim_end_matches('/'),
            Utc::now().timestamp_millis()
        );
        let body = self.fetcher.get_json(&url)?;
        Ok(normalize_records(projects_array(&body, "Manifest")?))
    }

    /// Tier 3: per-folder sidecars for the configured folders, guessing where
    /// they are missing.
    pub fn load_from_fallback(&self) -> Vec<Project> {
        self.config
            .fallback_folders
            .iter()
            .map(|folder| self.fallback_project(folder))
            .collect()
    }

    fn fallback_project(&self, folder: &str) -> Project {
        let lookup = MetadataLookup::from_fetch(
            self.fetcher.get_json(&self.folder_url(folder, METADATA_FILE)),
        );
        if let MetadataLookup::Invalid(reason) = &lookup {
            debug!(folder, %reason, "ignoring metadata.json");
        }
        let meta = lookup.into_metadata();

        let index = match self.fetcher.get_json(&self.folder_url(folder, INDEX_FILE)) {
            Ok(value) => Some(index_names(&value)),
            Err(e) => {
                debug!(folder, error = %e, "no index.json");
                None
            }
        };

        let root = &self.config.assets_root;
        let mut images = vec![naming::image_path(root, folder, COVER_FILE)];
        match index {
            Some(names) => images.extend(
                names
                    .iter()
                    .map(|name| naming::image_path(root, folder, name))
                    .filter(|path| !naming::is_cover_path(path)),
            ),
            None => images.extend(&NumberedCandidates::new(root, folder, self.config.guess_count)),
        }

        let humanized = naming::humanize(folder);
        Project {
            folder: folder.to_string(),
            title: metadata::resolve(&[meta.title.as_deref(), Some(humanized.as_str())])
                .unwrap_or_default(),
            area: meta.area,
            blurb: meta.blurb.unwrap_or_default(),
            text: meta.text.unwrap_or_default(),
            images,
        }
    }

    /// Fetch a loaded project's `metadata.json` once and merge what it holds.
    ///
    /// Later calls for the same folder return the recorded outcome without
    /// fetching. Returns `None` when no loaded project has this folder.
    pub fn refresh_metadata(&mut self, folder: &str) -> Option<&MetadataState> {
        let index = self
            .projects
            .as_ref()?
            .iter()
            .position(|p| p.folder == folder)?;

        if !self.metadata_states.contains_key(folder) {
            let url = self.folder_url(folder, METADATA_FILE);
            let state = match MetadataLookup::from_fetch(self.fetcher.get_json(&url)) {
                MetadataLookup::Present(meta) => {
                    if let Some(project) = self.projects.as_mut().and_then(|p| p.get_mut(index)) {
                        apply_metadata(project, meta);
                    }
                    MetadataState::Applied
                }
                MetadataLookup::Absent => MetadataState::Missing,
                MetadataLookup::Invalid(reason) => {
                    warn!(folder, %reason, "metadata refresh failed");
                    MetadataState::Failed(reason)
                }
            };
            self.metadata_states.insert(folder.to_string(), state);
        }
        self.metadata_states.get(folder)
    }

    /// Look up a loaded project by folder.
    pub fn project(&self, folder: &str) -> Option<&Project> {
        self.projects.as_ref()?.iter().find(|p| p.folder == folder)
    }

    fn folder_url(&self, folder: &str, file: &str) -> String {
        naming::image_path(&self.config.assets_root, folder, file)
    }
}

/// Lead image of a project: a `cover.*` entry, else the first image, else the
/// conventional cover path.
pub fn cover_src(project: &Project, assets_root: &str) -> String {
    project
        .images
        .iter()
        .find(|path| naming::is_cover_path(path))
        .or_else(|| project.images.first())
        .cloned()
        .unwrap_or_else(|| naming::image_path(assets_root, &project.folder, COVER_FILE))
}

/// Every image a detail view should try: the stored list, or when that is
/// empty the conventional cover followed by numbered guesses.
pub fn all_pictures(project: &Project, assets_root: &str, guess_count: u32) -> Vec<String> {
    if !project.images.is_empty() {
        return project.images.clone();
    }
    std::iter::once(naming::image_path(assets_root, &project.folder, COVER_FILE))
        .chain(&NumberedCandidates::new(assets_root, &project.folder, guess_count))
        .collect()
}

fn projects_array<'a>(body: &'a Value, source: &str) -> Result<&'a [Value], TierError> {
    body.get("projects")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| TierError::Shape(format!("{source} has no 'projects' array")))
}

fn normalize_records(records: &[Value]) -> Vec<Project> {
    records
        .iter()
        .filter_map(|record| {
            let project = normalize_record(record);
            if project.is_none() {
                warn!(%record, "dropping project record without a folder");
            }
            project
        })
        .collect()
}

/// Canonical project from a loosely-typed record.
///
/// Defaults match the generator's output: title falls back to the humanized
/// folder name, area to `null`, strings to `""`, images to an empty list.
/// Non-string image entries are dropped.
pub fn normalize_record(record: &Value) -> Option<Project> {
    let folder = metadata::string_field(record, "folder")?;
    let meta = ProjectMetadata::from_value(record);
    let images = record
        .get("images")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();
    let humanized = naming::humanize(&folder);
    Some(Project {
        title: metadata::resolve(&[meta.title.as_deref(), Some(humanized.as_str())])
            .unwrap_or_default(),
        folder,
        area: meta.area,
        blurb: meta.blurb.unwrap_or_default(),
        text: meta.text.unwrap_or_default(),
        images,
    })
}

/// File names listed in an `index.json` value. A value that is not an array
/// lists nothing.
fn index_names(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn apply_metadata(project: &mut Project, meta: ProjectMetadata) {
    if let Some(title) = meta.title {
        project.title = title;
    }
    if meta.area.is_some() {
        project.area = meta.area;
    }
    if let Some(blurb) = meta.blurb {
        project.blurb = blurb;
    }
    if let Some(text) = meta.text {
        project.text = text;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use serde_json::json;

    const ROOT: &str = "./assets/projects";

    fn config(folders: &[&str]) -> LoaderConfig {
        LoaderConfig {
            fallback_folders: strings(folders),
            ..LoaderConfig::default()
        }
    }

    fn manifest_body() -> Value {
        json!({
            "generatedAt": "2026-01-01T00:00:00.000Z",
            "root": "assets/projects",
            "projects": [{
                "folder": "CASA-XD",
                "title": "Casa XD",
                "area": 120,
                "blurb": "",
                "text": "",
                "images": ["assets/projects/CASA-XD/cover.jpg", "assets/projects/CASA-XD/01.jpg"]
            }]
        })
    }

    // =========================================================================
    // Cascade order tests
    // =========================================================================

    #[test]
    fn api_wins_when_available() {
        let site = FakeSite::new()
            .with("/api/projects", json!({"projects": [{"folder": "VIS", "title": "Vis"}]}))
            .with("./assets/projects/manifest.json", manifest_body());
        let mut loader = ProjectLoader::new(&site, config(&["RU-SM"]));

        let projects = loader.ensure_loaded();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].folder, "VIS");
        assert_eq!(loader.served_by(), Some(Tier::Api));
        assert_eq!(site.requests(), vec!["/api/projects"]);
    }

    #[test]
    fn manifest_used_when_api_fails() {
        let site = FakeSite::new()
            .with_status("/api/projects", 500)
            .with("./assets/projects/manifest.json", manifest_body());
        let mut loader = ProjectLoader::new(&site, config(&["RU-SM"]));

        let projects = loader.ensure_loaded().to_vec();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].title, "Casa XD");
        assert_eq!(loader.served_by(), Some(Tier::Manifest));
        assert!(
            !site.requests().iter().any(|url| url.contains("RU-SM")),
            "fallback tier must not run: {:?}",
            site.requests()
        );
    }

    #[test]
    fn manifest_request_is_cache_busted() {
        let site = FakeSite::new().with("./assets/projects/manifest.json", manifest_body());
        let mut loader = ProjectLoader::new(&site, config(&[]));
        loader.ensure_loaded();

        let manifest_url = site
            .requests()
            .into_iter()
            .find(|url| url.contains("manifest.json"))
            .unwrap();
        let (path, stamp) = manifest_url.split_once('?').unwrap();
        assert_eq!(path, "./assets/projects/manifest.json");
        assert!(stamp.parse::<i64>().is_ok());
    }

    #[test]
    fn api_without_projects_array_falls_through() {
        let site = FakeSite::new()
            .with("/api/projects", json!({"items": []}))
            .with("./assets/projects/manifest.json", manifest_body());
        let mut loader = ProjectLoader::new(&site, config(&[]));

        loader.ensure_loaded();
        assert_eq!(loader.served_by(), Some(Tier::Manifest));
    }

    #[test]
    fn malformed_manifest_falls_back() {
        let site = FakeSite::new().with("./assets/projects/manifest.json", json!({"projects": "nope"}));
        let mut loader = ProjectLoader::new(&site, config(&["VIS"]));

        let projects = loader.ensure_loaded();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].folder, "VIS");
        assert_eq!(loader.served_by(), Some(Tier::Fallback));
    }

    #[test]
    fn disabled_api_skips_request() {
        let site = FakeSite::new().with("./assets/projects/manifest.json", manifest_body());
        let mut cfg = config(&[]);
        cfg.api_endpoint = None;
        let mut loader = ProjectLoader::new(&site, cfg);

        loader.ensure_loaded();
        assert!(!site.requests().iter().any(|url| url.contains("/api/")));
        assert_eq!(loader.served_by(), Some(Tier::Manifest));
    }

    #[test]
    fn everything_missing_with_no_folders_is_empty() {
        let site = FakeSite::new();
        let mut loader = ProjectLoader::new(&site, config(&[]));
        assert!(loader.ensure_loaded().is_empty());
        assert_eq!(loader.served_by(), Some(Tier::Fallback));
    }

    #[test]
    fn load_is_memoized() {
        let site = FakeSite::new().with("/api/projects", json!({"projects": []}));
        let mut loader = ProjectLoader::new(&site, config(&[]));
        assert!(loader.projects().is_none());

        loader.ensure_loaded();
        loader.ensure_loaded();
        assert_eq!(site.requests().len(), 1);
        assert_eq!(loader.projects().map(<[Project]>::len), Some(0));
    }

    // =========================================================================
    // Manifest normalization tests
    // =========================================================================

    #[test]
    fn normalize_defaults_missing_fields() {
        let project = normalize_record(&json!({"folder": "VIS"})).unwrap();
        assert_eq!(project.title, "Vis");
        assert_eq!(project.area, None);
        assert_eq!(project.blurb, "");
        assert_eq!(project.text, "");
        assert!(project.images.is_empty());
    }

    #[test]
    fn normalize_humanizes_multi_word_folder() {
        let project = normalize_record(&json!({"folder": "casa_de-campo", "title": ""})).unwrap();
        assert_eq!(project.title, "Casa De Campo");
    }

    #[test]
    fn manifest_title_defaults_like_generator() {
        let site = FakeSite::new().with(
            "./assets/projects/manifest.json",
            json!({"projects": [{"folder": "RU-SM", "images": []}]}),
        );
        let loader = ProjectLoader::new(&site, config(&[]));
        let projects = loader.load_from_manifest().unwrap();
        assert_eq!(projects[0].title, naming::humanize("RU-SM"));
        assert_eq!(projects[0].title, "Ru Sm");
    }

    #[test]
    fn normalize_drops_non_string_images() {
        let project =
            normalize_record(&json!({"folder": "VIS", "images": ["a.jpg", 3, null, "b.jpg"]}))
                .unwrap();
        assert_eq!(project.images, strings(&["a.jpg", "b.jpg"]));
    }

    #[test]
    fn normalize_requires_folder() {
        assert_eq!(normalize_record(&json!({"title": "x"})), None);
        assert_eq!(normalize_record(&json!("VIS")), None);
    }

    #[test]
    fn empty_manifest_gives_empty_list() {
        let site = FakeSite::new().with(
            "./assets/projects/manifest.json",
            json!({"generatedAt": "x", "root": "assets/projects", "projects": []}),
        );
        let loader = ProjectLoader::new(&site, config(&["VIS"]));
        assert!(loader.load_from_manifest().unwrap().is_empty());
    }

    // =========================================================================
    // Fallback tier tests
    // =========================================================================

    #[test]
    fn fallback_guesses_without_sidecars() {
        let site = FakeSite::new();
        let loader = ProjectLoader::new(&site, config(&["RU-SM"]));

        let projects = loader.load_from_fallback();
        let ru = &projects[0];
        assert_eq!(ru.title, "Ru Sm");
        assert_eq!(ru.images.len(), 13);
        assert_eq!(ru.images[0], "./assets/projects/RU-SM/cover.jpg");
        assert_eq!(ru.images[1], "./assets/projects/RU-SM/01.jpg");
        assert_eq!(ru.images[12], "./assets/projects/RU-SM/12.jpg");
        assert_eq!(ru.area, None);
        assert_eq!(ru.blurb, "");
    }

    #[test]
    fn fallback_uses_index_and_metadata() {
        let site = FakeSite::new()
            .with(
                "./assets/projects/CASA-XD/metadata.json",
                json!({"title": "Casa XD", "area": 120}),
            )
            .with(
                "./assets/projects/CASA-XD/index.json",
                json!(["01.jpg", "COVER.jpg", "02.png"]),
            );
        let loader = ProjectLoader::new(&site, config(&["CASA-XD"]));

        let casa = &loader.load_from_fallback()[0];
        assert_eq!(casa.title, "Casa XD");
        assert_eq!(casa.area.as_ref().and_then(|n| n.as_u64()), Some(120));
        assert_eq!(casa.blurb, "");
        assert_eq!(
            casa.images,
            strings(&[
                "./assets/projects/CASA-XD/cover.jpg",
                "./assets/projects/CASA-XD/01.jpg",
                "./assets/projects/CASA-XD/02.png",
            ])
        );
    }

    #[test]
    fn fallback_index_not_array_means_no_guesses() {
        let site = FakeSite::new().with("./assets/projects/VIS/index.json", json!({"files": []}));
        let loader = ProjectLoader::new(&site, config(&["VIS"]));

        let vis = &loader.load_from_fallback()[0];
        assert_eq!(vis.images, strings(&["./assets/projects/VIS/cover.jpg"]));
    }

    #[test]
    fn fallback_metadata_without_index_still_guesses() {
        let site = FakeSite::new().with(
            "./assets/projects/Antena/metadata.json",
            json!({"blurb": "Torre"}),
        );
        let loader = ProjectLoader::new(&site, config(&["Antena"]));

        let antena = &loader.load_from_fallback()[0];
        assert_eq!(antena.title, "Antena");
        assert_eq!(antena.blurb, "Torre");
        assert_eq!(antena.images.len(), 13);
    }

    #[test]
    fn fallback_respects_guess_count() {
        let site = FakeSite::new();
        let mut cfg = config(&["VIS"]);
        cfg.guess_count = 3;
        let loader = ProjectLoader::new(&site, cfg);
        assert_eq!(loader.load_from_fallback()[0].images.len(), 4);
    }

    // =========================================================================
    // Candidate and accessor tests
    // =========================================================================

    #[test]
    fn candidates_are_restartable() {
        let candidates = NumberedCandidates::new(ROOT, "VIS", 2);
        let first: Vec<String> = candidates.iter().collect();
        let second: Vec<String> = (&candidates).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(
            first,
            strings(&["./assets/projects/VIS/01.jpg", "./assets/projects/VIS/02.jpg"])
        );
        assert_eq!(candidates.len(), 2);
    }

    fn project_with(images: &[&str]) -> Project {
        Project {
            folder: "VIS".into(),
            title: "Vis".into(),
            area: None,
            blurb: String::new(),
            text: String::new(),
            images: strings(images),
        }
    }

    #[test]
    fn cover_src_prefers_cover_entry() {
        let project = project_with(&["p/VIS/01.jpg", "p/VIS/Cover.png"]);
        assert_eq!(cover_src(&project, ROOT), "p/VIS/Cover.png");
    }

    #[test]
    fn cover_src_falls_back_to_first() {
        let project = project_with(&["p/VIS/01.jpg", "p/VIS/02.jpg"]);
        assert_eq!(cover_src(&project, ROOT), "p/VIS/01.jpg");
    }

    #[test]
    fn cover_src_synthesized_when_empty() {
        let project = project_with(&[]);
        assert_eq!(cover_src(&project, ROOT), "./assets/projects/VIS/cover.jpg");
    }

    #[test]
    fn all_pictures_uses_stored_list() {
        let project = project_with(&["p/VIS/01.jpg"]);
        assert_eq!(all_pictures(&project, ROOT, 12), strings(&["p/VIS/01.jpg"]));
    }

    #[test]
    fn all_pictures_guesses_when_empty() {
        let pics = all_pictures(&project_with(&[]), ROOT, 12);
        assert_eq!(pics.len(), 13);
        assert_eq!(pics[0], "./assets/projects/VIS/cover.jpg");
        assert_eq!(pics[12], "./assets/projects/VIS/12.jpg");
    }

    // =========================================================================
    // Metadata refresh tests
    // =========================================================================

    #[test]
    fn refresh_applies_metadata_once() {
        let site = FakeSite::new()
            .with("./assets/projects/manifest.json", manifest_body())
            .with(
                "./assets/projects/CASA-XD/metadata.json",
                json!({"blurb": "Vivienda", "text": "Detalle"}),
            );
        let mut loader = ProjectLoader::new(&site, config(&[]));
        loader.ensure_loaded();

        assert_eq!(loader.refresh_metadata("CASA-XD"), Some(&MetadataState::Applied));
        assert_eq!(loader.refresh_metadata("CASA-XD"), Some(&MetadataState::Applied));

        let casa = loader.project("CASA-XD").unwrap();
        assert_eq!(casa.blurb, "Vivienda");
        assert_eq!(casa.text, "Detalle");
        assert_eq!(casa.title, "Casa XD");

        let metadata_fetches = site
            .requests()
            .iter()
            .filter(|url| url.ends_with("CASA-XD/metadata.json"))
            .count();
        assert_eq!(metadata_fetches, 1);
    }

    #[test]
    fn refresh_failure_recorded_and_not_retried() {
        let site = FakeSite::new()
            .with("./assets/projects/manifest.json", manifest_body())
            .with_status("./assets/projects/CASA-XD/metadata.json", 500);
        let mut loader = ProjectLoader::new(&site, config(&[]));
        loader.ensure_loaded();

        assert!(matches!(
            loader.refresh_metadata("CASA-XD"),
            Some(MetadataState::Failed(_))
        ));
        loader.refresh_metadata("CASA-XD");
        let fetches = site
            .requests()
            .iter()
            .filter(|url| url.ends_with("metadata.json"))
            .count();
        assert_eq!(fetches, 1);
        assert_eq!(loader.project("CASA-XD").unwrap().title, "Casa XD");
    }

    #[test]
    fn refresh_missing_metadata() {
        let site = FakeSite::new().with("./assets/projects/manifest.json", manifest_body());
        let mut loader = ProjectLoader::new(&site, config(&[]));
        loader.ensure_loaded();
        assert_eq!(loader.refresh_metadata("CASA-XD"), Some(&MetadataState::Missing));
    }

    #[test]
    fn refresh_unknown_or_unloaded_is_none() {
        let site = FakeSite::new();
        let mut loader = ProjectLoader::new(&site, config(&["VIS"]));
        assert_eq!(loader.refresh_metadata("VIS"), None);
        loader.ensure_loaded();
        assert_eq!(loader.refresh_metadata("NOPE"), None);
    }
}
