//! Shared test utilities for the portfolio-gal test suite.
//!
//! Provides project-folder fixtures for the generator and an in-memory site
//! for the loader.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! make_project(tmp.path(), "RU-SM", &["cover.jpg", "01.jpg"]);
//!
//! let site = FakeSite::new()
//!     .with("/api/projects", json!({"projects": []}))
//!     .with_status("./assets/projects/manifest.json", 500);
//! ```

use crate::fetch::{Fetch, FetchError};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

// =========================================================================
// Fixture setup
// =========================================================================

/// Owned strings from string literals.
pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Create `<root>/<folder>` holding placeholder files with the given names.
///
/// Contents are never decoded, so any bytes will do.
pub fn make_project(root: &Path, folder: &str, files: &[&str]) -> PathBuf {
    let dir = root.join(folder);
    fs::create_dir_all(&dir).unwrap();
    for file in files {
        fs::write(dir.join(file), b"fake image").unwrap();
    }
    dir
}

// =========================================================================
// In-memory site
// =========================================================================

/// A site that answers from a fixed table and records every request.
///
/// URLs are matched without their query string, so cache-busted manifest
/// requests hit the same entry. Unknown URLs answer 404.
#[derive(Default)]
pub struct FakeSite {
    documents: HashMap<String, Value>,
    statuses: HashMap<String, u16>,
    requests: RefCell<Vec<String>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `url`.
    pub fn with(mut self, url: &str, body: Value) -> Self {
        self.documents.insert(url.to_string(), body);
        self
    }

    /// Answer `url` with an error status.
    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.statuses.insert(url.to_string(), status);
        self
    }

    /// Every URL requested so far, in order, query strings included.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Fetch for FakeSite {
    fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        let key = url.split('?').next().unwrap_or_default();
        if let Some(&status) = self.statuses.get(key) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        self.documents
            .get(key)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}
