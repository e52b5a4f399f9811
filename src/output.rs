//! CLI output formatting for the generator and the loader.
//!
//! Output is **project-centric**: every project leads with its positional
//! index and title, with the folder and images as indented context lines.
//!
//! # Output Format
//!
//! ## Generate
//!
//! ```text
//! 001 Casa XD (3 images)
//!     Folder: CASA-XD/
//!     120 m² • Vivienda unifamiliar
//! 002 Ru Sm (no images)
//!     Folder: RU-SM/
//!
//! Wrote 2 projects to assets/projects/manifest.json
//! ```
//!
//! ## Load
//!
//! ```text
//! Served by: manifest
//! 001 Casa XD (3 images)
//!     Folder: CASA-XD/
//!     Cover: assets/projects/CASA-XD/cover.jpg
//!     120 m² • Vivienda unifamiliar
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::loader::{self, Tier};
use crate::sidecars::SidecarReport;
use crate::types::{HeroManifest, Manifest, Project};
use serde_json::Number;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn image_count(n: usize) -> String {
    match n {
        0 => "no images".to_string(),
        1 => "1 image".to_string(),
        n => format!("{n} images"),
    }
}

/// Project header plus folder line.
fn project_header(index: usize, project: &Project) -> Vec<String> {
    vec![
        format!(
            "{} {} ({})",
            format_index(index),
            project.title,
            image_count(project.images.len())
        ),
        format!("    Folder: {}/", project.folder),
    ]
}

/// Area in square metres with thousands separators.
///
/// ```text
/// 1200   → 1,200 m²
/// 85.5   → 85.5 m²
/// ```
pub fn format_area(area: &Number) -> String {
    let written = area.to_string();
    let (sign, unsigned) = match written.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", written.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    let mut grouped = String::new();
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac} m²"),
        None => format!("{sign}{grouped} m²"),
    }
}

/// Caption line under a project title: area and blurb, skipping empty parts.
pub fn meta_line(project: &Project) -> String {
    let area = project.area.as_ref().map(format_area);
    let blurb = Some(project.blurb.trim()).filter(|b| !b.is_empty());
    [area.as_deref(), blurb]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" • ")
}

// ============================================================================
// Generate
// ============================================================================

/// Format generator output: one entry per project, then a summary line.
pub fn format_generate_output(manifest: &Manifest, manifest_path: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, project) in manifest.projects.iter().enumerate() {
        lines.extend(project_header(i + 1, project));
        let meta = meta_line(project);
        if !meta.is_empty() {
            lines.push(format!("    {meta}"));
        }
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    let noun = if manifest.projects.len() == 1 {
        "project"
    } else {
        "projects"
    };
    lines.push(format!(
        "Wrote {} {} to {}",
        manifest.projects.len(),
        noun,
        manifest_path.display()
    ));
    lines
}

/// Print generator output to stdout.
pub fn print_generate_output(manifest: &Manifest, manifest_path: &Path) {
    for line in format_generate_output(manifest, manifest_path) {
        println!("{}", line);
    }
}

/// Format the sidecar report written alongside the manifest.
pub fn format_sidecar_report(reports: &[SidecarReport]) -> Vec<String> {
    let mut lines = vec!["Sidecars".to_string()];
    for report in reports {
        let metadata = if report.metadata_written {
            ", metadata.json"
        } else {
            ""
        };
        lines.push(format!(
            "    {}/ index.json ({} entries){}",
            report.folder, report.indexed, metadata
        ));
    }
    lines
}

pub fn print_sidecar_report(reports: &[SidecarReport]) {
    for line in format_sidecar_report(reports) {
        println!("{}", line);
    }
}

pub fn format_hero_output(hero: &HeroManifest, path: &Path) -> Vec<String> {
    let mut lines: Vec<String> = hero
        .images
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{} {}", format_index(i + 1), name))
        .collect();
    lines.push(format!(
        "Wrote {} to {}",
        image_count(hero.images.len()),
        path.display()
    ));
    lines
}

pub fn print_hero_output(hero: &HeroManifest, path: &Path) {
    for line in format_hero_output(hero, path) {
        println!("{}", line);
    }
}

// ============================================================================
// Load
// ============================================================================

/// Format the loaded project list with the tier that served it.
pub fn format_projects(projects: &[Project], tier: Tier, assets_root: &str) -> Vec<String> {
    let mut lines = vec![format!("Served by: {tier}")];
    if projects.is_empty() {
        lines.push("No projects".to_string());
    }
    for (i, project) in projects.iter().enumerate() {
        lines.extend(project_header(i + 1, project));
        lines.push(format!(
            "    Cover: {}",
            loader::cover_src(project, assets_root)
        ));
        let meta = meta_line(project);
        if !meta.is_empty() {
            lines.push(format!("    {meta}"));
        }
    }
    lines
}

/// Print the loaded project list to stdout.
pub fn print_projects(projects: &[Project], tier: Tier, assets_root: &str) {
    for line in format_projects(projects, tier, assets_root) {
        println!("{}", line);
    }
}

/// Format a project's full detail view: caption, text and every picture.
pub fn format_project_detail(project: &Project, pictures: &[String]) -> Vec<String> {
    let mut lines = vec![project.title.clone()];
    let meta = meta_line(project);
    if !meta.is_empty() {
        lines.push(format!("    {meta}"));
    }
    if !project.text.trim().is_empty() {
        lines.push(format!("    {}", project.text.trim()));
    }
    for (i, picture) in pictures.iter().enumerate() {
        lines.push(format!("    {} {}", format_index(i + 1), picture));
    }
    lines
}

pub fn print_project_detail(project: &Project, pictures: &[String]) {
    for line in format_project_detail(project, pictures) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
