//! Uploads captured orchard images as dated, provenance-tagged observation
//! files, matching each image to its tree by the row/column key encoded in
//! the folder name.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::constants::{provenance, vocab};
use crate::data_mgmt::process::{RowOutcome, RunSummary};
use crate::helpers;
use crate::interfaces::opensilex::{DataFileDescription, PhenotypingApi, ProvenanceRef};

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "tiff"];

/// Path segment that precedes the acquisition date.
const EXTRACTION_SEGMENT: &str = "Extraction";

// Folder naming convention: `<label>_<row>_<label>_<column>`, with the grid
// position in the 2nd and 4th underscore-delimited segments.
static FOLDER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^_]+_(?P<row>[^_]+)_[^_]+_(?P<col>[^_]+)(?:_.*)?$").unwrap());

static DATE_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static SIDE_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^side_\d+$").unwrap());

#[derive(Error, Debug)]
pub enum GridKeyError {
    #[error("folder name '{0}' does not follow the <label>_<row>_<label>_<column> convention")]
    Unrecognized(String),
}

#[derive(Debug, PartialEq)]
pub struct GridKey {
    pub row: String,
    pub column: String,
}

/// An image discovered on disk, paired with its parent folder name.
#[derive(Debug)]
pub struct ImageFile {
    pub path: PathBuf,
    pub folder_name: String,
}

pub fn import_images(
    api: &impl PhenotypingApi,
    root: &Path,
    dry_run: bool,
) -> anyhow::Result<RunSummary> {
    let images = discover_images(root)
        .with_context(|| format!("could not walk image directory {}", root.display()))?;
    log::info!("Found {} image files under {}", images.len(), root.display());

    let mut summary = RunSummary::default();
    for image in &images {
        match import_image(api, image, dry_run) {
            Ok(outcome) => {
                if let RowOutcome::Skipped(reason) = &outcome {
                    log::info!("{}: skipped ({})", image.path.display(), reason);
                }
                summary.record(&outcome);
            }
            Err(e) => {
                log::error!("{}: {:#}", image.path.display(), e);
                summary.failed += 1;
            }
        }
    }
    log::info!("Image import finished: {summary}");
    Ok(summary)
}

fn import_image(
    api: &impl PhenotypingApi,
    image: &ImageFile,
    dry_run: bool,
) -> anyhow::Result<RowOutcome> {
    let key = parse_grid_key(&image.folder_name)?;

    let Some(target) = resolve_target(api, &key)? else {
        return Ok(RowOutcome::Skipped(format!(
            "no scientific object for folder {}",
            image.folder_name
        )));
    };

    let file_name = image
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let description = DataFileDescription {
        target,
        rdf_type: vocab::RDF_TYPE_RGB_IMAGE.into(),
        provenance: provenance_uri(&image.path).map(|uri| ProvenanceRef { uri }),
        date: capture_date(&image.path),
        file: file_name.clone(),
    };

    if dry_run {
        log::info!(
            "[dry run] would upload {}: {}",
            image.path.display(),
            serde_json::to_string(&description)?
        );
        return Ok(RowOutcome::DryRun);
    }

    let payload = match fs::read(&image.path) {
        Ok(bytes) => bytes,
        // Not the same thing as an upload failure: the walk saw the file
        // but it is gone now
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Ok(RowOutcome::Skipped(format!(
                "file no longer on disk: {}",
                image.path.display()
            )));
        }
        Err(e) => {
            return Err(e).with_context(|| format!("could not read {}", image.path.display()))
        }
    };

    let uri = api.post_data_file(&description, &file_name, &payload)?;
    log::info!("Uploaded {} as {}", image.path.display(), uri);
    Ok(RowOutcome::Submitted(uri))
}

/// Recursively collect image files (by extension, case-insensitive),
/// sorted by path for a deterministic processing order.
fn discover_images(root: &Path) -> std::io::Result<Vec<ImageFile>> {
    let mut images = Vec::new();
    walk(root, &mut images)?;
    Ok(images
        .into_iter()
        .sorted_by(|a, b| a.path.cmp(&b.path))
        .collect())
}

fn walk(dir: &Path, images: &mut Vec<ImageFile>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, images)?;
        } else if has_image_extension(&path) {
            let folder_name = path
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            images.push(ImageFile { path, folder_name });
        }
    }
    Ok(())
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn parse_grid_key(folder_name: &str) -> Result<GridKey, GridKeyError> {
    let caps = FOLDER_PATTERN
        .captures(folder_name)
        .ok_or_else(|| GridKeyError::Unrecognized(folder_name.to_string()))?;
    Ok(GridKey {
        row: caps["row"].to_string(),
        column: caps["col"].to_string(),
    })
}

fn resolve_target(
    api: &impl PhenotypingApi,
    key: &GridKey,
) -> anyhow::Result<Option<String>> {
    let pattern = format!("_{}_{}", key.row, key.column);
    let matches = api.search_scientific_objects(&pattern)?;
    Ok(matches
        .into_iter()
        .find(|o| o.name.contains(&pattern))
        .map(|o| o.uri))
}

/// Provenance from the acquisition side segment plus the camera file stem,
/// e.g. `side_1/rgb_left`. Unknown keys yield no provenance.
fn provenance_uri(path: &Path) -> Option<String> {
    let side = path
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .find(|s| SIDE_SEGMENT.is_match(s))?;
    let stem = path.file_stem()?.to_str()?;
    let key = format!("{side}/{stem}");
    provenance::PROVENANCE_URIS
        .get(key.as_str())
        .map(|uri| uri.to_string())
}

/// Acquisition date: the `YYYY-MM-DD` path segment immediately following
/// the `Extraction` segment, as a midnight-UTC timestamp.
fn capture_date(path: &Path) -> Option<String> {
    let segments: Vec<&str> = path
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();
    let extraction = segments.iter().position(|s| *s == EXTRACTION_SEGMENT)?;
    let candidate = segments.get(extraction + 1)?;
    if !DATE_SEGMENT.is_match(candidate) {
        return None;
    }
    NaiveDate::parse_from_str(candidate, "%Y-%m-%d")
        .ok()
        .map(helpers::midnight_utc)
}
