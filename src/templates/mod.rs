//! Reformats XLSX measurement sheets into the bulk-import CSV templates.

mod fruit_weights;
mod growth_stages;
mod table;

pub use table::TemplateTable;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::constants::defaults;
use crate::data_mgmt::table::{SourceTable, TableError};

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("unsupported document code: {0}")]
    UnsupportedCode(u16),
    #[error("template has no '{0}' column")]
    MissingTemplateColumn(String),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("could not write output CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Phenological growth-stage observations (BBCH).
pub const DOC_GROWTH_STAGES: u16 = 1;
/// Fruit count and weight observations.
pub const DOC_FRUIT_WEIGHTS: u16 = 2;

/// Fill the template for `code` with the measurement sheet at `sheet_path`
/// and write a fresh versioned CSV under `output_dir`. Never overwrites.
pub fn fill_template(
    code: u16,
    sheet_path: &Path,
    output_dir: &Path,
    base_override: Option<&str>,
    ext_override: Option<&str>,
) -> Result<PathBuf, TemplateError> {
    let template_path = match code {
        DOC_GROWTH_STAGES => Path::new(defaults::TEMPLATE_GROWTH_STAGES),
        DOC_FRUIT_WEIGHTS => Path::new(defaults::TEMPLATE_FRUIT_WEIGHTS),
        other => return Err(TemplateError::UnsupportedCode(other)),
    };

    let source = SourceTable::from_path(sheet_path)?;
    let mut template = TemplateTable::load(template_path)?;

    match code {
        DOC_GROWTH_STAGES => growth_stages::fill(&mut template, &source)?,
        _ => fruit_weights::fill(&mut template, &source)?,
    }

    let output_path = versioned_output_path(output_dir, template_path, base_override, ext_override);
    template.write_to(&output_path)?;
    log::info!("Filled template written to {}", output_path.display());
    Ok(output_path)
}

/// `<stem>_filled.csv`, with `(1)`, `(2)`, ... appended until the name is
/// unused.
fn versioned_output_path(
    output_dir: &Path,
    template_path: &Path,
    base_override: Option<&str>,
    ext_override: Option<&str>,
) -> PathBuf {
    let stem = base_override
        .map(str::to_string)
        .unwrap_or_else(|| {
            template_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("template")
                .to_string()
        });
    let ext = ext_override.unwrap_or(defaults::OUTPUT_EXT);
    let base = format!("{stem}{}", defaults::FILLED_SUFFIX);

    let mut candidate = output_dir.join(format!("{base}.{ext}"));
    let mut version = 1;
    while candidate.exists() {
        candidate = output_dir.join(format!("{base}({version}).{ext}"));
        version += 1;
    }
    candidate
}
