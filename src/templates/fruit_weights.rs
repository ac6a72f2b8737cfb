//! Fruit count/weight fill: one output row per measurement-sheet row.

use itertools::Itertools;

use crate::constants::vocab;
use crate::data_mgmt::table::SourceTable;

use super::table::TemplateTable;
use super::TemplateError;

// Identifying columns concatenated into the target name
const GENO_COLUMN: &str = "Geno";
const LIGNE_COLUMN: &str = "Ligne";
const POSITION_COLUMN: &str = "Position";

const YEAR_COLUMN: &str = "Year";
const FRUIT_COUNT_COLUMN: &str = "nb_fr_tot";
const WEIGHT_HARVESTED_COLUMN: &str = "poids_recoltes_tot";

/// Harvest observations carry a nominal September 1 date.
const HARVEST_MONTH_DAY: &str = "-09-01";

pub fn fill(template: &mut TemplateTable, source: &SourceTable) -> Result<(), TemplateError> {
    let target_idx = column_index(template, vocab::COL_TARGET)?;
    let date_idx = column_index(template, vocab::COL_DATE)?;
    let count_idx = column_index(template, vocab::VAR_FRUIT_COUNT)?;
    let weight_idx = column_index(template, vocab::VAR_WEIGHT_HARVESTED)?;
    let weight50_idx = column_index(template, vocab::VAR_WEIGHT_50_FRUITS)?;

    let target_columns = [GENO_COLUMN, LIGNE_COLUMN, POSITION_COLUMN];
    let have_target_columns = target_columns.iter().all(|c| source.has_column(c));
    if !have_target_columns {
        log::warn!(
            "Columns {GENO_COLUMN}, {LIGNE_COLUMN} or {POSITION_COLUMN} not found in sheet; \
             target column left blank"
        );
    }
    let have_weight_columns =
        source.has_column(FRUIT_COUNT_COLUMN) && source.has_column(WEIGHT_HARVESTED_COLUMN);
    if !have_weight_columns {
        log::warn!(
            "Columns {FRUIT_COUNT_COLUMN} or {WEIGHT_HARVESTED_COLUMN} not found in sheet; \
             weight-per-50-fruits column left blank"
        );
    }

    template.ensure_data_capacity(source.len());
    for (i, row) in source.rows().iter().enumerate() {
        let mut out = template.blank_row();

        if have_target_columns {
            out[target_idx] = target_columns
                .iter()
                .map(|c| {
                    row.get(c)
                        .map(|v| v.to_cell_string())
                        .unwrap_or_default()
                })
                .join("_");
        }

        if let Some(year) = row.optional(YEAR_COLUMN).and_then(|c| c.as_year()) {
            out[date_idx] = format!("{year}{HARVEST_MONTH_DAY}");
        }

        if let Some(count) = row.optional(FRUIT_COUNT_COLUMN) {
            out[count_idx] = count.to_cell_string();
        }
        if let Some(weight) = row.optional(WEIGHT_HARVESTED_COLUMN) {
            out[weight_idx] = weight.to_cell_string();
        }

        if have_weight_columns {
            let count = row.optional(FRUIT_COUNT_COLUMN).and_then(|c| c.as_f64());
            let weight = row
                .optional(WEIGHT_HARVESTED_COLUMN)
                .and_then(|c| c.as_f64());
            if let (Some(count), Some(weight)) = (count, weight) {
                if count != 0.0 {
                    out[weight50_idx] = weight_per_50_fruits(count, weight).to_string();
                }
            }
        }

        template.set_data_row(i, out);
    }
    Ok(())
}

fn column_index(template: &TemplateTable, name: &str) -> Result<usize, TemplateError> {
    template
        .column_index(name)
        .ok_or_else(|| TemplateError::MissingTemplateColumn(name.to_string()))
}

fn weight_per_50_fruits(fruit_count: f64, harvested_weight: f64) -> f64 {
    harvested_weight / fruit_count * 50.0
}
