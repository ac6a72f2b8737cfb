//! Creates one scientific object per row of the orchard source table.

use crate::constants::vocab;
use crate::data_mgmt::models::Row;
use crate::data_mgmt::process::{process_rows, RowOutcome, RunSummary};
use crate::data_mgmt::table::SourceTable;
use crate::helpers;
use crate::interfaces::opensilex::{Geometry, PhenotypingApi, ScientificObjectCreation};
use crate::settings::ObjectColumns;

use super::germplasm;

pub fn import_objects(
    api: &impl PhenotypingApi,
    table: &SourceTable,
    columns: &ObjectColumns,
    dry_run: bool,
) -> RunSummary {
    log::info!("Importing {} rows as scientific objects", table.len());
    let summary = process_rows(table.rows(), |row| import_row(api, row, columns, dry_run));
    log::info!("Object import finished: {summary}");
    summary
}

fn import_row(
    api: &impl PhenotypingApi,
    row: &Row,
    columns: &ObjectColumns,
    dry_run: bool,
) -> anyhow::Result<RowOutcome> {
    let request = object_from_row(api, row, columns)?;

    if already_exists(api, &request.name)? {
        return Ok(RowOutcome::Skipped(format!(
            "object '{}' already exists",
            request.name
        )));
    }

    if dry_run {
        log::info!(
            "[dry run] would create scientific object: {}",
            serde_json::to_string(&request)?
        );
        return Ok(RowOutcome::DryRun);
    }

    let uri = api.create_scientific_object(&request)?;
    log::info!("Created scientific object {uri}");
    Ok(RowOutcome::Submitted(uri))
}

fn object_from_row(
    api: &impl PhenotypingApi,
    row: &Row,
    columns: &ObjectColumns,
) -> anyhow::Result<ScientificObjectCreation> {
    let name = row.require_text(&columns.name)?;
    let longitude = row.require_f64(&columns.longitude)?;
    let latitude = row.require_f64(&columns.latitude)?;

    let publication_date = row
        .optional(&columns.plantation_year)
        .and_then(|cell| cell.as_year())
        .and_then(helpers::january_first_utc);

    let germplasm = row
        .optional(&columns.germplasm_code)
        .map(|cell| cell.to_cell_string())
        .and_then(|code| germplasm::resolve_germplasm(api, &code, Some(vocab::SPECIES_APPLE)));

    Ok(ScientificObjectCreation {
        rdf_type: vocab::RDF_TYPE_TREE.into(),
        name,
        geometry: Geometry::point(longitude, latitude),
        publication_date,
        germplasm,
    })
}

fn already_exists(api: &impl PhenotypingApi, name: &str) -> Result<bool, anyhow::Error> {
    let matches = api.search_scientific_objects(name)?;
    Ok(matches.iter().any(|o| o.name == name))
}
