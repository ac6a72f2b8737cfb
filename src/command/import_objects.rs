use anyhow::Result;

use crate::argsets::ImportArgs;
use crate::data_mgmt::table::SourceTable;
use crate::importers::objects;
use crate::interfaces::OpenSilexClient;
use crate::settings::Settings;

pub fn import_objects(args: ImportArgs) -> Result<()> {
    let settings = Settings::from_path(&args.settings)?;
    let table = SourceTable::from_path(settings.source_table_path()?)?;

    let client = OpenSilexClient::connect(&settings.credentials)?;
    let dry_run = args.dry_run || settings.dry_run;

    objects::import_objects(
        &client,
        &table,
        &settings.columns_mapping.objects,
        dry_run,
    );
    Ok(())
}
