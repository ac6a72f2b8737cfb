use anyhow::Result;

use crate::argsets::ImportArgs;
use crate::importers::images;
use crate::interfaces::OpenSilexClient;
use crate::settings::Settings;

pub fn import_images(args: ImportArgs) -> Result<()> {
    let settings = Settings::from_path(&args.settings)?;
    let root = settings.image_root()?;

    let client = OpenSilexClient::connect(&settings.credentials)?;
    let dry_run = args.dry_run || settings.dry_run;

    images::import_images(&client, root, dry_run)?;
    Ok(())
}
