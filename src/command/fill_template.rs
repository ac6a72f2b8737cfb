use anyhow::Result;

use crate::argsets::FillTemplateArgs;
use crate::settings::Settings;
use crate::templates;

pub fn fill_template(args: FillTemplateArgs) -> Result<()> {
    let settings = Settings::from_path(&args.settings)?;
    let sheet = match &args.sheet {
        Some(path) => path.as_path(),
        None => settings.measurement_sheet_path()?,
    };

    templates::fill_template(
        args.code,
        sheet,
        settings.output_dir(),
        settings.columns_mapping.file.as_deref(),
        settings.columns_mapping.file_ext.as_deref(),
    )?;
    Ok(())
}
