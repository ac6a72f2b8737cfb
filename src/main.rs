mod argsets;
mod command;
mod constants;
mod data_mgmt;
mod helpers;
mod importers;
mod interfaces;
mod settings;
mod templates;

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use dotenv::dotenv;
use env_logger::Env;

use constants::{defaults, envvars};

const CMD_IMPORT_OBJECTS: &str = "import-objects";
const CMD_IMPORT_IMAGES: &str = "import-images";
const CMD_FILL_TEMPLATE: &str = "fill-template";

const ARG_SETTINGS: &str = "--settings";
const ARG_DRY_RUN: &str = "--dry-run";

const DEFAULT_LOG_LEVEL: &str = "INFO";

fn main() -> Result<()> {
    let _ = dotenv();
    env_logger::Builder::from_env(
        Env::default().filter_or(envvars::LOGGING_LEVEL, DEFAULT_LOG_LEVEL),
    )
    .init();

    let mut args = pico_args::Arguments::from_env();
    let dry_run = args.contains(ARG_DRY_RUN);
    let settings = settings_path(&mut args)?;

    match args.subcommand()?.as_deref() {
        Some(CMD_IMPORT_OBJECTS) => {
            command::import_objects(argsets::ImportArgs { settings, dry_run })
        }
        Some(CMD_IMPORT_IMAGES) => {
            command::import_images(argsets::ImportArgs { settings, dry_run })
        }
        Some(CMD_FILL_TEMPLATE) => command::fill_template(argsets::FillTemplateArgs {
            settings,
            code: args.free_from_str()?,
            sheet: args.opt_free_from_str()?,
        }),
        _ => Err(anyhow!(
            "Subcommand must be one of '{CMD_IMPORT_OBJECTS}', '{CMD_IMPORT_IMAGES}', '{CMD_FILL_TEMPLATE}'"
        )),
    }
}

fn settings_path(args: &mut pico_args::Arguments) -> Result<PathBuf> {
    if let Some(path) = args.opt_value_from_str(ARG_SETTINGS)? {
        return Ok(path);
    }
    if let Ok(path) = env::var(envvars::OSI_SETTINGS) {
        return Ok(path.into());
    }
    Ok(defaults::SETTINGS_PATH.into())
}
