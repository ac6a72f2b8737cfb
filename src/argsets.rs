use std::path::PathBuf;

pub struct ImportArgs {
    pub settings: PathBuf,
    pub dry_run: bool,
}

pub struct FillTemplateArgs {
    pub settings: PathBuf,
    pub code: u16,
    pub sheet: Option<PathBuf>,
}
