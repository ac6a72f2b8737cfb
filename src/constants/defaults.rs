use std::time::Duration;

pub const API_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub const SETTINGS_PATH: &str = "settings.json";

// Fixed-path CSV templates for the supported document codes
pub const TEMPLATE_GROWTH_STAGES: &str = "data/csv_templates/dataset_template_bbch.csv";
pub const TEMPLATE_FRUIT_WEIGHTS: &str =
    "data/csv_templates/dataset_template_fruit_number_weight.csv";

pub const FILLED_SUFFIX: &str = "_filled";
pub const OUTPUT_EXT: &str = "csv";
