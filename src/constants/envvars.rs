pub const LOGGING_LEVEL: &str = "LOGGING_LEVEL";
pub const OSI_SETTINGS: &str = "OSI_SETTINGS";
