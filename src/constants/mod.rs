pub mod defaults;
pub mod envvars;
pub mod provenance;
pub mod vocab;
