pub mod models;
pub mod process;
pub mod table;
