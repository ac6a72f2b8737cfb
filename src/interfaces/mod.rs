pub mod opensilex;

pub use opensilex::{OpenSilexClient, PhenotypingApi};
