//! URIs and RDF types of the target OpenSILEX instance.

pub const RDF_TYPE_TREE: &str = "vocabulary:tree";
pub const RDF_TYPE_RGB_IMAGE: &str = "vocabulary:RGBImage";

/// Agrovoc species URI used to scope germplasm searches (Malus domestica).
pub const SPECIES_APPLE: &str = "http://aims.fao.org/aos/agrovoc/c_4555";

// Variable URIs of the bulk-import dataset templates
pub const VAR_BBCH54: &str =
    "http://opensilex.dev/id/variable/plant_bbch54pomefruit_visualobservation_unitless";
pub const VAR_BBCH59: &str =
    "http://opensilex.dev/id/variable/plant_bbch59pomefruit_visualobservation_unitless";
pub const VAR_BBCH65: &str =
    "http://opensilex.dev/id/variable/plant_bbch65pomefruit_visualobservation_unitless";
pub const VAR_BBCH67: &str =
    "http://opensilex.dev/id/variable/plant_bbch67pomefruit_visualobservation_unitless";

pub const VAR_FRUIT_COUNT: &str =
    "http://opensilex.dev/id/variable/plant_numberoffruits_calculation_unitless";
pub const VAR_WEIGHT_HARVESTED: &str =
    "http://opensilex.dev/id/variable/plant_weightharvested_weighing_kilogramme";
pub const VAR_WEIGHT_50_FRUITS: &str =
    "http://opensilex.dev/id/variable/plant_weight50fruits_weighing_kilogramme";

// Columns common to both dataset templates
pub const COL_TARGET: &str = "target";
pub const COL_DATE: &str = "Date";
