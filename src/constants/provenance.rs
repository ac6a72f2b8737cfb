use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Provenance URI per acquisition side and camera, keyed by
/// `<side segment>/<file stem>`. Keys not present here yield an
/// observation without provenance.
pub static PROVENANCE_URIS: Lazy<HashMap<&str, &str>> = Lazy::new(|| {
    HashMap::from([
        (
            "side_1/rgb_left",
            "dev:provenance/acquisition_side1_rgb_left",
        ),
        (
            "side_1/rgb_right",
            "dev:provenance/acquisition_side1_rgb_right",
        ),
        (
            "side_2/rgb_left",
            "dev:provenance/acquisition_side2_rgb_left",
        ),
        (
            "side_2/rgb_right",
            "dev:provenance/acquisition_side2_rgb_right",
        ),
    ])
});
