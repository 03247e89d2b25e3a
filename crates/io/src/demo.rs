// Bundled demo dataset - a fictional village for first-run exploration.
// The records are seeded with deliberate discrepancies (an area mismatch,
// two missing records, two orphans) so every status shows up.

use bhulekh_recon::{MapParcel, RecordEntry};

use crate::csv::parse_records;
use crate::geojson::load_map_parcels;

const DEMO_PARCELS_GEOJSON: &str = include_str!("../data/demo_parcels.geojson");
const DEMO_RECORDS_CSV: &str = include_str!("../data/demo_records.csv");

/// The bundled village map: 15 parcels.
pub fn demo_parcels() -> Vec<MapParcel> {
    load_map_parcels(DEMO_PARCELS_GEOJSON).expect("bundled demo map is valid")
}

/// The bundled land records matching the demo map.
pub fn demo_records() -> Vec<RecordEntry> {
    parse_records(DEMO_RECORDS_CSV).expect("bundled demo records are valid")
}
