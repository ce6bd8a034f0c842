use serde::Serialize;

use crate::dataset::Dataset;

/// One (location, generation) cell of the wide source table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongFormEntry {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub generation: String,
    /// Missing births read as zero.
    pub births: u32,
    /// Missing deaths stay missing; death-based visuals distinguish the two.
    pub deaths: Option<u32>,
}

/// Expand every non-totals row into one entry per generation, generations in
/// schema order within each location.
pub fn long_form(dataset: &Dataset) -> Vec<LongFormEntry> {
    let schema = dataset.schema();
    let mut out = Vec::with_capacity(dataset.records().len() * schema.len());

    for record in dataset.locations() {
        for gen in schema.iter() {
            let counts = record.counts(gen);
            out.push(LongFormEntry {
                location: record.location.clone(),
                latitude: record.latitude,
                longitude: record.longitude,
                generation: gen.label.clone(),
                births: counts.born.unwrap_or(0),
                deaths: counts.died,
            });
        }
    }
    out
}
