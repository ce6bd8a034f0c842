use serde::Serialize;
use tracing::debug;

use crate::dataset::Dataset;
use crate::error::Result;

/// One location's activity in the selected generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredRow {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub births: Option<u32>,
    pub deaths: Option<u32>,
}

/// The locations with any birth or death in one generation, in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredView {
    pub generation: String,
    pub rows: Vec<FilteredRow>,
}

impl FilteredView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_births(&self) -> u64 {
        self.rows.iter().map(|r| u64::from(r.births.unwrap_or(0))).sum()
    }

    pub fn total_deaths(&self) -> u64 {
        self.rows.iter().map(|r| u64::from(r.deaths.unwrap_or(0))).sum()
    }
}

/// Project the dataset onto one generation, keeping rows with a positive
/// birth or death count. Missing counts are carried as `None`.
pub fn filter_generation(dataset: &Dataset, generation: &str) -> Result<FilteredView> {
    let gen = dataset.schema().require(generation)?;

    let rows: Vec<FilteredRow> = dataset
        .locations()
        .filter_map(|record| {
            let counts = record.counts(gen);
            counts.is_active().then(|| FilteredRow {
                location: record.location.clone(),
                latitude: record.latitude,
                longitude: record.longitude,
                births: counts.born,
                deaths: counts.died,
            })
        })
        .collect();

    debug!(generation, rows = rows.len(), "filtered generation");
    Ok(FilteredView {
        generation: gen.label.clone(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures;
    use crate::error::DashError;

    #[test]
    fn keeps_only_active_rows() {
        let ds = fixtures::migration();

        let gen_ii = filter_generation(&ds, "II").unwrap();
        assert_eq!(gen_ii.rows.len(), 1);
        assert_eq!(gen_ii.rows[0].location, "Salem Massachusetts");
        assert_eq!(gen_ii.rows[0].births, Some(2));
        assert_eq!(gen_ii.rows[0].deaths, None);

        let gen_i = filter_generation(&ds, "I").unwrap();
        let names: Vec<&str> = gen_i.rows.iter().map(|r| r.location.as_str()).collect();
        assert_eq!(names, vec!["Salem Massachusetts", "Ipswich"]);
    }

    #[test]
    fn every_active_row_appears_exactly_once() {
        let ds = fixtures::migration();
        for gen in ds.schema().iter() {
            let view = filter_generation(&ds, &gen.label).unwrap();
            for row in &view.rows {
                assert!(row.births.unwrap_or(0) > 0 || row.deaths.unwrap_or(0) > 0);
            }
            let expected: Vec<&str> = ds
                .locations()
                .filter(|r| r.counts(gen).is_active())
                .map(|r| r.location.as_str())
                .collect();
            let got: Vec<&str> = view.rows.iter().map(|r| r.location.as_str()).collect();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn death_only_row_with_missing_birth_is_kept() {
        let csv = "\
Location,Latitude,Longitude,Gen I Born,Gen I Died
topsfield,42.6,-70.9,,2
Total,,,0,2
";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        let view = filter_generation(&ds, "I").unwrap();
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].births, None);
        assert_eq!(view.rows[0].deaths, Some(2));
    }

    #[test]
    fn totals_row_is_never_a_location() {
        let csv = "\
Location,Latitude,Longitude,Gen I Born,Gen I Died
rowley,42.7,-70.9,1,0
TOTAL,0.0,0.0,1,0
";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        let view = filter_generation(&ds, "I").unwrap();
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.total_births(), 1);
    }

    #[test]
    fn unknown_generation() {
        let ds = fixtures::migration();
        assert!(matches!(
            filter_generation(&ds, "X"),
            Err(DashError::UnknownGeneration { .. })
        ));
    }
}
