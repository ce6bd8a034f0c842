use serde::Serialize;
use tracing::warn;

use super::filter::filter_generation;
use crate::dataset::Dataset;
use crate::error::Result;

/// Aggregate counts for one generation, read from the totals row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationTotal {
    pub generation: String,
    pub births: Option<u32>,
    pub deaths: Option<u32>,
}

/// The totals row as a series over generations, in schema order.
pub fn totals_series(dataset: &Dataset) -> Vec<GenerationTotal> {
    let totals = dataset.totals();
    dataset
        .schema()
        .iter()
        .map(|gen| {
            let counts = totals.counts(gen);
            GenerationTotal {
                generation: gen.label.clone(),
                births: counts.born,
                deaths: counts.died,
            }
        })
        .collect()
}

/// A generation whose per-location sums disagree with the totals row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TotalsMismatch {
    pub generation: String,
    pub summed_births: u64,
    pub recorded_births: u64,
    pub summed_deaths: u64,
    pub recorded_deaths: u64,
}

/// Compare per-location sums with the totals row for every generation.
///
/// Rows dropped for missing coordinates are not summed, so a source whose
/// totals include them reports a mismatch here.
pub fn check_totals(dataset: &Dataset) -> Result<Vec<TotalsMismatch>> {
    let mut mismatches = Vec::new();
    for total in totals_series(dataset) {
        let view = filter_generation(dataset, &total.generation)?;
        let summed_births = view.total_births();
        let summed_deaths = view.total_deaths();
        let recorded_births = u64::from(total.births.unwrap_or(0));
        let recorded_deaths = u64::from(total.deaths.unwrap_or(0));

        if summed_births != recorded_births || summed_deaths != recorded_deaths {
            warn!(
                generation = %total.generation,
                summed_births,
                recorded_births,
                summed_deaths,
                recorded_deaths,
                "totals row disagrees with locations"
            );
            mismatches.push(TotalsMismatch {
                generation: total.generation,
                summed_births,
                recorded_births,
                summed_deaths,
                recorded_deaths,
            });
        }
    }
    Ok(mismatches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures;

    #[test]
    fn series_follows_generation_order() {
        let ds = fixtures::migration();
        let series = totals_series(&ds);
        assert_eq!(
            series,
            vec![
                GenerationTotal {
                    generation: "II".into(),
                    births: Some(2),
                    deaths: Some(0),
                },
                GenerationTotal {
                    generation: "I".into(),
                    births: Some(4),
                    deaths: Some(3),
                },
            ]
        );
    }

    #[test]
    fn clean_fixture_sums_match_totals_row() {
        let ds = fixtures::migration();
        for total in totals_series(&ds) {
            let view = filter_generation(&ds, &total.generation).unwrap();
            assert_eq!(view.total_births(), u64::from(total.births.unwrap_or(0)));
        }
        assert!(check_totals(&ds).unwrap().is_empty());
    }

    #[test]
    fn reports_disagreeing_generation() {
        let csv = "\
Location,Latitude,Longitude,Gen I Born,Gen I Died,Gen II Born,Gen II Died
rowley,42.7,-70.9,1,0,3,1
Total,,,1,0,5,1
";
        let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
        let mismatches = check_totals(&ds).unwrap();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].generation, "II");
        assert_eq!(mismatches[0].summed_births, 3);
        assert_eq!(mismatches[0].recorded_births, 5);
    }
}
