// src/dataset/mod.rs

use csv::ReaderBuilder;
use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};
use tracing::{debug, info, instrument};

use crate::error::{DashError, Result};

pub mod normalize;
pub mod record;
pub mod schema;

pub use record::{Counts, Record, TotalsRecord};
pub use schema::{GenerationColumns, GenerationSchema};

use normalize::{is_totals_name, parse_coordinate, parse_count, title_case};

pub const LOCATION: &str = "Location";
pub const LATITUDE: &str = "Latitude";
pub const LONGITUDE: &str = "Longitude";

/// The loaded, normalized spreadsheet.
///
/// Built once at startup and never mutated; every view is a projection
/// computed from a shared reference to it.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: GenerationSchema,
    records: Vec<Record>,
    totals: TotalsRecord,
    dropped_rows: usize,
}

fn column_index(headers: &[String], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| DashError::MissingColumn {
            column: name.to_string(),
        })
}

fn open_error(path: &Path, source: io::Error) -> DashError {
    match source.kind() {
        io::ErrorKind::NotFound => DashError::SourceNotFound {
            path: path.to_path_buf(),
        },
        _ => DashError::Io {
            path: path.to_path_buf(),
            source,
        },
    }
}

impl Dataset {
    /// Load the CSV at `path`.
    #[instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(DashError::SourceNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path).map_err(|e| open_error(path, e))?;
        let dataset = Self::from_reader(file)?;
        info!(
            records = dataset.records.len(),
            dropped = dataset.dropped_rows,
            generations = dataset.schema.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Parse and normalize CSV from any reader.
    ///
    /// - the first row whose location contains "total" (any case) becomes the
    ///   totals record, whether or not it has coordinates
    /// - rows without both coordinates are dropped
    /// - location names are title-cased
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
        let location_idx = column_index(&headers, LOCATION)?;
        let latitude_idx = column_index(&headers, LATITUDE)?;
        let longitude_idx = column_index(&headers, LONGITUDE)?;
        let schema = GenerationSchema::from_headers(&headers)?;

        let mut totals: Option<TotalsRecord> = None;
        let mut records = Vec::new();
        let mut dropped_rows = 0;

        for (row_idx, result) in rdr.records().enumerate() {
            let row = result?;
            let cell = |i: usize| row.get(i).unwrap_or("");

            let raw_name = cell(location_idx).trim();
            let counts: Vec<Counts> = schema
                .iter()
                .map(|g| Counts {
                    born: parse_count(cell(g.born_index)),
                    died: parse_count(cell(g.died_index)),
                })
                .collect();

            let is_totals = totals.is_none() && is_totals_name(raw_name);
            if is_totals {
                debug!(row = row_idx, location = raw_name, "found totals row");
                totals = Some(TotalsRecord {
                    location: title_case(raw_name),
                    counts: counts.clone(),
                });
            }

            match (
                parse_coordinate(cell(latitude_idx)),
                parse_coordinate(cell(longitude_idx)),
            ) {
                (Some(latitude), Some(longitude)) => records.push(Record {
                    location: title_case(raw_name),
                    latitude,
                    longitude,
                    counts,
                    is_totals,
                }),
                _ => {
                    debug!(row = row_idx, location = raw_name, "dropping row without coordinates");
                    dropped_rows += 1;
                }
            }
        }

        let totals = totals.ok_or(DashError::MissingTotalsRow)?;

        Ok(Self {
            schema,
            records,
            totals,
            dropped_rows,
        })
    }

    pub fn schema(&self) -> &GenerationSchema {
        &self.schema
    }

    /// Generation labels, youngest first.
    pub fn generations(&self) -> Vec<String> {
        self.schema.labels().map(str::to_string).collect()
    }

    /// Every normalized row, including the totals row if it had coordinates.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Normalized rows excluding the one totals row.
    pub fn locations(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|r| !r.is_totals())
    }

    pub fn totals(&self) -> &TotalsRecord {
        &self.totals
    }

    /// Rows removed for lacking coordinates.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Dataset;

    /// Two located rows, one row without coordinates, and a totals row that
    /// matches the located rows.
    pub const MIGRATION_CSV: &str = "\
Location,Latitude,Longitude,Gen I Born,Gen I Died,Gen II Born,Gen II Died
salem massachusetts,42.52,-70.89,3,1,2,
ipswich,42.68,-70.84,1,2,0,0
unknown place,,,4,0,1,1
Total,,,4,3,2,0
";

    pub fn migration() -> Dataset {
        Dataset::from_reader(MIGRATION_CSV.as_bytes()).expect("fixture loads")
    }
}
