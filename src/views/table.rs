use serde::Serialize;

use crate::reshape::FilteredView;

pub const TOTAL_LABEL: &str = "Total";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub location: String,
    pub births: u64,
    pub deaths: u64,
}

/// Per-location detail rows for one generation, with a computed totals row
/// appended last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailsTable {
    pub rows: Vec<TableRow>,
}

impl DetailsTable {
    pub fn build(view: &FilteredView) -> Self {
        let mut rows: Vec<TableRow> = view
            .rows
            .iter()
            .map(|r| TableRow {
                location: r.location.clone(),
                births: u64::from(r.births.unwrap_or(0)),
                deaths: u64::from(r.deaths.unwrap_or(0)),
            })
            .collect();

        let births = rows.iter().map(|r| r.births).sum();
        let deaths = rows.iter().map(|r| r.deaths).sum();
        rows.push(TableRow {
            location: TOTAL_LABEL.to_string(),
            births,
            deaths,
        });
        Self { rows }
    }

    /// The appended totals row.
    pub fn total(&self) -> Option<&TableRow> {
        self.rows.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reshape::FilteredRow;

    #[test]
    fn appends_arithmetic_total() {
        let view = FilteredView {
            generation: "IV".into(),
            rows: vec![
                FilteredRow {
                    location: "Salem".into(),
                    latitude: 0.0,
                    longitude: 0.0,
                    births: Some(3),
                    deaths: None,
                },
                FilteredRow {
                    location: "Wenham".into(),
                    latitude: 0.0,
                    longitude: 0.0,
                    births: Some(2),
                    deaths: Some(4),
                },
            ],
        };
        let table = DetailsTable::build(&view);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].deaths, 0);
        assert_eq!(
            table.total(),
            Some(&TableRow {
                location: "Total".into(),
                births: 5,
                deaths: 4,
            })
        );
    }
}
