// src/views/mod.rs

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::dataset::Dataset;
use crate::error::{DashError, Result};
use crate::reshape::{filter_generation, long_form, totals_series, FilteredView};

pub mod charts;
pub mod map;
pub mod table;

pub use charts::{BarDatum, Bubble, DonutSlice, LinePoint, SunburstNode, TimelineFrame};
pub use map::{MapView, MarkerLayer};
pub use table::{DetailsTable, TableRow};

/// Display toggles. They only decide which layers are emitted; nothing is
/// validated or stored beyond the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    pub show_birth_markers: bool,
    pub show_death_markers: bool,
    pub show_birth_heatmap: bool,
    pub show_death_heatmap: bool,
    pub expand_map: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_birth_markers: true,
            show_death_markers: true,
            show_birth_heatmap: false,
            show_death_heatmap: false,
            expand_map: false,
        }
    }
}

/// Everything a user can change between redraws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub generation: String,
    #[serde(default)]
    pub options: ViewOptions,
}

impl Selection {
    pub fn new(generation: impl Into<String>) -> Self {
        Self {
            generation: generation.into(),
            options: ViewOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ViewOptions) -> Self {
        self.options = options;
        self
    }
}

/// Every chart payload for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub generation: String,
    pub generations: Vec<String>,
    pub options: ViewOptions,
    pub filtered: FilteredView,
    pub map: MapView,
    pub bar: Vec<BarDatum>,
    pub table: DetailsTable,
    pub timeline: Vec<TimelineFrame>,
    pub line: Vec<LinePoint>,
    pub donut: Vec<DonutSlice>,
    pub sunburst: Vec<SunburstNode>,
    pub bubble: Vec<Bubble>,
}

impl DashboardView {
    /// Run the full reshape pipeline for `selection`.
    pub fn build(dataset: &Dataset, selection: &Selection) -> Result<Self> {
        Self::build_until(dataset, selection, &|| false)
    }

    /// Like [`build`](Self::build), but returns [`DashError::Cancelled`] once
    /// `cancelled` reports true. Checked between payloads and inside the
    /// heatmap layers.
    #[instrument(level = "debug", skip(dataset, cancelled), fields(generation = %selection.generation))]
    pub fn build_until(
        dataset: &Dataset,
        selection: &Selection,
        cancelled: &dyn Fn() -> bool,
    ) -> Result<Self> {
        let check = || {
            if cancelled() {
                Err(DashError::Cancelled)
            } else {
                Ok(())
            }
        };

        let filtered = filter_generation(dataset, &selection.generation)?;
        let map = map::build_map(&filtered, &selection.options, cancelled)?;
        check()?;
        let entries = long_form(dataset);
        check()?;
        let series = totals_series(dataset);
        let timeline = charts::timeline(dataset.schema(), &entries);
        check()?;
        let sunburst = charts::sunburst_chart(dataset.schema(), &entries);
        check()?;

        Ok(Self {
            generation: filtered.generation.clone(),
            generations: dataset.generations(),
            options: selection.options,
            map,
            bar: charts::bar_chart(&filtered),
            table: DetailsTable::build(&filtered),
            timeline,
            line: charts::line_chart(&series),
            donut: charts::donut_chart(&filtered),
            sunburst,
            bubble: charts::bubble_chart(&filtered),
            filtered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures;

    #[test]
    fn builds_every_payload() {
        let ds = fixtures::migration();
        let view = DashboardView::build(&ds, &Selection::new("II")).unwrap();

        assert_eq!(view.generation, "II");
        assert_eq!(view.generations, vec!["II", "I"]);
        assert_eq!(view.filtered.rows.len(), 1);
        assert_eq!(view.table.rows.len(), 2);
        assert_eq!(view.timeline.len(), 2);
        assert_eq!(view.line.len(), 2);
        assert!(view.map.birth_markers.is_some());
        assert!(view.map.birth_heatmap.is_none());
    }

    #[test]
    fn unknown_generation_is_rejected() {
        let ds = fixtures::migration();
        let err = DashboardView::build(&ds, &Selection::new("VII")).unwrap_err();
        assert!(matches!(err, DashError::UnknownGeneration { .. }));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let opts: ViewOptions = serde_yaml::from_str("show_birth_heatmap: true").unwrap();
        assert!(opts.show_birth_heatmap);
        assert!(opts.show_birth_markers);
        assert!(!opts.expand_map);
    }

    #[test]
    fn build_gives_up_when_cancelled() {
        let ds = fixtures::migration();
        let err = DashboardView::build_until(&ds, &Selection::new("I"), &|| true).unwrap_err();
        assert!(matches!(err, DashError::Cancelled));
    }
}
