use serde::Serialize;

use crate::dataset::GenerationSchema;
use crate::reshape::{FilteredView, GenerationTotal, LongFormEntry};

/// One bar of the grouped births/deaths chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarDatum {
    pub location: String,
    /// "Births" or "Deaths".
    pub series: String,
    pub count: Option<u32>,
}

/// Melt each row into a births bar and a deaths bar.
pub fn bar_chart(view: &FilteredView) -> Vec<BarDatum> {
    let births = view.rows.iter().map(|r| BarDatum {
        location: r.location.clone(),
        series: "Births".into(),
        count: r.births,
    });
    let deaths = view.rows.iter().map(|r| BarDatum {
        location: r.location.clone(),
        series: "Deaths".into(),
        count: r.deaths,
    });
    births.chain(deaths).collect()
}

/// All locations for one generation; one animation step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineFrame {
    pub generation: String,
    pub points: Vec<LongFormEntry>,
}

/// Group the long form into frames, one per generation in schema order.
pub fn timeline(schema: &GenerationSchema, entries: &[LongFormEntry]) -> Vec<TimelineFrame> {
    schema
        .labels()
        .map(|label| TimelineFrame {
            generation: label.to_string(),
            points: entries
                .iter()
                .filter(|e| e.generation == label)
                .cloned()
                .collect(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinePoint {
    pub generation: String,
    pub births: u32,
    pub deaths: u32,
}

pub fn line_chart(series: &[GenerationTotal]) -> Vec<LinePoint> {
    series
        .iter()
        .map(|t| LinePoint {
            generation: t.generation.clone(),
            births: t.births.unwrap_or(0),
            deaths: t.deaths.unwrap_or(0),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DonutSlice {
    pub location: String,
    pub births: u32,
}

/// Share of births by location. Locations with no births get no slice.
pub fn donut_chart(view: &FilteredView) -> Vec<DonutSlice> {
    view.rows
        .iter()
        .filter_map(|r| {
            let births = r.births.unwrap_or(0);
            (births > 0).then(|| DonutSlice {
                location: r.location.clone(),
                births,
            })
        })
        .collect()
}

/// Flat node list of the generation → location hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SunburstNode {
    pub id: String,
    pub label: String,
    /// Empty for generation nodes.
    pub parent: String,
    pub value: u64,
}

pub fn sunburst_chart(schema: &GenerationSchema, entries: &[LongFormEntry]) -> Vec<SunburstNode> {
    let mut nodes = Vec::new();
    for label in schema.labels() {
        let children: Vec<SunburstNode> = entries
            .iter()
            .filter(|e| e.generation == label && e.births > 0)
            .map(|e| SunburstNode {
                id: format!("{}/{}", label, e.location),
                label: e.location.clone(),
                parent: label.to_string(),
                value: u64::from(e.births),
            })
            .collect();
        nodes.push(SunburstNode {
            id: label.to_string(),
            label: label.to_string(),
            parent: String::new(),
            value: children.iter().map(|c| c.value).sum(),
        });
        nodes.extend(children);
    }
    nodes
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bubble {
    pub location: String,
    pub births: u32,
    pub deaths: u32,
}

pub fn bubble_chart(view: &FilteredView) -> Vec<Bubble> {
    view.rows
        .iter()
        .map(|r| Bubble {
            location: r.location.clone(),
            births: r.births.unwrap_or(0),
            deaths: r.deaths.unwrap_or(0),
        })
        .collect()
}
