use serde::Serialize;

use super::ViewOptions;
use crate::error::{DashError, Result};
use crate::reshape::FilteredView;

const DEFAULT_ZOOM: u8 = 2;
const HEAT_RADIUS: u32 = 15;
const FRAME_WIDTH: u32 = 700;
const FRAME_HEIGHT: u32 = 400;
const EXPANDED_HEIGHT: u32 = 700;
/// Heat points generated between cancellation checks.
const HEAT_CHUNK: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub count: u32,
    pub popup: String,
}

/// A clustered marker layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerLayer {
    pub name: String,
    pub color: String,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradientStop {
    pub at: f64,
    pub color: String,
}

/// A density layer with one point per counted event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatLayer {
    pub name: String,
    pub radius: u32,
    pub gradient: Vec<GradientStop>,
    pub points: Vec<[f64; 2]>,
}

/// Rendered size; `width: None` means fill the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapFrame {
    pub width: Option<u32>,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    /// Mean position of the shown locations; `None` when nothing is shown.
    pub center: Option<[f64; 2]>,
    pub zoom: u8,
    pub birth_markers: Option<MarkerLayer>,
    pub death_markers: Option<MarkerLayer>,
    pub birth_heatmap: Option<HeatLayer>,
    pub death_heatmap: Option<HeatLayer>,
    pub frame: MapFrame,
}

#[derive(Clone, Copy)]
enum Event {
    Birth,
    Death,
}

impl Event {
    fn count(self, births: Option<u32>, deaths: Option<u32>) -> u32 {
        match self {
            Event::Birth => births.unwrap_or(0),
            Event::Death => deaths.unwrap_or(0),
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Event::Birth => "Births",
            Event::Death => "Deaths",
        }
    }
}

fn center(view: &FilteredView) -> Option<[f64; 2]> {
    if view.rows.is_empty() {
        return None;
    }
    let n = view.rows.len() as f64;
    let lat = view.rows.iter().map(|r| r.latitude).sum::<f64>() / n;
    let lon = view.rows.iter().map(|r| r.longitude).sum::<f64>() / n;
    Some([lat, lon])
}

fn marker_layer(view: &FilteredView, event: Event, color: &str) -> MarkerLayer {
    let markers = view
        .rows
        .iter()
        .filter_map(|r| {
            let count = event.count(r.births, r.deaths);
            (count > 0).then(|| Marker {
                location: r.location.clone(),
                latitude: r.latitude,
                longitude: r.longitude,
                count,
                popup: format!("Location: {}<br>{}: {}", r.location, event.noun(), count),
            })
        })
        .collect();
    MarkerLayer {
        name: event.noun().to_string(),
        color: color.to_string(),
        markers,
    }
}

fn heat_layer(
    view: &FilteredView,
    event: Event,
    gradient: [(f64, &str); 3],
    cancelled: &dyn Fn() -> bool,
) -> Result<HeatLayer> {
    let mut points = Vec::new();
    for r in &view.rows {
        let mut remaining = event.count(r.births, r.deaths) as usize;
        while remaining > 0 {
            if cancelled() {
                return Err(DashError::Cancelled);
            }
            let n = remaining.min(HEAT_CHUNK);
            points.extend(std::iter::repeat([r.latitude, r.longitude]).take(n));
            remaining -= n;
        }
    }
    Ok(HeatLayer {
        name: format!("{} Heatmap", event.noun()),
        radius: HEAT_RADIUS,
        gradient: gradient
            .iter()
            .map(|(at, color)| GradientStop {
                at: *at,
                color: color.to_string(),
            })
            .collect(),
        points,
    })
}

/// Build the map, giving up with [`DashError::Cancelled`] as soon as
/// `cancelled` returns true. Heatmaps are the only expensive layers, so the
/// check runs between chunks of heat points.
pub fn build_map(
    view: &FilteredView,
    options: &ViewOptions,
    cancelled: &dyn Fn() -> bool,
) -> Result<MapView> {
    let birth_heatmap = if options.show_birth_heatmap {
        Some(heat_layer(
            view,
            Event::Birth,
            [(0.4, "blue"), (0.6, "lime"), (1.0, "green")],
            cancelled,
        )?)
    } else {
        None
    };
    let death_heatmap = if options.show_death_heatmap {
        Some(heat_layer(
            view,
            Event::Death,
            [(0.4, "orange"), (0.6, "red"), (1.0, "darkred")],
            cancelled,
        )?)
    } else {
        None
    };

    Ok(MapView {
        center: center(view),
        zoom: DEFAULT_ZOOM,
        birth_markers: options
            .show_birth_markers
            .then(|| marker_layer(view, Event::Birth, "green")),
        death_markers: options
            .show_death_markers
            .then(|| marker_layer(view, Event::Death, "red")),
        birth_heatmap,
        death_heatmap,
        frame: if options.expand_map {
            MapFrame {
                width: None,
                height: EXPANDED_HEIGHT,
            }
        } else {
            MapFrame {
                width: Some(FRAME_WIDTH),
                height: FRAME_HEIGHT,
            }
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reshape::FilteredRow;

    fn row(location: &str, lat: f64, lon: f64, births: Option<u32>, deaths: Option<u32>) -> FilteredRow {
        FilteredRow {
            location: location.into(),
            latitude: lat,
            longitude: lon,
            births,
            deaths,
        }
    }

    fn sample() -> FilteredView {
        FilteredView {
            generation: "III".into(),
            rows: vec![
                row("Salem", 40.0, -70.0, Some(2), None),
                row("Ipswich", 42.0, -72.0, None, Some(1)),
            ],
        }
    }

    #[test]
    fn default_options_show_markers_only() {
        let map = build_map(&sample(), &ViewOptions::default(), &|| false).unwrap();
        assert_eq!(map.center, Some([41.0, -71.0]));

        let births = map.birth_markers.unwrap();
        assert_eq!(births.markers.len(), 1);
        assert_eq!(births.markers[0].popup, "Location: Salem<br>Births: 2");

        let deaths = map.death_markers.unwrap();
        assert_eq!(deaths.markers.len(), 1);
        assert_eq!(deaths.markers[0].location, "Ipswich");

        assert!(map.birth_heatmap.is_none());
        assert!(map.death_heatmap.is_none());
        assert_eq!(map.frame.width, Some(700));
    }

    #[test]
    fn heatmap_repeats_point_per_event() {
        let options = ViewOptions {
            show_birth_markers: false,
            show_death_markers: false,
            show_birth_heatmap: true,
            show_death_heatmap: true,
            expand_map: true,
        };
        let map = build_map(&sample(), &options, &|| false).unwrap();
        assert!(map.birth_markers.is_none());
        assert_eq!(map.birth_heatmap.unwrap().points, vec![[40.0, -70.0]; 2]);
        let deaths = map.death_heatmap.unwrap();
        assert_eq!(deaths.points, vec![[42.0, -72.0]]);
        assert_eq!(deaths.gradient[2].color, "darkred");
        assert_eq!(map.frame, MapFrame { width: None, height: 700 });
    }

    #[test]
    fn empty_view_has_no_center() {
        let view = FilteredView {
            generation: "I".into(),
            rows: vec![],
        };
        assert_eq!(
            build_map(&view, &ViewOptions::default(), &|| false)
                .unwrap()
                .center,
            None
        );
    }

    #[test]
    fn heatmap_build_stops_when_cancelled() {
        let view = FilteredView {
            generation: "I".into(),
            rows: vec![row("Salem", 40.0, -70.0, Some(50_000_000), None)],
        };
        let options = ViewOptions {
            show_birth_heatmap: true,
            ..ViewOptions::default()
        };
        let checks = std::cell::Cell::new(0u32);
        let cancel_after_two = || {
            checks.set(checks.get() + 1);
            checks.get() > 2
        };

        let err = build_map(&view, &options, &cancel_after_two).unwrap_err();
        assert!(matches!(err, DashError::Cancelled));
        assert_eq!(checks.get(), 3);
    }
}
