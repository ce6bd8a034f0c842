use serde::Serialize;

use super::schema::GenerationColumns;

/// Birth and death counts of one row for one generation.
///
/// Counts stay `None` when the source cell was empty; they are zero-filled
/// only where arithmetic needs them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub born: Option<u32>,
    pub died: Option<u32>,
}

impl Counts {
    /// At least one birth or death.
    pub fn is_active(&self) -> bool {
        self.born.unwrap_or(0) > 0 || self.died.unwrap_or(0) > 0
    }
}

/// One normalized source row with coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Title-cased location name.
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    /// One entry per generation, in schema order.
    pub(crate) counts: Vec<Counts>,
    /// Set on the row chosen as the [`TotalsRecord`].
    pub(crate) is_totals: bool,
}

impl Record {
    pub fn counts(&self, generation: &GenerationColumns) -> Counts {
        self.counts
            .get(generation.position)
            .copied()
            .unwrap_or_default()
    }

    /// Whether this row is the aggregate totals row, which per-location
    /// views must skip. Only the first row matching "total" is; later
    /// matches such as a "Subtotal" row are ordinary locations.
    pub fn is_totals(&self) -> bool {
        self.is_totals
    }
}

/// The aggregate row holding per-generation sums across all locations.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalsRecord {
    pub location: String,
    pub(crate) counts: Vec<Counts>,
}

impl TotalsRecord {
    pub fn counts(&self, generation: &GenerationColumns) -> Counts {
        self.counts
            .get(generation.position)
            .copied()
            .unwrap_or_default()
    }
}
