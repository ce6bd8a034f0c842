use tracing::warn;

/// Upper-case the first letter of every word and lower-case the rest.
///
/// A "word" starts after any non-letter, so "o'brien" becomes "O'Brien" and
/// "st. louis" becomes "St. Louis".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Whether a location name marks the aggregate totals row.
pub fn is_totals_name(location: &str) -> bool {
    location.to_lowercase().contains("total")
}

/// Trim whitespace and strip outer quotes if present.
fn clean_str(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].trim()
    } else {
        trimmed
    }
}

/// Parse a latitude/longitude cell; empty or non-numeric cells are absent.
pub fn parse_coordinate(raw: &str) -> Option<f64> {
    let s = clean_str(raw);
    if s.is_empty() {
        return None;
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            warn!(value = s, "unparseable coordinate, treating as missing");
            None
        }
    }
}

/// Parse a birth/death count cell.
///
/// Spreadsheet exports often write counts as floats ("3.0"), so any finite
/// non-negative number is accepted and rounded. Empty cells are absent;
/// anything else is logged and treated as absent.
pub fn parse_count(raw: &str) -> Option<u32> {
    let s = clean_str(raw);
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return None;
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v <= f64::from(u32::MAX) => Some(v.round() as u32),
        _ => {
            warn!(value = s, "invalid count, treating as missing");
            None
        }
    }
}
