use crate::error::{DashError, Result};

fn symbol_value(c: char) -> Option<u32> {
    match c {
        'I' => Some(1),
        'V' => Some(5),
        'X' => Some(10),
        'L' => Some(50),
        'C' => Some(100),
        'D' => Some(500),
        'M' => Some(1000),
        _ => None,
    }
}

/// Decode a roman numeral into its integer value.
///
/// Scans right to left: a symbol smaller than the one to its right is
/// subtracted, anything else is added. Only used as a sort key, so malformed
/// numerals built from valid symbols ("IIII", "VX") are not rejected; their
/// value is whatever that rule produces and should not be relied upon.
/// Empty input or a symbol outside `IVXLCDM` is an error.
pub fn decode_roman(numeral: &str) -> Result<u32> {
    if numeral.is_empty() {
        return Err(DashError::InvalidNumeral {
            numeral: numeral.to_string(),
        });
    }

    let mut total: i64 = 0;
    let mut prev = 0u32;
    for c in numeral.chars().rev() {
        let value = symbol_value(c).ok_or_else(|| DashError::InvalidNumeral {
            numeral: numeral.to_string(),
        })?;
        if value < prev {
            total -= i64::from(value);
        } else {
            total += i64::from(value);
        }
        prev = value;
    }

    Ok(total.max(0) as u32)
}
