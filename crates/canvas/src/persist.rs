//! The persisted position attribute.
//!
//! An entity's last commanded coordinate is stored on its surface as the
//! data attribute [`POSITION_KEY`], holding a two-element array such as
//! `[120, 45]`. Whole numbers are written without a fractional part.

use crate::{Error, Result};
use surface::Coordinate;

/// Dataset key of the persisted position.
pub const POSITION_KEY: &str = "elastibox_position";

pub fn encode_position(position: Coordinate) -> String {
    format!(
        "[{}, {}]",
        format_number(position.x()),
        format_number(position.y())
    )
}

pub fn decode_position(text: &str) -> Result<Coordinate> {
    let [x, y]: [f64; 2] =
        serde_json::from_str(text).map_err(|source| Error::MalformedPosition {
            text: text.to_string(),
            source,
        })?;
    Ok(Coordinate::new(x, y))
}

/// Format a number the way the persisted text expects: shortest form,
/// integers without a trailing `.0`.
pub(crate) fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Leading integer of a legacy pixel value such as `"45px"`.
pub(crate) fn parse_pixels(value: &str) -> Option<f64> {
    let value = value.trim_start();
    let end = value
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(value.len());
    value[..end].parse::<i64>().ok().map(|pixels| pixels as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_whole_numbers_without_fraction() {
        assert_eq!(encode_position(Coordinate::new(120.0, 45.0)), "[120, 45]");
        assert_eq!(encode_position(Coordinate::new(-3.0, 0.0)), "[-3, 0]");
    }

    #[test]
    fn encodes_fractions_in_shortest_form() {
        assert_eq!(encode_position(Coordinate::new(0.5, 12.25)), "[0.5, 12.25]");
    }

    #[test]
    fn decodes_persisted_text() {
        assert_eq!(decode_position("[7, 9]").unwrap(), Coordinate::new(7.0, 9.0));
        assert_eq!(
            decode_position("[1.5,-2]").unwrap(),
            Coordinate::new(1.5, -2.0)
        );
    }

    #[test]
    fn fractional_positions_round_trip_exactly() {
        for text in [
            "[523.3333333333334, 16777217]",
            "[0.30000000000000004, -1234.5678901234]",
        ] {
            assert_eq!(encode_position(decode_position(text).unwrap()), text);
        }
    }

    #[test]
    fn rejects_malformed_text() {
        for text in ["", "[7]", "[7, 9, 11]", "{\"x\": 1}", "[a, b]", "7, 9"] {
            assert!(
                matches!(decode_position(text), Err(Error::MalformedPosition { .. })),
                "{text:?} should not decode"
            );
        }
    }

    #[test]
    fn parses_legacy_pixels() {
        assert_eq!(parse_pixels("45px"), Some(45.0));
        assert_eq!(parse_pixels("-12px"), Some(-12.0));
        assert_eq!(parse_pixels("12.7px"), Some(12.0));
        assert_eq!(parse_pixels(" 8"), Some(8.0));
        assert_eq!(parse_pixels("auto"), None);
        assert_eq!(parse_pixels(""), None);
    }
}
