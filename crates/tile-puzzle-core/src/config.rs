//! Attribute converters: validation and defaults for the component
//! configuration surface.
//!
//! Invalid values are silently replaced by defaults rather than surfaced as
//! errors; a bad attribute must never break the puzzle.

/// Default number of pieces when the attribute is missing or invalid.
pub const DEFAULT_PIECE_COUNT: u32 = 16;

/// Smallest accepted piece count.
pub const MIN_PIECE_COUNT: u32 = 4;

/// Largest accepted piece count.
pub const MAX_PIECE_COUNT: u32 = 64;

/// Default tile border color when the attribute can't be resolved as a
/// display color.
pub const DEFAULT_BORDER_COLOR: &str = "white";

/// Parse the desired-piece-count attribute.
///
/// Accepts integers in `[MIN_PIECE_COUNT, MAX_PIECE_COUNT]`; anything else
/// (non-numeric, out of range) falls back to [`DEFAULT_PIECE_COUNT`].
pub fn convert_piece_count(value: &str) -> u32 {
    match value.trim().parse::<i64>() {
        Ok(n) if (MIN_PIECE_COUNT as i64..=MAX_PIECE_COUNT as i64).contains(&n) => n as u32,
        _ => DEFAULT_PIECE_COUNT,
    }
}

/// Parse the image-source attribute.
///
/// The value is trimmed; empty or whitespace-only means "no source set",
/// which is a distinct display state rather than an error.
pub fn convert_src(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_count_in_range() {
        assert_eq!(convert_piece_count("16"), 16);
        assert_eq!(convert_piece_count("4"), 4);
        assert_eq!(convert_piece_count("64"), 64);
        assert_eq!(convert_piece_count(" 25 "), 25);
    }

    #[test]
    fn test_piece_count_below_minimum_uses_default() {
        assert_eq!(convert_piece_count("3"), DEFAULT_PIECE_COUNT);
        assert_eq!(convert_piece_count("0"), DEFAULT_PIECE_COUNT);
        assert_eq!(convert_piece_count("-5"), DEFAULT_PIECE_COUNT);
    }

    #[test]
    fn test_piece_count_above_maximum_uses_default() {
        assert_eq!(convert_piece_count("65"), DEFAULT_PIECE_COUNT);
        assert_eq!(convert_piece_count("1000"), DEFAULT_PIECE_COUNT);
    }

    #[test]
    fn test_piece_count_non_numeric_uses_default() {
        assert_eq!(convert_piece_count(""), DEFAULT_PIECE_COUNT);
        assert_eq!(convert_piece_count("lots"), DEFAULT_PIECE_COUNT);
        assert_eq!(convert_piece_count("1.5"), DEFAULT_PIECE_COUNT);
    }

    #[test]
    fn test_rejected_piece_count_still_yields_a_grid() {
        // Downstream scenario: "3" is substituted by the default before the
        // grid is computed.
        let pieces = convert_piece_count("3");
        let grid = crate::compute_grid(400.0, 300.0, pieces);
        assert_eq!(grid.piece_count(), 16);
    }

    #[test]
    fn test_src_trims_and_drops_empty() {
        assert_eq!(convert_src("  img.png  "), Some("img.png".to_string()));
        assert_eq!(convert_src(""), None);
        assert_eq!(convert_src("   \t "), None);
    }
}
