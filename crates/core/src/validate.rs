//! Pure range predicates for gating raw user input.
//!
//! These never fail and never correct anything; they only answer whether a
//! value is already inside its documented range. Construction still accepts
//! out-of-range numbers and clamps them.

use crate::color::{HsvColor, OklchColor, RgbColor};

/// Largest chroma an OKLCh picker exposes.
pub const MAX_CHROMA: f64 = 0.4;

/// True for `#RGB` or `#RRGGBB` (the `#` is optional, any case).
///
/// Whitespace is not trimmed; `" #fff"` is invalid.
pub fn is_valid_hex(hex: &str) -> bool {
    RgbColor::from_hex(hex).is_ok()
}

/// True if every channel is an integer in [0, 255].
pub fn is_valid_rgb(r: i64, g: i64, b: i64) -> bool {
    [r, g, b].iter().all(|c| (0..=255).contains(c))
}

/// True if hue is in [0, 360) and saturation and value are in [0, 100].
pub fn is_valid_hsv(hsv: &HsvColor) -> bool {
    (0.0..360.0).contains(&hsv.h) && (0.0..=100.0).contains(&hsv.s) && (0.0..=100.0).contains(&hsv.v)
}

/// True if lightness is in [0, 1], chroma in [0, `MAX_CHROMA`], and hue in [0, 360).
pub fn is_valid_oklch(oklch: &OklchColor) -> bool {
    (0.0..=1.0).contains(&oklch.l)
        && (0.0..=MAX_CHROMA).contains(&oklch.c)
        && (0.0..360.0).contains(&oklch.h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_validation_matches_parser() {
        assert!(is_valid_hex("#D04F99"));
        assert!(is_valid_hex("d04f99"));
        assert!(is_valid_hex("#fff"));
        assert!(!is_valid_hex("#ffff"));
        assert!(!is_valid_hex("#zzzzzz"));
        assert!(!is_valid_hex(""));
        assert!(!is_valid_hex(" #fff "));
    }

    #[test]
    fn rgb_validation_checks_each_channel() {
        assert!(is_valid_rgb(0, 128, 255));
        assert!(!is_valid_rgb(256, 0, 0));
        assert!(!is_valid_rgb(0, -1, 0));
    }

    #[test]
    fn hsv_validation_excludes_full_turn() {
        assert!(is_valid_hsv(&HsvColor::new(359.9, 100.0, 0.0)));
        assert!(!is_valid_hsv(&HsvColor::new(360.0, 50.0, 50.0)));
        assert!(!is_valid_hsv(&HsvColor::new(10.0, 100.5, 50.0)));
        assert!(!is_valid_hsv(&HsvColor::new(f64::NAN, 50.0, 50.0)));
    }

    #[test]
    fn oklch_validation_checks_ranges() {
        assert!(is_valid_oklch(&OklchColor::new(0.618, 0.183, 340.247)));
        assert!(is_valid_oklch(&OklchColor::new(1.0, 0.4, 0.0)));
        assert!(!is_valid_oklch(&OklchColor::new(1.01, 0.1, 0.0)));
        assert!(!is_valid_oklch(&OklchColor::new(0.5, -0.01, 0.0)));
        assert!(!is_valid_oklch(&OklchColor::new(0.5, 0.41, 0.0)));
        assert!(!is_valid_oklch(&OklchColor::new(0.5, 0.1, 360.0)));
        assert!(!is_valid_oklch(&OklchColor::new(f64::INFINITY, 0.1, 0.0)));
    }
}
