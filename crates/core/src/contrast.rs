//! WCAG relative luminance, contrast ratio, and letter grades.
//!
//! Luminance is computed from the unquantized OKLCh→sRGB path, so two tokens
//! that share a hex code but differ slightly in OKLCh can still differ in
//! contrast.

use crate::color::{linear_to_unit_srgb, oklch_to_linear, OklchColor};
use crate::token::ColorToken;
use crate::tokens::TokenSet;
use serde::Serialize;
use std::fmt;

/// Minimum ratio for AAA on normal text.
pub const AAA_NORMAL: f64 = 7.0;
/// Minimum ratio for AA on normal text.
pub const AA_NORMAL: f64 = 4.5;
/// Minimum ratio for AAA on large text.
pub const AAA_LARGE: f64 = 4.5;
/// Minimum ratio for AA on large text.
pub const AA_LARGE: f64 = 3.0;

/// Surface/foreground token pairs checked by [`audit`].
pub const STANDARD_PAIRS: &[(&str, &str)] = &[
    ("background", "foreground"),
    ("card", "cardForeground"),
    ("popover", "popoverForeground"),
    ("primary", "primaryForeground"),
    ("secondary", "secondaryForeground"),
    ("muted", "mutedForeground"),
    ("accent", "accentForeground"),
    ("destructive", "destructiveForeground"),
    ("sidebar", "sidebarForeground"),
    ("sidebarPrimary", "sidebarPrimaryForeground"),
    ("sidebarAccent", "sidebarAccentForeground"),
];

/// WCAG conformance grade, ordered `Fail < AA < AAA`.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ContrastGrade {
    Fail,
    AA,
    AAA,
}

impl ContrastGrade {
    pub fn as_str(self) -> &'static str {
        match self {
            ContrastGrade::Fail => "Fail",
            ContrastGrade::AA => "AA",
            ContrastGrade::AAA => "AAA",
        }
    }
}

impl fmt::Display for ContrastGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delinearizes one gamma-encoded channel with the WCAG 2 threshold.
fn wcag_channel(c: f64) -> f64 {
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG relative luminance of an OKLCh color, in [0, 1].
pub fn relative_luminance(color: OklchColor) -> f64 {
    let [r, g, b] = linear_to_unit_srgb(oklch_to_linear(color));
    0.2126 * wcag_channel(r) + 0.7152 * wcag_channel(g) + 0.0722 * wcag_channel(b)
}

/// Contrast ratio between two colors, in [1, 21]. Symmetric in its arguments.
pub fn contrast_ratio(a: OklchColor, b: OklchColor) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    (la.max(lb) + 0.05) / (la.min(lb) + 0.05)
}

/// Grade for normal-size text: 7 for AAA, 4.5 for AA.
pub fn contrast_grade(ratio: f64) -> ContrastGrade {
    grade(ratio, AAA_NORMAL, AA_NORMAL)
}

/// Grade for large text: 4.5 for AAA, 3 for AA.
pub fn large_text_grade(ratio: f64) -> ContrastGrade {
    grade(ratio, AAA_LARGE, AA_LARGE)
}

fn grade(ratio: f64, aaa: f64, aa: f64) -> ContrastGrade {
    if ratio >= aaa {
        ContrastGrade::AAA
    } else if ratio >= aa {
        ContrastGrade::AA
    } else {
        ContrastGrade::Fail
    }
}

/// A background and a foreground token under evaluation.
#[derive(Debug, Clone, Copy)]
pub struct ContrastPair<'a> {
    pub background: &'a ColorToken,
    pub foreground: &'a ColorToken,
}

/// Outcome of evaluating a [`ContrastPair`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastReport {
    pub background: String,
    pub foreground: String,
    pub ratio: f64,
    pub grade: ContrastGrade,
    pub large_text_grade: ContrastGrade,
}

impl<'a> ContrastPair<'a> {
    pub fn new(background: &'a ColorToken, foreground: &'a ColorToken) -> Self {
        Self {
            background,
            foreground,
        }
    }

    pub fn ratio(&self) -> f64 {
        contrast_ratio(self.background.oklch(), self.foreground.oklch())
    }

    pub fn report(&self) -> ContrastReport {
        let ratio = self.ratio();
        ContrastReport {
            background: self.background.name().to_string(),
            foreground: self.foreground.name().to_string(),
            ratio,
            grade: contrast_grade(ratio),
            large_text_grade: large_text_grade(ratio),
        }
    }
}

/// Evaluates every standard surface/foreground pair present in `tokens`.
///
/// Pairs where either side is missing are skipped.
pub fn audit(tokens: &TokenSet) -> Vec<ContrastReport> {
    STANDARD_PAIRS
        .iter()
        .filter_map(|&(bg, fg)| Some(ContrastPair::new(tokens.get(bg)?, tokens.get(fg)?).report()))
        .collect()
}
