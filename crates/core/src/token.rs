//! Color tokens: one named color with all five representations kept in sync.
//!
//! A [`ColorToken`] stores OKLCh as its source of truth and re-derives the
//! hex, RGB, HSV, and display fields from it whenever it is built. Tokens are
//! immutable values; every `with_*` update returns a new token that keeps the
//! name, description, and link metadata of the old one.

use crate::color::{
    hsv_to_rgb, oklch_to_rgb, rgb_to_hsv, rgb_to_oklch, ColorValue, HsvColor, OklchColor,
    RgbColor,
};
use crate::error::ThemeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::trace;

/// A named theme color with every representation derived from `oklch`.
///
/// Serializes with camelCase keys (`oklchDisplay`, `linkedTo`, ...). On
/// deserialization only `oklch` and the metadata are read; the derived fields
/// are recomputed, so a hand-edited `hex` in a document can never disagree
/// with `oklch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "TokenRecord")]
pub struct ColorToken {
    name: String,
    oklch: OklchColor,
    hex: String,
    oklch_display: String,
    rgb: RgbColor,
    hsv: HsvColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    linked_to: Option<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    linked_from: BTreeSet<String>,
}

/// The persisted subset of a token; everything else is derived.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenRecord {
    #[serde(default)]
    name: String,
    oklch: OklchColor,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    linked_to: Option<String>,
    #[serde(default)]
    linked_from: BTreeSet<String>,
}

impl From<TokenRecord> for ColorToken {
    fn from(record: TokenRecord) -> Self {
        ColorToken::build(
            record.name,
            record.oklch,
            record.description,
            record.linked_to,
            record.linked_from,
        )
    }
}

impl ColorToken {
    /// Derives every field from `oklch` after clamping lightness to [0, 1],
    /// flooring chroma at 0, and wrapping hue into [0, 360).
    fn build(
        name: String,
        oklch: OklchColor,
        description: Option<String>,
        linked_to: Option<String>,
        linked_from: BTreeSet<String>,
    ) -> Self {
        let oklch = oklch.normalized();
        let rgb = oklch_to_rgb(oklch);
        let hsv = rgb_to_hsv(rgb);
        let hex = rgb.to_hex();
        let oklch_display = oklch.to_string();
        trace!(name = %name, hex = %hex, oklch = %oklch_display, "derived color token");
        Self {
            name,
            oklch,
            hex,
            oklch_display,
            rgb,
            hsv,
            description,
            linked_to,
            linked_from,
        }
    }

    /// Same metadata, new color.
    fn recolor(&self, oklch: OklchColor) -> Self {
        Self::build(
            self.name.clone(),
            oklch,
            self.description.clone(),
            self.linked_to.clone(),
            self.linked_from.clone(),
        )
    }

    // -- Construction --

    pub fn from_oklch(name: &str, oklch: OklchColor, description: Option<&str>) -> Self {
        Self::build(
            name.to_string(),
            oklch,
            description.map(String::from),
            None,
            BTreeSet::new(),
        )
    }

    /// Builds a token from a hex string (`#RRGGBB`, `RRGGBB`, or `#RGB`).
    ///
    /// Returns `ThemeError::MalformedInput` if the string is not valid hex.
    pub fn from_hex(name: &str, hex: &str, description: Option<&str>) -> Result<Self, ThemeError> {
        let rgb = RgbColor::from_hex(hex)?;
        Ok(Self::from_rgb(name, rgb, description))
    }

    pub fn from_rgb(name: &str, rgb: RgbColor, description: Option<&str>) -> Self {
        Self::from_oklch(name, rgb_to_oklch(rgb), description)
    }

    /// Builds a token from HSV. Hue is wrapped and saturation/value clamped
    /// before the HSV is quantized to 8-bit RGB.
    pub fn from_hsv(name: &str, hsv: HsvColor, description: Option<&str>) -> Self {
        Self::from_rgb(name, hsv_to_rgb(hsv.normalized()), description)
    }

    pub fn from_value(name: &str, value: ColorValue, description: Option<&str>) -> Self {
        match value {
            ColorValue::Hex(rgb) | ColorValue::Rgb(rgb) => Self::from_rgb(name, rgb, description),
            ColorValue::Hsv(hsv) => Self::from_hsv(name, hsv, description),
            ColorValue::Oklch(oklch) => Self::from_oklch(name, oklch, description),
        }
    }

    /// Parses any accepted color text (hex, `rgb()`, `hsv()`, `oklch()`) into a token.
    pub fn parse(name: &str, text: &str, description: Option<&str>) -> Result<Self, ThemeError> {
        let value: ColorValue = text.parse()?;
        Ok(Self::from_value(name, value, description))
    }

    // -- Updates --

    #[must_use]
    pub fn with_oklch(&self, oklch: OklchColor) -> Self {
        self.recolor(oklch)
    }

    /// Returns `ThemeError::MalformedInput` if the string is not valid hex;
    /// the original token is untouched either way.
    pub fn with_hex(&self, hex: &str) -> Result<Self, ThemeError> {
        let rgb = RgbColor::from_hex(hex)?;
        Ok(self.with_rgb(rgb))
    }

    #[must_use]
    pub fn with_rgb(&self, rgb: RgbColor) -> Self {
        self.recolor(rgb_to_oklch(rgb))
    }

    #[must_use]
    pub fn with_hsv(&self, hsv: HsvColor) -> Self {
        self.with_rgb(hsv_to_rgb(hsv.normalized()))
    }

    #[must_use]
    pub fn with_value(&self, value: ColorValue) -> Self {
        match value {
            ColorValue::Hex(rgb) | ColorValue::Rgb(rgb) => self.with_rgb(rgb),
            ColorValue::Hsv(hsv) => self.with_hsv(hsv),
            ColorValue::Oklch(oklch) => self.with_oklch(oklch),
        }
    }

    #[must_use]
    pub fn with_description(&self, description: Option<&str>) -> Self {
        Self {
            description: description.map(String::from),
            ..self.clone()
        }
    }

    // -- Accessors --

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn oklch(&self) -> OklchColor {
        self.oklch
    }

    /// Canonical `#RRGGBB` form.
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// `oklch(L C H)` with four decimals for L and C and two for H.
    pub fn oklch_display(&self) -> &str {
        &self.oklch_display
    }

    pub fn rgb(&self) -> RgbColor {
        self.rgb
    }

    pub fn hsv(&self) -> HsvColor {
        self.hsv
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Name of the token this one follows, if any.
    pub fn linked_to(&self) -> Option<&str> {
        self.linked_to.as_deref()
    }

    /// Names of the tokens that follow this one.
    pub fn linked_from(&self) -> &BTreeSet<String> {
        &self.linked_from
    }

    // -- Link metadata, maintained by `TokenSet` --

    pub(crate) fn set_name(&mut self, name: &str) {
        name.clone_into(&mut self.name);
    }

    pub(crate) fn set_linked_to(&mut self, target: Option<String>) {
        self.linked_to = target;
    }

    pub(crate) fn linked_from_mut(&mut self) -> &mut BTreeSet<String> {
        &mut self.linked_from
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{format_oklch, rgb_to_hex};

    const EPSILON: f64 = 0.01;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn assert_consistent(token: &ColorToken) {
        let rgb = oklch_to_rgb(token.oklch());
        assert_eq!(token.rgb(), rgb, "rgb drifted for {}", token.name());
        assert_eq!(token.hex(), rgb_to_hex(rgb), "hex drifted for {}", token.name());
        assert_eq!(token.hsv(), rgb_to_hsv(rgb), "hsv drifted for {}", token.name());
        assert_eq!(
            token.oklch_display(),
            format_oklch(token.oklch()),
            "display drifted for {}",
            token.name()
        );
    }

    // -- Construction --

    #[test]
    fn white_hex_has_full_lightness_and_no_chroma() {
        let white = ColorToken::from_hex("background", "#FFFFFF", None).unwrap();
        assert!(approx_eq(white.oklch().l, 1.0), "l: {}", white.oklch().l);
        assert!(approx_eq(white.oklch().c, 0.0), "c: {}", white.oklch().c);
        assert_eq!(white.oklch_display(), "oklch(1.0000 0.0000 0.00)");
        assert_consistent(&white);
    }

    #[test]
    fn black_hex_has_zero_lightness() {
        let black = ColorToken::from_hex("foreground", "#000000", None).unwrap();
        assert!(approx_eq(black.oklch().l, 0.0), "l: {}", black.oklch().l);
        assert_eq!(black.hex(), "#000000");
        assert_eq!(black.oklch_display(), "oklch(0.0000 0.0000 0.00)");
    }

    #[test]
    fn bubblegum_primary_matches_reference_hex() {
        let primary =
            ColorToken::from_oklch("primary", OklchColor::new(0.6180, 0.1830, 340.247), None);
        assert_eq!(primary.hex(), "#CA50A7");
        assert_eq!(primary.oklch_display(), "oklch(0.6180 0.1830 340.25)");
        assert_consistent(&primary);
    }

    #[test]
    fn hex_construction_derives_matching_rgb_and_display() {
        let token = ColorToken::from_hex("primary", "d04f99", Some("Brand pink")).unwrap();
        assert_eq!(token.hex(), "#D04F99");
        assert_eq!(token.rgb(), RgbColor::new(0xD0, 0x4F, 0x99));
        assert_eq!(token.oklch_display(), "oklch(0.6209 0.1801 348.14)");
        assert_eq!(token.description(), Some("Brand pink"));
        assert_consistent(&token);
    }

    #[test]
    fn malformed_hex_fails_construction() {
        let err = ColorToken::from_hex("primary", "#12345", None).unwrap_err();
        assert!(matches!(err, ThemeError::MalformedInput(_)));
    }

    #[test]
    fn out_of_range_oklch_is_clamped_not_rejected() {
        let token = ColorToken::from_oklch("ring", OklchColor::new(1.5, -0.3, 400.0), None);
        assert_eq!(token.oklch().l, 1.0);
        assert_eq!(token.oklch().c, 0.0);
        assert!(approx_eq(token.oklch().h, 40.0), "h: {}", token.oklch().h);
        assert_eq!(token.hex(), "#FFFFFF");
    }

    #[test]
    fn hsv_construction_quantizes_through_rgb() {
        let token = ColorToken::from_hsv("accent", HsvColor::new(120.0, 100.0, 100.0), None);
        assert_eq!(token.hex(), "#00FF00");
        assert_consistent(&token);
    }

    #[test]
    fn parse_accepts_every_representation() {
        for text in ["#00FF00", "rgb(0, 255, 0)", "hsv(120, 100%, 100%)"] {
            let token = ColorToken::parse("chart1", text, None).unwrap();
            assert_eq!(token.hex(), "#00FF00", "from {text}");
        }
        let token = ColorToken::parse("chart1", "oklch(0.6180 0.1830 340.247)", None).unwrap();
        assert_eq!(token.hex(), "#CA50A7");
    }

    // -- Updates --

    #[test]
    fn updates_replace_all_color_fields_and_keep_metadata() {
        let mut base = ColorToken::from_hex("primary", "#D04F99", Some("Brand")).unwrap();
        base.set_linked_to(Some("accent".into()));
        base.linked_from_mut().insert("ring".into());

        let updated = base.with_hex("#1E90FF").unwrap();
        assert_eq!(updated.hex(), "#1E90FF");
        assert_eq!(updated.name(), "primary");
        assert_eq!(updated.description(), Some("Brand"));
        assert_eq!(updated.linked_to(), Some("accent"));
        assert!(updated.linked_from().contains("ring"));
        assert_consistent(&updated);

        let via_rgb = base.with_rgb(RgbColor::new(30, 144, 255));
        assert_eq!(via_rgb, updated);

        let via_hsv = base.with_hsv(rgb_to_hsv(RgbColor::new(30, 144, 255)));
        assert_eq!(via_hsv, updated);

        let via_oklch = base.with_oklch(updated.oklch());
        assert_eq!(via_oklch, updated);
    }

    #[test]
    fn failed_update_leaves_original_untouched() {
        let base = ColorToken::from_hex("primary", "#D04F99", None).unwrap();
        let before = base.clone();
        assert!(base.with_hex("#GG0000").is_err());
        assert_eq!(base, before);
    }

    #[test]
    fn with_description_keeps_color() {
        let base = ColorToken::from_hex("muted", "#808080", None).unwrap();
        let described = base.with_description(Some("Quiet surfaces"));
        assert_eq!(described.hex(), base.hex());
        assert_eq!(described.description(), Some("Quiet surfaces"));
    }

    // -- Serde --

    #[test]
    fn serializes_all_representations_with_camel_case_keys() {
        let token = ColorToken::from_hex("primaryForeground", "#FFFFFF", None).unwrap();
        let v = serde_json::to_value(&token).unwrap();
        assert_eq!(v["name"], "primaryForeground");
        assert_eq!(v["hex"], "#FFFFFF");
        assert_eq!(v["oklchDisplay"], "oklch(1.0000 0.0000 0.00)");
        assert_eq!(v["rgb"], serde_json::json!({"r": 255, "g": 255, "b": 255}));
        assert!(v.get("hsv").is_some());
        assert!(v.get("oklch").is_some());
        assert!(v.get("description").is_none());
        assert!(v.get("linkedFrom").is_none());
    }

    #[test]
    fn deserializing_rederives_from_oklch() {
        let json = r##"{
            "name": "primary",
            "oklch": {"l": 0.618, "c": 0.183, "h": 340.247},
            "hex": "#000000",
            "linkedTo": "accent"
        }"##;
        let token: ColorToken = serde_json::from_str(json).unwrap();
        assert_eq!(token.hex(), "#CA50A7");
        assert_eq!(token.linked_to(), Some("accent"));
        assert_consistent(&token);
    }

    #[test]
    fn json_round_trip_is_lossless() {
        let token = ColorToken::from_hex("accent", "#80CED6", Some("Teal")).unwrap();
        let json = serde_json::to_string(&token).unwrap();
        let back: ColorToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }

    // -- Property-based tests --

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn oklch_construction_is_always_consistent(
                l in -0.5_f64..=1.5,
                c in -0.1_f64..=0.5,
                h in -720.0_f64..720.0,
            ) {
                let token = ColorToken::from_oklch("x", OklchColor { l, c, h }, None);
                let o = token.oklch();
                prop_assert!((0.0..=1.0).contains(&o.l));
                prop_assert!(o.c >= 0.0);
                prop_assert!((0.0..360.0).contains(&o.h));
                assert_consistent(&token);
            }

            #[test]
            fn rgb_construction_reproduces_input(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
                let rgb = RgbColor { r, g, b };
                let token = ColorToken::from_rgb("x", rgb, None);
                prop_assert_eq!(token.rgb(), rgb);
                assert_consistent(&token);
            }
        }
    }
}
