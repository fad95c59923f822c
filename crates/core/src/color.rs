//! Color types and conversion functions for the token codec.
//!
//! OKLCh is the single source of truth. Every other representation (8-bit
//! sRGB, HSV, hex) is derived from it through the OKLab matrix transform and
//! sRGB gamma encoding. All conversions are pure functions over `Copy` values
//! and use `f64` throughout for precision.
//!
//! Out-of-range numeric input is silently corrected (clamped or wrapped) and
//! reported as a `tracing` debug event. Only text that cannot be read as the
//! claimed representation is an error.

use crate::error::ThemeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Chroma below this is treated as achromatic: hue is undefined there, so it
/// is pinned to zero along with the chroma itself.
const ACHROMATIC_CHROMA: f64 = 1e-6;

/// OKLCh color: lightness in [0, 1], chroma >= 0 (about 0.4 at most for
/// displayable colors), hue in degrees in [0, 360).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OklchColor {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

/// 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSV color: hue in degrees in [0, 360), saturation and value in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HsvColor {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

/// Linear RGB color (gamma-decoded), components nominally in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LinearRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// OKLab perceptual color space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct OkLab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl OklchColor {
    pub const fn new(l: f64, c: f64, h: f64) -> Self {
        Self { l, c, h }
    }

    /// Clamps lightness to [0, 1], floors chroma at 0, and wraps hue into
    /// [0, 360). Corrections are logged, never rejected.
    #[must_use]
    pub fn normalized(self) -> Self {
        let l = positive_zero(self.l.clamp(0.0, 1.0));
        let c = positive_zero(self.c.max(0.0));
        let h = wrap_hue(self.h);
        if l != self.l || c != self.c || h != self.h {
            debug!(
                l_in = self.l,
                c_in = self.c,
                h_in = self.h,
                l,
                c,
                h,
                "corrected out-of-range oklch input"
            );
        }
        Self { l, c, h }
    }
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from wide integer channels, clamping each to [0, 255].
    pub fn from_clamped(r: i64, g: i64, b: i64) -> Self {
        let clamp = |v: i64| -> u8 {
            let clamped = v.clamp(0, 255);
            if clamped != v {
                debug!(from = v, to = clamped, "clamped out-of-range rgb channel");
            }
            clamped as u8
        };
        Self {
            r: clamp(r),
            g: clamp(g),
            b: clamp(b),
        }
    }

    /// Parses a hex color string like "#d04f99", "D04F99", or "#fff".
    ///
    /// Three-digit shorthand expands each digit (`#abc` is `#AABBCC`).
    /// Returns `ThemeError::MalformedInput` for any other length or for
    /// non-hex characters, surrounding whitespace included.
    pub fn from_hex(hex: &str) -> Result<RgbColor, ThemeError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if let Some(bad) = digits.chars().find(|ch| !ch.is_ascii_hexdigit()) {
            return Err(ThemeError::MalformedInput(format!(
                "invalid hex digit {bad:?} in {hex:?}"
            )));
        }
        let nibble = |i: usize| -> u8 {
            // Only ASCII hex digits remain, so every byte is a valid digit.
            match digits.as_bytes()[i] {
                d @ b'0'..=b'9' => d - b'0',
                d @ b'a'..=b'f' => d - b'a' + 10,
                d => d - b'A' + 10,
            }
        };
        match digits.len() {
            3 => Ok(RgbColor {
                r: nibble(0) * 17,
                g: nibble(1) * 17,
                b: nibble(2) * 17,
            }),
            6 => Ok(RgbColor {
                r: nibble(0) << 4 | nibble(1),
                g: nibble(2) << 4 | nibble(3),
                b: nibble(4) << 4 | nibble(5),
            }),
            n => Err(ThemeError::MalformedInput(format!(
                "expected 3 or 6 hex digits, got {n}"
            ))),
        }
    }

    /// Converts the color to a canonical hex string like `"#D04F99"`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl HsvColor {
    pub const fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }

    /// Wraps hue into [0, 360) and clamps saturation and value to [0, 100].
    #[must_use]
    pub fn normalized(self) -> Self {
        let h = wrap_hue(self.h);
        let s = positive_zero(self.s.clamp(0.0, 100.0));
        let v = positive_zero(self.v.clamp(0.0, 100.0));
        if h != self.h || s != self.s || v != self.v {
            debug!(
                h_in = self.h,
                s_in = self.s,
                v_in = self.v,
                h,
                s,
                v,
                "corrected out-of-range hsv input"
            );
        }
        Self { h, s, v }
    }
}

// -- Display --

impl fmt::Display for OklchColor {
    /// Formats as `oklch(L C H)` with lightness and chroma to four decimal
    /// places and hue to two.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // A hue that rounds up to 360.00 is the same angle as 0.00.
        let h = if (self.h * 100.0).round() >= 36_000.0 {
            0.0
        } else {
            self.h
        };
        write!(
            f,
            "oklch({:.4} {:.4} {:.2})",
            positive_zero(self.l),
            positive_zero(self.c),
            positive_zero(h)
        )
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl fmt::Display for HsvColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsv({:.2}, {:.2}%, {:.2}%)", self.h, self.s, self.v)
    }
}

// -- Parsing --

/// Splits `name(a, b, c)` or `name(a b c)` into its arguments.
///
/// Returns `None` when the text is not a call to `name`.
fn function_args<'a>(text: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let text = text.trim();
    let open = text.find('(')?;
    if !text[..open].trim().eq_ignore_ascii_case(name) {
        return None;
    }
    let inner = text[open + 1..].strip_suffix(')')?;
    Some(
        inner
            .split(|ch: char| ch == ',' || ch.is_whitespace())
            .filter(|arg| !arg.is_empty())
            .collect(),
    )
}

fn expect_args<'a>(text: &'a str, name: &str) -> Result<[&'a str; 3], ThemeError> {
    let args = function_args(text, name)
        .ok_or_else(|| ThemeError::MalformedInput(format!("expected {name}(...), got {text:?}")))?;
    <[&str; 3]>::try_from(args.as_slice()).map_err(|_| {
        ThemeError::MalformedInput(format!(
            "{name}() takes 3 components, got {} in {text:?}",
            args.len()
        ))
    })
}

fn parse_number(arg: &str, what: &str) -> Result<f64, ThemeError> {
    match arg.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ThemeError::MalformedInput(format!(
            "invalid {what} component {arg:?}"
        ))),
    }
}

/// Parses a number that may carry a `%` suffix, scaling percentages by `percent_scale`.
fn parse_scaled(arg: &str, what: &str, percent_scale: f64) -> Result<f64, ThemeError> {
    match arg.strip_suffix('%') {
        Some(pct) => Ok(parse_number(pct, what)? / 100.0 * percent_scale),
        None => parse_number(arg, what),
    }
}

impl FromStr for OklchColor {
    type Err = ThemeError;

    /// Parses `oklch(L C H)`. Lightness may be a percentage, chroma may be
    /// a percentage of 0.4, and hue may carry a `deg` suffix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [l, c, h] = expect_args(s, "oklch")?;
        Ok(OklchColor {
            l: parse_scaled(l, "lightness", 1.0)?,
            c: parse_scaled(c, "chroma", 0.4)?,
            h: parse_number(h.strip_suffix("deg").unwrap_or(h), "hue")?,
        })
    }
}

impl FromStr for RgbColor {
    type Err = ThemeError;

    /// Parses `rgb(R, G, B)` with integer channels, clamping each to [0, 255].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [r, g, b] = expect_args(s, "rgb")?;
        let channel = |arg: &str| {
            arg.parse::<i64>().map_err(|_| {
                ThemeError::MalformedInput(format!("invalid rgb channel {arg:?}"))
            })
        };
        Ok(RgbColor::from_clamped(channel(r)?, channel(g)?, channel(b)?))
    }
}

impl FromStr for HsvColor {
    type Err = ThemeError;

    /// Parses `hsv(H, S%, V%)`; the percent signs are optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [h, sat, val] = expect_args(s, "hsv")?;
        Ok(HsvColor {
            h: parse_number(h.strip_suffix("deg").unwrap_or(h), "hue")?,
            s: parse_number(sat.strip_suffix('%').unwrap_or(sat), "saturation")?,
            v: parse_number(val.strip_suffix('%').unwrap_or(val), "value")?,
        })
    }
}

/// A color given in any accepted textual representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorValue {
    Hex(RgbColor),
    Rgb(RgbColor),
    Hsv(HsvColor),
    Oklch(OklchColor),
}

impl ColorValue {
    /// Converts the value to (unnormalized) OKLCh.
    pub fn to_oklch(self) -> OklchColor {
        match self {
            ColorValue::Hex(rgb) | ColorValue::Rgb(rgb) => rgb_to_oklch(rgb),
            ColorValue::Hsv(hsv) => rgb_to_oklch(hsv_to_rgb(hsv.normalized())),
            ColorValue::Oklch(oklch) => oklch,
        }
    }
}

impl FromStr for ColorValue {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let head = text
            .split('(')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match (text.contains('('), head.as_str()) {
            (true, "oklch") => text.parse().map(ColorValue::Oklch),
            (true, "rgb") => text.parse().map(ColorValue::Rgb),
            (true, "hsv") => text.parse().map(ColorValue::Hsv),
            (true, other) => Err(ThemeError::MalformedInput(format!(
                "unsupported color function {other:?}"
            ))),
            (false, _) => RgbColor::from_hex(text).map(ColorValue::Hex),
        }
    }
}

// -- Scalar helpers --

/// Wraps a hue angle into [0, 360).
pub(crate) fn wrap_hue(h: f64) -> f64 {
    let wrapped = h.rem_euclid(360.0);
    // rem_euclid rounds tiny negative angles up to exactly 360.
    positive_zero(if wrapped >= 360.0 { 0.0 } else { wrapped })
}

/// Replaces negative zero with positive zero so it never prints as "-0".
fn positive_zero(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

/// Quantizes a [0, 1] channel to 8 bits with rounding and clamping.
fn quantize(c: f64) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Applies inverse sRGB gamma to convert a single sRGB component to linear.
fn srgb_component_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Applies sRGB gamma to convert a single linear component to sRGB.
fn linear_component_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

// -- OKLab pipeline --

/// Converts linear RGB to OKLab via the OKLab matrix transform.
pub(crate) fn linear_to_oklab(c: LinearRgb) -> OkLab {
    let l_ = 0.4122214708 * c.r + 0.5363325363 * c.g + 0.0514459929 * c.b;
    let m_ = 0.2119034982 * c.r + 0.6806995451 * c.g + 0.1073969566 * c.b;
    let s_ = 0.0883024619 * c.r + 0.2817188376 * c.g + 0.6299787005 * c.b;

    let l_c = l_.cbrt();
    let m_c = m_.cbrt();
    let s_c = s_.cbrt();

    OkLab {
        l: 0.2104542553 * l_c + 0.7936177850 * m_c - 0.0040720468 * s_c,
        a: 1.9779984951 * l_c - 2.4285922050 * m_c + 0.4505937099 * s_c,
        b: 0.0259040371 * l_c + 0.7827717662 * m_c - 0.8086757660 * s_c,
    }
}

/// Converts OKLab to linear RGB via the inverse OKLab matrix transform.
pub(crate) fn oklab_to_linear(c: OkLab) -> LinearRgb {
    let l_ = c.l + 0.3963377774 * c.a + 0.2158037573 * c.b;
    let m_ = c.l - 0.1055613458 * c.a - 0.0638541728 * c.b;
    let s_ = c.l - 0.0894841775 * c.a - 1.2914855480 * c.b;

    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;

    LinearRgb {
        r: 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s,
        g: -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s,
        b: -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s,
    }
}

/// Converts OKLab to OKLCh (cylindrical form).
///
/// Achromatic guard: chroma below `ACHROMATIC_CHROMA` yields `c = 0, h = 0`
/// instead of the noise `atan2` would return for near-zero a/b.
pub(crate) fn oklab_to_oklch(c: OkLab) -> OklchColor {
    let ch = (c.a * c.a + c.b * c.b).sqrt();
    if ch < ACHROMATIC_CHROMA {
        return OklchColor {
            l: c.l,
            c: 0.0,
            h: 0.0,
        };
    }
    OklchColor {
        l: c.l,
        c: ch,
        h: wrap_hue(c.b.atan2(c.a).to_degrees()),
    }
}

/// Converts OKLCh to OKLab.
pub(crate) fn oklch_to_oklab(c: OklchColor) -> OkLab {
    let h_rad = c.h.to_radians();
    OkLab {
        l: c.l,
        a: c.c * h_rad.cos(),
        b: c.c * h_rad.sin(),
    }
}

/// OKLCh to linear RGB, before gamma encoding and quantization.
pub(crate) fn oklch_to_linear(c: OklchColor) -> LinearRgb {
    oklab_to_linear(oklch_to_oklab(c))
}

/// Gamma-encodes linear RGB to normalized sRGB, clamped to [0, 1].
pub(crate) fn linear_to_unit_srgb(c: LinearRgb) -> [f64; 3] {
    [c.r, c.g, c.b].map(|v| linear_component_to_srgb(v).clamp(0.0, 1.0))
}

// -- Public conversions --

/// OKLCh to 8-bit sRGB: OKLab, linear RGB, gamma, then round and clamp.
pub fn oklch_to_rgb(c: OklchColor) -> RgbColor {
    let [r, g, b] = linear_to_unit_srgb(oklch_to_linear(c));
    RgbColor {
        r: quantize(r),
        g: quantize(g),
        b: quantize(b),
    }
}

/// 8-bit sRGB to OKLCh: inverse gamma, OKLab matrix, then polar form.
pub fn rgb_to_oklch(c: RgbColor) -> OklchColor {
    let linear = LinearRgb {
        r: srgb_component_to_linear(f64::from(c.r) / 255.0),
        g: srgb_component_to_linear(f64::from(c.g) / 255.0),
        b: srgb_component_to_linear(f64::from(c.b) / 255.0),
    };
    oklab_to_oklch(linear_to_oklab(linear))
}

/// 8-bit sRGB to HSV using the max/min/delta formula.
pub fn rgb_to_hsv(c: RgbColor) -> HsvColor {
    let max = c.r.max(c.g).max(c.b);
    let min = c.r.min(c.g).min(c.b);
    let delta = f64::from(max - min);
    let (r, g, b) = (f64::from(c.r), f64::from(c.g), f64::from(c.b));

    let h = if max == min {
        0.0
    } else if max == c.r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == c.g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let s = if max == 0 {
        0.0
    } else {
        delta / f64::from(max) * 100.0
    };
    let v = f64::from(max) / 255.0 * 100.0;

    HsvColor {
        h: wrap_hue(h),
        s,
        v,
    }
}

/// HSV to 8-bit sRGB. Exact inverse of [`rgb_to_hsv`] for 8-bit inputs.
pub fn hsv_to_rgb(c: HsvColor) -> RgbColor {
    let s = c.s / 100.0;
    let v = c.v / 100.0;
    let chroma = v * s;
    let sector = wrap_hue(c.h) / 60.0;
    let x = chroma * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match sector as u8 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = v - chroma;
    RgbColor {
        r: quantize(r + m),
        g: quantize(g + m),
        b: quantize(b + m),
    }
}

/// Parses a hex string into 8-bit sRGB.
pub fn hex_to_rgb(hex: &str) -> Result<RgbColor, ThemeError> {
    RgbColor::from_hex(hex)
}

/// Formats 8-bit sRGB as `#RRGGBB`.
pub fn rgb_to_hex(c: RgbColor) -> String {
    c.to_hex()
}

/// Canonicalizes a hex string: adds `#`, uppercases, expands shorthand.
pub fn normalize_hex(hex: &str) -> Result<String, ThemeError> {
    RgbColor::from_hex(hex).map(RgbColor::to_hex)
}

/// Formats OKLCh with the fixed display precision, e.g. `oklch(0.6209 0.1801 348.14)`.
pub fn format_oklch(c: OklchColor) -> String {
    c.to_string()
}
