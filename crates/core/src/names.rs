//! Token name to CSS custom property mapping.
//!
//! The known theme tokens have a fixed property name each. Any other name
//! falls back to a mechanical camelCase→kebab-case mapping, so every token
//! name maps to exactly one property.

use std::borrow::Cow;

/// Known theme tokens and their CSS custom property names (without `--`).
pub const TOKEN_PROPERTIES: &[(&str, &str)] = &[
    ("background", "background"),
    ("foreground", "foreground"),
    ("card", "card"),
    ("cardForeground", "card-foreground"),
    ("popover", "popover"),
    ("popoverForeground", "popover-foreground"),
    ("primary", "primary"),
    ("primaryForeground", "primary-foreground"),
    ("secondary", "secondary"),
    ("secondaryForeground", "secondary-foreground"),
    ("muted", "muted"),
    ("mutedForeground", "muted-foreground"),
    ("accent", "accent"),
    ("accentForeground", "accent-foreground"),
    ("destructive", "destructive"),
    ("destructiveForeground", "destructive-foreground"),
    ("border", "border"),
    ("input", "input"),
    ("ring", "ring"),
    ("chart1", "chart-1"),
    ("chart2", "chart-2"),
    ("chart3", "chart-3"),
    ("chart4", "chart-4"),
    ("chart5", "chart-5"),
    ("sidebar", "sidebar"),
    ("sidebarForeground", "sidebar-foreground"),
    ("sidebarPrimary", "sidebar-primary"),
    ("sidebarPrimaryForeground", "sidebar-primary-foreground"),
    ("sidebarAccent", "sidebar-accent"),
    ("sidebarAccentForeground", "sidebar-accent-foreground"),
    ("sidebarBorder", "sidebar-border"),
    ("sidebarRing", "sidebar-ring"),
];

/// True if `name` is one of the known theme tokens.
pub fn is_known_token(name: &str) -> bool {
    TOKEN_PROPERTIES.iter().any(|&(token, _)| token == name)
}

/// CSS custom property name (without `--`) for a token name.
pub fn css_property(name: &str) -> Cow<'static, str> {
    match TOKEN_PROPERTIES.iter().find(|&&(token, _)| token == name) {
        Some(&(_, property)) => Cow::Borrowed(property),
        None => Cow::Owned(kebab_case(name)),
    }
}

/// Token name for a CSS custom property; a leading `--` is ignored.
pub fn token_name(property: &str) -> Cow<'static, str> {
    let property = property.strip_prefix("--").unwrap_or(property);
    match TOKEN_PROPERTIES.iter().find(|&&(_, prop)| prop == property) {
        Some(&(token, _)) => Cow::Borrowed(token),
        None => Cow::Owned(camel_case(property)),
    }
}

/// `sidebarPrimaryForeground` → `sidebar-primary-foreground`, `chart1` → `chart-1`.
fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_digit = false;
    for (i, ch) in name.chars().enumerate() {
        let digit = ch.is_ascii_digit();
        if i > 0 && (ch.is_uppercase() || (digit && !prev_digit)) {
            out.push('-');
        }
        out.extend(ch.to_lowercase());
        prev_digit = digit;
    }
    out
}

/// `card-foreground` → `cardForeground`, `chart-1` → `chart1`.
fn camel_case(property: &str) -> String {
    let mut out = String::with_capacity(property.len());
    for (i, part) in property.split('-').filter(|p| !p.is_empty()).enumerate() {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                out.push(first);
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }
    out
}
