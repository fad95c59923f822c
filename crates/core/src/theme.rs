//! A complete theme: light and dark token sets plus pass-through attributes.

use crate::error::ThemeError;
use crate::tokens::TokenSet;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Light and dark color variants of a theme, with the non-color attributes
/// (fonts, radius, spacing, shadows) carried along uninterpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub light: TokenSet,
    #[serde(default)]
    pub dark: TokenSet,
    #[serde(default, skip_serializing_if = "ThemeAttributes::is_empty")]
    pub attributes: ThemeAttributes,
}

impl Theme {
    /// Parses a theme document.
    ///
    /// Token entries may be color strings (`"#D04F99"`, `"oklch(...)"`) or
    /// full token records as written by the JSON export. A missing `dark`
    /// variant is empty; a missing `light` variant is an error.
    pub fn from_json(text: &str) -> Result<Theme, ThemeError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Ordered `(property, value)` pairs emitted verbatim as custom properties.
///
/// Property names are stored without the leading `--`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeAttributes {
    entries: Vec<(String, String)>,
}

impl ThemeAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property, replacing an earlier value in place.
    pub fn set(&mut self, property: &str, value: &str) {
        let property = property.strip_prefix("--").unwrap_or(property);
        match self.entries.iter_mut().find(|(p, _)| p == property) {
            Some((_, v)) => value.clone_into(v),
            None => self.entries.push((property.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        let property = property.strip_prefix("--").unwrap_or(property);
        self.entries
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }
}

impl Serialize for ThemeAttributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (property, value) in &self.entries {
            map.serialize_entry(property, value)?;
        }
        map.end()
    }
}

struct AttributesVisitor;

impl<'de> Visitor<'de> for AttributesVisitor {
    type Value = ThemeAttributes;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from property name to string value")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ThemeAttributes, A::Error> {
        let mut attributes = ThemeAttributes::new();
        while let Some((property, value)) = access.next_entry::<String, String>()? {
            attributes.set(&property, &value);
        }
        Ok(attributes)
    }
}

impl<'de> Deserialize<'de> for ThemeAttributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AttributesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::ColorToken;

    const DOCUMENT: &str = r##"{
        "name": "Bubblegum",
        "light": {
            "background": "#F6E6EE",
            "primary": "oklch(0.6209 0.1801 348.1385)"
        },
        "dark": {
            "background": "#12242E"
        },
        "attributes": {
            "font-sans": "Poppins, sans-serif",
            "--radius": "0.4rem"
        }
    }"##;

    #[test]
    fn parses_document_in_order() {
        let theme = Theme::from_json(DOCUMENT).unwrap();
        assert_eq!(theme.name.as_deref(), Some("Bubblegum"));
        assert_eq!(theme.light.names().collect::<Vec<_>>(), ["background", "primary"]);
        assert_eq!(theme.light.get("primary").map(ColorToken::hex), Some("#D04F99"));
        assert_eq!(theme.dark.len(), 1);
        assert_eq!(
            theme.attributes.iter().collect::<Vec<_>>(),
            [("font-sans", "Poppins, sans-serif"), ("radius", "0.4rem")]
        );
    }

    #[test]
    fn missing_dark_is_empty() {
        let theme = Theme::from_json(r##"{"light": {"primary": "#D04F99"}}"##).unwrap();
        assert!(theme.dark.is_empty());
        assert!(theme.attributes.is_empty());
    }

    #[test]
    fn missing_light_is_invalid_document() {
        let err = Theme::from_json(r##"{"dark": {}}"##).unwrap_err();
        assert!(matches!(err, ThemeError::InvalidDocument(_)), "got {err:?}");
    }

    #[test]
    fn malformed_color_is_invalid_document() {
        let err = Theme::from_json(r##"{"light": {"primary": "#1234"}}"##).unwrap_err();
        assert!(matches!(err, ThemeError::InvalidDocument(_)), "got {err:?}");
    }

    #[test]
    fn non_string_attribute_is_rejected() {
        assert!(Theme::from_json(r#"{"light": {}, "attributes": {"radius": 4}}"#).is_err());
    }

    #[test]
    fn attributes_replace_in_place() {
        let mut attrs = ThemeAttributes::new();
        attrs.set("radius", "0.5rem");
        attrs.set("font-sans", "Inter");
        attrs.set("--radius", "1rem");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("--radius"), Some("1rem"));
        assert_eq!(attrs.iter().next(), Some(("radius", "1rem")));
    }

    #[test]
    fn json_round_trip_is_lossless() {
        let theme = Theme::from_json(DOCUMENT).unwrap();
        let json = serde_json::to_string(&theme).unwrap();
        assert_eq!(Theme::from_json(&json).unwrap(), theme);
    }
}
