//! CSS import: reads custom properties back into a [`Theme`].
//!
//! This is the inverse of [`crate::export::to_css`]. Declarations are read
//! from the light and dark selector blocks wherever they sit, including
//! inside at-rules such as `@layer base { ... }`.

use crate::color::ColorValue;
use crate::error::ThemeError;
use crate::export::ExportOptions;
use crate::names::token_name;
use crate::theme::Theme;
use crate::token::ColorToken;
use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, StyleSheetParser,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Light,
    Dark,
}

/// At-rules whose block holds more rules rather than declarations.
const GROUPING_AT_RULES: &[&str] = &["layer", "media", "supports", "container", "scope"];

/// Parses a stylesheet into a theme.
///
/// Custom properties whose value reads as a color become tokens of the
/// matching variant; other light-block properties become attributes.
/// Everything outside the two selectors is ignored. Tokenizing follows CSS
/// syntax, so comments, quoted strings and `url(...)` are handled the way a
/// browser handles them, and a block left open at end of input is closed.
/// A rule with no block (a stray `}`, a dangling selector) is
/// `ThemeError::InvalidDocument`.
pub fn parse_css(css: &str, options: &ExportOptions) -> Result<Theme, ThemeError> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut collector = RuleCollector {
        options,
        theme: Theme::default(),
        invalid: None,
    };
    let invalid = collect_rules(&mut parser, &mut collector);
    if let Some(message) = invalid.or(collector.invalid) {
        return Err(ThemeError::InvalidDocument(message));
    }

    let theme = collector.theme;
    debug!(
        light = theme.light.len(),
        dark = theme.dark.len(),
        attributes = theme.attributes.len(),
        "imported css"
    );
    Ok(theme)
}

/// Runs a list of rules through `collector`, returning the first broken rule.
fn collect_rules(input: &mut Parser<'_, '_>, collector: &mut RuleCollector<'_>) -> Option<String> {
    let mut invalid = None;
    for result in StyleSheetParser::new(input, collector) {
        if let Err((error, rule)) = result {
            invalid.get_or_insert_with(|| {
                format!(
                    "invalid rule {:?} at line {}, column {}",
                    rule.trim(),
                    error.location.line + 1,
                    error.location.column
                )
            });
        }
    }
    invalid
}

/// Consumes every remaining token of a (possibly nested) parser.
fn skip_rest(input: &mut Parser<'_, '_>) {
    while input.next().is_ok() {}
}

/// Consumes the remaining tokens and returns their source text, trimmed.
fn rest_as_text<'i>(input: &mut Parser<'i, '_>) -> &'i str {
    let start = input.position();
    skip_rest(input);
    input.slice_from(start).trim()
}

fn variant_of(selector: &str, options: &ExportOptions) -> Option<Variant> {
    let matches = |wanted: &str| selector.split(',').any(|s| s.trim() == wanted);
    if matches(&options.light_selector) {
        Some(Variant::Light)
    } else if matches(&options.dark_selector) {
        Some(Variant::Dark)
    } else {
        None
    }
}

/// Stylesheet-level parser: picks out the light and dark blocks.
struct RuleCollector<'a> {
    options: &'a ExportOptions,
    theme: Theme,
    invalid: Option<String>,
}

impl<'i> QualifiedRuleParser<'i> for RuleCollector<'_> {
    type Prelude = Option<Variant>;
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Ok(variant_of(rest_as_text(input), self.options))
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let Some(variant) = prelude else {
            skip_rest(input);
            return Ok(());
        };
        let mut declarations = DeclarationCollector {
            variant,
            theme: &mut self.theme,
        };
        for result in RuleBodyParser::new(input, &mut declarations) {
            if let Err((_, declaration)) = result {
                debug!(declaration, "skipped unparsable declaration");
            }
        }
        Ok(())
    }
}

impl<'i> AtRuleParser<'i> for RuleCollector<'_> {
    /// Whether the block holds nested rules worth descending into.
    type Prelude = bool;
    type AtRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        skip_rest(input);
        Ok(GROUPING_AT_RULES
            .iter()
            .any(|rule| name.eq_ignore_ascii_case(rule)))
    }

    fn rule_without_block(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        Ok(())
    }

    fn parse_block<'t>(
        &mut self,
        grouping: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        if grouping {
            if let Some(message) = collect_rules(input, self) {
                self.invalid.get_or_insert(message);
            }
        } else {
            skip_rest(input);
        }
        Ok(())
    }
}

/// Declaration-level parser for one light or dark block.
struct DeclarationCollector<'a> {
    variant: Variant,
    theme: &'a mut Theme,
}

impl<'i> DeclarationParser<'i> for DeclarationCollector<'_> {
    type Declaration = ();
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        declare(self.theme, self.variant, &name, rest_as_text(input));
        Ok(())
    }
}

impl<'i> AtRuleParser<'i> for DeclarationCollector<'_> {
    type Prelude = ();
    type AtRule = ();
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for DeclarationCollector<'_> {
    type Prelude = ();
    type QualifiedRule = ();
    type Error = ();
}

impl<'i> RuleBodyItemParser<'i, (), ()> for DeclarationCollector<'_> {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}

fn declare(theme: &mut Theme, variant: Variant, property: &str, value: &str) {
    if !property.starts_with("--") || value.is_empty() {
        return;
    }

    // CSS hex colors always carry '#'; a bare `600` is a number, not a color.
    let parsed = if value.starts_with('#') || value.contains('(') {
        value.parse::<ColorValue>()
    } else {
        Err(ThemeError::MalformedInput(value.to_string()))
    };
    match parsed {
        Ok(color) => {
            let token = ColorToken::from_value(&token_name(property), color, None);
            match variant {
                Variant::Light => theme.light.insert(token),
                Variant::Dark => theme.dark.insert(token),
            };
        }
        Err(_) if variant == Variant::Light => theme.attributes.set(property, value),
        Err(_) => debug!(property, value, "skipped non-color dark property"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::OklchColor;
    use crate::export::to_css;

    const STYLESHEET: &str = "
@import url('https://fonts.example/poppins.css');

@layer base {
  :root {
    /* brand */
    --background: oklch(0.9399 0.0203 345.70);
    --primary: #D04F99;
    --sidebar-primary-foreground: rgb(255, 255, 255);
    --font-sans: Poppins, sans-serif;
    --font-weight: 600;
    --radius: 0.4rem
  }

  .dark {
    --background: oklch(0.2497 0.0305 234.16);
    --shadow-color: 0 0 0;
  }

  body {
    --ignored: #000000;
  }
}
";

    #[test]
    fn reads_tokens_and_attributes_from_nested_blocks() {
        let theme = parse_css(STYLESHEET, &ExportOptions::default()).unwrap();
        assert_eq!(
            theme.light.names().collect::<Vec<_>>(),
            ["background", "primary", "sidebarPrimaryForeground"]
        );
        assert_eq!(theme.light.get("primary").map(ColorToken::hex), Some("#D04F99"));
        assert_eq!(
            theme.light.get("background").map(ColorToken::oklch),
            Some(OklchColor::new(0.9399, 0.0203, 345.70))
        );
        assert_eq!(theme.dark.names().collect::<Vec<_>>(), ["background"]);
        assert_eq!(
            theme.attributes.iter().collect::<Vec<_>>(),
            [
                ("font-sans", "Poppins, sans-serif"),
                ("font-weight", "600"),
                ("radius", "0.4rem")
            ]
        );
        assert!(!theme.light.contains("ignored"));
    }

    #[test]
    fn css_export_reimports_to_identical_css() {
        let theme = parse_css(STYLESHEET, &ExportOptions::default()).unwrap();
        let css = to_css(&theme, &ExportOptions::default());
        let again = parse_css(&css, &ExportOptions::default()).unwrap();
        assert_eq!(to_css(&again, &ExportOptions::default()), css);
    }

    #[test]
    fn custom_selectors_are_honored() {
        let options = ExportOptions {
            light_selector: "[data-theme=light]".into(),
            dark_selector: "[data-theme=dark]".into(),
            indent: 2,
        };
        let css = "[data-theme=light] { --ring: #fff; } [data-theme=dark] { --ring: #000; }";
        let theme = parse_css(css, &options).unwrap();
        assert_eq!(theme.light.get("ring").map(ColorToken::hex), Some("#FFFFFF"));
        assert_eq!(theme.dark.get("ring").map(ColorToken::hex), Some("#000000"));
    }

    #[test]
    fn grouped_selector_matches() {
        let theme = parse_css(":root, .light { --ring: #fff; }", &ExportOptions::default()).unwrap();
        assert!(theme.light.contains("ring"));
    }

    #[test]
    fn quoted_values_keep_their_delimiters() {
        let css = r#":root { --font-sans: "Foo;Bar", sans-serif; --content: '{'; --ring: #fff; }"#;
        let theme = parse_css(css, &ExportOptions::default()).unwrap();
        assert_eq!(
            theme.attributes.iter().collect::<Vec<_>>(),
            [("font-sans", "\"Foo;Bar\", sans-serif"), ("content", "'{'")]
        );
        assert!(theme.light.contains("ring"));
    }

    #[test]
    fn url_values_are_not_comments() {
        let css = ":root { --bg-image: url(https://x.example/*.png); --ring: #000; }";
        let theme = parse_css(css, &ExportOptions::default()).unwrap();
        assert_eq!(
            theme.attributes.get("bg-image"),
            Some("url(https://x.example/*.png)")
        );
        assert_eq!(theme.light.get("ring").map(ColorToken::hex), Some("#000000"));
    }

    #[test]
    fn non_grouping_at_rules_are_skipped() {
        let css = "
@font-face { font-family: Poppins; src: url(poppins.woff2); }
@keyframes pulse { from { opacity: 0; } to { opacity: 1; } }
@media (prefers-color-scheme: dark) { .dark { --ring: #000; } }
:root { --ring: #fff; }
";
        let theme = parse_css(css, &ExportOptions::default()).unwrap();
        assert_eq!(theme.light.get("ring").map(ColorToken::hex), Some("#FFFFFF"));
        assert_eq!(theme.dark.get("ring").map(ColorToken::hex), Some("#000000"));
        assert!(theme.attributes.is_empty());
    }

    #[test]
    fn block_open_at_end_of_input_is_closed() {
        let theme = parse_css(":root { --ring: #fff; /* trailing", &ExportOptions::default()).unwrap();
        assert!(theme.light.contains("ring"));
    }

    #[test]
    fn rule_without_block_is_invalid() {
        for bad in [":root { --ring: #fff; } }", ":root { --ring: #fff; } body", "@layer base { } }"] {
            let err = parse_css(bad, &ExportOptions::default()).unwrap_err();
            assert!(matches!(err, ThemeError::InvalidDocument(_)), "{bad:?}: {err:?}");
        }
    }
}
