#![deny(unsafe_code)]
//! Color token engine for the chroma-tokens theme editor.
//!
//! Provides the OKLCh-anchored color codec (`OklchColor`, `RgbColor`,
//! `HsvColor`, hex), the `ColorToken` value type that keeps all five
//! representations in sync, WCAG contrast analysis, ordered token
//! collections, and deterministic CSS / Tailwind / JSON export with a
//! matching CSS import.

pub mod color;
pub mod contrast;
pub mod error;
pub mod export;
pub mod import;
pub mod names;
pub mod theme;
pub mod token;
pub mod tokens;
pub mod validate;

pub use color::{ColorValue, HsvColor, OklchColor, RgbColor};
pub use contrast::{ContrastGrade, ContrastPair, ContrastReport};
pub use error::ThemeError;
pub use export::{ExportBundle, ExportOptions};
pub use theme::{Theme, ThemeAttributes};
pub use token::ColorToken;
pub use tokens::TokenSet;
