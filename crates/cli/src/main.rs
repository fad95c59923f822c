#![deny(unsafe_code)]
//! CLI binary for the chroma-tokens theme engine.
//!
//! Subcommands:
//! - `convert <color>`: build a token from any color string, print every representation
//! - `contrast <bg> <fg>`: WCAG contrast ratio and grades
//! - `export <theme>`: render a theme as CSS, Tailwind config, or JSON
//! - `audit <theme>`: contrast reports for the standard token pairs
//! - `tokens`: print the known token names and their CSS properties

mod error;

use chroma_tokens_core::contrast::{audit, ContrastPair};
use chroma_tokens_core::names::TOKEN_PROPERTIES;
use chroma_tokens_core::{export, import, ColorToken, ExportOptions, Theme};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use error::CliError;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chroma-tokens", about = "Color token conversion, contrast, and theme export")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a token from a color and print all representations.
    Convert {
        /// Color as hex, rgb(...), hsv(...), or oklch(...).
        color: String,

        /// Token name.
        #[arg(long, default_value = "color")]
        name: String,
    },
    /// Compute the WCAG contrast ratio between two colors.
    Contrast {
        /// Background color.
        background: String,

        /// Foreground color.
        foreground: String,
    },
    /// Export a theme (.json document or .css stylesheet).
    Export {
        /// Theme file path.
        theme: PathBuf,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = Format::Css)]
        format: Format,

        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export options as a JSON file.
        #[arg(long)]
        options: Option<PathBuf>,
    },
    /// Check contrast of the standard surface/foreground pairs.
    Audit {
        /// Theme file path.
        theme: PathBuf,
    },
    /// List known token names and their CSS custom properties.
    Tokens,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum Format {
    Css,
    Config,
    Json,
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_options(path: Option<&Path>) -> Result<ExportOptions, CliError> {
    let Some(path) = path else {
        return Ok(ExportOptions::default());
    };
    let text = read_file(path)?;
    serde_json::from_str(&text).map_err(|source| CliError::Options {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a theme, choosing the parser by file extension.
fn load_theme(path: &Path, options: &ExportOptions) -> Result<Theme, CliError> {
    let text = read_file(path)?;
    let is_css = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("css"));
    let theme = if is_css {
        import::parse_css(&text, options)
    } else {
        Theme::from_json(&text)
    }
    .map_err(|source| CliError::Theme {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        light = theme.light.len(),
        dark = theme.dark.len(),
        "loaded theme"
    );
    Ok(theme)
}

fn parse_color(name: &str, text: &str) -> Result<ColorToken, CliError> {
    ColorToken::parse(name, text, None).map_err(|source| CliError::Color {
        role: name.to_string(),
        text: text.to_string(),
        source,
    })
}

/// Runs a command and returns the text destined for stdout.
fn execute(command: Command, json: bool) -> Result<String, CliError> {
    let mut out = String::new();
    match command {
        Command::Convert { color, name } => {
            let token = parse_color(&name, &color)?;
            if json {
                out = serde_json::to_string_pretty(&token)?;
            } else {
                let _ = writeln!(out, "name:   {}", token.name());
                let _ = writeln!(out, "hex:    {}", token.hex());
                let _ = writeln!(out, "rgb:    {}", token.rgb());
                let _ = writeln!(out, "hsv:    {}", token.hsv());
                let _ = write!(out, "oklch:  {}", token.oklch_display());
            }
        }
        Command::Contrast {
            background,
            foreground,
        } => {
            let bg = parse_color("background", &background)?;
            let fg = parse_color("foreground", &foreground)?;
            let report = ContrastPair::new(&bg, &fg).report();
            if json {
                out = serde_json::to_string_pretty(&report)?;
            } else {
                let _ = write!(
                    out,
                    "{} on {}: {:.2}:1  normal {}  large {}",
                    fg.hex(),
                    bg.hex(),
                    report.ratio,
                    report.grade,
                    report.large_text_grade
                );
            }
        }
        Command::Export {
            theme,
            format,
            output,
            options,
        } => {
            let options = load_options(options.as_deref())?;
            let theme = load_theme(&theme, &options)?;
            let rendered = match format {
                Format::Css => export::to_css(&theme, &options),
                Format::Config => export::to_tailwind_config(&theme, &options),
                Format::Json => export::to_json(&theme, &options)?,
            };
            match output {
                Some(path) => {
                    fs::write(&path, &rendered).map_err(|source| CliError::Io {
                        path: path.clone(),
                        source,
                    })?;
                    info!(path = %path.display(), bytes = rendered.len(), "wrote export");
                    if json {
                        let info = serde_json::json!({
                            "output": path.display().to_string(),
                            "format": format!("{format:?}").to_lowercase(),
                            "bytes": rendered.len(),
                        });
                        out = serde_json::to_string_pretty(&info)?;
                    }
                }
                None => out = rendered.trim_end().to_string(),
            }
        }
        Command::Audit { theme } => {
            let theme = load_theme(&theme, &ExportOptions::default())?;
            let light = audit(&theme.light);
            let dark = audit(&theme.dark);
            if json {
                let info = serde_json::json!({ "light": light, "dark": dark });
                out = serde_json::to_string_pretty(&info)?;
            } else {
                for (variant, reports) in [("light", &light), ("dark", &dark)] {
                    for r in reports {
                        let _ = writeln!(
                            out,
                            "{variant:<5}  {:<34} {:>6.2}  {:<4}  large {}",
                            format!("{}/{}", r.background, r.foreground),
                            r.ratio,
                            r.grade,
                            r.large_text_grade
                        );
                    }
                }
                out.truncate(out.trim_end().len());
            }
        }
        Command::Tokens => {
            if json {
                let list: Vec<_> = TOKEN_PROPERTIES
                    .iter()
                    .map(|&(token, property)| {
                        serde_json::json!({ "token": token, "property": format!("--{property}") })
                    })
                    .collect();
                out = serde_json::to_string_pretty(&list)?;
            } else {
                for &(token, property) in TOKEN_PROPERTIES {
                    let _ = writeln!(out, "{token:<26} --{property}");
                }
                out.truncate(out.trim_end().len());
            }
        }
    }
    Ok(out)
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let json_mode = cli.json;
    match execute(cli.command, json_mode) {
        Ok(out) => {
            if !out.is_empty() {
                println!("{out}");
            }
        }
        Err(e) => {
            if json_mode {
                let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
                eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
            } else {
                eprintln!("error: {e}");
            }
            process::exit(e.exit_code());
        }
    }
}
