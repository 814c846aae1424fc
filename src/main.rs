use clap::{Parser, Subcommand};
use litebox::config::{self, PageConfig};
use litebox::geometry::{self, Offset, Size};
use litebox::host::headless::{HeadlessHost, HeadlessSession};
use litebox::host::{EventTarget, Key};
use litebox::options::{DeclaredOptions, LightboxConfig, OptionValue};
use litebox::output;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// The thumbnail being inspected or simulated.
#[derive(clap::Args, Clone)]
struct ThumbnailArgs {
    /// Natural image width in pixels
    #[arg(long)]
    width: u32,

    /// Natural image height in pixels
    #[arg(long)]
    height: u32,

    /// Declared scale, e.g. "0.5" or "50%"
    #[arg(long)]
    scale: Option<String>,

    /// Declared duration, e.g. "200ms" or ".2s"
    #[arg(long)]
    duration: Option<String>,

    /// Declared layout, e.g. "width: 100px; centerX: 0"
    #[arg(long)]
    layout: Option<String>,

    /// Viewport size as WIDTHxHEIGHT
    #[arg(long, default_value = "1024x768", value_parser = parse_viewport)]
    viewport: Size,

    /// Thumbnail page offset as TOP,LEFT
    #[arg(long, default_value = "0,0", value_parser = parse_offset)]
    offset: Offset,
}

impl ThumbnailArgs {
    fn natural(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn declared(&self) -> DeclaredOptions {
        [
            ("duration", &self.duration),
            ("scale", &self.scale),
            ("layout", &self.layout),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|v| (key.to_string(), OptionValue::Text(v.clone())))
        })
        .collect()
    }
}

#[derive(Parser)]
#[command(name = "litebox")]
#[command(about = "Inspect and simulate click-to-expand image lightboxes")]
#[command(long_about = "\
Inspect and simulate click-to-expand image lightboxes

A marked thumbnail expands into a popup centered in the viewport over a
dimming backdrop, and collapses back to its place when dismissed.

Per-element options (as an author would declare them):

  duration   \"200\", \"200ms\", \"2s\", \".2s\"         (default 500ms)
  scale      \"0.5\", \"50%\"                       (default 1.0)
  layout     \"width: 100px; height: 80px; centerX: 0; centerY: 0; left: 10px\"

Simulation steps (comma separated):

  click      click the thumbnail
  enter      press Enter on the thumbnail
  escape     press Escape anywhere
  backdrop   click the backdrop
  load       finish loading the image (with --lazy)
  wait:MS    let MS milliseconds pass

Set RUST_LOG=litebox=debug to trace phase transitions.
Run 'litebox gen-config' to generate a documented litebox.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing litebox.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the resolved config, computed styles, and animation frames
    Inspect {
        #[command(flatten)]
        thumbnail: ThumbnailArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run a scripted interaction against a headless page
    Simulate {
        #[command(flatten)]
        thumbnail: ThumbnailArgs,

        /// Comma-separated steps, e.g. "click,wait:250,escape,wait:600"
        #[arg(long, default_value = "click,wait:500,escape,wait:500")]
        steps: Steps,

        /// Start with the image still loading
        #[arg(long)]
        lazy: bool,
    },
    /// Print a stock litebox.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    configure_logging();
    let cli = Cli::parse();
    let page_config = match &cli.config {
        Some(dir) => config::load_config(dir)?,
        None => PageConfig::default(),
    };

    match cli.command {
        Command::Inspect { thumbnail, json } => {
            let lightbox_config =
                LightboxConfig::from_declared(&thumbnail.declared(), &page_config.defaults);
            let styles = geometry::compute_styles(
                thumbnail.natural(),
                lightbox_config.scale,
                &lightbox_config.layout,
            );
            let home =
                geometry::home_frame(thumbnail.offset, Offset::default(), styles.thumbnail_size);
            let target = geometry::target_frame(thumbnail.viewport, styles.image_size);
            if json {
                let report = serde_json::json!({
                    "config": lightbox_config,
                    "styles": styles,
                    "home": home,
                    "target": target,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_inspection(&lightbox_config, &styles, home, target);
            }
        }
        Command::Simulate {
            thumbnail,
            steps,
            lazy,
        } => simulate(page_config, &thumbnail, &steps, lazy)?,
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays parseable.
fn configure_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn simulate(
    page_config: PageConfig,
    thumbnail: &ThumbnailArgs,
    steps: &Steps,
    lazy: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut host = HeadlessHost::new();
    host.set_viewport(thumbnail.viewport);
    let natural = (!lazy).then(|| thumbnail.natural());
    let (layer, image) = host.add_thumbnail(&page_config.marker, thumbnail.declared(), natural);
    host.set_page_offset(layer, thumbnail.offset);

    let mut session = HeadlessSession::attach(host, page_config);
    let name = session
        .page
        .registry()
        .names()
        .first()
        .map(|n| n.to_string())
        .ok_or("no lightbox attached")?;

    if let Some(snapshot) = session.snapshot(&name) {
        output::print_snapshot("attach", &snapshot);
    }
    for step in &steps.0 {
        match step {
            Step::Click => {
                session.click(layer);
            }
            Step::Enter => {
                session.press_key(EventTarget::Element(layer), Key::Enter);
            }
            Step::Escape => {
                session.press_key(EventTarget::Window, Key::Escape);
            }
            Step::Backdrop => {
                let backdrop = session.page.pane().backdrop();
                session.click(backdrop);
            }
            Step::Load => session.finish_loading(image, thumbnail.natural()),
            Step::Wait(ms) => session.wait(*ms),
        }
        if let Some(snapshot) = session.snapshot(&name) {
            output::print_snapshot(&step.to_string(), &snapshot);
        }
    }
    Ok(())
}

// ============================================================================
// Argument parsing
// ============================================================================

fn parse_viewport(raw: &str) -> Result<Size, String> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{raw}'"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid viewport side '{s}': {e}"))
    };
    Ok(Size::new(parse(w)?, parse(h)?))
}

fn parse_offset(raw: &str) -> Result<Offset, String> {
    let (top, left) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected TOP,LEFT, got '{raw}'"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("invalid offset '{s}'"))
    };
    Ok(Offset::new(parse(top)?, parse(left)?))
}

#[derive(Error, Debug, PartialEq)]
enum StepParseError {
    #[error("unknown step '{0}' (expected click, enter, escape, backdrop, load, or wait:<ms>)")]
    Unknown(String),
    #[error("invalid wait '{0}': expected a non-negative number of milliseconds")]
    Wait(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Click,
    Enter,
    Escape,
    Backdrop,
    Load,
    Wait(f64),
}

impl FromStr for Step {
    type Err = StepParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(ms) = s.strip_prefix("wait:") {
            return ms
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(Step::Wait)
                .ok_or_else(|| StepParseError::Wait(ms.to_string()));
        }
        match s {
            "click" => Ok(Step::Click),
            "enter" => Ok(Step::Enter),
            "escape" => Ok(Step::Escape),
            "backdrop" => Ok(Step::Backdrop),
            "load" => Ok(Step::Load),
            other => Err(StepParseError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Click => write!(f, "click"),
            Step::Enter => write!(f, "enter"),
            Step::Escape => write!(f, "escape"),
            Step::Backdrop => write!(f, "backdrop"),
            Step::Load => write!(f, "load"),
            Step::Wait(ms) => write!(f, "wait:{ms}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Steps(Vec<Step>);

impl FromStr for Steps {
    type Err = StepParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Steps)
    }
}
