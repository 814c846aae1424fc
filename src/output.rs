//! CLI output formatting for `inspect` and `simulate`.
//!
//! # Output Format
//!
//! ## Inspect
//!
//! ```text
//! Config
//!     duration: 200ms
//!     scale: 0.5
//!     layout: left: -10px; width: 100px
//!
//! Styles
//!     natural: 400x300
//!     thumbnail: 100 x auto
//!     thumbnail image: left: 10px; width: 200px; height: 150px
//!     full image: left: 0px; width: 400px; height: 300px
//!
//! Frames
//!     home: top: 100px; left: 50px; width: 100px; margin-top: 0px; margin-left: 0px
//!     target: top: 400px; left: 500px; width: 400px; height: 300px; margin-top: -150px; margin-left: -200px
//! ```
//!
//! ## Simulate
//!
//! ```text
//!      0ms  click       showing  pane=showing  popup=attached  pending=3
//!    250ms  wait:250    shown    pane=shown    popup=attached  pending=0
//! ```
//!
//! # Architecture
//!
//! Each section has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::geometry::{ComputedStyles, Frame, Style, ThumbnailSize};
use crate::host::headless::Snapshot;
use crate::lightbox::Phase;
use crate::options::LightboxConfig;
use crate::pane::PanePhase;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// A style as CSS, or `(none)` when empty.
fn style_line(style: &Style) -> String {
    if style.is_empty() {
        "(none)".to_string()
    } else {
        style.to_css()
    }
}

fn side(value: Option<u32>) -> String {
    value.map_or_else(|| "auto".to_string(), |v| v.to_string())
}

fn thumbnail_line(size: ThumbnailSize) -> String {
    format!("{} x {}", side(size.width), side(size.height))
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Hidden => "hidden",
        Phase::Showing => "showing",
        Phase::Shown => "shown",
        Phase::Hiding => "hiding",
    }
}

fn pane_label(phase: PanePhase) -> &'static str {
    match phase {
        PanePhase::Hidden => "hidden",
        PanePhase::Showing => "showing",
        PanePhase::Shown => "shown",
        PanePhase::Hiding => "hiding",
    }
}

// ============================================================================
// Inspect
// ============================================================================

pub fn format_config(config: &LightboxConfig) -> Vec<String> {
    let layout = if config.layout.is_empty() {
        "(none)".to_string()
    } else {
        config
            .layout
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("; ")
    };
    vec![
        "Config".to_string(),
        format!("{}duration: {}ms", indent(1), config.duration_ms),
        format!("{}scale: {}", indent(1), config.scale),
        format!("{}layout: {}", indent(1), layout),
    ]
}

pub fn format_styles(styles: &ComputedStyles) -> Vec<String> {
    vec![
        "Styles".to_string(),
        format!(
            "{}natural: {}x{}",
            indent(1),
            styles.image_size.width,
            styles.image_size.height
        ),
        format!("{}thumbnail: {}", indent(1), thumbnail_line(styles.thumbnail_size)),
        format!(
            "{}thumbnail image: {}",
            indent(1),
            style_line(&styles.thumbnail_image_style)
        ),
        format!(
            "{}full image: {}",
            indent(1),
            style_line(&styles.full_image_style)
        ),
    ]
}

pub fn format_frames(home: Frame, target: Frame) -> Vec<String> {
    vec![
        "Frames".to_string(),
        format!("{}home: {}", indent(1), style_line(&home.to_style())),
        format!("{}target: {}", indent(1), style_line(&target.to_style())),
    ]
}

/// Config, styles, and frames as blank-line-separated sections.
pub fn format_inspection(
    config: &LightboxConfig,
    styles: &ComputedStyles,
    home: Frame,
    target: Frame,
) -> Vec<String> {
    let mut lines = format_config(config);
    lines.push(String::new());
    lines.extend(format_styles(styles));
    lines.push(String::new());
    lines.extend(format_frames(home, target));
    lines
}

pub fn print_inspection(
    config: &LightboxConfig,
    styles: &ComputedStyles,
    home: Frame,
    target: Frame,
) {
    for line in format_inspection(config, styles, home, target) {
        println!("{}", line);
    }
}

// ============================================================================
// Simulate
// ============================================================================

/// One row of a simulation trace.
pub fn format_snapshot(step: &str, snapshot: &Snapshot) -> String {
    format!(
        "{:>7}ms  {:<10}  {:<8} pane={:<8} popup={:<8} pending={}",
        snapshot.clock_ms,
        step,
        phase_label(snapshot.phase),
        pane_label(snapshot.pane),
        if snapshot.popup_attached {
            "attached"
        } else {
            "detached"
        },
        snapshot.pending_animations
    )
}

pub fn print_snapshot(step: &str, snapshot: &Snapshot) {
    println!("{}", format_snapshot(step, snapshot));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{self, Offset, Size};
    use crate::layout::parse_layout;

    fn config(layout: &str) -> LightboxConfig {
        LightboxConfig {
            duration_ms: 200.0,
            scale: 0.5,
            layout: parse_layout(layout),
        }
    }

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn empty_style_shows_none() {
        assert_eq!(style_line(&Style::new()), "(none)");
    }

    #[test]
    fn unfixed_thumbnail_side_is_auto() {
        let size = ThumbnailSize {
            width: Some(100),
            height: None,
        };
        assert_eq!(thumbnail_line(size), "100 x auto");
    }

    // =========================================================================
    // Inspect tests
    // =========================================================================

    #[test]
    fn config_section() {
        let lines = format_config(&config("width: 100px"));
        assert_eq!(
            lines,
            vec![
                "Config",
                "    duration: 200ms",
                "    scale: 0.5",
                "    layout: width: 100px",
            ]
        );
    }

    #[test]
    fn config_section_without_layout() {
        let lines = format_config(&config(""));
        assert_eq!(lines[3], "    layout: (none)");
    }

    #[test]
    fn styles_section_for_scaled_image() {
        let styles = geometry::compute_styles(Size::new(400, 300), 0.5, &parse_layout(""));
        let lines = format_styles(&styles);
        assert_eq!(lines[0], "Styles");
        assert_eq!(lines[1], "    natural: 400x300");
        assert_eq!(lines[2], "    thumbnail: 200 x 150");
        assert_eq!(lines[3], "    thumbnail image: width: 200px; height: 150px");
        assert_eq!(lines[4], "    full image: width: 400px; height: 300px");
    }

    #[test]
    fn frames_section() {
        let styles = geometry::compute_styles(Size::new(400, 300), 1.0, &parse_layout(""));
        let home = geometry::home_frame(
            Offset::new(100.0, 50.0),
            Offset::default(),
            styles.thumbnail_size,
        );
        let target = geometry::target_frame(Size::new(1000, 800), styles.image_size);
        let lines = format_frames(home, target);
        assert_eq!(
            lines[1],
            "    home: top: 100px; left: 50px; width: 400px; height: 300px; margin-top: 0px; margin-left: 0px"
        );
        assert_eq!(
            lines[2],
            "    target: top: 400px; left: 500px; width: 400px; height: 300px; margin-top: -150px; margin-left: -200px"
        );
    }

    #[test]
    fn inspection_separates_sections() {
        let cfg = config("");
        let styles = geometry::compute_styles(Size::new(400, 300), 0.5, &cfg.layout);
        let home = geometry::home_frame(Offset::default(), Offset::default(), styles.thumbnail_size);
        let target = geometry::target_frame(Size::new(1000, 800), styles.image_size);
        let lines = format_inspection(&cfg, &styles, home, target);
        let headers: Vec<_> = lines
            .iter()
            .filter(|l| !l.is_empty() && !l.starts_with(' '))
            .collect();
        assert_eq!(headers, vec!["Config", "Styles", "Frames"]);
        assert_eq!(lines.iter().filter(|l| l.is_empty()).count(), 2);
    }

    // =========================================================================
    // Simulate tests
    // =========================================================================

    #[test]
    fn snapshot_row() {
        let snapshot = Snapshot {
            clock_ms: 250.0,
            lightbox: "hero".to_string(),
            phase: Phase::Shown,
            pane: PanePhase::Shown,
            popup_attached: true,
            pending_animations: 0,
        };
        let row = format_snapshot("wait:250", &snapshot);
        assert!(row.trim_start().starts_with("250ms"));
        assert!(row.contains("wait:250"));
        assert!(row.contains("shown"));
        assert!(row.contains("pane=shown"));
        assert!(row.contains("popup=attached"));
        assert!(row.ends_with("pending=0"));
    }
}
