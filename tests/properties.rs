//! Option parsing and geometry through the public API.

use litebox::config::{DefaultsConfig, PageConfig, load_config};
use litebox::geometry::{self, Offset, Property, Size, ThumbnailSize};
use litebox::layout::parse_layout;
use litebox::options::{DeclaredOptions, LightboxConfig, OptionValue, parse_duration, parse_scale};

const IMAGE: Size = Size {
    width: 400,
    height: 300,
};

// =========================================================================
// Options
// =========================================================================

#[test]
fn durations() {
    assert_eq!(parse_duration(&"2s".into()), 2000.0);
    assert_eq!(parse_duration(&"200ms".into()), 200.0);
    assert_eq!(parse_duration(&200.0.into()), 200.0);
    assert_eq!(parse_duration(&"bogus".into()), 500.0);
}

#[test]
fn scales() {
    assert_eq!(parse_scale(&"50%".into()), 0.5);
    assert_eq!(parse_scale(&".5".into()), 0.5);
    assert_eq!(parse_scale(&"bogus".into()), 1.0);
}

#[test]
fn layout_with_width_disables_auto_resize() {
    let layout = parse_layout("left: 10px; width: 200px");
    assert_eq!(layout.get("left"), Some("10px"));
    assert_eq!(layout.get("width"), Some("200px"));
    assert_eq!(layout.len(), 2);
    assert!(!layout.auto_resize());
}

#[test]
fn declared_options_fall_back_to_page_defaults() {
    let declared: DeclaredOptions = [
        ("duration".to_string(), OptionValue::from("soon")),
        ("scale".to_string(), OptionValue::from("25%")),
    ]
    .into_iter()
    .collect();
    let defaults = DefaultsConfig {
        duration: 300.0,
        scale: 1.0,
    };
    let config = LightboxConfig::from_declared(&declared, &defaults);
    assert_eq!(config.duration_ms, 300.0);
    assert_eq!(config.scale, 0.25);
    assert!(config.layout.is_empty());
}

// =========================================================================
// Geometry
// =========================================================================

#[test]
fn clip_offset_is_reversed_and_reset() {
    let styles = geometry::compute_styles(IMAGE, 0.5, &parse_layout("left: 10px"));
    assert_eq!(styles.thumbnail_image_style.get(Property::Left), Some("-10px"));
    assert_eq!(styles.full_image_style.get(Property::Left), Some("0px"));
}

#[test]
fn auto_resize_follows_scaled_image() {
    let styles = geometry::compute_styles(IMAGE, 0.5, &parse_layout(""));
    assert_eq!(
        styles.thumbnail_size,
        ThumbnailSize {
            width: Some(200),
            height: Some(150),
        }
    );
}

#[test]
fn frames_bracket_the_animation() {
    let styles = geometry::compute_styles(IMAGE, 0.5, &parse_layout(""));
    let home = geometry::home_frame(
        Offset::new(300.7, 20.2),
        Offset::new(100.0, 0.0),
        styles.thumbnail_size,
    );
    assert_eq!(home.top, 200.0);
    assert_eq!(home.left, 20.0);
    assert_eq!(home.width, Some(200));

    let target = geometry::target_frame(Size::new(1000, 800), IMAGE);
    assert_eq!((target.top, target.left), (400.0, 500.0));
    assert_eq!((target.margin_top, target.margin_left), (-150.0, -200.0));
}

// =========================================================================
// Config file
// =========================================================================

#[test]
fn stock_config_file_loads_to_defaults() {
    let tmp = tempfile::TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("litebox.toml"),
        litebox::config::stock_config_toml(),
    )
    .unwrap();
    assert_eq!(load_config(tmp.path()).unwrap(), PageConfig::default());
}
