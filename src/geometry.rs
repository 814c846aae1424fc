//! Pure geometry for thumbnails and their expanded frames.
//!
//! All functions here are pure and testable without a host or a rendered page.
//!
//! A thumbnail is a clipping box around an image rendered at
//! `natural × scale`. Layout offsets move the image inside the box so the
//! wanted crop window shows through. Expanding resets those offsets and
//! animates the image to its natural size.

use crate::layout::{LayoutRule, Length, reverse_offset};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Style properties the engine reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Property {
    Top,
    Left,
    Right,
    Bottom,
    Width,
    Height,
    MarginTop,
    MarginLeft,
    Opacity,
}

impl Property {
    pub fn css_name(self) -> &'static str {
        match self {
            Property::Top => "top",
            Property::Left => "left",
            Property::Right => "right",
            Property::Bottom => "bottom",
            Property::Width => "width",
            Property::Height => "height",
            Property::MarginTop => "margin-top",
            Property::MarginLeft => "margin-left",
            Property::Opacity => "opacity",
        }
    }

    /// Map a clip offset name from a layout rule.
    pub fn from_offset_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Property::Left),
            "right" => Some(Property::Right),
            "top" => Some(Property::Top),
            "bottom" => Some(Property::Bottom),
            _ => None,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

/// A set of style declarations, one value per property.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Style(BTreeMap<Property, String>);

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, property: Property, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    pub fn set(&mut self, property: Property, value: impl Into<String>) {
        self.0.insert(property, value.into());
    }

    pub fn get(&self, property: Property) -> Option<&str> {
        self.0.get(&property).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Property, &str)> {
        self.0.iter().map(|(p, v)| (*p, v.as_str()))
    }

    /// Copy every declaration of `other` over this style.
    pub fn merge(&mut self, other: &Style) {
        for (property, value) in other.iter() {
            self.set(property, value);
        }
    }

    /// Render as an inline `style` attribute.
    pub fn to_css(&self) -> String {
        self.iter()
            .map(|(p, v)| format!("{}: {}", p.css_name(), v))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Format a pixel value. Never renders `-0px`.
pub fn px(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value}px")
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Scale and floor each side.
    pub fn scaled_floor(self, scale: f64) -> Self {
        Self {
            width: (self.width as f64 * scale).floor() as u32,
            height: (self.height as f64 * scale).floor() as u32,
        }
    }
}

/// The natural (unscaled) size of an image.
pub type ImageSize = Size;

/// A position in pixels, e.g. a page offset or scroll offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Offset {
    pub top: f64,
    pub left: f64,
}

impl Offset {
    pub fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

/// Size of the thumbnail box. A side is `None` when neither the layout nor
/// auto-resize fixes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ThumbnailSize {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ThumbnailSize {
    pub fn to_style(self) -> Style {
        let mut style = Style::new();
        if let Some(w) = self.width {
            style.set(Property::Width, px(w as f64));
        }
        if let Some(h) = self.height {
            style.set(Property::Height, px(h as f64));
        }
        style
    }
}

/// Position and size of the popup clone at one end of its animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub top: f64,
    pub left: f64,
    pub margin_top: f64,
    pub margin_left: f64,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Frame {
    pub fn to_style(self) -> Style {
        let mut style = Style::new()
            .with(Property::Top, px(self.top))
            .with(Property::Left, px(self.left))
            .with(Property::MarginTop, px(self.margin_top))
            .with(Property::MarginLeft, px(self.margin_left));
        if let Some(w) = self.width {
            style.set(Property::Width, px(w as f64));
        }
        if let Some(h) = self.height {
            style.set(Property::Height, px(h as f64));
        }
        style
    }
}

/// Styles derived once an image's natural size is known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedStyles {
    pub image_size: ImageSize,
    /// Image style while thumbnailed: clip offsets and scaled size.
    pub thumbnail_image_style: Style,
    /// Image style while expanded: offsets zeroed, natural size.
    pub full_image_style: Style,
    pub thumbnail_size: ThumbnailSize,
}

/// Clip styles that depend only on the layout.
///
/// Returns `(thumbnail, full)`. Each offset present in the layout is reversed
/// on the thumbnail image and zeroed on the full image. These can be applied
/// before the image has loaded.
pub fn clip_styles(layout: &LayoutRule) -> (Style, Style) {
    let mut thumbnail = Style::new();
    let mut full = Style::new();
    for (name, raw) in layout.offsets() {
        if let Some(property) = Property::from_offset_name(name) {
            thumbnail.set(property, reverse_offset(raw));
            full.set(property, px(0.0));
        }
    }
    (thumbnail, full)
}

/// Size of the thumbnail box.
///
/// With no explicit `width`/`height`, the box follows `floor(natural × scale)`.
/// Otherwise it takes exactly the explicit side(s), as whole pixels.
pub fn thumbnail_size(natural: ImageSize, scale: f64, layout: &LayoutRule) -> ThumbnailSize {
    if layout.auto_resize() {
        let scaled = natural.scaled_floor(scale);
        return ThumbnailSize {
            width: Some(scaled.width),
            height: Some(scaled.height),
        };
    }
    let whole = |len: Length| len.whole().max(0) as u32;
    ThumbnailSize {
        width: layout.width().map(whole),
        height: layout.height().map(whole),
    }
}

/// Horizontal or vertical centering offset for the thumbnail image.
///
/// `-(floor(natural / 2 - box / 2)) - shift`
fn center_offset(natural: u32, thumbnail: u32, shift: i64) -> f64 {
    let centered = (natural as f64 / 2.0 - thumbnail as f64 / 2.0).floor();
    -centered - shift as f64
}

/// Compute every cached style for an image of `natural` size.
pub fn compute_styles(natural: ImageSize, scale: f64, layout: &LayoutRule) -> ComputedStyles {
    let (mut thumbnail_image_style, mut full_image_style) = clip_styles(layout);
    let thumbnail_size = thumbnail_size(natural, scale, layout);
    // An unfixed side falls back to the scaled image for centering.
    let scaled = natural.scaled_floor(scale);

    let mut style = Style::new()
        .with(Property::Width, px(natural.width as f64 * scale))
        .with(Property::Height, px(natural.height as f64 * scale));
    let mut reset = Style::new()
        .with(Property::Width, px(natural.width as f64))
        .with(Property::Height, px(natural.height as f64));

    if let Some(shift) = layout.center_x() {
        let box_width = thumbnail_size.width.unwrap_or(scaled.width);
        style.set(
            Property::Left,
            px(center_offset(natural.width, box_width, shift.whole())),
        );
        reset.set(Property::Left, px(0.0));
    }

    // Vertical centering needs a fixed height; auto height tracks the image.
    if let Some(shift) = layout.center_y().filter(|_| layout.has_explicit_height()) {
        let box_height = thumbnail_size.height.unwrap_or(scaled.height);
        style.set(
            Property::Top,
            px(center_offset(natural.height, box_height, shift.whole())),
        );
        reset.set(Property::Top, px(0.0));
    }

    thumbnail_image_style.merge(&style);
    full_image_style.merge(&reset);

    ComputedStyles {
        image_size: natural,
        thumbnail_image_style,
        full_image_style,
        thumbnail_size,
    }
}

/// Frame that sits exactly on top of the thumbnail.
///
/// The page offset is floored, then the scroll offset subtracted, since the
/// clone lives in a fixed overlay.
pub fn home_frame(page_offset: Offset, scroll: Offset, thumbnail: ThumbnailSize) -> Frame {
    Frame {
        top: page_offset.top.floor() - scroll.top,
        left: page_offset.left.floor() - scroll.left,
        margin_top: 0.0,
        margin_left: 0.0,
        width: thumbnail.width,
        height: thumbnail.height,
    }
}

/// Frame centered on the viewport at the image's natural size.
///
/// Centering uses negative half-size margins rather than a transform.
pub fn target_frame(viewport: Size, image: ImageSize) -> Frame {
    Frame {
        top: (viewport.height / 2) as f64,
        left: (viewport.width / 2) as f64,
        margin_top: -((image.height / 2) as f64),
        margin_left: -((image.width / 2) as f64),
        width: Some(image.width),
        height: Some(image.height),
    }
}

/// Percentage position an expanded clone rests at, so it stays centered
/// across viewport resizes.
pub fn resting_position() -> Style {
    Style::new()
        .with(Property::Top, "50%")
        .with(Property::Left, "50%")
}

/// The resting position converted back to pixels, for a pixel animation to
/// start from.
pub fn center_position(viewport: Size) -> Style {
    Style::new()
        .with(Property::Top, px((viewport.height / 2) as f64))
        .with(Property::Left, px((viewport.width / 2) as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::parse_layout;

    const IMAGE: ImageSize = Size {
        width: 400,
        height: 300,
    };

    // =========================================================================
    // clip offsets
    // =========================================================================

    #[test]
    fn left_offset_is_reversed_and_reset() {
        let styles = compute_styles(IMAGE, 0.5, &parse_layout("left: 10px"));
        assert_eq!(styles.thumbnail_image_style.get(Property::Left), Some("-10px"));
        assert_eq!(styles.full_image_style.get(Property::Left), Some("0px"));
    }

    #[test]
    fn negative_offsets_become_positive() {
        let (thumb, full) = clip_styles(&parse_layout("top: -2em; bottom: 5%"));
        assert_eq!(thumb.get(Property::Top), Some("2em"));
        assert_eq!(thumb.get(Property::Bottom), Some("-5%"));
        assert_eq!(full.get(Property::Top), Some("0px"));
        assert_eq!(full.get(Property::Bottom), Some("0px"));
        assert_eq!(thumb.get(Property::Left), None);
    }

    #[test]
    fn clip_styles_ignore_non_offsets() {
        let (thumb, full) = clip_styles(&parse_layout("width: 20px; centerX: 3px"));
        assert!(thumb.is_empty());
        assert!(full.is_empty());
    }

    // =========================================================================
    // sizing
    // =========================================================================

    #[test]
    fn auto_resize_scales_and_floors() {
        let styles = compute_styles(IMAGE, 0.5, &LayoutRule::default());
        assert_eq!(
            styles.thumbnail_size,
            ThumbnailSize {
                width: Some(200),
                height: Some(150)
            }
        );
    }

    #[test]
    fn auto_resize_floors_fractions() {
        let size = thumbnail_size(Size::new(101, 33), 0.5, &LayoutRule::default());
        assert_eq!(size.width, Some(50));
        assert_eq!(size.height, Some(16));
    }

    #[test]
    fn explicit_size_wins() {
        let size = thumbnail_size(IMAGE, 0.5, &parse_layout("width: 120px; height: 90px"));
        assert_eq!(
            size,
            ThumbnailSize {
                width: Some(120),
                height: Some(90)
            }
        );
    }

    #[test]
    fn explicit_width_only_leaves_height_free() {
        let size = thumbnail_size(IMAGE, 0.5, &parse_layout("width: 120px"));
        assert_eq!(size.width, Some(120));
        assert_eq!(size.height, None);
    }

    #[test]
    fn image_sizes_scaled_and_natural() {
        let styles = compute_styles(IMAGE, 0.5, &LayoutRule::default());
        assert_eq!(styles.thumbnail_image_style.get(Property::Width), Some("200px"));
        assert_eq!(styles.thumbnail_image_style.get(Property::Height), Some("150px"));
        assert_eq!(styles.full_image_style.get(Property::Width), Some("400px"));
        assert_eq!(styles.full_image_style.get(Property::Height), Some("300px"));
    }

    #[test]
    fn scaled_size_keeps_fractions() {
        let styles = compute_styles(Size::new(401, 301), 0.5, &LayoutRule::default());
        assert_eq!(styles.thumbnail_image_style.get(Property::Width), Some("200.5px"));
    }

    // =========================================================================
    // centering
    // =========================================================================

    #[test]
    fn center_x_without_explicit_width() {
        // box = 200, offset = -(floor(200 - 100)) - 0
        let styles = compute_styles(IMAGE, 0.5, &parse_layout("centerX: 0px"));
        assert_eq!(styles.thumbnail_image_style.get(Property::Left), Some("-100px"));
        assert_eq!(styles.full_image_style.get(Property::Left), Some("0px"));
    }

    #[test]
    fn center_x_with_shift_overrides_left() {
        // box = 100, offset = -(floor(200 - 50)) - 10 = -160
        let styles = compute_styles(
            IMAGE,
            1.0,
            &parse_layout("left: 4px; width: 100px; centerX: 10px"),
        );
        assert_eq!(styles.thumbnail_image_style.get(Property::Left), Some("-160px"));
    }

    #[test]
    fn center_y_requires_explicit_height() {
        let without = compute_styles(IMAGE, 1.0, &parse_layout("width: 100px; centerY: 0px"));
        assert_eq!(without.thumbnail_image_style.get(Property::Top), None);
        assert_eq!(without.full_image_style.get(Property::Top), None);

        // box = 100, offset = -(floor(150 - 50)) - (-5) = -95
        let with = compute_styles(IMAGE, 1.0, &parse_layout("height: 100px; centerY: -5px"));
        assert_eq!(with.thumbnail_image_style.get(Property::Top), Some("-95px"));
        assert_eq!(with.full_image_style.get(Property::Top), Some("0px"));
    }

    #[test]
    fn center_x_with_height_only_uses_scaled_width() {
        // width side unfixed: box = floor(400 * 0.5) = 200
        let styles = compute_styles(IMAGE, 0.5, &parse_layout("height: 80px; centerX: 0"));
        assert_eq!(styles.thumbnail_image_style.get(Property::Left), Some("-100px"));
    }

    // =========================================================================
    // frames
    // =========================================================================

    #[test]
    fn home_frame_subtracts_scroll() {
        let frame = home_frame(
            Offset::new(310.7, 40.2),
            Offset::new(100.0, 0.0),
            ThumbnailSize {
                width: Some(200),
                height: Some(150),
            },
        );
        assert_eq!(frame.top, 210.0);
        assert_eq!(frame.left, 40.0);
        let style = frame.to_style();
        assert_eq!(style.get(Property::MarginTop), Some("0px"));
        assert_eq!(style.get(Property::MarginLeft), Some("0px"));
        assert_eq!(style.get(Property::Width), Some("200px"));
    }

    #[test]
    fn target_frame_centers_with_negative_margins() {
        let frame = target_frame(Size::new(1025, 769), Size::new(401, 301));
        let style = frame.to_style();
        assert_eq!(style.get(Property::Top), Some("384px"));
        assert_eq!(style.get(Property::Left), Some("512px"));
        assert_eq!(style.get(Property::MarginTop), Some("-150px"));
        assert_eq!(style.get(Property::MarginLeft), Some("-200px"));
        assert_eq!(style.get(Property::Width), Some("401px"));
        assert_eq!(style.get(Property::Height), Some("301px"));
    }

    #[test]
    fn center_position_matches_target_frame() {
        let viewport = Size::new(1024, 768);
        let center = center_position(viewport);
        let target = target_frame(viewport, IMAGE).to_style();
        assert_eq!(center.get(Property::Top), target.get(Property::Top));
        assert_eq!(center.get(Property::Left), target.get(Property::Left));
    }

    #[test]
    fn style_to_css() {
        let style = Style::new()
            .with(Property::MarginTop, "-4px")
            .with(Property::Left, "3px");
        assert_eq!(style.to_css(), "left: 3px; margin-top: -4px");
    }

    #[test]
    fn px_never_negative_zero() {
        assert_eq!(px(-0.0), "0px");
        assert_eq!(px(12.5), "12.5px");
    }
}
