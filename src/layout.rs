//! Layout rules: the inline-CSS-like string that clips and sizes a thumbnail.
//!
//! A layout is written like a `style` attribute:
//!
//! ```text
//! left: 10px; width: 200px; centerY: -4px; height: 120px
//! ```
//!
//! Declarations are split on `;`, then each one on its *first* `:`. Names and
//! values are trimmed. Every declaration is stored, including names this crate
//! does not understand, so a layout written for a newer version still parses.
//!
//! ## Recognized names
//!
//! | Name | Meaning |
//! |---|---|
//! | `left`, `right`, `top`, `bottom` | Crop window offset inside the image |
//! | `width`, `height` | Explicit thumbnail box size (disables auto-resize) |
//! | `centerX`, `centerY` | Center the crop window, shifted by the given amount |
//!
//! Offsets carry a unit of `px`, `em` or `%`. A bare number is read as pixels.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Unit tag of a layout length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Px,
    Em,
    Percent,
}

impl Unit {
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Em => "em",
            Unit::Percent => "%",
        }
    }
}

/// A signed numeric value with a unit, e.g. `-10px` or `2.5em`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Length {
    pub value: f64,
    pub unit: Unit,
}

impl Length {
    pub fn px(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Px,
        }
    }

    /// Parse `"10px"`, `"-1.5em"`, `"50%"` or a bare `"12"` (pixels).
    ///
    /// Returns `None` for unknown units or anything that is not a finite number.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (number, unit) = if let Some(n) = raw.strip_suffix("px") {
            (n, Unit::Px)
        } else if let Some(n) = raw.strip_suffix("em") {
            (n, Unit::Em)
        } else if let Some(n) = raw.strip_suffix('%') {
            (n, Unit::Percent)
        } else {
            (raw, Unit::Px)
        };
        let value: f64 = number.trim_end().parse().ok()?;
        value.is_finite().then_some(Self { value, unit })
    }

    /// The integer part of the value, ignoring the unit.
    ///
    /// Sizes and center shifts are applied as whole pixels.
    pub fn whole(self) -> i64 {
        self.value.trunc() as i64
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // -0 would render as "-0px"
        let value = if self.value == 0.0 { 0.0 } else { self.value };
        write!(f, "{}{}", value, self.unit.suffix())
    }
}

/// The four clip offsets, in the order they are applied.
pub const OFFSET_NAMES: [&str; 4] = ["left", "right", "top", "bottom"];

/// Parsed layout declarations.
///
/// Raw values are kept verbatim; typed accessors parse on demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LayoutRule {
    declarations: BTreeMap<String, String>,
}

impl LayoutRule {
    /// Raw value of a declaration, if present and non-empty.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.declarations
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn length(&self, name: &str) -> Option<Length> {
        self.get(name).and_then(Length::parse)
    }

    pub fn width(&self) -> Option<Length> {
        self.length("width")
    }

    pub fn height(&self) -> Option<Length> {
        self.length("height")
    }

    pub fn center_x(&self) -> Option<Length> {
        self.length("centerX")
    }

    pub fn center_y(&self) -> Option<Length> {
        self.length("centerY")
    }

    pub fn has_explicit_height(&self) -> bool {
        self.get("height").is_some()
    }

    /// Whether the thumbnail box should follow the scaled image size.
    ///
    /// Any explicit `width` or `height` turns automatic resizing off.
    pub fn auto_resize(&self) -> bool {
        self.get("width").is_none() && self.get("height").is_none()
    }

    /// Clip offsets that are present, as `(name, raw value)` pairs.
    pub fn offsets(&self) -> impl Iterator<Item = (&'static str, &str)> {
        OFFSET_NAMES
            .iter()
            .filter_map(|&name| self.get(name).map(|v| (name, v)))
    }
}

/// Parse a layout string into a [`LayoutRule`].
///
/// Declarations without a `:` or with an empty name are dropped. A later
/// declaration of the same name replaces an earlier one.
pub fn parse_layout(raw: &str) -> LayoutRule {
    let declarations = raw
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            (!name.is_empty()).then(|| (name.to_string(), value.trim().to_string()))
        })
        .collect();
    LayoutRule { declarations }
}

/// Flip the sign of a raw CSS offset, keeping its unit as written.
///
/// - `"10px"` → `"-10px"`
/// - `"-2em"` → `"2em"`
pub fn reverse_offset(rule: &str) -> String {
    match rule.strip_prefix('-') {
        Some(positive) => positive.to_string(),
        None => format!("-{rule}"),
    }
}
