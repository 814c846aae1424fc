//! Shared fixtures for the litebox test suite.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut session = two_thumbnail_session();
//! let hero = hero_layer(&session);
//! session.click(hero);
//! session.wait(200.0);
//! assert_phase(&session, "hero", Phase::Shown);
//! ```

use crate::config::PageConfig;
use crate::geometry::{Offset, Size};
use crate::host::ElementId;
use crate::host::headless::{HeadlessHost, HeadlessSession};
use crate::lightbox::Phase;
use crate::options::{DeclaredOptions, OptionValue};

pub const VIEWPORT: Size = Size {
    width: 1000,
    height: 800,
};

pub fn options(pairs: &[(&str, OptionValue)]) -> DeclaredOptions {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Two loaded thumbnails on a 1000x800 viewport.
///
/// - `hero`: 400x300, `duration: "200ms"`, `scale: "50%"`, at (100, 50)
/// - anonymous (becomes `litebox0`): 300x200, no options, at (600, 50)
pub fn two_thumbnail_session() -> HeadlessSession {
    let mut host = HeadlessHost::new();
    host.set_viewport(VIEWPORT);

    let (hero, _) = host.add_thumbnail(
        "litebox",
        options(&[("duration", "200ms".into()), ("scale", "50%".into())]),
        Some(Size::new(400, 300)),
    );
    host.set_dom_id_attr(hero, "hero");
    host.set_page_offset(hero, Offset::new(100.0, 50.0));

    let (other, _) = host.add_thumbnail("litebox", DeclaredOptions::new(), Some(Size::new(300, 200)));
    host.set_page_offset(other, Offset::new(600.0, 50.0));

    HeadlessSession::attach(host, PageConfig::default())
}

// =========================================================================
// Lookups (panic with the available names on miss)
// =========================================================================

pub fn layer_of(session: &HeadlessSession, name: &str) -> ElementId {
    session
        .page
        .lookup(name)
        .map(|l| l.layer())
        .unwrap_or_else(|| {
            let names = session.page.registry().names();
            panic!("lightbox '{name}' not found. Available: {names:?}")
        })
}

pub fn hero_layer(session: &HeadlessSession) -> ElementId {
    layer_of(session, "hero")
}

pub fn assert_phase(session: &HeadlessSession, name: &str, expected: Phase) {
    let snapshot = session
        .snapshot(name)
        .unwrap_or_else(|| panic!("lightbox '{name}' not found"));
    assert_eq!(snapshot.phase, expected, "phase of '{name}' at {}ms", snapshot.clock_ms);
}
