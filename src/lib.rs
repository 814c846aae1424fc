//! # Litebox
//!
//! Click-to-expand image lightboxes. A marked thumbnail on the page expands,
//! with an animated move and resize, into a popup centered in the viewport
//! over a dimming backdrop, and collapses back to its exact position when
//! dismissed.
//!
//! # Architecture: Pure Core, Host at the Edge
//!
//! The library never touches a document directly. Everything it needs from
//! the page (finding elements, reading sizes, starting animations, binding
//! events) goes through the [`host::Host`] trait:
//!
//! ```text
//! options / layout   declared strings  →  LightboxConfig       (pure)
//! geometry           natural size      →  styles and frames    (pure)
//! lightbox / pane    events            →  Host calls           (state machines)
//! page               Host callbacks    →  lightbox / pane      (routing)
//! ```
//!
//! Hosts hand events back as plain values: a bound [`host::Handler`] names a
//! lightbox and an action, and an animation started with a
//! [`host::Completion`] reports back through [`page::Page::animation_settled`].
//! No closures cross the boundary, so binding and unbinding are symmetric
//! and a whole page can be driven in memory by
//! [`host::headless::HeadlessSession`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`options`] | Per-element option parsing: duration, scale, resolved [`options::LightboxConfig`] |
//! | [`layout`] | Inline layout declarations, lengths, and offset reversal |
//! | [`geometry`] | Thumbnail sizing, clip styles, and the home/target animation frames |
//! | [`host`] | The collaborator contract and the values exchanged across it |
//! | [`lightbox`] | One thumbnail's Hidden → Showing → Shown → Hiding lifecycle |
//! | [`pane`] | The shared backdrop overlay and its fade |
//! | [`registry`] | Owned lightbox instances, keyed by id and element name |
//! | [`page`] | Document-ready attach and routing of host callbacks |
//! | [`config`] | `litebox.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Fall Back, Never Fail
//!
//! Author-supplied options are forgiving. An unparseable duration or scale
//! silently becomes the default, an unparseable layout declaration is
//! dropped, and a marked element without an image is skipped. Only the page
//! configuration file can produce an error, because a typo there is the
//! author's to fix before shipping.
//!
//! ## Last Request Wins
//!
//! Every lightbox shares one backdrop. A show or hide on the pane cancels the
//! fade in flight, and a hide on a lightbox mid-animation cancels its frame
//! animation before reversing. Each state machine also remembers the handle
//! it is waiting on and ignores any other, so exactly one completion settles
//! each transition.

pub mod config;
pub mod geometry;
pub mod host;
pub mod layout;
pub mod lightbox;
pub mod options;
pub mod output;
pub mod page;
pub mod pane;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_helpers;
