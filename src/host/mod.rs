//! The host environment a page runs in.
//!
//! The [`Host`] trait is everything the presentation engine needs from the
//! outside world: element discovery and mutation, geometry queries, style
//! animation, and event binding. It holds no policy; the state machines in
//! [`crate::lightbox`] and [`crate::pane`] decide what to call and when.
//!
//! Callbacks are plain values. Binding an event registers a [`Handler`]; when
//! the event fires, the host hands that handler back to
//! [`Page::dispatch`](crate::page::Page::dispatch). Starting an animation with
//! a [`Completion`] asks the host to deliver it to
//! [`Page::animation_settled`](crate::page::Page::animation_settled) once the
//! animation finishes. Nothing holds a reference back into the page, so
//! handlers unbind by value and a cancelled animation simply never reports.
//!
//! [`HeadlessHost`](headless::HeadlessHost) is an in-memory implementation
//! used by the CLI and the test suite.

pub mod headless;

use crate::geometry::{ImageSize, Offset, Property, Size, Style};
use crate::options::DeclaredOptions;
use crate::registry::LightboxId;
use serde::Serialize;

/// Opaque handle to a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ElementId(pub u64);

/// Handle to an in-flight animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AnimationHandle(pub u64);

/// Where an event handler is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EventTarget {
    Element(ElementId),
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EventKind {
    Click,
    KeyDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Key {
    Enter,
    Escape,
    Other(u32),
}

impl Key {
    /// Map a legacy `keyCode`/`which` value.
    pub fn from_code(code: u32) -> Self {
        match code {
            13 => Key::Enter,
            27 => Key::Escape,
            other => Key::Other(other),
        }
    }
}

/// An event delivered to a bound handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Event {
    Click,
    KeyDown(Key),
}

impl Event {
    pub fn kind(self) -> EventKind {
        match self {
            Event::Click => EventKind::Click,
            Event::KeyDown(_) => EventKind::KeyDown,
        }
    }
}

/// What a bound handler does when its event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Action {
    /// Click on the thumbnail.
    Show,
    /// Keydown on the thumbnail; shows on Enter.
    ShowOnEnter,
    /// Click on the expanded clone or the backdrop.
    Hide,
    /// Keydown on the window; hides on Escape.
    HideOnEscape,
}

/// A bound event handler: an action for one lightbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Handler {
    pub lightbox: LightboxId,
    pub action: Action,
}

impl Handler {
    pub fn new(lightbox: LightboxId, action: Action) -> Self {
        Self { lightbox, action }
    }
}

/// Who to notify when an animation settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Completion {
    /// A lightbox's clone frame animation.
    Lightbox(LightboxId),
    /// The shared pane's backdrop fade.
    Pane,
}

/// Operations the host environment provides.
///
/// Implementations must honor one guarantee: after [`Host::cancel`], the
/// cancelled animation's completion is never delivered.
pub trait Host {
    /// All elements carrying the given marker class, in document order.
    fn query_elements_by_marker(&self, marker: &str) -> Vec<ElementId>;

    /// Options attached to an element (e.g. `data-*` attributes).
    fn read_declared_options(&self, element: ElementId) -> DeclaredOptions;

    fn dom_id(&self, element: ElementId) -> Option<String>;

    fn set_dom_id(&mut self, element: ElementId, id: &str);

    /// The first `<img>` inside an element.
    fn find_image(&self, element: ElementId) -> Option<ElementId>;

    fn body(&self) -> ElementId;

    /// Create a detached element with one class.
    fn create_element(&mut self, class: &str) -> ElementId;

    /// Deep structural copy, detached. The element id is not copied.
    fn clone_element(&mut self, element: ElementId) -> ElementId;

    fn append_child(&mut self, parent: ElementId, child: ElementId);

    /// Remove an element from its parent.
    fn detach(&mut self, element: ElementId);

    fn add_class(&mut self, element: ElementId, class: &str);

    fn remove_class(&mut self, element: ElementId, class: &str);

    fn set_visible(&mut self, element: ElementId, visible: bool);

    /// The authored value of a style property, if any.
    fn computed_style(&self, element: ElementId, property: Property) -> Option<String>;

    /// Offset of an element relative to the document.
    fn page_offset(&self, element: ElementId) -> Offset;

    fn viewport_size(&self) -> Size;

    fn scroll_offset(&self) -> Offset;

    /// `None` while the image has not been decoded.
    fn natural_image_size(&self, image: ElementId) -> Option<ImageSize>;

    fn set_style(&mut self, element: ElementId, style: &Style);

    /// Animate towards `target` over `duration_ms`.
    fn animate_style(
        &mut self,
        element: ElementId,
        target: &Style,
        duration_ms: f64,
        on_complete: Option<Completion>,
    ) -> AnimationHandle;

    /// Stop an animation where it is. Its completion must never be delivered.
    fn cancel(&mut self, handle: AnimationHandle);

    fn bind_event(&mut self, target: EventTarget, kind: EventKind, handler: Handler);

    fn unbind_event(&mut self, target: EventTarget, kind: EventKind, handler: Handler);

    /// Ask to be told (via [`Page::image_loaded`](crate::page::Page::image_loaded))
    /// when an image finishes loading.
    fn on_image_load(&mut self, image: ElementId, lightbox: LightboxId);
}
