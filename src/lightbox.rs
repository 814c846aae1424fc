//! One thumbnail and the popup it expands into.
//!
//! # Phases
//!
//! ```text
//!           show()            frame settles
//! Hidden ──────────▶ Showing ──────────────▶ Shown
//!   ▲                   │                      │
//!   │ frame settles     │ hide()               │ hide()
//!   │                   ▼                      │
//!   └────────────── Hiding ◀───────────────────┘
//! ```
//!
//! A lightbox is *showing* in every phase but `Hidden`, and *animating* in
//! `Showing` and `Hiding`.
//!
//! # Interrupted animations
//!
//! `hide()` while animating cancels the in-flight frame and image animations
//! before starting the reverse ones. The host guarantees a cancelled
//! animation never reports, and the lightbox additionally ignores any
//! completion whose handle is not its current frame animation. Exactly one
//! completion can therefore settle each transition.
//!
//! # Readiness
//!
//! Geometry needs the image's natural size. Until the image has loaded the
//! lightbox has no [`ComputedStyles`] and `show()` does nothing.

use crate::config::ClassesConfig;
use crate::geometry::{self, ComputedStyles, clip_styles};
use crate::host::{
    Action, AnimationHandle, Completion, ElementId, EventKind, EventTarget, Handler, Host, Key,
};
use crate::options::LightboxConfig;
use crate::pane::Pane;
use crate::registry::LightboxId;
use serde::Serialize;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Hidden,
    Showing,
    Shown,
    Hiding,
}

/// The clone shown in the pane while a lightbox is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Popup {
    pub layer: ElementId,
    pub image: Option<ElementId>,
    /// Backdrop the dismissal click handler is bound on.
    backdrop: ElementId,
}

#[derive(Debug)]
pub struct Lightbox {
    id: LightboxId,
    name: String,
    layer: ElementId,
    image: ElementId,
    config: LightboxConfig,
    styles: Option<ComputedStyles>,
    phase: Phase,
    popup: Option<Popup>,
    frame_animation: Option<AnimationHandle>,
    image_animation: Option<AnimationHandle>,
    escape_bound: bool,
}

impl Lightbox {
    pub fn new(
        id: LightboxId,
        name: String,
        layer: ElementId,
        image: ElementId,
        config: LightboxConfig,
    ) -> Self {
        Self {
            id,
            name,
            layer,
            image,
            config,
            styles: None,
            phase: Phase::Hidden,
            popup: None,
            frame_animation: None,
            image_animation: None,
            escape_bound: false,
        }
    }

    pub fn id(&self) -> LightboxId {
        self.id
    }

    /// The source element's id.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layer(&self) -> ElementId {
        self.layer
    }

    pub fn image(&self) -> ElementId {
        self.image
    }

    pub fn config(&self) -> &LightboxConfig {
        &self.config
    }

    pub fn styles(&self) -> Option<&ComputedStyles> {
        self.styles.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn popup(&self) -> Option<Popup> {
        self.popup
    }

    pub fn is_ready(&self) -> bool {
        self.styles.is_some()
    }

    pub fn is_showing(&self) -> bool {
        self.phase != Phase::Hidden
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Showing | Phase::Hiding)
    }

    fn handler(&self, action: Action) -> Handler {
        Handler::new(self.id, action)
    }

    /// Wire the source element into the host.
    ///
    /// Clip offsets go on the image straight away. Sizing waits for the image
    /// to load, either now or via [`Host::on_image_load`].
    pub fn attach<H: Host>(&mut self, host: &mut H) {
        let (thumbnail_clip, _) = clip_styles(&self.config.layout);
        if !thumbnail_clip.is_empty() {
            host.set_style(self.image, &thumbnail_clip);
        }
        host.bind_event(
            EventTarget::Element(self.layer),
            EventKind::KeyDown,
            self.handler(Action::ShowOnEnter),
        );
        if host.natural_image_size(self.image).is_some() {
            self.image_ready(host);
        } else {
            debug!(lightbox = %self.name, "waiting for image");
            host.on_image_load(self.image, self.id);
        }
    }

    /// Compute and apply thumbnail geometry, then accept clicks.
    ///
    /// Runs once; later calls are ignored.
    pub fn image_ready<H: Host>(&mut self, host: &mut H) {
        if self.styles.is_some() {
            return;
        }
        let Some(natural) = host.natural_image_size(self.image) else {
            warn!(lightbox = %self.name, "image reported ready without a size");
            return;
        };
        let styles = geometry::compute_styles(natural, self.config.scale, &self.config.layout);
        host.set_style(self.image, &styles.thumbnail_image_style);
        host.set_style(self.layer, &styles.thumbnail_size.to_style());
        host.bind_event(
            EventTarget::Element(self.layer),
            EventKind::Click,
            self.handler(Action::Show),
        );
        debug!(
            lightbox = %self.name,
            width = natural.width,
            height = natural.height,
            "image ready"
        );
        self.styles = Some(styles);
    }

    /// Expand the thumbnail into the pane.
    pub fn show<H: Host>(&mut self, host: &mut H, pane: &mut Pane) {
        if self.is_showing() {
            return;
        }
        let Some(styles) = self.styles.as_ref() else {
            debug!(lightbox = %self.name, "show ignored, image not ready");
            return;
        };
        let duration = self.config.duration_ms;
        let full_image_style = styles.full_image_style.clone();
        // Position is read fresh: the page may have scrolled or reflowed.
        let home = geometry::home_frame(
            host.page_offset(self.layer),
            host.scroll_offset(),
            styles.thumbnail_size,
        );
        let target = geometry::target_frame(host.viewport_size(), styles.image_size);

        let clone = host.clone_element(self.layer);
        let clone_image = host.find_image(clone);
        host.set_style(clone, &home.to_style());
        host.append_child(pane.layer(), clone);

        let hide = self.handler(Action::Hide);
        host.bind_event(EventTarget::Element(pane.backdrop()), EventKind::Click, hide);
        host.bind_event(EventTarget::Element(clone), EventKind::Click, hide);

        pane.show(host, duration);

        host.bind_event(
            EventTarget::Window,
            EventKind::KeyDown,
            self.handler(Action::HideOnEscape),
        );
        self.escape_bound = true;

        self.image_animation =
            clone_image.map(|image| host.animate_style(image, &full_image_style, duration, None));
        self.frame_animation = Some(host.animate_style(
            clone,
            &target.to_style(),
            duration,
            Some(Completion::Lightbox(self.id)),
        ));
        self.popup = Some(Popup {
            layer: clone,
            image: clone_image,
            backdrop: pane.backdrop(),
        });
        debug!(lightbox = %self.name, "showing");
        self.phase = Phase::Showing;
    }

    /// Collapse the popup back onto the thumbnail.
    pub fn hide<H: Host>(&mut self, host: &mut H, pane: &mut Pane, classes: &ClassesConfig) {
        if !self.is_showing() {
            return;
        }
        let (Some(styles), Some(popup)) = (self.styles.as_ref(), self.popup) else {
            return;
        };
        let duration = self.config.duration_ms;
        let thumbnail_image_style = styles.thumbnail_image_style.clone();
        // The thumbnail may have moved while expanded.
        let home = geometry::home_frame(
            host.page_offset(self.layer),
            host.scroll_offset(),
            styles.thumbnail_size,
        );

        pane.hide(host, duration);
        host.remove_class(popup.layer, &classes.active);

        if self.is_animating() {
            if let Some(handle) = self.frame_animation.take() {
                host.cancel(handle);
            }
        } else {
            // Shown rests at 50%/50%; go back to pixels before animating.
            host.set_style(popup.layer, &geometry::center_position(host.viewport_size()));
        }
        if let Some(handle) = self.image_animation.take() {
            host.cancel(handle);
        }

        if let Some(image) = popup.image {
            self.image_animation =
                Some(host.animate_style(image, &thumbnail_image_style, duration, None));
        }
        if self.escape_bound {
            host.unbind_event(
                EventTarget::Window,
                EventKind::KeyDown,
                self.handler(Action::HideOnEscape),
            );
            self.escape_bound = false;
        }
        self.frame_animation = Some(host.animate_style(
            popup.layer,
            &home.to_style(),
            duration,
            Some(Completion::Lightbox(self.id)),
        ));
        debug!(lightbox = %self.name, from = ?self.phase, "hiding");
        self.phase = Phase::Hiding;
    }

    /// Handle a keydown delivered to the window binding.
    ///
    /// Escape dismisses, but only while the binding installed by `show()` is
    /// live.
    pub fn key_down<H: Host>(
        &mut self,
        host: &mut H,
        pane: &mut Pane,
        classes: &ClassesConfig,
        key: Key,
    ) {
        if key == Key::Escape && self.escape_bound {
            self.hide(host, pane, classes);
        }
    }

    /// Called when a frame animation started by this lightbox settles.
    pub fn animation_settled<H: Host>(
        &mut self,
        host: &mut H,
        handle: AnimationHandle,
        classes: &ClassesConfig,
    ) {
        if self.frame_animation != Some(handle) {
            trace!(lightbox = %self.name, ?handle, "ignoring superseded animation");
            return;
        }
        self.frame_animation = None;
        let Some(popup) = self.popup else {
            return;
        };
        match self.phase {
            Phase::Showing => {
                host.add_class(popup.layer, &classes.active);
                host.set_style(popup.layer, &geometry::resting_position());
                self.phase = Phase::Shown;
            }
            Phase::Hiding => {
                host.detach(popup.layer);
                let hide = self.handler(Action::Hide);
                host.unbind_event(EventTarget::Element(popup.layer), EventKind::Click, hide);
                host.unbind_event(EventTarget::Element(popup.backdrop), EventKind::Click, hide);
                self.image_animation = None;
                self.popup = None;
                self.phase = Phase::Hidden;
            }
            Phase::Hidden | Phase::Shown => {}
        }
        debug!(lightbox = %self.name, phase = ?self.phase, "settled");
    }
}
