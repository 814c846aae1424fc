//! The shared overlay behind expanded images.
//!
//! One pane exists per page. It is a container holding a modal backdrop and
//! any popup clones. Showing fades the backdrop from 0 to its authored
//! opacity; hiding fades it to 0 and then takes the container out of the
//! layout so it cannot catch clicks.
//!
//! Every lightbox drives the same fade. A new request always cancels the one
//! in flight, so the last show or hide decides the final opacity.

use crate::config::ClassesConfig;
use crate::geometry::{Property, Style};
use crate::host::{AnimationHandle, Completion, ElementId, Host};
use serde::Serialize;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PanePhase {
    Hidden,
    Showing,
    Shown,
    Hiding,
}

#[derive(Debug)]
pub struct Pane {
    layer: ElementId,
    backdrop: ElementId,
    resting_opacity: String,
    phase: PanePhase,
    animation: Option<AnimationHandle>,
}

impl Pane {
    /// Build the pane inside the document body, initially hidden.
    ///
    /// The backdrop's authored opacity is read once here; page CSS may dim it
    /// below 1.
    pub fn create<H: Host>(host: &mut H, classes: &ClassesConfig) -> Self {
        let layer = host.create_element(&classes.pane);
        let backdrop = host.create_element(&classes.modal);
        host.append_child(layer, backdrop);
        let body = host.body();
        host.append_child(body, layer);
        host.set_visible(layer, false);

        let resting_opacity = host
            .computed_style(backdrop, Property::Opacity)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|o| o.is_finite() && (0.0..=1.0).contains(o))
            .unwrap_or(1.0);

        Self {
            layer,
            backdrop,
            resting_opacity: resting_opacity.to_string(),
            phase: PanePhase::Hidden,
            animation: None,
        }
    }

    pub fn layer(&self) -> ElementId {
        self.layer
    }

    pub fn backdrop(&self) -> ElementId {
        self.backdrop
    }

    pub fn phase(&self) -> PanePhase {
        self.phase
    }

    pub fn resting_opacity(&self) -> &str {
        &self.resting_opacity
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, PanePhase::Showing | PanePhase::Hiding)
    }

    fn cancel_in_flight<H: Host>(&mut self, host: &mut H) {
        if let Some(handle) = self.animation.take() {
            host.cancel(handle);
        }
    }

    pub fn show<H: Host>(&mut self, host: &mut H, duration_ms: f64) {
        self.cancel_in_flight(host);
        host.set_style(self.backdrop, &Style::new().with(Property::Opacity, "0"));
        host.set_visible(self.layer, true);
        let target = Style::new().with(Property::Opacity, self.resting_opacity.clone());
        self.animation = Some(host.animate_style(
            self.backdrop,
            &target,
            duration_ms,
            Some(Completion::Pane),
        ));
        debug!(from = ?self.phase, "pane showing");
        self.phase = PanePhase::Showing;
    }

    pub fn hide<H: Host>(&mut self, host: &mut H, duration_ms: f64) {
        self.cancel_in_flight(host);
        let target = Style::new().with(Property::Opacity, "0");
        self.animation = Some(host.animate_style(
            self.backdrop,
            &target,
            duration_ms,
            Some(Completion::Pane),
        ));
        debug!(from = ?self.phase, "pane hiding");
        self.phase = PanePhase::Hiding;
    }

    /// Called when the backdrop fade identified by `handle` settles.
    pub fn animation_settled<H: Host>(&mut self, host: &mut H, handle: AnimationHandle) {
        if self.animation != Some(handle) {
            trace!(?handle, "ignoring superseded pane animation");
            return;
        }
        self.animation = None;
        match self.phase {
            PanePhase::Showing => self.phase = PanePhase::Shown,
            PanePhase::Hiding => {
                host.set_visible(self.layer, false);
                self.phase = PanePhase::Hidden;
            }
            PanePhase::Hidden | PanePhase::Shown => {}
        }
        debug!(phase = ?self.phase, "pane settled");
    }
}
