//! The page controller: one pane, every lightbox, and the routing between
//! them and the host.
//!
//! [`Page::attach`] is the document-ready step. After that the host feeds the
//! page three kinds of input:
//!
//! - [`Page::dispatch`] for a bound [`Handler`] whose event fired,
//! - [`Page::image_loaded`] for an image a lightbox was waiting on,
//! - [`Page::animation_settled`] for an animation started with a [`Completion`].

use crate::config::PageConfig;
use crate::host::{Action, AnimationHandle, Completion, Event, Handler, Host, Key};
use crate::lightbox::Lightbox;
use crate::options::LightboxConfig;
use crate::pane::Pane;
use crate::registry::{LightboxId, Registry};
use tracing::{info, warn};

#[derive(Debug)]
pub struct Page {
    config: PageConfig,
    pane: Pane,
    registry: Registry,
}

impl Page {
    /// Build the pane and a lightbox for every marked element.
    ///
    /// Marked elements without an `<img>` are skipped.
    pub fn attach<H: Host>(host: &mut H, config: PageConfig) -> Self {
        let pane = Pane::create(host, &config.classes);
        let mut registry = Registry::new(config.id_prefix.clone());

        for element in host.query_elements_by_marker(&config.marker) {
            let Some(image) = host.find_image(element) else {
                warn!(?element, "marked element has no image, skipping");
                continue;
            };
            let name = match host.dom_id(element) {
                Some(id) if !id.is_empty() => id,
                _ => {
                    let generated = registry.generate_name();
                    host.set_dom_id(element, &generated);
                    generated
                }
            };
            let options = host.read_declared_options(element);
            let lightbox_config = LightboxConfig::from_declared(&options, &config.defaults);
            let mut lightbox =
                Lightbox::new(registry.next_id(), name, element, image, lightbox_config);
            lightbox.attach(host);
            registry.insert(lightbox);
        }

        info!(lightboxes = registry.len(), "page attached");
        Self {
            config,
            pane,
            registry,
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn pane(&self) -> &Pane {
        &self.pane
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn lightbox(&self, id: LightboxId) -> Option<&Lightbox> {
        self.registry.get(id)
    }

    /// Find a lightbox by its source element's id.
    pub fn lookup(&self, name: &str) -> Option<&Lightbox> {
        self.registry.lookup(name)
    }

    pub fn show<H: Host>(&mut self, host: &mut H, id: LightboxId) {
        if let Some(lightbox) = self.registry.get_mut(id) {
            lightbox.show(host, &mut self.pane);
        }
    }

    pub fn hide<H: Host>(&mut self, host: &mut H, id: LightboxId) {
        if let Some(lightbox) = self.registry.get_mut(id) {
            lightbox.hide(host, &mut self.pane, &self.config.classes);
        }
    }

    /// Run a bound handler for the event that fired.
    pub fn dispatch<H: Host>(&mut self, host: &mut H, handler: Handler, event: Event) {
        let Some(lightbox) = self.registry.get_mut(handler.lightbox) else {
            warn!(lightbox = %handler.lightbox, "handler for unknown lightbox");
            return;
        };
        match (handler.action, event) {
            (Action::Show, Event::Click) | (Action::ShowOnEnter, Event::KeyDown(Key::Enter)) => {
                lightbox.show(host, &mut self.pane);
            }
            (Action::Hide, Event::Click) => {
                lightbox.hide(host, &mut self.pane, &self.config.classes);
            }
            (Action::HideOnEscape, Event::KeyDown(key)) => {
                lightbox.key_down(host, &mut self.pane, &self.config.classes, key);
            }
            _ => {}
        }
    }

    /// An image a lightbox was waiting on has loaded.
    pub fn image_loaded<H: Host>(&mut self, host: &mut H, id: LightboxId) {
        if let Some(lightbox) = self.registry.get_mut(id) {
            lightbox.image_ready(host);
        }
    }

    /// An animation started with a completion has settled.
    pub fn animation_settled<H: Host>(
        &mut self,
        host: &mut H,
        handle: AnimationHandle,
        completion: Completion,
    ) {
        match completion {
            Completion::Pane => self.pane.animation_settled(host, handle),
            Completion::Lightbox(id) => {
                if let Some(lightbox) = self.registry.get_mut(id) {
                    lightbox.animation_settled(host, handle, &self.config.classes);
                }
            }
        }
    }
}
