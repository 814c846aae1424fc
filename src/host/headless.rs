//! In-memory host with a virtual clock.
//!
//! [`HeadlessHost`] keeps a small element tree (classes, inline styles,
//! visibility, page offsets, natural image sizes), a viewport and scroll
//! position, event bindings, and pending animations. Animations do not
//! interpolate: when the clock passes an animation's end, its target style is
//! applied and its completion is handed back. Every mutation is recorded as a
//! [`HostOp`] so tests can assert on what the engine asked for.
//!
//! [`HeadlessSession`] pairs a host with a [`Page`] and plays the role of the
//! browser's event loop: it routes clicks and keys to bound handlers, reports
//! image loads, and delivers animation completions in end-time order.

use super::{
    AnimationHandle, Completion, ElementId, Event, EventKind, EventTarget, Handler, Host, Key,
};
use crate::config::PageConfig;
use crate::geometry::{ImageSize, Offset, Property, Size, Style};
use crate::lightbox::Phase;
use crate::options::DeclaredOptions;
use crate::page::Page;
use crate::pane::PanePhase;
use crate::registry::LightboxId;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A recorded host mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum HostOp {
    Create(ElementId, String),
    Clone { source: ElementId, clone: ElementId },
    Append { parent: ElementId, child: ElementId },
    Detach(ElementId),
    SetDomId(ElementId, String),
    AddClass(ElementId, String),
    RemoveClass(ElementId, String),
    SetVisible(ElementId, bool),
    SetStyle(ElementId, Style),
    Animate {
        handle: AnimationHandle,
        element: ElementId,
        target: Style,
        duration_ms: f64,
    },
    Cancel(AnimationHandle),
    Settled(AnimationHandle),
    Bind(EventTarget, EventKind, Handler),
    Unbind(EventTarget, EventKind, Handler),
    AwaitLoad(ElementId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Div,
    Img,
}

#[derive(Debug, Clone)]
struct Node {
    tag: Tag,
    classes: BTreeSet<String>,
    dom_id: Option<String>,
    style: Style,
    visible: bool,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    page_offset: Offset,
    natural_size: Option<ImageSize>,
    options: DeclaredOptions,
}

impl Node {
    fn new(tag: Tag) -> Self {
        Self {
            tag,
            classes: BTreeSet::new(),
            dom_id: None,
            style: Style::new(),
            visible: true,
            parent: None,
            children: Vec::new(),
            page_offset: Offset::default(),
            natural_size: None,
            options: DeclaredOptions::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct PendingAnimation {
    element: ElementId,
    target: Style,
    ends_at: f64,
    completion: Option<Completion>,
}

/// An animation that reached its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settled {
    pub handle: AnimationHandle,
    pub element: ElementId,
    pub completion: Option<Completion>,
}

#[derive(Debug)]
pub struct HeadlessHost {
    nodes: BTreeMap<ElementId, Node>,
    next_element: u64,
    body: ElementId,
    viewport: Size,
    scroll: Offset,
    clock_ms: f64,
    next_animation: u64,
    animations: BTreeMap<AnimationHandle, PendingAnimation>,
    bindings: Vec<(EventTarget, EventKind, Handler)>,
    load_waiters: Vec<(ElementId, LightboxId)>,
    authored: BTreeMap<(String, Property), String>,
    ops: Vec<HostOp>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    /// An empty document with a 1024x768 viewport.
    pub fn new() -> Self {
        let body = ElementId(0);
        let mut nodes = BTreeMap::new();
        nodes.insert(body, Node::new(Tag::Div));
        Self {
            nodes,
            next_element: 1,
            body,
            viewport: Size::new(1024, 768),
            scroll: Offset::default(),
            clock_ms: 0.0,
            next_animation: 0,
            animations: BTreeMap::new(),
            bindings: Vec::new(),
            load_waiters: Vec::new(),
            authored: BTreeMap::new(),
            ops: Vec::new(),
        }
    }

    fn insert_node(&mut self, node: Node) -> ElementId {
        let id = ElementId(self.next_element);
        self.next_element += 1;
        self.nodes.insert(id, node);
        id
    }

    // =========================================================================
    // Document setup
    // =========================================================================

    /// Add a marked `<div>` holding one `<img>` to the body.
    ///
    /// Returns `(element, image)`. `natural` of `None` leaves the image
    /// undecoded until [`HeadlessHost::set_natural_size`].
    pub fn add_thumbnail(
        &mut self,
        marker: &str,
        options: DeclaredOptions,
        natural: Option<ImageSize>,
    ) -> (ElementId, ElementId) {
        let mut layer = Node::new(Tag::Div);
        layer.classes.insert(marker.to_string());
        layer.options = options;
        layer.parent = Some(self.body);
        let layer = self.insert_node(layer);

        let mut image = Node::new(Tag::Img);
        image.natural_size = natural;
        image.parent = Some(layer);
        let image = self.insert_node(image);

        self.node_mut(layer).children.push(image);
        let body = self.body;
        self.node_mut(body).children.push(layer);
        (layer, image)
    }

    /// Declare a stylesheet rule: elements with `class` get `value` for
    /// `property` unless set inline.
    pub fn author_style(&mut self, class: &str, property: Property, value: &str) {
        self.authored
            .insert((class.to_string(), property), value.to_string());
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn set_scroll(&mut self, scroll: Offset) {
        self.scroll = scroll;
    }

    pub fn set_page_offset(&mut self, element: ElementId, offset: Offset) {
        self.node_mut(element).page_offset = offset;
    }

    pub fn set_natural_size(&mut self, image: ElementId, size: ImageSize) {
        self.node_mut(image).natural_size = Some(size);
    }

    pub fn set_dom_id_attr(&mut self, element: ElementId, id: &str) {
        self.node_mut(element).dom_id = Some(id.to_string());
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn ops(&self) -> &[HostOp] {
        &self.ops
    }

    pub fn clock(&self) -> f64 {
        self.clock_ms
    }

    pub fn set_clock(&mut self, ms: f64) {
        self.clock_ms = self.clock_ms.max(ms);
    }

    pub fn pending_animations(&self) -> usize {
        self.animations.len()
    }

    pub fn style_of(&self, element: ElementId, property: Property) -> Option<&str> {
        self.nodes.get(&element)?.style.get(property)
    }

    pub fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.nodes
            .get(&element)
            .is_some_and(|n| n.classes.contains(class))
    }

    pub fn is_visible(&self, element: ElementId) -> bool {
        self.nodes.get(&element).is_some_and(|n| n.visible)
    }

    pub fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.nodes.get(&element)?.parent
    }

    pub fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.nodes
            .get(&element)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Handlers bound on exactly this target for this kind.
    pub fn handlers(&self, target: EventTarget, kind: EventKind) -> Vec<Handler> {
        self.bindings
            .iter()
            .filter(|(t, k, _)| *t == target && *k == kind)
            .map(|(_, _, h)| *h)
            .collect()
    }

    pub fn load_waiters(&self, image: ElementId) -> Vec<LightboxId> {
        self.load_waiters
            .iter()
            .filter(|(img, _)| *img == image)
            .map(|(_, id)| *id)
            .collect()
    }

    /// Remove and return the lightboxes waiting on an image.
    pub fn take_load_waiters(&mut self, image: ElementId) -> Vec<LightboxId> {
        let waiting = self.load_waiters(image);
        self.load_waiters.retain(|(img, _)| *img != image);
        waiting
    }

    /// The target itself, its ancestors, then the window.
    pub fn propagation_path(&self, target: EventTarget) -> Vec<EventTarget> {
        let mut path = Vec::new();
        if let EventTarget::Element(element) = target {
            let mut current = Some(element);
            while let Some(e) = current {
                path.push(EventTarget::Element(e));
                current = self.parent(e);
            }
        }
        path.push(EventTarget::Window);
        path
    }

    // =========================================================================
    // Clock
    // =========================================================================

    /// Settle the earliest animation ending at or before `until`.
    ///
    /// Applies its target style and moves the clock to its end time.
    pub fn pop_due(&mut self, until: f64) -> Option<Settled> {
        let (&handle, _) = self
            .animations
            .iter()
            .filter(|(_, a)| a.ends_at <= until)
            .min_by(|(ha, a), (hb, b)| a.ends_at.total_cmp(&b.ends_at).then(ha.cmp(hb)))?;
        let animation = self.animations.remove(&handle)?;
        if let Some(node) = self.nodes.get_mut(&animation.element) {
            node.style.merge(&animation.target);
        }
        self.clock_ms = self.clock_ms.max(animation.ends_at);
        self.ops.push(HostOp::Settled(handle));
        Some(Settled {
            handle,
            element: animation.element,
            completion: animation.completion,
        })
    }

    /// Move the clock forward, settling everything due on the way.
    pub fn advance(&mut self, ms: f64) -> Vec<Settled> {
        let until = self.clock_ms + ms;
        let mut settled = Vec::new();
        while let Some(s) = self.pop_due(until) {
            settled.push(s);
        }
        self.clock_ms = until;
        settled
    }

    fn node(&self, element: ElementId) -> Option<&Node> {
        self.nodes.get(&element)
    }

    fn node_mut(&mut self, element: ElementId) -> &mut Node {
        self.nodes
            .entry(element)
            .or_insert_with(|| Node::new(Tag::Div))
    }

    fn copy_subtree(&mut self, element: ElementId) -> Option<ElementId> {
        let source = self.node(element)?.clone();
        let mut copy = source.clone();
        copy.dom_id = None;
        copy.parent = None;
        copy.children = Vec::new();
        copy.page_offset = Offset::default();
        let id = self.insert_node(copy);
        for child in source.children {
            if let Some(child_copy) = self.copy_subtree(child) {
                self.node_mut(child_copy).parent = Some(id);
                self.node_mut(id).children.push(child_copy);
            }
        }
        Some(id)
    }
}

impl Host for HeadlessHost {
    fn query_elements_by_marker(&self, marker: &str) -> Vec<ElementId> {
        self.nodes
            .iter()
            .filter(|(id, n)| n.classes.contains(marker) && self.is_attached(**id))
            .map(|(id, _)| *id)
            .collect()
    }

    fn read_declared_options(&self, element: ElementId) -> DeclaredOptions {
        self.node(element)
            .map(|n| n.options.clone())
            .unwrap_or_default()
    }

    fn dom_id(&self, element: ElementId) -> Option<String> {
        self.node(element)?.dom_id.clone()
    }

    fn set_dom_id(&mut self, element: ElementId, id: &str) {
        self.node_mut(element).dom_id = Some(id.to_string());
        self.ops.push(HostOp::SetDomId(element, id.to_string()));
    }

    fn find_image(&self, element: ElementId) -> Option<ElementId> {
        let node = self.node(element)?;
        node.children.iter().find_map(|&child| {
            match self.node(child).map(|n| n.tag) {
                Some(Tag::Img) => Some(child),
                _ => self.find_image(child),
            }
        })
    }

    fn body(&self) -> ElementId {
        self.body
    }

    fn create_element(&mut self, class: &str) -> ElementId {
        let mut node = Node::new(Tag::Div);
        node.classes.insert(class.to_string());
        let id = self.insert_node(node);
        self.ops.push(HostOp::Create(id, class.to_string()));
        id
    }

    fn clone_element(&mut self, element: ElementId) -> ElementId {
        let clone = self
            .copy_subtree(element)
            .unwrap_or_else(|| self.insert_node(Node::new(Tag::Div)));
        self.ops.push(HostOp::Clone {
            source: element,
            clone,
        });
        clone
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.detach_silently(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
        self.ops.push(HostOp::Append { parent, child });
    }

    fn detach(&mut self, element: ElementId) {
        self.detach_silently(element);
        self.ops.push(HostOp::Detach(element));
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        self.node_mut(element).classes.insert(class.to_string());
        self.ops.push(HostOp::AddClass(element, class.to_string()));
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        self.node_mut(element).classes.remove(class);
        self.ops.push(HostOp::RemoveClass(element, class.to_string()));
    }

    fn set_visible(&mut self, element: ElementId, visible: bool) {
        self.node_mut(element).visible = visible;
        self.ops.push(HostOp::SetVisible(element, visible));
    }

    fn computed_style(&self, element: ElementId, property: Property) -> Option<String> {
        let node = self.node(element)?;
        if let Some(inline) = node.style.get(property) {
            return Some(inline.to_string());
        }
        node.classes
            .iter()
            .find_map(|class| self.authored.get(&(class.clone(), property)).cloned())
    }

    fn page_offset(&self, element: ElementId) -> Offset {
        self.node(element)
            .map(|n| n.page_offset)
            .unwrap_or_default()
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn scroll_offset(&self) -> Offset {
        self.scroll
    }

    fn natural_image_size(&self, image: ElementId) -> Option<ImageSize> {
        self.node(image)?.natural_size
    }

    fn set_style(&mut self, element: ElementId, style: &Style) {
        self.node_mut(element).style.merge(style);
        self.ops.push(HostOp::SetStyle(element, style.clone()));
    }

    fn animate_style(
        &mut self,
        element: ElementId,
        target: &Style,
        duration_ms: f64,
        on_complete: Option<Completion>,
    ) -> AnimationHandle {
        let handle = AnimationHandle(self.next_animation);
        self.next_animation += 1;
        self.animations.insert(
            handle,
            PendingAnimation {
                element,
                target: target.clone(),
                ends_at: self.clock_ms + duration_ms.max(0.0),
                completion: on_complete,
            },
        );
        self.ops.push(HostOp::Animate {
            handle,
            element,
            target: target.clone(),
            duration_ms,
        });
        handle
    }

    fn cancel(&mut self, handle: AnimationHandle) {
        if self.animations.remove(&handle).is_some() {
            self.ops.push(HostOp::Cancel(handle));
        }
    }

    fn bind_event(&mut self, target: EventTarget, kind: EventKind, handler: Handler) {
        self.bindings.push((target, kind, handler));
        self.ops.push(HostOp::Bind(target, kind, handler));
    }

    fn unbind_event(&mut self, target: EventTarget, kind: EventKind, handler: Handler) {
        self.bindings
            .retain(|(t, k, h)| !(*t == target && *k == kind && *h == handler));
        self.ops.push(HostOp::Unbind(target, kind, handler));
    }

    fn on_image_load(&mut self, image: ElementId, lightbox: LightboxId) {
        self.load_waiters.push((image, lightbox));
        self.ops.push(HostOp::AwaitLoad(image));
    }
}

impl HeadlessHost {
    fn is_attached(&self, element: ElementId) -> bool {
        let mut current = Some(element);
        while let Some(e) = current {
            if e == self.body {
                return true;
            }
            current = self.parent(e);
        }
        false
    }

    fn detach_silently(&mut self, element: ElementId) {
        if let Some(parent) = self.nodes.get(&element).and_then(|n| n.parent) {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.retain(|c| *c != element);
            }
            self.node_mut(element).parent = None;
        }
    }
}

/// State of one lightbox and the pane at a point in a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub clock_ms: f64,
    pub lightbox: String,
    pub phase: Phase,
    pub pane: PanePhase,
    pub popup_attached: bool,
    pub pending_animations: usize,
}

/// A headless page plus the event loop that drives it.
#[derive(Debug)]
pub struct HeadlessSession {
    pub host: HeadlessHost,
    pub page: Page,
}

impl HeadlessSession {
    /// Run the document-ready step against a prepared host.
    pub fn attach(mut host: HeadlessHost, config: PageConfig) -> Self {
        let page = Page::attach(&mut host, config);
        Self { host, page }
    }

    fn fire(&mut self, target: EventTarget, event: Event) -> usize {
        let mut fired = 0;
        for step in self.host.propagation_path(target) {
            for handler in self.host.handlers(step, event.kind()) {
                self.page.dispatch(&mut self.host, handler, event);
                fired += 1;
            }
        }
        fired
    }

    /// Click an element. Returns how many handlers ran.
    pub fn click(&mut self, element: ElementId) -> usize {
        self.fire(EventTarget::Element(element), Event::Click)
    }

    /// Press a key with focus on `target`. Returns how many handlers ran.
    pub fn press_key(&mut self, target: EventTarget, key: Key) -> usize {
        self.fire(target, Event::KeyDown(key))
    }

    /// Finish decoding an image and notify whoever waits on it.
    pub fn finish_loading(&mut self, image: ElementId, size: ImageSize) {
        self.host.set_natural_size(image, size);
        for lightbox in self.host.take_load_waiters(image) {
            self.page.image_loaded(&mut self.host, lightbox);
        }
    }

    /// Let `ms` pass, delivering completions in end-time order.
    pub fn wait(&mut self, ms: f64) {
        let until = self.host.clock() + ms;
        while let Some(settled) = self.host.pop_due(until) {
            if let Some(completion) = settled.completion {
                self.page
                    .animation_settled(&mut self.host, settled.handle, completion);
            }
        }
        self.host.set_clock(until);
    }

    pub fn snapshot(&self, name: &str) -> Option<Snapshot> {
        let lightbox = self.page.lookup(name)?;
        Some(Snapshot {
            clock_ms: self.host.clock(),
            lightbox: lightbox.name().to_string(),
            phase: lightbox.phase(),
            pane: self.page.pane().phase(),
            popup_attached: lightbox
                .popup()
                .is_some_and(|p| self.host.parent(p.layer).is_some()),
            pending_animations: self.host.pending_animations(),
        })
    }
}
