//! In-memory host for tests and simulation
//!
//! [`MemoryHost`] keeps a tiny element tree with inline styles, answers
//! simple selectors (`.class`, `#id`, `tag`, and descendant chains of those),
//! and records every listener registration so binding behavior can be
//! asserted on.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{PlatformError, Result};
use crate::host::{Capabilities, Host, ListenerTarget, Size, Surface};
use crate::input::NativeEvent;

// ============================================================================
// Elements
// ============================================================================

#[derive(Debug, Default)]
struct ElementData {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    styles: FxHashMap<String, String>,
    size: Size,
    renderable: bool,
    children: Vec<MemoryElement>,
}

/// Shared handle to an in-memory element
#[derive(Clone, Debug)]
pub struct MemoryElement {
    inner: Rc<RefCell<ElementData>>,
}

impl PartialEq for MemoryElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl MemoryElement {
    /// Create a renderable element with the given tag
    pub fn new(tag: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ElementData {
                tag: tag.to_ascii_lowercase(),
                renderable: true,
                ..Default::default()
            })),
        }
    }

    /// Add a class name
    pub fn with_class(self, class: &str) -> Self {
        self.inner.borrow_mut().classes.push(class.to_string());
        self
    }

    /// Set the id attribute
    pub fn with_id(self, id: &str) -> Self {
        self.inner.borrow_mut().id = Some(id.to_string());
        self
    }

    /// Append a child element
    pub fn append_child(&self, child: MemoryElement) {
        self.inner.borrow_mut().children.push(child);
    }

    /// Set the size reported as the rendered size
    pub fn set_rendered_size(&self, size: Size) {
        self.inner.borrow_mut().size = size;
    }

    /// Mark the element as detached / not renderable
    pub fn set_renderable(&self, renderable: bool) {
        self.inner.borrow_mut().renderable = renderable;
    }

    /// Direct children
    pub fn children(&self) -> Vec<MemoryElement> {
        self.inner.borrow().children.clone()
    }

    /// Whether `display` is set to something other than `none`
    pub fn is_visible(&self) -> bool {
        matches!(self.style("display"), Some(ref d) if d != "none")
    }

    /// Parsed `zIndex`, if set
    pub fn z_index(&self) -> Option<i32> {
        self.style("zIndex").and_then(|z| z.parse().ok())
    }

    fn matches(&self, simple: &str) -> bool {
        let data = self.inner.borrow();
        if let Some(class) = simple.strip_prefix('.') {
            data.classes.iter().any(|c| c == class)
        } else if let Some(id) = simple.strip_prefix('#') {
            data.id.as_deref() == Some(id)
        } else {
            data.tag.eq_ignore_ascii_case(simple)
        }
    }

    fn collect_descendants(&self, simple: &str, out: &mut Vec<MemoryElement>) {
        for child in self.children() {
            if child.matches(simple) {
                out.push(child.clone());
            }
            child.collect_descendants(simple, out);
        }
    }

    fn select_all(&self, selector: &str) -> Result<Vec<MemoryElement>> {
        let parts: Vec<&str> = selector.split_whitespace().collect();
        if parts.is_empty() || parts.iter().any(|p| !is_simple_selector(p)) {
            return Err(PlatformError::InvalidSelector(selector.to_string()));
        }

        let mut scope = vec![self.clone()];
        for part in parts {
            let mut next = Vec::new();
            for root in &scope {
                root.collect_descendants(part, &mut next);
            }
            // nested scopes reach the same element more than once
            let mut unique: Vec<MemoryElement> = Vec::with_capacity(next.len());
            for element in next {
                if !unique.contains(&element) {
                    unique.push(element);
                }
            }
            scope = unique;
        }
        Ok(scope)
    }
}

fn is_simple_selector(part: &str) -> bool {
    let name = part.trim_start_matches(['.', '#']);
    !name.is_empty()
        && part.len() - name.len() <= 1
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl Surface for MemoryElement {
    fn set_style(&self, property: &str, value: &str) {
        let mut data = self.inner.borrow_mut();
        if value.is_empty() {
            data.styles.remove(property);
        } else {
            data.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn style(&self, property: &str) -> Option<String> {
        self.inner.borrow().styles.get(property).cloned()
    }

    fn rendered_size(&self) -> Size {
        self.inner.borrow().size
    }

    fn is_renderable(&self) -> bool {
        self.inner.borrow().renderable
    }
}

// ============================================================================
// Host
// ============================================================================

/// A listener registration change, in call order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenerChange {
    Added(ListenerTarget, NativeEvent),
    Removed(ListenerTarget, NativeEvent),
}

/// In-memory [`Host`] implementation
pub struct MemoryHost {
    body: MemoryElement,
    capabilities: Capabilities,
    supported_styles: FxHashSet<String>,
    viewport: Size,
    listeners: FxHashSet<(ListenerTarget, NativeEvent)>,
    log: Vec<ListenerChange>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// Host with unprefixed transform/transition support and a 320x568 viewport
    pub fn new() -> Self {
        Self::with_styles(&[
            "transform",
            "transition",
            "transitionDuration",
            "transitionTimingFunction",
            "transitionProperty",
            "perspective",
        ])
    }

    /// Host that only knows webkit-prefixed transform/transition properties
    pub fn webkit() -> Self {
        Self::with_styles(&[
            "webkitTransform",
            "webkitTransition",
            "webkitTransitionDuration",
            "webkitTransitionTimingFunction",
            "webkitTransitionProperty",
            "webkitPerspective",
        ])
    }

    /// Host without any transform/transition support
    pub fn legacy() -> Self {
        Self::with_styles(&[])
    }

    /// Host supporting exactly the given style property names
    pub fn with_styles(styles: &[&str]) -> Self {
        let body = MemoryElement::new("body");
        let viewport = Size::new(320.0, 568.0);
        body.set_rendered_size(viewport);
        Self {
            body,
            capabilities: Capabilities::default(),
            supported_styles: styles.iter().map(|s| s.to_string()).collect(),
            viewport,
            listeners: FxHashSet::default(),
            log: Vec::new(),
        }
    }

    /// Override detected capabilities
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Override the viewport size
    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = viewport;
        self
    }

    /// Change the viewport size (as a rotation or window resize would)
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Build `body > div.pageWrap > div.m-page * count`
    ///
    /// The wrapper reports `rendered` as its size.
    pub fn mount_pages(&self, count: usize, rendered: Size) -> (MemoryElement, Vec<MemoryElement>) {
        let wrapper = MemoryElement::new("div").with_class("pageWrap");
        wrapper.set_rendered_size(rendered);
        let pages: Vec<_> = (0..count)
            .map(|i| {
                let page = MemoryElement::new("div").with_class("m-page");
                page.set_rendered_size(rendered);
                page.append_child(MemoryElement::new("img").with_id(&format!("page-img-{i}")));
                wrapper.append_child(page.clone());
                page
            })
            .collect();
        self.body.append_child(wrapper.clone());
        (wrapper, pages)
    }

    /// Whether a listener is currently registered
    pub fn has_listener(&self, target: ListenerTarget, event: NativeEvent) -> bool {
        self.listeners.contains(&(target, event))
    }

    /// Number of currently registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Every registration change so far
    pub fn listener_log(&self) -> &[ListenerChange] {
        &self.log
    }
}

impl Host for MemoryHost {
    type Element = MemoryElement;

    fn body(&self) -> MemoryElement {
        self.body.clone()
    }

    fn query_selector(&self, selector: &str) -> Result<Option<MemoryElement>> {
        Ok(self.body.select_all(selector)?.into_iter().next())
    }

    fn query_selector_all(&self, root: &MemoryElement, selector: &str) -> Result<Vec<MemoryElement>> {
        root.select_all(selector)
    }

    fn children(&self, root: &MemoryElement) -> Vec<MemoryElement> {
        root.children()
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn supports_style(&self, property: &str) -> bool {
        self.supported_styles.contains(property)
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn add_listener(&mut self, target: ListenerTarget, event: NativeEvent) {
        if self.listeners.insert((target, event)) {
            tracing::trace!("listener added: {:?} {}", target, event.name());
        }
        self.log.push(ListenerChange::Added(target, event));
    }

    fn remove_listener(&mut self, target: ListenerTarget, event: NativeEvent) {
        self.listeners.remove(&(target, event));
        self.log.push(ListenerChange::Removed(target, event));
    }
}
