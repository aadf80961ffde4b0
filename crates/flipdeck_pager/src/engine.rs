//! The page-transition engine
//!
//! A one-axis, full-screen slide pager. Gestures move through four states:
//!
//! ```text
//!            start                first move with candidate
//!   Idle ───────────▶ Tracking ─────────────────────────────▶ Locked
//!    ▲                   │  release (tap)                       │ release
//!    │◀──────────────────┘                                      ▼
//!    │      transition end (commit / rollback)              Settling
//!    └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Only `Idle` accepts a new gesture. `Settling` lasts until the host reports
//! a transition end on one of the two slides involved (or completes inline
//! when transitions are unavailable or the duration is zero).
//!
//! # Example
//!
//! ```ignore
//! use flipdeck_pager::{Pager, ContainerSpec, SlideSpec, PageEvent};
//!
//! let mut pager = Pager::new(host, ContainerSpec::Selector(".pageWrap"),
//!     SlideSpec::Selector(".m-page"), PageConfig::default())?;
//!
//! pager.on(PageEvent::Success, |payload| {
//!     if let Some((from, to)) = payload.indices() {
//!         println!("slide {from} -> {to}");
//!     }
//! });
//!
//! // From the host's listener callback
//! let response = pager.handle_event(&event);
//! ```

use std::rc::Rc;
use std::time::Instant;

use flipdeck_core::{PageConfig, StyleProbe};
use flipdeck_platform::{
    EventKind, EventResponse, EventTarget, Host, InputEvent, PointerButton, Size, Surface,
};

use crate::binding::{BindingManager, HandlerTable};
use crate::error::{PagerError, Result};
use crate::event::{EventPayload, PageEvent, PagerBus, SlideRef};
use crate::gesture::{Direction, EdgePolicy, Gesture};
use crate::resize::ResizeCoordinator;
use crate::transition::{set_visible, set_z_index, SlideStyler, Z_BASE, Z_RAISED};

// ============================================================================
// Construction inputs
// ============================================================================

/// How to find the container
#[derive(Clone, Debug)]
pub enum ContainerSpec<'a, E> {
    /// The document body
    Body,
    /// An element handle
    Element(E),
    /// First match of a selector
    Selector(&'a str),
}

/// How to find the slides
#[derive(Clone, Debug)]
pub enum SlideSpec<'a, E> {
    /// Every direct child of the container
    Children,
    /// Explicit handles, in order
    Elements(Vec<E>),
    /// Every match of a selector below the container
    Selector(&'a str),
}

// ============================================================================
// State
// ============================================================================

/// Observable engine state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagerState {
    /// No gesture in flight
    Idle,
    /// Gesture active, no candidate locked yet
    Tracking,
    /// Candidate revealed, slides follow the drag
    Locked,
    /// Released, animating toward commit or rollback
    Settling,
}

/// How a released drag resolves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The candidate becomes current
    Commit,
    /// Both slides return to rest
    Rollback,
}

#[derive(Clone, Debug)]
struct Settle {
    outgoing: usize,
    incoming: usize,
    outcome: Outcome,
}

#[derive(Clone, Debug)]
enum Phase {
    Idle,
    Tracking(Gesture),
    Locked(Gesture),
    Settling(Settle),
}

// ============================================================================
// Pager
// ============================================================================

/// Full-screen slide pager bound to a host
pub struct Pager<H: Host> {
    host: H,
    container: H::Element,
    slides: Vec<H::Element>,
    config: PageConfig,
    styler: SlideStyler,
    bindings: BindingManager,
    handlers: HandlerTable<Self>,
    resize: ResizeCoordinator,
    bus: Rc<PagerBus<H::Element>>,
    phase: Phase,
    page_now: usize,
    /// Wrapping back from the first slide; unlocked after a last→first commit
    first_change: bool,
    size: Size,
}

impl<H: Host> Pager<H> {
    /// Mount a pager on `container`, laying out `slides`
    ///
    /// Fails if the container does not resolve to a renderable element, no
    /// slides are found, or the configuration is invalid. Listeners are
    /// bound immediately when `start_enabled` is set.
    pub fn new(
        host: H,
        container: ContainerSpec<'_, H::Element>,
        slides: SlideSpec<'_, H::Element>,
        config: PageConfig,
    ) -> Result<Self> {
        config.validate()?;

        let container = match container {
            ContainerSpec::Body => host.body(),
            ContainerSpec::Element(element) => element,
            ContainerSpec::Selector(selector) => host
                .query_selector(selector)?
                .ok_or_else(|| PagerError::ContainerNotFound(selector.to_string()))?,
        };
        if !container.is_renderable() {
            return Err(PagerError::ContainerNotRenderable);
        }

        let slides = match slides {
            SlideSpec::Children => host.children(&container),
            SlideSpec::Elements(elements) => elements,
            SlideSpec::Selector(selector) => host.query_selector_all(&container, selector)?,
        };
        if slides.is_empty() {
            return Err(PagerError::NoSlides);
        }
        if config.current >= slides.len() {
            return Err(PagerError::CurrentOutOfRange {
                current: config.current,
                len: slides.len(),
            });
        }

        let probe = StyleProbe::new();
        let support = |property: &str| host.supports_style(property);
        let styler = SlideStyler::resolve(&probe, &config, &support);
        let page_style: Vec<(String, String)> = config
            .page_style
            .iter()
            .map(|(name, value)| {
                let name = probe
                    .prefix_style(name, &support)
                    .unwrap_or_else(|| name.clone());
                (name, value.clone())
            })
            .collect();

        let bindings = BindingManager::new(&config, host.capabilities(), slides.len());
        let handlers = HandlerTable::new()
            .with(EventKind::Start, Self::on_start)
            .with(EventKind::Move, Self::on_move)
            .with(EventKind::End, Self::on_end)
            .with(EventKind::TransitionEnd, Self::on_transition_end)
            .with(EventKind::Resize, Self::on_resize);

        tracing::debug!(
            "pager: {} slide(s), current {}, families {:?}",
            slides.len(),
            config.current,
            bindings.families()
        );

        let mut pager = Self {
            resize: ResizeCoordinator::new(config.resize_debounce()),
            page_now: config.current,
            first_change: config.first_change,
            host,
            container,
            slides,
            styler,
            bindings,
            handlers,
            bus: Rc::new(PagerBus::new()),
            phase: Phase::Idle,
            size: Size::default(),
            config,
        };

        pager.apply_base_style(&page_style);
        pager.refresh();
        if pager.config.start_enabled {
            pager.bind();
        }
        Ok(pager)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Committed slide index
    pub fn page_now(&self) -> usize {
        self.page_now
    }

    /// Candidate slide index while a gesture or its settle is in flight
    pub fn page_next(&self) -> Option<usize> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Tracking(g) | Phase::Locked(g) => g.next,
            Phase::Settling(s) => Some(s.incoming),
        }
    }

    /// Number of slides
    pub fn page_count(&self) -> usize {
        self.slides.len()
    }

    /// Current state
    pub fn state(&self) -> PagerState {
        match self.phase {
            Phase::Idle => PagerState::Idle,
            Phase::Tracking(_) => PagerState::Tracking,
            Phase::Locked(_) => PagerState::Locked,
            Phase::Settling(_) => PagerState::Settling,
        }
    }

    /// Outcome of the settle in progress
    pub fn settling_outcome(&self) -> Option<Outcome> {
        match &self.phase {
            Phase::Settling(s) => Some(s.outcome),
            _ => None,
        }
    }

    /// Reference width/height used for offsets
    pub fn size(&self) -> Size {
        self.size
    }

    /// Whether backward wrap from the first slide is currently allowed
    pub fn first_change_enabled(&self) -> bool {
        self.first_change
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn container(&self) -> &H::Element {
        &self.container
    }

    pub fn slide(&self, index: usize) -> Option<&H::Element> {
        self.slides.get(index)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Subscribe to a pager event
    pub fn on<F>(&self, event: PageEvent, handler: F)
    where
        F: Fn(&EventPayload<H::Element>) + 'static,
    {
        self.bus.on(event, handler);
    }

    /// Shared handle to the event bus, for handlers that re-emit
    pub fn events(&self) -> Rc<PagerBus<H::Element>> {
        self.bus.clone()
    }

    fn emit(&self, event: PageEvent) {
        self.bus.emit(event, &EventPayload::None);
    }

    fn emit_transition(&self, event: PageEvent, outgoing: usize, incoming: usize) {
        let payload = EventPayload::Transition {
            outgoing: SlideRef {
                index: outgoing,
                element: self.slides[outgoing].clone(),
            },
            incoming: SlideRef {
                index: incoming,
                element: self.slides[incoming].clone(),
            },
        };
        self.bus.emit(event, &payload);
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Register listeners and emit `Create`
    pub fn bind(&mut self) {
        self.bindings.bind(&mut self.host);
        self.emit(PageEvent::Create);
    }

    /// Unregister listeners and emit `Destroy`
    ///
    /// A settle in progress completes at once and an unreleased drag is
    /// dropped, since their closing events can no longer arrive.
    pub fn unbind(&mut self) {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Settling(settle) => {
                self.phase = Phase::Settling(settle);
                self.settle();
            }
            Phase::Tracking(g) | Phase::Locked(g) => {
                if let Some(next) = g.next {
                    self.retract(next);
                }
                tracing::debug!("unbind: dropped gesture from slide {}", self.page_now);
            }
            Phase::Idle => {}
        }
        self.bindings.unbind(&mut self.host);
        self.emit(PageEvent::Destroy);
    }

    /// Whether listeners are registered
    pub fn is_bound(&self) -> bool {
        self.bindings.is_bound()
    }

    /// Recompute geometry and resize the container and every slide
    pub fn refresh(&mut self) {
        let rendered = self.container.rendered_size();
        let viewport = self.host.viewport_size();

        let width = self
            .config
            .width
            .or((rendered.width > 0.0).then_some(rendered.width))
            .unwrap_or(viewport.width);
        let height = self
            .config
            .height
            .or((rendered.height > 0.0).then_some(rendered.height))
            .unwrap_or(viewport.height);
        self.size = Size::new(width, height);

        let (w, h) = (format!("{width}px"), format!("{height}px"));
        self.container.set_style("width", &w);
        self.container.set_style("height", &h);
        for slide in &self.slides {
            slide.set_style("width", &w);
            slide.set_style("height", &h);
        }

        tracing::debug!("refresh: {}x{}", width, height);
        self.emit(PageEvent::Refresh);
    }

    /// Jump straight to `index` without animating
    ///
    /// Only allowed while idle. Emits `Success` with the old/new pair.
    pub fn go_to(&mut self, index: usize) -> bool {
        if !matches!(self.phase, Phase::Idle) || index >= self.slides.len() {
            return false;
        }
        let from = self.page_now;
        if index == from {
            return false;
        }

        let (old, new) = (&self.slides[from], &self.slides[index]);
        set_visible(old, false);
        self.styler.clear_transform(old);
        self.styler.clear_transform(new);
        set_z_index(new, Z_BASE);
        set_visible(new, true);
        self.page_now = index;

        tracing::debug!("go_to: {} -> {}", from, index);
        self.emit_transition(PageEvent::Success, from, index);
        true
    }

    /// Fire the pending resize refresh if it is due
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// [`tick`](Self::tick) with an explicit clock
    pub fn tick_at(&mut self, now: Instant) {
        if self.resize.poll(now) {
            self.refresh();
        }
    }

    /// Whether a debounced refresh is waiting
    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    /// When the pending refresh is due, for hosts that arm a timer
    pub fn resize_deadline(&self) -> Option<Instant> {
        self.resize.deadline()
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Feed a native event forwarded by the host
    pub fn handle_event(&mut self, event: &InputEvent) -> EventResponse {
        self.handle_event_at(event, Instant::now())
    }

    /// [`handle_event`](Self::handle_event) with an explicit clock
    pub fn handle_event_at(&mut self, event: &InputEvent, now: Instant) -> EventResponse {
        if !self.bindings.accepts(event.event) {
            tracing::trace!("ignored {} (not bound)", event.event.name());
            return EventResponse::IGNORED;
        }
        match self.handlers.get(event.kind()) {
            Some(handler) => handler(self, event, now),
            None => EventResponse::IGNORED,
        }
    }

    fn on_start(&mut self, event: &InputEvent, _now: Instant) -> EventResponse {
        let Some(family) = event.family() else {
            return EventResponse::IGNORED;
        };

        let response = if self.config.img_touch && event.target_is_image {
            EventResponse::PREVENT_DEFAULT
        } else {
            EventResponse::IGNORED
        };

        if family.checks_button() && event.button != PointerButton::Primary {
            tracing::trace!("start ignored: button {:?}", event.button);
            return response;
        }

        match &self.phase {
            Phase::Idle => {}
            Phase::Settling(_) => {
                tracing::trace!("start ignored: settling");
                return response;
            }
            Phase::Tracking(g) | Phase::Locked(g) => {
                tracing::trace!(
                    "start ignored: {:?} gesture in flight, got {:?}",
                    g.family,
                    family
                );
                return response;
            }
        }

        for slide in &self.slides {
            self.styler.set_duration(slide, 0);
        }

        let point = event.primary_point();
        self.phase = Phase::Tracking(Gesture::new(family, point.y));
        self.emit(PageEvent::Start);
        response
    }

    fn on_move(&mut self, event: &InputEvent, _now: Instant) -> EventResponse {
        let Some(family) = event.family() else {
            return EventResponse::IGNORED;
        };
        let y = event.primary_point().y;

        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Tracking(g) | Phase::Locked(g) if g.family == family => self.track(g, y),
            other => {
                self.phase = other;
            }
        }
        EventResponse::PREVENT_DEFAULT
    }

    /// Lock a direction and reveal its candidate, re-locking when the drag
    /// crosses back over its start point
    fn track(&mut self, mut gesture: Gesture, y: f32) {
        gesture.last_y = y;

        let heading = Direction::from_delta(gesture.delta());
        if let (Some(dir), Some(locked)) = (heading, gesture.lock) {
            if dir != locked {
                if let Some(stale) = gesture.next.take() {
                    self.retract(stale);
                }
                gesture.lock = None;
                tracing::trace!("move: reversed past start, unlocking {:?}", locked);
            }
        }

        if gesture.lock.is_none() {
            let candidate = heading
                .and_then(|dir| Some((dir, self.edge_policy().candidate(self.page_now, dir)?)));

            let Some((direction, next)) = candidate else {
                gesture.last_y = gesture.start_y;
                tracing::trace!("move: no candidate from slide {}", self.page_now);
                self.phase = Phase::Tracking(gesture);
                return;
            };

            gesture.lock = Some(direction);
            gesture.next = Some(next);

            let incoming = &self.slides[next];
            set_visible(incoming, true);
            set_z_index(incoming, Z_RAISED);
            tracing::debug!(
                "lock {:?}: {} -> {}",
                direction,
                self.page_now,
                next
            );
        }

        self.follow(&gesture);
        self.phase = Phase::Locked(gesture);
        self.emit(PageEvent::Move);
    }

    /// Hide a revealed candidate and drop the drag offsets
    fn retract(&self, candidate: usize) {
        let slide = &self.slides[candidate];
        set_visible(slide, false);
        set_z_index(slide, Z_BASE);
        self.styler.clear_transform(slide);
        self.styler.clear_transform(&self.slides[self.page_now]);
    }

    /// Position both slides for the current drag distance
    fn follow(&self, gesture: &Gesture) {
        let (Some(direction), Some(next)) = (gesture.lock, gesture.next) else {
            return;
        };
        let delta = gesture.delta();
        let height = self.size.height;

        if !self.config.single {
            let shrink = if height > 0.0 {
                delta.abs() * self.config.scale / height
            } else {
                0.0
            };
            let scale = (1.0 - shrink).max(1.0 - self.config.scale);
            self.translate(self.page_now, 0.0, delta / self.config.move_y, scale);
        }
        self.translate(next, 0.0, direction.entry_offset(height) + delta, 1.0);
    }

    fn translate(&self, index: usize, x: f32, y: f32, scale: f32) {
        self.styler.translate(&self.slides[index], x, y, scale);
        self.emit(PageEvent::Translate);
    }

    fn transition_to(&self, index: usize, y: f32, scale: f32, time_ms: u32) {
        self.styler.transition_to(
            &self.slides[index],
            0.0,
            y,
            scale,
            time_ms,
            &self.config.easing_type,
        );
        self.emit(PageEvent::Translate);
    }

    fn on_end(&mut self, event: &InputEvent, _now: Instant) -> EventResponse {
        let Some(family) = event.family() else {
            return EventResponse::IGNORED;
        };

        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Tracking(g) | Phase::Locked(g) if g.family == family => self.release(g),
            other => self.phase = other,
        }
        EventResponse::IGNORED
    }

    fn release(&mut self, gesture: Gesture) {
        let (Some(direction), Some(incoming)) = (gesture.lock, gesture.next) else {
            tracing::trace!("release: tap");
            return;
        };

        if !gesture.is_drag() {
            // tap after a reveal: put everything back without animating
            self.retract(incoming);
            tracing::trace!("release: tap within dead zone");
            return;
        }

        let outgoing = self.page_now;
        let height = self.size.height;
        let outcome = if gesture.distance() >= self.config.translate_threshold {
            Outcome::Commit
        } else {
            Outcome::Rollback
        };

        let (out_y, out_scale, in_y) = match outcome {
            Outcome::Commit => (
                direction.sign() * height / self.config.move_y,
                1.0 - self.config.scale,
                0.0,
            ),
            Outcome::Rollback => (0.0, 1.0, direction.entry_offset(height)),
        };

        let time_ms = if self.styler.uses_transition() {
            self.config.transition_time
        } else {
            0
        };

        if !self.config.single {
            self.transition_to(outgoing, out_y, out_scale, time_ms);
        }
        self.transition_to(incoming, in_y, 1.0, time_ms);

        tracing::debug!(
            "release {:?}: distance {} -> {:?}",
            direction,
            gesture.distance(),
            outcome
        );
        self.phase = Phase::Settling(Settle {
            outgoing,
            incoming,
            outcome,
        });
        self.emit(PageEvent::End);

        if time_ms == 0 {
            self.settle();
        }
    }

    fn on_transition_end(&mut self, event: &InputEvent, _now: Instant) -> EventResponse {
        let owned = match (&self.phase, event.target) {
            (Phase::Settling(s), EventTarget::Slide(i)) => i == s.outgoing || i == s.incoming,
            _ => false,
        };
        if owned {
            self.settle();
        } else {
            tracing::trace!("transition end ignored: {:?}", event.target);
        }
        EventResponse::IGNORED
    }

    /// Finish the settle in progress and return to idle
    fn settle(&mut self) {
        let Phase::Settling(settle) = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return;
        };
        let Settle {
            outgoing,
            incoming,
            outcome,
        } = settle;

        for index in [outgoing, incoming] {
            self.styler.set_duration(&self.slides[index], 0);
        }

        let (out_slide, in_slide) = (&self.slides[outgoing], &self.slides[incoming]);
        match outcome {
            Outcome::Commit => {
                if outgoing == self.slides.len() - 1 && incoming == 0 {
                    self.first_change = true;
                }
                set_visible(out_slide, false);
                self.styler.clear_transform(out_slide);
                self.styler.clear_transform(in_slide);
                set_z_index(in_slide, Z_BASE);
                self.page_now = incoming;

                tracing::debug!("commit: now {}", incoming);
                self.emit_transition(PageEvent::Success, outgoing, incoming);
            }
            Outcome::Rollback => {
                set_visible(in_slide, false);
                self.styler.clear_transform(out_slide);
                self.styler.clear_transform(in_slide);
                set_z_index(in_slide, Z_BASE);

                tracing::debug!("rollback: still {}", outgoing);
                self.emit_transition(PageEvent::Fail, outgoing, incoming);
            }
        }
        self.emit(PageEvent::TransitionEnd);
    }

    fn on_resize(&mut self, _event: &InputEvent, now: Instant) -> EventResponse {
        if self.resize.schedule(now) {
            tracing::trace!("resize: pending refresh rescheduled");
        }
        self.emit(PageEvent::Resize);
        EventResponse::IGNORED
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn edge_policy(&self) -> EdgePolicy {
        EdgePolicy {
            len: self.slides.len(),
            cycle: self.config.cycle,
            first_change: self.first_change,
        }
    }

    fn apply_base_style(&self, page_style: &[(String, String)]) {
        if self.container.style("position").as_deref() != Some("absolute") {
            self.container.set_style("position", "relative");
        }

        for (i, slide) in self.slides.iter().enumerate() {
            set_visible(slide, i == self.page_now);
            slide.set_style("position", "absolute");
            slide.set_style("left", "0");
            slide.set_style("top", "0");
            set_z_index(slide, Z_BASE);
            for (name, value) in page_style {
                slide.set_style(name, value);
            }
            self.styler.apply_transition_property(slide);
        }
    }
}
