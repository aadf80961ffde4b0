//! Scripted scenarios
//!
//! A scenario is a TOML file describing a slide deck, the host it runs on,
//! a pager configuration and an ordered list of input steps:
//!
//! ```toml
//! slides = 4
//! host = "webkit"
//!
//! [config]
//! isCycle = true
//! translateThreshold = 80
//!
//! [[steps]]
//! action = "start"
//! event = "touchstart"
//! y = 400
//!
//! [[steps]]
//! action = "transition-end"
//! slide = 1
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

use flipdeck_pager::prelude::*;
use flipdeck_platform::testing::{MemoryElement, MemoryHost};
use flipdeck_platform::{
    Capabilities, DeviceFamily, EventKind, EventTarget, InputEvent, NativeEvent, PointerButton,
    Size,
};

/// Style support profile of the simulated runtime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostProfile {
    /// Unprefixed transforms and transitions
    #[default]
    Standard,
    /// `webkit`-prefixed transforms and transitions only
    Webkit,
    /// No transforms or transitions
    Legacy,
}

impl HostProfile {
    fn host(self) -> MemoryHost {
        match self {
            HostProfile::Standard => MemoryHost::new(),
            HostProfile::Webkit => MemoryHost::webkit(),
            HostProfile::Legacy => MemoryHost::legacy(),
        }
    }
}

/// Input capabilities of the simulated runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilitySet {
    pub touch: bool,
    pub pointer: bool,
    pub mouse: bool,
}

impl Default for CapabilitySet {
    fn default() -> Self {
        let caps = Capabilities::default();
        Self {
            touch: caps.touch,
            pointer: caps.pointer,
            mouse: caps.mouse,
        }
    }
}

impl From<CapabilitySet> for Capabilities {
    fn from(set: CapabilitySet) -> Self {
        Capabilities {
            touch: set.touch,
            pointer: set.pointer,
            mouse: set.mouse,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    #[default]
    Primary,
    Auxiliary,
    Secondary,
}

impl From<Button> for PointerButton {
    fn from(button: Button) -> Self {
        match button {
            Button::Primary => PointerButton::Primary,
            Button::Auxiliary => PointerButton::Auxiliary,
            Button::Secondary => PointerButton::Secondary,
        }
    }
}

/// A native input event at a coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pointer {
    /// Native event name (`touchstart`, `mousemove`, `MSPointerUp`, ...)
    pub event: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub button: Button,
    /// The event originated on an image
    #[serde(default)]
    pub image: bool,
}

/// One scripted step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    Start(Pointer),
    Move(Pointer),
    End(Pointer),
    /// A transition-end delivered to a slide
    TransitionEnd { slide: usize },
    /// A window resize, optionally changing the container size
    Resize {
        #[serde(default)]
        width: Option<f32>,
        #[serde(default)]
        height: Option<f32>,
    },
    /// Advance the simulated clock, then poll pending work
    Tick { ms: u64 },
    Bind,
    Unbind,
    GoTo { index: usize },
}

fn default_slides() -> usize {
    3
}

fn default_viewport() -> [f32; 2] {
    [320.0, 568.0]
}

/// A scripted scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_slides")]
    pub slides: usize,
    #[serde(default)]
    pub host: HostProfile,
    #[serde(default)]
    pub capabilities: CapabilitySet,
    /// Container (and window) size, `[width, height]`
    #[serde(default = "default_viewport")]
    pub viewport: [f32; 2],
    #[serde(default)]
    pub config: PageConfig,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// An event emitted while the scenario ran
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Index of the step that caused it
    pub step: Option<usize>,
    pub event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slides: Option<(usize, usize)>,
}

/// Outcome of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub events: Vec<Record>,
    pub page_now: usize,
    pub page_count: usize,
    pub state: String,
}

impl Scenario {
    /// Parse a scenario from TOML source
    pub fn parse(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse scenario")
    }

    /// Load a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("Invalid scenario {}", path.display()))
    }

    /// Run every step against an in-memory host
    pub fn run(&self) -> Result<Report> {
        let viewport = Size::new(self.viewport[0], self.viewport[1]);
        let host = self
            .host
            .host()
            .with_capabilities(self.capabilities.into())
            .with_viewport(viewport);
        let (wrapper, _) = host.mount_pages(self.slides, viewport);

        let records = Rc::new(RefCell::new(Vec::new()));
        let step = Rc::new(RefCell::new(None::<usize>));

        let mut pager = Pager::new(
            host,
            ContainerSpec::Element(wrapper.clone()),
            SlideSpec::Children,
            self.config.clone(),
        )
        .context("Failed to mount pager")?;

        for event in PageEvent::ALL {
            let records = records.clone();
            let step = step.clone();
            pager.on(event, move |payload| {
                records.borrow_mut().push(Record {
                    step: *step.borrow(),
                    event: event.name(),
                    slides: payload.indices(),
                });
            });
        }

        let mut clock = Instant::now();
        for (index, action) in self.steps.iter().enumerate() {
            *step.borrow_mut() = Some(index);
            tracing::debug!("step {}: {:?}", index, action);
            self.apply(&mut pager, &wrapper, &mut clock, action)
                .with_context(|| format!("Step {index} failed"))?;
        }

        let events = records.borrow().clone();
        Ok(Report {
            events,
            page_now: pager.page_now(),
            page_count: pager.page_count(),
            state: format!("{:?}", pager.state()),
        })
    }

    fn apply(
        &self,
        pager: &mut Pager<MemoryHost>,
        wrapper: &MemoryElement,
        clock: &mut Instant,
        step: &Step,
    ) -> Result<()> {
        match step {
            Step::Start(p) => self.send(pager, *clock, p, EventKind::Start),
            Step::Move(p) => self.send(pager, *clock, p, EventKind::Move),
            Step::End(p) => self.send(pager, *clock, p, EventKind::End),
            Step::TransitionEnd { slide } => {
                if *slide >= pager.page_count() {
                    anyhow::bail!("No slide {} (deck has {})", slide, pager.page_count());
                }
                pager.handle_event_at(&InputEvent::transition_end(*slide), *clock);
                Ok(())
            }
            Step::Resize { width, height } => {
                if width.is_some() || height.is_some() {
                    let current = pager.size();
                    let size = Size::new(
                        width.unwrap_or(current.width),
                        height.unwrap_or(current.height),
                    );
                    wrapper.set_rendered_size(size);
                    pager.host_mut().set_viewport(size);
                }
                pager.handle_event_at(&InputEvent::new(NativeEvent::Resize), *clock);
                Ok(())
            }
            Step::Tick { ms } => {
                *clock += Duration::from_millis(*ms);
                pager.tick_at(*clock);
                Ok(())
            }
            Step::Bind => {
                pager.bind();
                Ok(())
            }
            Step::Unbind => {
                pager.unbind();
                Ok(())
            }
            Step::GoTo { index } => {
                if !pager.go_to(*index) {
                    tracing::warn!("go-to {} ignored", index);
                }
                Ok(())
            }
        }
    }

    fn send(
        &self,
        pager: &mut Pager<MemoryHost>,
        now: Instant,
        pointer: &Pointer,
        expected: EventKind,
    ) -> Result<()> {
        let native = NativeEvent::from_name(&pointer.event)
            .with_context(|| format!("Unknown event '{}'", pointer.event))?;
        if native.kind() != expected {
            anyhow::bail!(
                "'{}' is a {:?} event, expected {:?}",
                pointer.event,
                native.kind(),
                expected
            );
        }

        let mut event = match native.family() {
            Some(DeviceFamily::Touch) if expected != EventKind::End => {
                InputEvent::touch(native, pointer.x, pointer.y)
            }
            _ => InputEvent::at(native, pointer.x, pointer.y),
        }
        .with_button(pointer.button.into())
        .with_target(EventTarget::Container);
        if pointer.image {
            event = event.on_image();
        }

        let response = pager.handle_event_at(&event, now);
        tracing::trace!("{} -> {:?}", pointer.event, response);
        Ok(())
    }
}
