//! Slide transform and transition styling
//!
//! Property names are resolved once through the style probe. When the
//! runtime has no transform support, offsets are written as rounded
//! `left`/`top` positions and scale is dropped; without transition support
//! every settle is instantaneous.

use flipdeck_core::{PageConfig, StyleProbe, StyleSupport};
use flipdeck_platform::Surface;

/// Stacking order of resting slides
pub const Z_BASE: i32 = 8;
/// Stacking order of the candidate slide while it slides in
pub const Z_RAISED: i32 = 9;

/// Resolved style names and capability flags
#[derive(Clone, Debug, PartialEq)]
pub struct SlideStyler {
    transform: Option<String>,
    duration: Option<String>,
    timing: Option<String>,
    property: Option<String>,
    translate_z: &'static str,
    transition_property: String,
}

impl SlideStyler {
    /// Probe the runtime and combine the result with the config overrides
    pub fn resolve(probe: &StyleProbe, config: &PageConfig, support: &impl StyleSupport) -> Self {
        let transform = probe
            .prefix_style("transform", support)
            .filter(|_| config.use_transform);

        let duration = probe.prefix_style("transitionDuration", support);
        let use_transition = config.use_transition && duration.is_some();
        let (duration, timing, property) = if use_transition {
            (
                duration,
                probe.prefix_style("transitionTimingFunction", support),
                probe.prefix_style("transitionProperty", support),
            )
        } else {
            (None, None, None)
        };

        if transform.is_none() {
            tracing::warn!("transforms unavailable, positioning slides with left/top");
        }
        if !use_transition {
            tracing::warn!("transitions unavailable, slides will settle instantly");
        }

        let transition_property = config.transition_property.clone().unwrap_or_else(|| {
            match probe.css_name("transform", support) {
                Some(css) if transform.is_some() => format!("left, top, {css}"),
                _ => "left, top".to_string(),
            }
        });

        Self {
            translate_z: if transform.is_some() {
                probe.translate_z(support)
            } else {
                ""
            },
            transform,
            duration,
            timing,
            property,
            transition_property,
        }
    }

    /// Whether offsets are written as transforms
    pub fn uses_transform(&self) -> bool {
        self.transform.is_some()
    }

    /// Whether settle steps animate
    pub fn uses_transition(&self) -> bool {
        self.duration.is_some()
    }

    /// Resolved name of the transform property, if used
    pub fn transform_property(&self) -> Option<&str> {
        self.transform.as_deref()
    }

    /// Value written to the transition-property style
    pub fn transition_property(&self) -> &str {
        &self.transition_property
    }

    /// Transform value for an offset and scale
    pub fn transform_value(&self, x: f32, y: f32, scale: f32) -> String {
        format!(
            "translate({}px,{}px) scale({}){}",
            clean(x),
            clean(y),
            clean(scale),
            self.translate_z
        )
    }

    /// Place a slide at `(x, y)` with `scale`
    pub fn translate<S: Surface>(&self, slide: &S, x: f32, y: f32, scale: f32) {
        match &self.transform {
            Some(name) => slide.set_style(name, &self.transform_value(x, y, scale)),
            None => {
                slide.set_style("left", &format!("{}px", clean(x.round())));
                slide.set_style("top", &format!("{}px", clean(y.round())));
            }
        }
    }

    /// Animate a slide to `(x, y)` with `scale` over `time_ms`
    pub fn transition_to<S: Surface>(
        &self,
        slide: &S,
        x: f32,
        y: f32,
        scale: f32,
        time_ms: u32,
        easing: &str,
    ) {
        self.set_easing(slide, easing);
        self.set_duration(slide, time_ms);
        self.translate(slide, x, y, scale);
    }

    /// Set the transition duration
    pub fn set_duration<S: Surface>(&self, slide: &S, time_ms: u32) {
        if let Some(name) = &self.duration {
            slide.set_style(name, &format!("{time_ms}ms"));
        }
    }

    /// Set the transition timing function
    pub fn set_easing<S: Surface>(&self, slide: &S, easing: &str) {
        if let Some(name) = &self.timing {
            slide.set_style(name, easing);
        }
    }

    /// Apply the transition-property list
    pub fn apply_transition_property<S: Surface>(&self, slide: &S) {
        if let Some(name) = &self.property {
            slide.set_style(name, &self.transition_property);
        }
    }

    /// Return a slide to its resting position
    pub fn clear_transform<S: Surface>(&self, slide: &S) {
        match &self.transform {
            Some(name) => slide.set_style(name, ""),
            None => {
                slide.set_style("left", "0");
                slide.set_style("top", "0");
            }
        }
    }
}

/// Show or hide a slide
pub fn set_visible<S: Surface>(slide: &S, visible: bool) {
    slide.set_style("display", if visible { "block" } else { "none" });
}

/// Set a slide's stacking order
pub fn set_z_index<S: Surface>(slide: &S, z: i32) {
    slide.set_style("zIndex", &z.to_string());
}

// -0 formats as "-0"
fn clean(v: f32) -> f32 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}
