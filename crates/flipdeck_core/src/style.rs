//! Vendor-prefix and 3-D acceleration probing
//!
//! Given a camelCase style property (`transform`, `transitionDuration`), the
//! probe finds the spelling the runtime understands by trying each vendor
//! prefix and finally the bare name. Results are memoized per probe.

use std::cell::RefCell;

use rustc_hash::FxHashMap;

/// Answers whether a camelCase style property exists on the runtime
pub trait StyleSupport {
    fn supports_style(&self, property: &str) -> bool;
}

impl<F: Fn(&str) -> bool> StyleSupport for F {
    fn supports_style(&self, property: &str) -> bool {
        self(property)
    }
}

/// A vendor prefix
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Vendor {
    Webkit,
    Moz,
    Ms,
    O,
    /// Unprefixed, standard property
    Standard,
}

impl Vendor {
    /// Probe order
    pub const ALL: [Vendor; 5] = [
        Vendor::Webkit,
        Vendor::Moz,
        Vendor::Ms,
        Vendor::O,
        Vendor::Standard,
    ];

    /// Prefix as used in camelCase style names
    pub fn prefix(self) -> &'static str {
        match self {
            Vendor::Webkit => "webkit",
            Vendor::Moz => "moz",
            Vendor::Ms => "ms",
            Vendor::O => "o",
            Vendor::Standard => "",
        }
    }

    /// Apply this prefix to a camelCase property
    pub fn apply(self, style: &str) -> String {
        match self {
            Vendor::Standard => style.to_string(),
            _ => format!("{}{}", self.prefix(), capitalize(style)),
        }
    }
}

/// Transform fragment that forces GPU compositing
pub const TRANSLATE_Z: &str = " translateZ(0)";

/// Memoizing style probe
#[derive(Debug, Default)]
pub struct StyleProbe {
    cache: RefCell<FxHashMap<String, Option<Vendor>>>,
}

impl StyleProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vendor under which `style` exists, `None` if it is unsupported
    pub fn vendor(&self, style: &str, support: &impl StyleSupport) -> Option<Vendor> {
        if let Some(cached) = self.cache.borrow().get(style) {
            return *cached;
        }

        let found = Vendor::ALL
            .into_iter()
            .find(|vendor| support.supports_style(&vendor.apply(style)));

        if found.is_none() {
            tracing::debug!("style property unsupported: {}", style);
        }
        self.cache.borrow_mut().insert(style.to_string(), found);
        found
    }

    /// Prefixed camelCase name of `style`, `None` if unsupported
    pub fn prefix_style(&self, style: &str, support: &impl StyleSupport) -> Option<String> {
        self.vendor(style, support).map(|vendor| vendor.apply(style))
    }

    /// Prefixed hyphenated name (`-webkit-transform`), `None` if unsupported
    pub fn css_name(&self, style: &str, support: &impl StyleSupport) -> Option<String> {
        let vendor = self.vendor(style, support)?;
        let bare = hyphenate(style);
        Some(match vendor {
            Vendor::Standard => bare,
            _ => format!("-{}-{}", vendor.prefix(), bare),
        })
    }

    /// Whether 3-D transforms (and so GPU compositing) are available
    pub fn has_3d(&self, support: &impl StyleSupport) -> bool {
        self.vendor("perspective", support).is_some()
    }

    /// Extra transform fragment forcing compositing, empty when 3-D is absent
    pub fn translate_z(&self, support: &impl StyleSupport) -> &'static str {
        if self.has_3d(support) {
            TRANSLATE_Z
        } else {
            ""
        }
    }
}

fn capitalize(style: &str) -> String {
    let mut chars = style.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn hyphenate(style: &str) -> String {
    let mut out = String::with_capacity(style.len() + 4);
    for c in style.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_prefers_vendor_then_standard() {
        let probe = StyleProbe::new();
        let webkit = |p: &str| p == "webkitTransform" || p == "transform";
        assert_eq!(probe.vendor("transform", &webkit), Some(Vendor::Webkit));
        assert_eq!(
            probe.prefix_style("transform", &webkit).as_deref(),
            Some("webkitTransform")
        );

        let probe = StyleProbe::new();
        let standard = |p: &str| p == "transform";
        assert_eq!(
            probe.prefix_style("transform", &standard).as_deref(),
            Some("transform")
        );
    }

    #[test]
    fn test_unsupported() {
        let probe = StyleProbe::new();
        let none = |_: &str| false;
        assert_eq!(probe.prefix_style("transform", &none), None);
        assert!(!probe.has_3d(&none));
        assert_eq!(probe.translate_z(&none), "");
    }

    #[test]
    fn test_memoized() {
        let probe = StyleProbe::new();
        let calls = Cell::new(0);
        let counting = |p: &str| {
            calls.set(calls.get() + 1);
            p == "mozTransitionDuration"
        };

        assert_eq!(probe.vendor("transitionDuration", &counting), Some(Vendor::Moz));
        let first = calls.get();
        assert_eq!(probe.vendor("transitionDuration", &counting), Some(Vendor::Moz));
        assert_eq!(calls.get(), first);
    }

    #[test]
    fn test_css_name() {
        let probe = StyleProbe::new();
        let webkit = |p: &str| p == "webkitTransform";
        assert_eq!(
            probe.css_name("transform", &webkit).as_deref(),
            Some("-webkit-transform")
        );

        let probe = StyleProbe::new();
        let standard = |p: &str| p == "transitionTimingFunction";
        assert_eq!(
            probe.css_name("transitionTimingFunction", &standard).as_deref(),
            Some("transition-timing-function")
        );
    }

    #[test]
    fn test_translate_z() {
        let probe = StyleProbe::new();
        let gpu = |p: &str| p == "webkitPerspective";
        assert!(probe.has_3d(&gpu));
        assert_eq!(probe.translate_z(&gpu), " translateZ(0)");
    }
}
