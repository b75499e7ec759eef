//! Compiled SVG templates
//!
//! A template is the serialized markup of an asset cut into literal text and
//! holes. Holes are a closed set of data structures evaluated against render
//! parameters; nothing is compiled to executable code.
//!
//! # Example
//!
//! ```rust
//! use simple_svg::template::{Lookup, Segment, Template};
//! use simple_svg::Params;
//!
//! let template = Template::from_segments(vec![
//!     Segment::Literal(r#"<rect fill=""#.to_string()),
//!     Segment::Lookup(Lookup::new(vec!["color0".to_string(), "[fill]".to_string()], "#f00")),
//!     Segment::Literal(r#""/>"#.to_string()),
//! ]);
//!
//! assert_eq!(template.evaluate(&Params::new()), r##"<rect fill="#f00"/>"##);
//! assert_eq!(
//!     template.evaluate(&Params::parse("[fill]:blue")),
//!     r#"<rect fill="blue"/>"#
//! );
//! ```

mod compiler;

pub use compiler::{compile, inject_size_hooks, inject_style_hook, SIZE_FALLBACK};

use quick_xml::escape::escape;

use crate::renderer::Params;

/// Ordered candidate keys with a literal fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    keys: Vec<String>,
    fallback: String,
}

impl Lookup {
    pub fn new(keys: Vec<String>, fallback: impl Into<String>) -> Self {
        Self {
            keys,
            fallback: fallback.into(),
        }
    }

    /// Candidate keys, most specific first
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// First candidate present in `params`, else the fallback
    pub fn resolve<'a>(&'a self, params: &'a Params) -> &'a str {
        self.keys
            .iter()
            .find_map(|key| params.get(key))
            .unwrap_or(&self.fallback)
    }
}

/// Root `style` hook exposing `[fill]`/`[stroke]` on documents without colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleHook {
    base: Option<String>,
    properties: Vec<String>,
}

impl StyleHook {
    pub fn new(base: Option<String>, properties: &[&str]) -> Self {
        Self {
            base: base.filter(|b| !b.trim().is_empty()),
            properties: properties.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    /// The existing style followed by `prop:value;` per supplied `[prop]`
    pub fn resolve(&self, params: &Params) -> String {
        let mut style = self.base.clone().unwrap_or_default();
        for property in &self.properties {
            if let Some(value) = params.get(&format!("[{property}]")) {
                if !style.is_empty() && !style.trim_end().ends_with(';') {
                    style.push(';');
                }
                style.push_str(property);
                style.push(':');
                style.push_str(value);
                style.push(';');
            }
        }
        style
    }
}

/// One piece of a compiled template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Markup emitted verbatim
    Literal(String),
    /// Attribute value chosen from render parameters
    Lookup(Lookup),
    /// Root style assembled from render parameters
    Style(StyleHook),
}

/// An immutable compiled template
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// All lookups in document order
    pub fn lookups(&self) -> impl Iterator<Item = &Lookup> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Lookup(lookup) => Some(lookup),
            _ => None,
        })
    }

    /// Render the template. Values taken from `params` are attribute-escaped.
    pub fn evaluate(&self, params: &Params) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Lookup(lookup) => out.push_str(&escape(lookup.resolve(params))),
                Segment::Style(hook) => out.push_str(&escape(hook.resolve(params).as_str())),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_lookup_precedence() {
        let lookup = Lookup::new(keys(&["color0", "colorGroup0", "[fill]"]), "#fff");
        let params = Params::parse("[fill]:red;colorGroup0:blue");
        assert_eq!(lookup.resolve(&params), "blue");
    }

    #[test]
    fn test_lookup_falls_back_to_literal() {
        let lookup = Lookup::new(keys(&["color0"]), "#fff");
        assert_eq!(lookup.resolve(&Params::new()), "#fff");
        assert_eq!(lookup.resolve(&Params::parse("color1:red")), "#fff");
    }

    #[test]
    fn test_style_hook_without_params_keeps_base() {
        let hook = StyleHook::new(Some("opacity:.5".to_string()), &["fill", "stroke"]);
        assert_eq!(hook.resolve(&Params::new()), "opacity:.5");
    }

    #[test]
    fn test_style_hook_appends_supplied_properties() {
        let hook = StyleHook::new(Some("opacity:.5".to_string()), &["fill", "stroke"]);
        let params = Params::parse("[stroke]:red;[fill]:blue");
        assert_eq!(hook.resolve(&params), "opacity:.5;fill:blue;stroke:red;");

        let bare = StyleHook::new(None, &["fill", "stroke"]);
        assert_eq!(bare.resolve(&Params::parse("[fill]:blue")), "fill:blue;");
    }

    #[test]
    fn test_evaluate_escapes_parameter_values() {
        let template = Template::from_segments(vec![
            Segment::Literal("<g class=\"".to_string()),
            Segment::Lookup(Lookup::new(keys(&["c"]), "x")),
            Segment::Literal("\"/>".to_string()),
        ]);
        let out = template.evaluate(&Params::new().with("c", "a\"b<c"));
        assert_eq!(out, "<g class=\"a&quot;b&lt;c\"/>");
    }
}
