//! Serializes an annotated tree into a [`Template`]

use quick_xml::escape::escape;

use super::{Lookup, Segment, StyleHook, Template};
use crate::parser::{AttrValue, Element, Node};

/// Root size used when neither a dimension nor a size parameter is given
pub const SIZE_FALLBACK: &str = "100%";

/// Compile the tree rooted at `root` into a template
pub fn compile(root: &Element) -> Template {
    let mut builder = SegmentBuilder::default();
    write_element(root, &mut builder);
    Template::from_segments(builder.segments)
}

/// Give the root `height`/`width` hooks when it declares neither
///
/// Each resolves to its own `[height]`/`[width]` parameter, then the shared
/// size parameter, then [`SIZE_FALLBACK`].
pub fn inject_size_hooks(root: &mut Element) {
    if root.has_attribute("height") || root.has_attribute("width") {
        return;
    }
    for dimension in ["height", "width"] {
        let keys = vec![
            format!("[{dimension}]"),
            "[size]".to_string(),
            "size".to_string(),
        ];
        root.set_attribute(dimension, AttrValue::Lookup(Lookup::new(keys, SIZE_FALLBACK)));
    }
}

/// Expose generic `[fill]`/`[stroke]` overrides through the root style
pub fn inject_style_hook(root: &mut Element) {
    let base = root.attribute("style").map(str::to_string);
    root.set_attribute(
        "style",
        AttrValue::Style(StyleHook::new(base, &["fill", "stroke"])),
    );
}

#[derive(Default)]
struct SegmentBuilder {
    segments: Vec<Segment>,
}

impl SegmentBuilder {
    fn literal(&mut self, text: &str) {
        if let Some(Segment::Literal(last)) = self.segments.last_mut() {
            last.push_str(text);
        } else {
            self.segments.push(Segment::Literal(text.to_string()));
        }
    }

    fn hole(&mut self, segment: Segment) {
        self.segments.push(segment);
    }
}

fn write_element(element: &Element, out: &mut SegmentBuilder) {
    out.literal("<");
    out.literal(&element.name);

    for attr in &element.attributes {
        out.literal(" ");
        out.literal(&attr.name);
        out.literal("=\"");
        match &attr.value {
            AttrValue::Literal(value) => out.literal(&escape(value.as_str())),
            AttrValue::Lookup(lookup) => out.hole(Segment::Lookup(lookup.clone())),
            AttrValue::Style(hook) => out.hole(Segment::Style(hook.clone())),
        }
        out.literal("\"");
    }

    if element.children.is_empty() {
        out.literal("/>");
        return;
    }
    out.literal(">");

    for child in &element.children {
        match child {
            Node::Element(child) => write_element(child, out),
            Node::Text(text) => out.literal(text),
            Node::CData(text) => {
                out.literal("<![CDATA[");
                out.literal(text);
                out.literal("]]>");
            }
            Node::Comment(text) => {
                out.literal("<!--");
                out.literal(text);
                out.literal("-->");
            }
        }
    }

    out.literal("</");
    out.literal(&element.name);
    out.literal(">");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::renderer::Params;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_compile_round_trips_literal_markup() {
        let markup = r#"<svg viewBox="0 0 1 1"><!--c--><g><text>a &amp; b</text><path d="M0 0"/></g></svg>"#;
        let template = compile(&parse(markup).unwrap());
        assert_eq!(template.segments().len(), 1);
        assert_eq!(template.evaluate(&Params::new()), markup);
    }

    #[test]
    fn test_compile_reescapes_attribute_values() {
        let template = compile(&parse(r#"<svg><g class="a&amp;b"/></svg>"#).unwrap());
        assert_eq!(
            template.evaluate(&Params::new()),
            r#"<svg><g class="a&amp;b"/></svg>"#
        );
    }

    #[test]
    fn test_size_hooks_default_to_full_size() {
        let mut root = parse("<svg/>").unwrap();
        inject_size_hooks(&mut root);
        let template = compile(&root);

        assert_eq!(
            template.evaluate(&Params::new()),
            r#"<svg height="100%" width="100%"/>"#
        );
        assert_eq!(
            template.evaluate(&Params::parse("size:24px;[width]:10px")),
            r#"<svg height="24px" width="10px"/>"#
        );
    }

    #[test]
    fn test_size_hooks_skip_explicit_dimensions() {
        let mut root = parse(r#"<svg width="10"/>"#).unwrap();
        inject_size_hooks(&mut root);
        assert!(!root.has_attribute("height"));
        assert_eq!(compile(&root).lookups().count(), 0);
    }

    #[test]
    fn test_style_hook_keeps_existing_style_slot() {
        let mut root = parse(r#"<svg style="opacity:.5" id="a"/>"#).unwrap();
        inject_style_hook(&mut root);
        let template = compile(&root);
        assert_eq!(
            template.evaluate(&Params::parse("[fill]:red")),
            r#"<svg style="opacity:.5;fill:red;" id="a"/>"#
        );
    }
}
