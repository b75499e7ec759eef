//! Sprite extraction
//!
//! A `symbol` in a sprite sheet becomes a standalone `svg`: it takes over the
//! document's root attributes it does not set itself and loses the
//! `display:none` that keeps sheet symbols hidden.

use crate::parser::{AttrValue, Attribute, AttributeMap, Element};

/// Tag that marks a sprite
pub const SYMBOL_TAG: &str = "symbol";

/// Id for a sprite: the symbol's own id, else `spriteN`
pub fn sprite_id(symbol: &Element, sprite_count: usize) -> String {
    match symbol.attribute("id") {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => format!("sprite{sprite_count}"),
    }
}

/// Standalone `svg` element for a symbol
///
/// `symbol` is cloned before the caller rewrites any of its colors.
pub fn standalone(symbol: &Element, root_attributes: &AttributeMap) -> Element {
    let mut svg = symbol.clone();
    svg.name = "svg".to_string();

    for (name, value) in root_attributes {
        if name.is_empty() || value.is_empty() || svg.has_attribute(name) {
            continue;
        }
        svg.attributes.push(Attribute::literal(name.clone(), value.clone()));
    }

    if let Some(style) = svg.attribute("style") {
        let visible = strip_hidden_display(style);
        if visible.trim().trim_matches(';').trim().is_empty() {
            svg.attributes.retain(|a| a.name != "style");
        } else {
            svg.set_attribute("style", AttrValue::Literal(visible));
        }
    }

    svg
}

/// Remove the first `display:none` declaration from a style value
fn strip_hidden_display(style: &str) -> String {
    let mut search_from = 0;
    while let Some(offset) = style[search_from..].find("display:") {
        let start = search_from + offset;
        let value = style[start + "display:".len()..].trim_start();
        if value.starts_with("none") {
            let end = style[start..].find(';').map_or(style.len(), |i| start + i);
            return format!("{}{}", &style[..start], &style[end..]);
        }
        search_from = start + "display:".len();
    }
    style.to_string()
}
