//! SVG document parser
//!
//! Reads markup into an [`Element`] tree with attribute and child order
//! preserved exactly as written. Only the root element is kept; the prolog
//! (XML declaration, doctype, processing instructions) is dropped.

mod tree;

pub use tree::{AttrValue, Attribute, AttributeMap, Element, Node};

use std::fmt::Display;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::ParseError;

/// Parse markup into its root element.
///
/// # Example
///
/// ```rust
/// use simple_svg::parser::parse;
///
/// let root = parse(r#"<svg viewBox="0 0 10 10"><rect fill="red"/></svg>"#).unwrap();
/// assert_eq!(root.name, "svg");
/// assert_eq!(root.attribute("viewBox"), Some("0 0 10 10"));
/// ```
pub fn parse(markup: &str) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(markup);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position() as usize;
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => return Err(malformed(reader.error_position() as usize, err)),
        };

        match event {
            Event::Start(e) => {
                if root.is_some() && stack.is_empty() {
                    return Err(malformed(position, "more than one root element"));
                }
                stack.push(start_element(&e, position)?);
            }
            Event::Empty(e) => {
                let element = start_element(&e, position)?;
                close_element(&mut stack, &mut root, element, position)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| malformed(position, "end tag without a start tag"))?;
                close_element(&mut stack, &mut root, element, position)?;
            }
            Event::Text(e) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Text(text)),
                    None if text.trim().is_empty() => {}
                    None => return Err(malformed(position, "text outside the root element")),
                }
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::CData(text)),
                    None => return Err(malformed(position, "CDATA outside the root element")),
                }
            }
            Event::Comment(e) => {
                if let Some(parent) = stack.last_mut() {
                    parent
                        .children
                        .push(Node::Comment(String::from_utf8_lossy(&e).into_owned()));
                }
            }
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.pop() {
        return Err(ParseError::Unclosed {
            tag: open.name,
            position: markup.len(),
        });
    }

    root.ok_or(ParseError::NoRoot)
}

fn malformed(position: usize, message: impl Display) -> ParseError {
    ParseError::Malformed {
        position,
        message: message.to_string(),
    }
}

fn start_element(e: &BytesStart, position: usize) -> Result<Element, ParseError> {
    let mut element = Element::new(String::from_utf8_lossy(e.name().as_ref()));

    for attr in e.attributes() {
        let attr = attr.map_err(|err| malformed(position, err))?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| malformed(position, err))?
            .into_owned();
        element.attributes.push(Attribute::literal(name, value));
    }

    Ok(element)
}

/// Attach a finished element to its parent, or make it the root
fn close_element(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
    position: usize,
) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => return Err(malformed(position, "more than one root element")),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_attribute_order() {
        let root = parse(r#"<svg><rect y="2" fill="red" x="1"/></svg>"#).unwrap();
        let rect = root.child_elements().next().unwrap();
        let names: Vec<_> = rect.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["y", "fill", "x"]);
    }

    #[test]
    fn test_parse_preserves_element_order() {
        let root = parse("<svg><g/><rect/><circle/></svg>").unwrap();
        let names: Vec<_> = root.child_elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["g", "rect", "circle"]);
    }

    #[test]
    fn test_parse_skips_prolog() {
        let markup = r#"<?xml version="1.0"?>
<!DOCTYPE svg>
<svg xmlns="http://www.w3.org/2000/svg"/>"#;
        let root = parse(markup).unwrap();
        assert_eq!(root.name, "svg");
        assert_eq!(root.attribute("xmlns"), Some("http://www.w3.org/2000/svg"));
    }

    #[test]
    fn test_parse_keeps_text_and_comments() {
        let root = parse("<svg><!-- hi --><text>a &amp; b</text></svg>").unwrap();
        assert_eq!(root.children[0], Node::Comment(" hi ".to_string()));
        let text = root.child_elements().next().unwrap();
        assert_eq!(text.children, vec![Node::Text("a &amp; b".to_string())]);
    }

    #[test]
    fn test_parse_unescapes_attribute_values() {
        let root = parse(r#"<svg><g class="a&amp;b"/></svg>"#).unwrap();
        let g = root.child_elements().next().unwrap();
        assert_eq!(g.attribute("class"), Some("a&b"));
    }

    #[test]
    fn test_parse_mismatched_tags_fail() {
        let result = parse("<svg><g></svg>");
        assert!(matches!(result, Err(ParseError::Malformed { .. })));
    }

    #[test]
    fn test_parse_unclosed_root_fails() {
        let result = parse("<svg><rect/>");
        assert!(result.is_err());
        if let Err(ParseError::Unclosed { tag, .. }) = result {
            assert_eq!(tag, "svg");
        }
    }

    #[test]
    fn test_parse_empty_input_fails() {
        assert!(matches!(parse("   "), Err(ParseError::NoRoot)));
    }

    #[test]
    fn test_parse_duplicate_attribute_fails() {
        let result = parse(r#"<svg><rect fill="red" fill="blue"/></svg>"#);
        assert!(matches!(result, Err(ParseError::Malformed { .. })));
    }

    #[test]
    fn test_parse_second_root_fails() {
        let result = parse("<svg/><svg/>");
        assert!(matches!(result, Err(ParseError::Malformed { .. })));
    }
}
