//! Markup tree produced by the parser and annotated by the builder

use crate::template::{Lookup, StyleHook};

/// Attributes of an element in document order
pub type AttributeMap = Vec<(String, String)>;

/// A node inside the root element
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Raw character data, entities left as written
    Text(String),
    CData(String),
    Comment(String),
}

/// Value held in an attribute slot
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Unescaped literal text
    Literal(String),
    /// Resolved against render parameters
    Lookup(Lookup),
    /// Root style hook for monochrome documents
    Style(StyleHook),
}

impl AttrValue {
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            AttrValue::Literal(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

impl Attribute {
    pub fn literal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AttrValue::Literal(value.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Literal value of an attribute, if present and not yet rewritten
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .and_then(|a| a.value.as_literal())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    pub fn attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes.iter_mut().find(|a| a.name == name)
    }

    /// Overwrite an attribute in its current slot, or append it
    pub fn set_attribute(&mut self, name: &str, value: AttrValue) {
        match self.attribute_mut(name) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                value,
            }),
        }
    }

    /// Literal attributes in document order
    pub fn attribute_map(&self) -> AttributeMap {
        self.attributes
            .iter()
            .filter_map(|a| a.value.as_literal().map(|v| (a.name.clone(), v.to_string())))
            .collect()
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attribute_keeps_slot() {
        let mut element = Element::new("rect");
        element.attributes.push(Attribute::literal("fill", "red"));
        element.attributes.push(Attribute::literal("x", "1"));

        element.set_attribute("fill", AttrValue::Literal("blue".to_string()));
        element.set_attribute("y", AttrValue::Literal("2".to_string()));

        let names: Vec<_> = element.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["fill", "x", "y"]);
        assert_eq!(element.attribute("fill"), Some("blue"));
    }

    #[test]
    fn test_attribute_ignores_rewritten_values() {
        let mut element = Element::new("rect");
        element.set_attribute(
            "fill",
            AttrValue::Lookup(Lookup::new(vec!["color0".to_string()], "red")),
        );
        assert!(element.has_attribute("fill"));
        assert_eq!(element.attribute("fill"), None);
        assert!(element.attribute_map().is_empty());
    }
}
