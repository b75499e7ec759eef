//! Color catalog
//!
//! Indexes every distinct color of a document and turns each `fill`/`stroke`
//! occurrence into a [`Lookup`] over its candidate keys, most specific first:
//!
//! 1. `colorN` - the occurrence's document-wide sequence number
//! 2. `#id[type]` - when the element has an id
//! 3. `colorGroupM` - the color's catalog index
//! 4. `.class[type]` - when the element has a class
//! 5. `tag[type]`
//! 6. `[type]`
//! 7. `[color]`
//!
//! The original literal is the fallback when no key is supplied.

use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use crate::color::{normalize, Rgba};
use crate::parser::{AttrValue, Element};
use crate::template::Lookup;

/// A color-bearing attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Paint {
    Fill,
    Stroke,
}

impl Paint {
    pub const ALL: [Paint; 2] = [Paint::Fill, Paint::Stroke];

    pub fn as_str(&self) -> &'static str {
        match self {
            Paint::Fill => "fill",
            Paint::Stroke => "stroke",
        }
    }

    /// `[fill]` / `[stroke]`
    pub fn selector(&self) -> String {
        format!("[{}]", self.as_str())
    }
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One distinct color
#[derive(Debug, Clone, PartialEq)]
pub struct ColorEntry {
    pub color: Rgba,
    /// Canonical key, e.g. `rgb(255, 0, 0)`
    pub key: String,
    /// Order of first appearance
    pub index: usize,
    pub count: usize,
    /// `path[type]` of every occurrence, in document order
    pub selectors: Vec<String>,
}

/// One attribute slot holding a color
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    /// Document-wide sequence number, unique per occurrence
    pub number: usize,
    pub paint: Paint,
    /// Canonical key of the catalog entry
    pub color: String,
    pub path: String,
    pub original: String,
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ColorCatalog {
    entries: Vec<ColorEntry>,
    by_key: HashMap<String, usize>,
    occurrences: Vec<Occurrence>,
}

impl ColorCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct colors in catalog order
    pub fn entries(&self) -> &[ColorEntry] {
        &self.entries
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    /// Look up an entry by any spelling of its color
    pub fn get(&self, color: &str) -> Option<&ColorEntry> {
        let key = normalize(color).ok()?.canonical();
        self.by_key.get(&key).map(|&index| &self.entries[index])
    }

    /// Number of distinct colors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Catalog the paint attributes of `element` and rewrite them in place
    ///
    /// Values that are not colors are left untouched.
    pub fn record(&mut self, element: &mut Element, path: &str) {
        for paint in Paint::ALL {
            let Some(original) = element.attribute(paint.as_str()).map(str::to_string) else {
                continue;
            };

            let color = match normalize(&original) {
                Ok(color) => color,
                Err(err) => {
                    trace!(%path, %paint, %err, "leaving paint value as is");
                    continue;
                }
            };

            let group = self.intern(color);
            let entry = &mut self.entries[group];
            entry.count += 1;
            entry.selectors.push(format!("{path}{}", paint.selector()));

            let number = self.occurrences.len();
            let keys = candidate_keys(element, paint, number, group);
            element.set_attribute(
                paint.as_str(),
                AttrValue::Lookup(Lookup::new(keys.clone(), original.clone())),
            );

            self.occurrences.push(Occurrence {
                number,
                paint,
                color: entry.key.clone(),
                path: path.to_string(),
                original,
                keys,
            });
        }
    }

    /// Catalog index for a color, assigning the next one on first sight
    fn intern(&mut self, color: Rgba) -> usize {
        let key = color.canonical();
        if let Some(&index) = self.by_key.get(&key) {
            return index;
        }
        let index = self.entries.len();
        self.by_key.insert(key.clone(), index);
        self.entries.push(ColorEntry {
            color,
            key,
            index,
            count: 0,
            selectors: Vec::new(),
        });
        index
    }
}

/// Candidate keys for one occurrence, most specific first
pub fn candidate_keys(element: &Element, paint: Paint, number: usize, group: usize) -> Vec<String> {
    let selector = paint.selector();
    let mut keys = vec![format!("color{number}")];

    if let Some(id) = element.attribute("id") {
        keys.push(format!("#{id}{selector}"));
    }
    keys.push(format!("colorGroup{group}"));
    if let Some(class) = element.attribute("class") {
        keys.push(format!(".{class}{selector}"));
    }
    keys.push(format!("{}{selector}", element.name));
    keys.push(selector);
    keys.push("[color]".to_string());

    keys
}

/// Selector path of `element` below `parent`: `svg>g#id.class>rect`
///
/// The root `svg` never contributes its id.
pub fn element_path(parent: &str, element: &Element) -> String {
    let mut path = String::from(parent);
    if !parent.is_empty() {
        path.push('>');
    }
    path.push_str(&element.name);

    if element.name != "svg" {
        if let Some(id) = element.attribute("id") {
            path.push('#');
            path.push_str(id);
        }
    }
    if let Some(class) = element.attribute("class") {
        path.push('.');
        path.push_str(class);
    }
    path
}
