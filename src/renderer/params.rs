//! Render parameters

use std::collections::{BTreeMap, HashMap};

/// Render parameters keyed by candidate key (`color0`, `[fill]`, `size`, ...)
///
/// Ordered so that anything derived from a parameter set is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the `key:value;key:value` shorthand.
    ///
    /// Whitespace and double quotes are stripped first. Fragments without a
    /// colon are ignored. A fragment splits at its first colon and keeps the
    /// rest as the value, so `a:b:c` sets `a` to `b:c` rather than dropping
    /// everything after the second colon; values like `url(data:...)` rely
    /// on this.
    ///
    /// ```rust
    /// use simple_svg::Params;
    ///
    /// let params = Params::parse(r##"[fill]: "#000"; broken; size:24px"##);
    /// assert_eq!(params.get("[fill]"), Some("#000"));
    /// assert_eq!(params.get("size"), Some("24px"));
    /// assert_eq!(params.len(), 2);
    /// ```
    pub fn parse(shorthand: &str) -> Self {
        let mut params = Self::new();
        if !shorthand.contains(':') {
            return params;
        }

        let cleaned: String = shorthand
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '"')
            .collect();

        for fragment in cleaned.split(';') {
            if let Some((key, value)) = fragment.split_once(':') {
                params.insert(key, value);
            }
        }
        params
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder form of [`Params::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Value for a key. Empty values count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// These parameters laid over `defaults`; ours win on conflict
    pub fn merged_over(&self, defaults: &Params) -> Params {
        let mut merged = defaults.clone();
        merged
            .0
            .extend(self.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<&str> for Params {
    fn from(shorthand: &str) -> Self {
        Params::parse(shorthand)
    }
}

impl From<String> for Params {
    fn from(shorthand: String) -> Self {
        Params::parse(&shorthand)
    }
}

impl From<&String> for Params {
    fn from(shorthand: &String) -> Self {
        Params::parse(shorthand)
    }
}

impl From<&Params> for Params {
    fn from(params: &Params) -> Self {
        params.clone()
    }
}

impl<K: Into<String>, V: Into<String>> From<HashMap<K, V>> for Params {
    fn from(map: HashMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> From<BTreeMap<K, V>> for Params {
    fn from(map: BTreeMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for Params {
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Params {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
