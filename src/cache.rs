//! Name to asset cache

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::asset::{Asset, AssetOptions};
use crate::config::Config;
use crate::error::{AssetError, NotFoundError};

/// Builds each named asset at most once and shares it afterwards
///
/// Names resolve against the search directories, first as given and then
/// with `.svg` appended. Failed constructions are not cached.
#[derive(Debug, Default)]
pub struct AssetCache {
    dirs: Vec<PathBuf>,
    options: Arc<AssetOptions>,
    assets: HashMap<String, Arc<Asset>>,
}

impl AssetCache {
    /// Create an empty cache searching the working directory
    pub fn new(options: AssetOptions) -> Self {
        Self {
            dirs: Vec::new(),
            options: Arc::new(options),
            assets: HashMap::new(),
        }
    }

    /// Create a cache from a configuration
    pub fn from_config(config: &Config) -> Self {
        let mut cache = Self::new(config.asset_options());
        cache.dirs = config.dirs.clone();
        cache
    }

    /// Add a search directory
    pub fn add_dir(&mut self, dir: impl Into<PathBuf>) {
        self.dirs.push(dir.into());
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Register inline markup under a name, replacing any earlier asset
    pub fn insert_markup(&mut self, name: &str, markup: &str) -> Result<Arc<Asset>, AssetError> {
        let asset = Arc::new(Asset::from_markup(markup, Arc::clone(&self.options))?);
        self.assets.insert(name.to_string(), Arc::clone(&asset));
        Ok(asset)
    }

    /// The asset for `name`, building it on first use
    pub fn get(&mut self, name: &str) -> Result<Arc<Asset>, AssetError> {
        if let Some(asset) = self.assets.get(name) {
            return Ok(Arc::clone(asset));
        }

        let path = self.locate(name).ok_or_else(|| NotFoundError::Asset {
            name: name.to_string(),
        })?;
        debug!(%name, path = %path.display(), "loading SVG asset");

        let asset = Arc::new(Asset::from_file(&path, Arc::clone(&self.options))?);
        self.assets.insert(name.to_string(), Arc::clone(&asset));
        Ok(asset)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    /// Number of constructed assets
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    fn locate(&self, name: &str) -> Option<PathBuf> {
        let with_extension = format!("{name}.svg");
        let candidates = |dir: &Path| [dir.join(name), dir.join(&with_extension)];

        if self.dirs.is_empty() {
            return candidates(Path::new(".")).into_iter().find(|p| p.is_file());
        }
        self.dirs
            .iter()
            .flat_map(|dir| candidates(dir.as_path()))
            .find(|p| p.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_get_builds_once() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("dot.svg"), r#"<svg><circle fill="red"/></svg>"#).unwrap();

        let mut cache = AssetCache::new(AssetOptions::new());
        cache.add_dir(dir.path());

        let first = cache.get("dot").unwrap();
        fs::remove_file(dir.path().join("dot.svg")).unwrap();
        let second = cache.get("dot").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_get_accepts_file_name_with_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.svg"), "<svg/>").unwrap();

        let mut cache = AssetCache::from_config(&Config::new().with_dir(dir.path()));
        assert!(cache.get("a.svg").is_ok());
        assert!(cache.contains("a.svg"));
    }

    #[test]
    fn test_unknown_name_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = AssetCache::new(AssetOptions::new());
        cache.add_dir(dir.path());

        let err = cache.get("ghost").unwrap_err();
        assert!(matches!(
            err,
            AssetError::NotFound(NotFoundError::Asset { ref name }) if name == "ghost"
        ));
    }

    #[test]
    fn test_parse_failures_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.svg");
        fs::write(&path, "<svg><g></svg>").unwrap();

        let mut cache = AssetCache::new(AssetOptions::new());
        cache.add_dir(dir.path());
        assert!(matches!(cache.get("bad"), Err(AssetError::Parse(_))));
        assert!(cache.is_empty());

        fs::write(&path, "<svg/>").unwrap();
        assert!(cache.get("bad").is_ok());
    }

    #[test]
    fn test_insert_markup() {
        let mut cache = AssetCache::new(AssetOptions::new().with_defaults("[fill]:blue"));
        cache
            .insert_markup("inline", r#"<svg width="1"><rect fill="red"/></svg>"#)
            .unwrap();

        let asset = cache.get("inline").unwrap();
        assert!(asset.markup("").contains(r#"fill="blue""#));
    }
}
