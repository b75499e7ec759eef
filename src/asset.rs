//! Compiled SVG assets
//!
//! An [`Asset`] is built once from markup: the tree is parsed, its colors
//! are cataloged and rewritten into lookups, `symbol` elements become nested
//! sprite assets, and the result is compiled into a [`Template`]. After
//! construction nothing in an asset changes, so one asset can serve any
//! number of concurrent renders.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::catalog::{element_path, ColorCatalog};
use crate::config::SpriteConfig;
use crate::error::{AssetError, NotFoundError};
use crate::parser::{self, AttributeMap, Element, Node};
use crate::renderer::{self, Optimizer, Params};
use crate::sprite::{self, SYMBOL_TAG};
use crate::template::{self, Template};

/// Where an asset's markup came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Inline,
    /// Extracted from a `symbol` of the parent asset
    Sprite { id: String },
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => write!(f, "{}", path.display()),
            Source::Inline => f.write_str("<inline>"),
            Source::Sprite { id } => write!(f, "sprite {id}"),
        }
    }
}

/// Options shared by an asset and all of its sprites
#[derive(Clone, Default)]
pub struct AssetOptions {
    /// Parameters every render starts from
    pub defaults: Params,
    pub sprite: SpriteConfig,
    pub optimizer: Option<Arc<dyn Optimizer>>,
    /// Log construction and render timings
    pub debug: bool,
}

impl fmt::Debug for AssetOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetOptions")
            .field("defaults", &self.defaults)
            .field("sprite", &self.sprite)
            .field("optimizer", &self.optimizer.is_some())
            .field("debug", &self.debug)
            .finish()
    }
}

impl AssetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default parameters from `key:value;...` shorthand
    pub fn with_defaults(mut self, defaults: impl Into<Params>) -> Self {
        self.defaults = defaults.into();
        self
    }

    pub fn with_sprite(mut self, sprite: SpriteConfig) -> Self {
        self.sprite = sprite;
        self
    }

    pub fn with_optimizer(mut self, optimizer: Arc<dyn Optimizer>) -> Self {
        self.optimizer = Some(optimizer);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Options for sprites extracted from an asset built with these
    ///
    /// Sprite affixes only apply to the first id of a path, so sprites are
    /// built without them.
    fn for_sprites(&self) -> Self {
        Self {
            sprite: SpriteConfig::default(),
            ..self.clone()
        }
    }
}

/// One compiled, parameterizable SVG
#[derive(Debug)]
pub struct Asset {
    source: Source,
    root_attributes: AttributeMap,
    template: Template,
    catalog: ColorCatalog,
    sprites: BTreeMap<String, Asset>,
    options: Arc<AssetOptions>,
}

impl Asset {
    /// Build an asset from an SVG file
    pub fn from_file(
        path: impl AsRef<Path>,
        options: impl Into<Arc<AssetOptions>>,
    ) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let markup = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::build(Source::Path(path.to_path_buf()), &markup, options.into())
    }

    /// Build an asset from SVG markup
    ///
    /// # Example
    ///
    /// ```rust
    /// use simple_svg::{Asset, AssetOptions};
    ///
    /// let asset = Asset::from_markup(r##"<svg><rect fill="#ff0000"/></svg>"##, AssetOptions::new()).unwrap();
    /// assert!(asset.markup("color0:#00ff00").contains(r##"fill="#00ff00""##));
    /// assert!(asset.markup("").contains(r##"fill="#ff0000""##));
    /// ```
    pub fn from_markup(
        markup: &str,
        options: impl Into<Arc<AssetOptions>>,
    ) -> Result<Self, AssetError> {
        Self::build(Source::Inline, markup, options.into())
    }

    /// Build an asset from markup with default options
    pub fn parse(markup: &str) -> Result<Self, AssetError> {
        Self::from_markup(markup, AssetOptions::default())
    }

    fn build(source: Source, markup: &str, options: Arc<AssetOptions>) -> Result<Self, AssetError> {
        let started = Instant::now();

        let mut root = parser::parse(markup)?;
        let root_attributes = root.attribute_map();

        let mut builder = Builder {
            catalog: ColorCatalog::new(),
            sprites: BTreeMap::new(),
            root_attributes: &root_attributes,
            options: Arc::new(options.for_sprites()),
        };
        builder.visit(&mut root, "")?;
        let Builder {
            catalog, sprites, ..
        } = builder;

        if catalog.is_empty() {
            template::inject_style_hook(&mut root);
        }
        template::inject_size_hooks(&mut root);
        let template = template::compile(&root);

        if options.debug {
            debug!(
                %source,
                colors = catalog.len(),
                occurrences = catalog.occurrences().len(),
                sprites = sprites.len(),
                elapsed = ?started.elapsed(),
                "compiled SVG asset"
            );
        }

        Ok(Self {
            source,
            root_attributes,
            template,
            catalog,
            sprites,
            options,
        })
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Root attributes as written in the source
    pub fn root_attributes(&self) -> &AttributeMap {
        &self.root_attributes
    }

    pub fn defaults(&self) -> &Params {
        &self.options.defaults
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn catalog(&self) -> &ColorCatalog {
        &self.catalog
    }

    pub fn sprites(&self) -> &BTreeMap<String, Asset> {
        &self.sprites
    }

    pub fn sprite_ids(&self) -> impl Iterator<Item = &str> {
        self.sprites.keys().map(String::as_str)
    }

    /// Follow a path of sprite ids. An empty path is the asset itself.
    ///
    /// Each id is wrapped in this asset's sprite prefix/postfix before the
    /// lookup; the error names the wrapped id that failed. Sprites carry no
    /// affixes, so only the first id of a path is wrapped.
    pub fn resolve<S: AsRef<str>>(&self, ids: &[S]) -> Result<&Asset, NotFoundError> {
        let Some((first, rest)) = ids.split_first() else {
            return Ok(self);
        };

        let id = self.options.sprite.wrap(first.as_ref());
        match self.sprites.get(&id) {
            Some(sprite) => sprite.resolve(rest),
            None => Err(NotFoundError::Sprite { id }),
        }
    }

    /// Rendered markup, before optimization and encoding
    pub fn markup(&self, params: impl Into<Params>) -> String {
        renderer::render_markup(&self.template, &params.into(), &self.options.defaults)
    }

    /// Render to a `url("data:image/svg+xml;...")` value
    ///
    /// `params` is a map or the `key:value;...` shorthand and takes
    /// precedence over the asset's defaults. Identical parameters always
    /// produce identical output.
    pub fn render(&self, params: impl Into<Params>) -> Result<String, AssetError> {
        let started = Instant::now();

        let markup = self.markup(params);
        let markup = renderer::optimize(markup, self.options.optimizer.as_deref())?;
        let uri = renderer::data_uri(&markup);

        if self.options.debug {
            debug!(source = %self.source, elapsed = ?started.elapsed(), "rendered SVG asset");
        }
        Ok(uri)
    }
}

/// Accumulator threaded through one construction
struct Builder<'a> {
    catalog: ColorCatalog,
    sprites: BTreeMap<String, Asset>,
    root_attributes: &'a AttributeMap,
    /// Options handed to extracted sprites
    options: Arc<AssetOptions>,
}

impl Builder<'_> {
    fn visit(&mut self, element: &mut Element, parent_path: &str) -> Result<(), AssetError> {
        let path = element_path(parent_path, element);

        if element.name == SYMBOL_TAG {
            self.extract_sprite(element)?;
        }
        self.catalog.record(element, &path);

        for child in &mut element.children {
            if let Node::Element(child) = child {
                self.visit(child, &path)?;
            }
        }
        Ok(())
    }

    fn extract_sprite(&mut self, symbol: &Element) -> Result<(), AssetError> {
        let id = sprite::sprite_id(symbol, self.sprites.len());
        let svg = sprite::standalone(symbol, self.root_attributes);
        let markup = template::compile(&svg).evaluate(&Params::new());

        debug!(%id, "extracting sprite");
        let asset = Asset::build(Source::Sprite { id: id.clone() }, &markup, Arc::clone(&self.options))?;
        self.sprites.insert(id, asset);
        Ok(())
    }
}
