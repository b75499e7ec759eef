//! Simple SVG - themeable SVG templates inlined as data URIs
//!
//! An SVG file is compiled once into an [`Asset`]: every `fill`/`stroke`
//! color becomes an override hook, every `symbol` becomes a nested sprite
//! asset, and the root gets size hooks. Rendering an asset with a set of
//! parameters yields a `url("data:image/svg+xml;...")` value ready to drop
//! into a stylesheet.
//!
//! # Example
//!
//! ```rust
//! use simple_svg::Asset;
//!
//! let asset = Asset::parse(r##"<svg><rect id="bg" fill="#ff0000"/></svg>"##).unwrap();
//!
//! // Most specific first: color0, #bg[fill], colorGroup0, rect[fill], [fill], [color]
//! let markup = asset.markup("#bg[fill]: #00ff00; size: 16px");
//! assert_eq!(
//!     markup,
//!     r##"<svg height="16px" width="16px"><rect id="bg" fill="#00ff00"/></svg>"##
//! );
//!
//! let uri = asset.render("[color]: blue").unwrap();
//! assert!(uri.starts_with(r#"url("data:image/svg+xml;charset=utf-8,"#));
//! ```

pub mod asset;
pub mod cache;
pub mod catalog;
pub mod color;
pub mod config;
pub mod error;
pub mod invocation;
pub mod parser;
pub mod renderer;
pub mod sprite;
pub mod template;

pub use asset::{Asset, AssetOptions, Source};
pub use cache::AssetCache;
pub use catalog::{ColorCatalog, ColorEntry, Occurrence, Paint};
pub use config::{Config, ConfigError, OptimizerSetting, SpriteConfig};
pub use error::{AssetError, ColorParseError, NotFoundError, OptimizeError, ParseError};
pub use invocation::{rewrite_value, Rewrite, Warning};
pub use renderer::{CommandOptimizer, Optimizer, Params};
pub use template::Template;

/// Compile `markup` with default options and render it with `params`
///
/// # Example
///
/// ```rust
/// let uri = simple_svg::render(r#"<svg width="8"/>"#, "[fill]:red").unwrap();
/// assert!(uri.contains("fill%3Ared%3B"));
/// ```
pub fn render(markup: &str, params: impl Into<Params>) -> Result<String, AssetError> {
    Asset::parse(markup)?.render(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_assets_are_shareable_across_threads() {
        assert_send_sync::<Asset>();
        assert_send_sync::<AssetCache>();
    }

    #[test]
    fn test_concurrent_renders_agree() {
        let asset = std::sync::Arc::new(
            Asset::parse(r#"<svg><circle fill="red" stroke="blue"/></svg>"#).unwrap(),
        );
        let expected = asset.render("[stroke]:green").unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let asset = std::sync::Arc::clone(&asset);
                std::thread::spawn(move || asset.render("[stroke]:green").unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    #[test]
    fn test_render_shortcut() {
        let uri = render(r#"<svg><rect fill="red"/></svg>"#, "color0:blue").unwrap();
        assert!(uri.contains("fill%3D%22blue%22"));
    }

    #[test]
    fn test_render_shortcut_propagates_parse_errors() {
        assert!(matches!(render("<svg", ""), Err(AssetError::Parse(_))));
    }
}
