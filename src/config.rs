//! Configuration for asset construction and value rewriting
//!
//! Configuration can be built in code or loaded from TOML:
//!
//! ```toml
//! func = "svg"
//! silent = true
//! debug = false
//! defaults = "[fill]:#000"
//! dirs = ["icons"]
//! svgo = { command = "svgo", args = ["-i", "-", "-o", "-"] }
//!
//! [sprite]
//! prefix = "icon-"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::asset::AssetOptions;
use crate::renderer::{CommandOptimizer, Optimizer, Params};

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Affixes wrapped around each sprite id during resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    pub prefix: String,
    pub postfix: String,
}

impl SpriteConfig {
    /// `prefix` + `id` + `postfix`
    pub fn wrap(&self, id: &str) -> String {
        format!("{}{}{}", self.prefix, id, self.postfix)
    }
}

/// External optimizer setting: a switch, or an explicit command line
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OptimizerSetting {
    Enabled(bool),
    Command {
        command: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl Default for OptimizerSetting {
    fn default() -> Self {
        OptimizerSetting::Enabled(false)
    }
}

impl OptimizerSetting {
    pub fn build(&self) -> Option<Arc<dyn Optimizer>> {
        match self {
            OptimizerSetting::Enabled(false) => None,
            OptimizerSetting::Enabled(true) => Some(Arc::new(CommandOptimizer::svgo())),
            OptimizerSetting::Command { command, args } => {
                Some(Arc::new(CommandOptimizer::new(command.clone(), args.clone())))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Function name recognized in declaration values
    pub func: String,
    /// Warn and continue on failures instead of raising them
    pub silent: bool,
    /// Timing diagnostics; also turns `silent` off
    pub debug: bool,
    /// External markup optimizer
    #[serde(alias = "optimizer")]
    pub svgo: OptimizerSetting,
    /// Default parameters in `key:value;...` form
    pub defaults: Option<String>,
    pub sprite: SpriteConfig,
    /// Directories searched for named assets
    pub dirs: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            func: "svg".to_string(),
            silent: true,
            debug: false,
            svgo: OptimizerSetting::default(),
            defaults: None,
            sprite: SpriteConfig::default(),
            dirs: Vec::new(),
        }
    }
}

impl Config {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Whether failures are reported as warnings. Debug mode always raises.
    pub fn is_silent(&self) -> bool {
        self.silent && !self.debug
    }

    /// Default parameters parsed from `defaults`
    pub fn default_params(&self) -> Params {
        self.defaults.as_deref().map(Params::parse).unwrap_or_default()
    }

    /// Options handed to every asset built under this configuration
    pub fn asset_options(&self) -> AssetOptions {
        AssetOptions {
            defaults: self.default_params(),
            sprite: self.sprite.clone(),
            optimizer: self.svgo.build(),
            debug: self.debug,
        }
    }

    pub fn with_func(mut self, func: impl Into<String>) -> Self {
        self.func = func.into();
        self
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_optimizer(mut self, setting: OptimizerSetting) -> Self {
        self.svgo = setting;
        self
    }

    pub fn with_defaults(mut self, defaults: impl Into<String>) -> Self {
        self.defaults = Some(defaults.into());
        self
    }

    pub fn with_sprite(mut self, prefix: impl Into<String>, postfix: impl Into<String>) -> Self {
        self.sprite = SpriteConfig {
            prefix: prefix.into(),
            postfix: postfix.into(),
        };
        self
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dirs.push(dir.into());
        self
    }
}
