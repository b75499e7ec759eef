//! Error types for asset construction, lookup and rendering

use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Malformed markup. Fatal to asset construction.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed SVG at byte {position}: {message}")]
    Malformed { position: usize, message: String },

    #[error("SVG document has no root element")]
    NoRoot,

    #[error("unclosed element <{tag}> at end of document")]
    Unclosed { tag: String, position: usize },
}

impl ParseError {
    /// Byte range the error points at
    pub fn span(&self, source: &str) -> Span {
        let start = match self {
            ParseError::Malformed { position, .. } | ParseError::Unclosed { position, .. } => {
                (*position).min(source.len())
            }
            ParseError::NoRoot => 0,
        };
        start..(start + 1).min(source.len()).max(start)
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = self.span(source);
        let mut buf = Vec::new();

        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(self.to_string())
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("{filename}: {self}"),
        }
    }
}

/// A sprite id or asset name that does not resolve
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("can't find sprite with id {id}")]
    Sprite { id: String },

    #[error("can't find SVG asset {name}")]
    Asset { name: String },
}

/// A paint value that is not a color. Only ever skips one occurrence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not a color: {value:?}")]
pub struct ColorParseError {
    pub value: String,
}

/// Failure of the external markup optimizer
#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error("failed to run optimizer `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("optimizer `{command}` exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("optimizer produced invalid UTF-8")]
    InvalidOutput(#[from] std::string::FromUtf8Error),

    #[error("{0}")]
    Custom(String),
}

/// Errors surfaced by [`crate::Asset`] and [`crate::AssetCache`]
#[derive(Error, Debug)]
pub enum AssetError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("failed to read SVG file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Optimize(#[from] OptimizeError),
}
