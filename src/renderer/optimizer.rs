//! External markup optimizer
//!
//! Rendering is synchronous end to end, so every optimizer blocks the caller
//! until its output is available.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::OptimizeError;

/// A pure markup-to-markup transform run on every render
pub trait Optimizer: Send + Sync {
    fn optimize(&self, markup: &str) -> Result<String, OptimizeError>;
}

impl<F> Optimizer for F
where
    F: Fn(&str) -> Result<String, OptimizeError> + Send + Sync,
{
    fn optimize(&self, markup: &str) -> Result<String, OptimizeError> {
        self(markup)
    }
}

/// Pipes markup through an external program (stdin to stdout)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOptimizer {
    program: String,
    args: Vec<String>,
}

impl CommandOptimizer {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// `svgo -i - -o -`
    pub fn svgo() -> Self {
        Self::new("svgo", ["-i", "-", "-o", "-"])
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Optimizer for CommandOptimizer {
    fn optimize(&self, markup: &str) -> Result<String, OptimizeError> {
        let spawn_error = |source| OptimizeError::Spawn {
            command: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| OptimizeError::Custom("optimizer stdin is not piped".to_string()))?;

        // Feed stdin from a second thread so a chatty child can't fill its
        // stdout pipe while we are still writing.
        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(markup.as_bytes()));
            let output = child.wait_with_output();
            (output, writer.join())
        });

        let output = output.map_err(spawn_error)?;
        if !output.status.success() {
            return Err(OptimizeError::Failed {
                command: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        match written {
            Ok(result) => result.map_err(spawn_error)?,
            Err(_) => {
                return Err(OptimizeError::Custom(
                    "optimizer input writer panicked".to_string(),
                ))
            }
        }

        let optimized = String::from_utf8(output.stdout)?;
        Ok(optimized.trim_end().to_string())
    }
}
