//! # External Renderer
//!
//! [`Renderer`] is the narrow seam between a projected [`Graph`] and
//! whatever lays it out. [`GraphvizRenderer`] shells out to Graphviz:
//!
//! 1. Serialize the graph to DOT.
//! 2. Write it to a [`NamedTempFile`].
//! 3. Run `<program> -T<format> <tmp> -o <output>`.
//!
//! The temporary file is owned by the render call and deleted when it is
//! dropped, whichever way the call returns.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::dot::to_dot;
use crate::graph::Graph;

/// Program name used when none is configured.
pub const DEFAULT_DOT_PROGRAM: &str = "dot";

/// Failures at the rendering boundary.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The layout program could not be started.
    #[error("renderer `{program}` is unavailable: {reason}")]
    RendererUnavailable { program: String, reason: String },

    /// The layout program ran and reported failure.
    #[error("renderer `{program}` failed ({status}): {stderr}")]
    RendererFailed {
        program: String,
        status: String,
        stderr: String,
    },

    /// Writing the DOT text or the output artifact failed.
    #[error("render I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Artifact format requested from the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
    Pdf,
    /// DOT source, written without invoking any program.
    Dot,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Pdf => "pdf",
            Self::Dot => "dot",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "pdf" => Ok(Self::Pdf),
            "dot" | "gv" => Ok(Self::Dot),
            other => Err(format!(
                "unknown output format {other:?} (expected svg, png, pdf, or dot)"
            )),
        }
    }
}

/// Something that can lay out a [`Graph`] into a file.
pub trait Renderer {
    /// Render `graph` as `format` into `output`, returning the written path.
    fn render(
        &self,
        graph: &Graph,
        format: OutputFormat,
        output: &Path,
    ) -> Result<PathBuf, RenderError>;
}

/// Renders through the Graphviz command-line tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphvizRenderer {
    program: PathBuf,
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_DOT_PROGRAM)
    }
}

impl GraphvizRenderer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Check that the program can be started. Returns its version banner.
    ///
    /// Graphviz prints `-V` output on stderr.
    pub fn check_available(&self) -> Result<String, RenderError> {
        let output = Command::new(&self.program)
            .arg("-V")
            .output()
            .map_err(|e| self.spawn_error(e))?;
        if !output.status.success() {
            return Err(self.failed(&output));
        }
        let banner = if output.stderr.is_empty() {
            &output.stdout
        } else {
            &output.stderr
        };
        Ok(String::from_utf8_lossy(banner).trim().to_string())
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    fn spawn_error(&self, e: io::Error) -> RenderError {
        match e.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                RenderError::RendererUnavailable {
                    program: self.program_name(),
                    reason: e.to_string(),
                }
            }
            _ => RenderError::Io(e),
        }
    }

    fn failed(&self, output: &std::process::Output) -> RenderError {
        RenderError::RendererFailed {
            program: self.program_name(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}

impl Renderer for GraphvizRenderer {
    fn render(
        &self,
        graph: &Graph,
        format: OutputFormat,
        output: &Path,
    ) -> Result<PathBuf, RenderError> {
        let source = to_dot(graph);

        if format == OutputFormat::Dot {
            std::fs::write(output, source)?;
            tracing::info!(path = %output.display(), "wrote DOT source");
            return Ok(output.to_path_buf());
        }

        let mut dot_file = NamedTempFile::new()?;
        dot_file.write_all(source.as_bytes())?;
        dot_file.flush()?;

        tracing::debug!(
            program = %self.program.display(),
            format = %format,
            input = %dot_file.path().display(),
            "invoking renderer"
        );
        let result = Command::new(&self.program)
            .arg(format!("-T{format}"))
            .arg(dot_file.path())
            .arg("-o")
            .arg(output)
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !result.status.success() {
            let err = self.failed(&result);
            tracing::warn!(error = %err, "renderer failed");
            return Err(err);
        }

        tracing::info!(path = %output.display(), format = %format, "rendered trace graph");
        Ok(output.to_path_buf())
    }
}
