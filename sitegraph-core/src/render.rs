// Graph output: DOT text, JSON, or an image rendered by Graphviz

use crate::error::{CrawlError, Result};
use crate::graph::{LinkGraph, PageNode};
use petgraph::dot::{Config, Dot};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Dot,
    Json,
    Png,
    Svg,
    Pdf,
    Jpg,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dot" | "gv" => Some(OutputFormat::Dot),
            "json" => Some(OutputFormat::Json),
            "png" => Some(OutputFormat::Png),
            "svg" => Some(OutputFormat::Svg),
            "pdf" => Some(OutputFormat::Pdf),
            "jpg" | "jpeg" => Some(OutputFormat::Jpg),
            _ => None,
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_str)
    }

    /// Pick the format for `path`: an explicit name wins, otherwise the
    /// extension decides.
    pub fn resolve(path: &Path, name: Option<&str>) -> Result<Self> {
        match name {
            Some(name) => Self::from_str(name)
                .ok_or_else(|| CrawlError::Config(format!("Unknown output format '{}'", name))),
            None => Self::from_path(path).ok_or_else(|| {
                CrawlError::Config(format!(
                    "Cannot infer output format from '{}', use --format or one of \
                     .png .svg .pdf .jpg .dot .json",
                    path.display()
                ))
            }),
        }
    }

    /// The `-T` argument Graphviz needs, for formats that go through it.
    fn graphviz_type(self) -> Option<&'static str> {
        match self {
            OutputFormat::Png => Some("png"),
            OutputFormat::Svg => Some("svg"),
            OutputFormat::Pdf => Some("pdf"),
            OutputFormat::Jpg => Some("jpg"),
            OutputFormat::Dot | OutputFormat::Json => None,
        }
    }
}

#[derive(Serialize)]
struct JsonGraph<'a> {
    nodes: Vec<&'a PageNode>,
    edges: Vec<JsonEdge<'a>>,
}

#[derive(Serialize)]
struct JsonEdge<'a> {
    source: &'a str,
    target: &'a str,
}

pub struct GraphRenderer {
    dot_command: String,
}

impl GraphRenderer {
    pub fn new() -> Self {
        Self::with_dot_command("dot")
    }

    /// Use a specific Graphviz executable instead of `dot` on the `PATH`.
    pub fn with_dot_command(command: impl Into<String>) -> Self {
        Self {
            dot_command: command.into(),
        }
    }

    pub fn to_dot(&self, graph: &LinkGraph) -> String {
        format!(
            "{}",
            Dot::with_config(graph.inner(), &[Config::EdgeNoLabel])
        )
    }

    pub fn write_dot(&self, graph: &LinkGraph, output: &mut dyn Write) -> Result<()> {
        output.write_all(self.to_dot(graph).as_bytes())?;
        Ok(())
    }

    pub fn write_json(&self, graph: &LinkGraph, output: &mut dyn Write) -> Result<()> {
        let json = JsonGraph {
            nodes: graph.nodes().collect(),
            edges: graph
                .edges()
                .map(|(source, target)| JsonEdge { source, target })
                .collect(),
        };
        serde_json::to_writer_pretty(&mut *output, &json)?;
        writeln!(output)?;
        Ok(())
    }

    /// Write `graph` to `path` in `format`.
    ///
    /// Image formats shell out to Graphviz, which must be installed.
    pub fn render_to_file(&self, graph: &LinkGraph, path: &Path, format: OutputFormat) -> Result<()> {
        info!("Rendering {} node(s) to {} ({:?})", graph.node_count(), path.display(), format);

        match format.graphviz_type() {
            Some(image_type) => self.render_image(graph, path, image_type),
            None => {
                let mut writer = BufWriter::new(File::create(path)?);
                match format {
                    OutputFormat::Json => self.write_json(graph, &mut writer)?,
                    _ => self.write_dot(graph, &mut writer)?,
                }
                writer.flush()?;
                Ok(())
            }
        }
    }

    fn render_image(&self, graph: &LinkGraph, path: &Path, image_type: &str) -> Result<()> {
        debug!("Running {} -T{} -o {}", self.dot_command, image_type, path.display());

        let mut child = Command::new(&self.dot_command)
            .arg(format!("-T{}", image_type))
            .arg("-o")
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                CrawlError::Render(format!(
                    "could not run '{}': {} (is Graphviz installed? Use a .dot or .json output to skip it)",
                    self.dot_command, e
                ))
            })?;

        // stdin is dropped before waiting so Graphviz sees EOF
        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(self.to_dot(graph).as_bytes()),
            None => Ok(()),
        };

        let output = child.wait_with_output()?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(CrawlError::Render(format!(
                "'{}' exited with {}: {}",
                self.dot_command,
                output.status,
                stderr.trim()
            )));
        }
        if let Err(e) = write_result {
            return Err(CrawlError::Render(format!(
                "'{}' stopped reading its input: {} {}",
                self.dot_command,
                e,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

impl Default for GraphRenderer {
    fn default() -> Self {
        Self::new()
    }
}
