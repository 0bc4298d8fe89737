//! # Render Subcommand
//!
//! Projects the full trace of a proof into a graph and hands it to the
//! configured Graphviz program.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use cpv_graph::{GraphProjector, GraphvizRenderer, OutputFormat, Renderer};
use cpv_replay::AnchorEngine;

use crate::config::CliConfig;

/// Arguments for the `cpv render` subcommand.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Path to the Chainpoint v3 proof (JSON).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output path. Defaults to the proof path with the format's extension.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format: svg, png, pdf, or dot.
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Graphviz executable to invoke.
    #[arg(long, value_name = "PROGRAM")]
    pub dot_program: Option<PathBuf>,
}

/// Execute the render subcommand.
pub fn run_render(args: &RenderArgs, config: &CliConfig) -> Result<u8> {
    let format = args.format.unwrap_or(config.format);
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.file, format));
    let program = args
        .dot_program
        .clone()
        .unwrap_or_else(|| config.dot_program.clone());
    let renderer = GraphvizRenderer::new(program);

    let written = render_file(&args.file, &output, format, config, &renderer)?;
    println!("OK: wrote {} ({format})", written.display());
    Ok(0)
}

/// Load, replay, project and render one proof.
pub fn render_file(
    proof_path: &Path,
    output: &Path,
    format: OutputFormat,
    config: &CliConfig,
    renderer: &dyn Renderer,
) -> Result<PathBuf> {
    let proof = crate::load_proof(proof_path)?;
    let full = AnchorEngine::new(config.chain_tag.as_str()).compute_full_trace(&proof)?;

    let mut projector = GraphProjector::new();
    if let Some(explorer) = &config.explorer {
        projector = projector.with_explorer(explorer);
    }
    let graph = projector.project(&full);

    renderer
        .render(&graph, format, output)
        .with_context(|| format!("failed to render {}", output.display()))
}

fn default_output(proof_path: &Path, format: OutputFormat) -> PathBuf {
    proof_path.with_extension(format.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpv_graph::{Graph, RenderError};
    use std::cell::RefCell;

    /// Captures the graph instead of running a layout program.
    #[derive(Default)]
    struct Capture {
        graphs: RefCell<Vec<(Graph, OutputFormat)>>,
    }

    impl Renderer for Capture {
        fn render(
            &self,
            graph: &Graph,
            format: OutputFormat,
            output: &Path,
        ) -> Result<PathBuf, RenderError> {
            self.graphs.borrow_mut().push((graph.clone(), format));
            Ok(output.to_path_buf())
        }
    }

    #[test]
    fn default_output_swaps_extension() {
        assert_eq!(
            default_output(Path::new("/tmp/proof.json"), OutputFormat::Svg),
            PathBuf::from("/tmp/proof.svg")
        );
    }

    #[test]
    fn explorer_link_reaches_the_renderer() {
        let f = crate::fixtures::proof_file(crate::fixtures::PROOF);
        let config = CliConfig {
            explorer: Some(cpv_replay::ExplorerTemplate::Blockchain),
            ..CliConfig::default()
        };
        let capture = Capture::default();
        let out = render_file(f.path(), Path::new("out.svg"), OutputFormat::Svg, &config, &capture)
            .unwrap();
        assert_eq!(out, PathBuf::from("out.svg"));

        let graphs = capture.graphs.borrow();
        let (graph, format) = &graphs[0];
        assert_eq!(*format, OutputFormat::Svg);
        let txid = graph.node("txid").unwrap();
        assert!(txid
            .link
            .as_deref()
            .unwrap()
            .starts_with("https://www.blockchain.com/btc/tx/"));
        assert!(graph.node("op_return").is_some());
    }

    #[test]
    fn dot_format_writes_without_graphviz() {
        let f = crate::fixtures::proof_file(crate::fixtures::PROOF);
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("proof.dot");
        let renderer = GraphvizRenderer::new("/nonexistent/dot");
        render_file(f.path(), &out, OutputFormat::Dot, &CliConfig::default(), &renderer).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.contains("\"txid\""));
        assert!(text.contains("\"a0\" -> \"op_return\";"));
    }

    #[test]
    fn unavailable_renderer_is_reported() {
        let f = crate::fixtures::proof_file(crate::fixtures::PROOF);
        let dir = tempfile::tempdir().unwrap();
        let renderer = GraphvizRenderer::new("/nonexistent/dot");
        let err = render_file(
            f.path(),
            &dir.path().join("proof.svg"),
            OutputFormat::Svg,
            &CliConfig::default(),
            &renderer,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RenderError>(),
            Some(RenderError::RendererUnavailable { .. })
        ));
    }
}
