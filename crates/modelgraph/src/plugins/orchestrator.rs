//! Two-pass rendering pipeline
//!
//! The pipeline owns the external collaborators and drives one diagram
//! through two states:
//!
//! - `AwaitingLayout`: emit without glyphs, render, extract positions and
//!   resolve a direction per relationship
//! - `Resolved`: emit again with the direction map and render the final
//!   artifact
//!
//! Renderer failures always abort. Geometry and direction failures abort
//! before the second pass unless [`PipelineOptions::degraded`] is set, in
//! which case the second pass simply omits the glyphs it could not resolve.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, span, warn, Level};

use crate::core::{
    positions_by_name, CommandRenderer, DiagramSource, DirectionMap, Emitter, GeometryExtractor,
    LayoutRenderer, ModelError, PositionMap, RelationshipKey, Result, DEFAULT_RENDER_TIMEOUT,
};
use crate::plugins::layout::{resolve_directions, GraphvizPlainExtractor, PlantUmlSvgExtractor};

/// Pipeline state; `Resolved` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    AwaitingLayout,
    Resolved,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::AwaitingLayout => write!(f, "AWAITING_LAYOUT"),
            PipelineState::Resolved => write!(f, "RESOLVED"),
        }
    }
}

/// External layout engine driving both passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutEngine {
    /// `plantuml -tsvg`, geometry from the SVG
    #[default]
    PlantUml,
    /// `dot -Tplain` for geometry, `dot -Tsvg` for the final artifact
    Graphviz,
}

impl LayoutEngine {
    pub fn layout_renderer(&self, timeout: Duration) -> CommandRenderer {
        match self {
            LayoutEngine::PlantUml => CommandRenderer::plantuml_svg(),
            LayoutEngine::Graphviz => CommandRenderer::graphviz_plain(),
        }
        .with_timeout(timeout)
    }

    pub fn final_renderer(&self, timeout: Duration) -> CommandRenderer {
        match self {
            LayoutEngine::PlantUml => CommandRenderer::plantuml_svg(),
            LayoutEngine::Graphviz => CommandRenderer::graphviz_svg(),
        }
        .with_timeout(timeout)
    }

    pub fn extractor(&self) -> Box<dyn GeometryExtractor> {
        match self {
            LayoutEngine::PlantUml => Box::new(PlantUmlSvgExtractor::new()),
            LayoutEngine::Graphviz => Box::new(GraphvizPlainExtractor::new()),
        }
    }
}

impl FromStr for LayoutEngine {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plantuml" => Ok(LayoutEngine::PlantUml),
            "graphviz" | "dot" => Ok(LayoutEngine::Graphviz),
            _ => Err(format!("Unknown layout engine: {}", s)),
        }
    }
}

impl fmt::Display for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutEngine::PlantUml => write!(f, "plantuml"),
            LayoutEngine::Graphviz => write!(f, "graphviz"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Continue to the second pass with whatever directions were resolved
    pub degraded: bool,
    pub engine: LayoutEngine,
    /// Budget for each external render
    pub timeout_ms: u64,
    /// Render the second pass; when off only the final text is produced
    pub render_final: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            degraded: false,
            engine: LayoutEngine::default(),
            timeout_ms: DEFAULT_RENDER_TIMEOUT.as_millis() as u64,
            render_final: true,
        }
    }
}

impl PipelineOptions {
    pub fn degraded(mut self) -> Self {
        self.degraded = true;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Everything produced by one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub state: PipelineState,
    /// Pass-one text, no glyphs
    pub layout_text: String,
    /// Pass-two text with the resolved glyphs
    pub final_text: String,
    /// Rendered pass-two artifact, if requested
    pub artifact: Option<String>,
    pub directions: DirectionMap,
    /// Non-empty only in degraded mode
    pub unresolved: Vec<RelationshipKey>,
    /// Nodes the pass-one artifact had no element for; non-empty only in degraded mode
    pub missing_nodes: Vec<String>,
}

impl PipelineOutput {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty() && self.missing_nodes.is_empty()
    }
}

/// Two-pass pipeline over swappable renderer and extractor
pub struct Pipeline {
    layout_renderer: Box<dyn LayoutRenderer>,
    final_renderer: Option<Box<dyn LayoutRenderer>>,
    extractor: Box<dyn GeometryExtractor>,
    options: PipelineOptions,
}

impl Pipeline {
    /// Pipeline that renders both passes with `renderer`
    pub fn new(
        renderer: impl LayoutRenderer + 'static,
        extractor: impl GeometryExtractor + 'static,
    ) -> Self {
        Self {
            layout_renderer: Box::new(renderer),
            final_renderer: None,
            extractor: Box::new(extractor),
            options: PipelineOptions::default(),
        }
    }

    /// Pipeline with the external programs of `options.engine`
    pub fn for_engine(options: PipelineOptions) -> Self {
        let timeout = options.timeout();
        Self {
            layout_renderer: Box::new(options.engine.layout_renderer(timeout)),
            final_renderer: Some(Box::new(options.engine.final_renderer(timeout))),
            extractor: options.engine.extractor(),
            options,
        }
    }

    /// Use a different renderer for the final artifact
    pub fn with_final_renderer(mut self, renderer: impl LayoutRenderer + 'static) -> Self {
        self.final_renderer = Some(Box::new(renderer));
        self
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Run both passes for one diagram source
    pub fn run<S, E>(&self, emitter: &E, source: &S) -> Result<PipelineOutput>
    where
        S: DiagramSource + ?Sized,
        E: Emitter<S> + ?Sized,
    {
        let run_span = span!(
            Level::INFO,
            "two_pass_pipeline",
            emitter = emitter.name(),
            renderer = self.layout_renderer.name(),
            extractor = self.extractor.name(),
            degraded = self.options.degraded
        );
        let _enter = run_span.enter();

        let mut state = PipelineState::AwaitingLayout;
        info!(%state, "Pipeline started");

        let layout_text = emitter.emit(source, &DirectionMap::new())?;
        debug!(output_len = layout_text.len(), "Pass one emitted");
        let layout_artifact = self.layout_renderer.render(&layout_text)?;

        let extracted = match self.extractor.extract_positions(&layout_artifact) {
            Ok(extracted) => extracted,
            Err(e) if self.options.degraded => {
                warn!(error = %e, "Geometry extraction failed, continuing without directions");
                PositionMap::new()
            }
            Err(e) => return Err(e),
        };

        let node_names = source.node_names();
        let (positions, missing_nodes) = positions_by_name(&extracted, &node_names);
        if !missing_nodes.is_empty() {
            if !self.options.degraded {
                return Err(ModelError::missing_nodes(missing_nodes));
            }
            warn!(missing = missing_nodes.len(), "Nodes missing from layout");
        }

        let resolution = resolve_directions(&positions, &source.relationship_keys());
        let (directions, unresolved) = if self.options.degraded {
            (resolution.directions, resolution.unresolved)
        } else {
            (resolution.into_complete()?, Vec::new())
        };

        state = PipelineState::Resolved;
        info!(
            %state,
            resolved = directions.len(),
            unresolved = unresolved.len(),
            "Directions resolved"
        );

        let final_text = emitter.emit(source, &directions)?;
        let artifact = if self.options.render_final {
            let renderer = self
                .final_renderer
                .as_deref()
                .unwrap_or(self.layout_renderer.as_ref());
            Some(renderer.render(&final_text)?)
        } else {
            None
        };

        info!(final_len = final_text.len(), "Pipeline completed");
        Ok(PipelineOutput {
            state,
            layout_text,
            final_text,
            artifact,
            directions,
            unresolved,
            missing_nodes,
        })
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("layout_renderer", &self.layout_renderer.name())
            .field(
                "final_renderer",
                &self.final_renderer.as_ref().map(|r| r.name().to_string()),
            )
            .field("extractor", &self.extractor.name())
            .field("options", &self.options)
            .finish()
    }
}
