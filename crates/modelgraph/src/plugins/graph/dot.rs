//! Graphviz DOT emitter for property-graph schemas
//!
//! Alternative to the PlantUML emitter when `dot` is the layout engine.
//! Node ids are the same aliases the PlantUML emitter writes, so the
//! plain-output extractor and the resolver need no engine-specific keys.
//! Ids are always quoted since `node`, `edge` and `graph` are keywords in
//! any letter case.

use tracing::{debug, span, Level};

use crate::core::naming::diagram_alias;
use crate::core::{DirectionMap, Emitter, EmitterConfig, Result};
use crate::plugins::plantuml::label_with_glyph;

use super::schema::PropertyGraphSchema;

const POINTS_PER_INCH: f64 = 72.0;

/// Escape text for a double-quoted DOT string
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quoted node id for a schema node name
fn node_id(name: &str) -> String {
    format!("\"{}\"", escape(&diagram_alias(name)))
}

#[derive(Debug, Clone, Default)]
pub struct DotEmitter {
    config: EmitterConfig,
}

impl DotEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EmitterConfig) -> Self {
        Self { config }
    }
}

impl Emitter<PropertyGraphSchema> for DotEmitter {
    fn emit(&self, schema: &PropertyGraphSchema, directions: &DirectionMap) -> Result<String> {
        let emit_span = span!(
            Level::INFO,
            "emit_dot",
            nodes = schema.node_count(),
            relationships = schema.relationship_count()
        );
        let _enter = emit_span.enter();

        let config = &self.config;
        let palette = &config.palette;
        let mut lines = Vec::new();

        lines.push(format!("digraph \"{}\" {{", escape(&schema.name)));
        lines.push(format!(
            "  graph [rankdir=TB, nodesep={:.2}, ranksep={:.2}, bgcolor=\"{}\", fontname=\"{}\", fontsize={}, dpi={}];",
            f64::from(config.node_separation) / POINTS_PER_INCH,
            f64::from(config.rank_separation) / POINTS_PER_INCH,
            palette.background,
            escape(&config.font_family),
            config.title_font_size,
            config.dpi
        ));
        lines.push(format!(
            "  node [shape=box, style=filled, fillcolor=\"{}\", color=\"{}\", fontname=\"{}\", fontsize={}];",
            palette.node_background,
            palette.border,
            escape(&config.font_family),
            config.font_size
        ));
        lines.push(format!(
            "  edge [dir=none, color=\"{}\", fontname=\"{}\", fontsize={}];",
            palette.line,
            escape(&config.font_family),
            config.font_size
        ));

        let framed = config.package_frame && !schema.name.trim().is_empty();
        let indent = if framed { "    " } else { "  " };
        if framed {
            lines.push(format!(
                "  subgraph cluster_{} {{",
                diagram_alias(&schema.name)
            ));
            lines.push(format!("    label=\"{}\";", escape(&schema.name)));
        }

        for node in schema.nodes.values() {
            let mut label = escape(&node.name);
            if !node.attributes.is_empty() {
                label.push_str("\\n\\n");
                for (name, ty) in &node.attributes {
                    label.push_str(&escape(&format!("{} : {}", name, ty)));
                    label.push_str("\\l");
                }
            }
            lines.push(format!(
                "{}{} [label=\"{}\"];",
                indent,
                node_id(&node.name),
                label
            ));
        }

        if framed {
            lines.push("  }".to_string());
        }

        for relationship in &schema.relationships {
            let label =
                label_with_glyph(&relationship.type_name, &relationship.key(), directions, config);
            lines.push(format!(
                "  {} -> {} [label=\"{}\"];",
                node_id(&relationship.from_node),
                node_id(&relationship.to_node),
                escape(&label)
            ));
        }

        lines.push("}".to_string());
        let mut text = lines.join("\n");
        text.push('\n');

        debug!(output_len = text.len(), "DOT diagram emitted");
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "graph-dot"
    }

    fn format(&self) -> &'static str {
        "dot"
    }
}
