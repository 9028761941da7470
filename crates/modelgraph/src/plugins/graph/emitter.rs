//! PlantUML emitter for property-graph schemas
//!
//! Nodes are drawn as attribute boxes inside a package named after the
//! model; relationships are plain lines labelled with their type and, once
//! resolved, the glyph pointing at the far endpoint.

use tracing::{debug, span, Level};

use crate::core::naming::diagram_alias;
use crate::core::{DirectionMap, Emitter, EmitterConfig, Result};
use crate::plugins::plantuml::{label_with_glyph, quoted, PlantUmlDocument};

use super::schema::PropertyGraphSchema;

#[derive(Debug, Clone, Default)]
pub struct GraphEmitter {
    config: EmitterConfig,
}

impl GraphEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EmitterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }
}

impl Emitter<PropertyGraphSchema> for GraphEmitter {
    fn emit(&self, schema: &PropertyGraphSchema, directions: &DirectionMap) -> Result<String> {
        let emit_span = span!(
            Level::INFO,
            "emit_graph",
            nodes = schema.node_count(),
            relationships = schema.relationship_count(),
            resolved = directions.len()
        );
        let _enter = emit_span.enter();

        let config = &self.config;
        let mut doc = PlantUmlDocument::new(&schema.name);
        doc.skin(config, "class", &config.palette.node_background);
        doc.blank();

        let framed = config.package_frame && !schema.name.trim().is_empty();
        if framed {
            doc.open(format!("package {}", quoted(&schema.name)));
        }

        for node in schema.nodes.values() {
            let header = format!("class {} as {}", quoted(&node.name), diagram_alias(&node.name));
            if node.attributes.is_empty() {
                doc.line(header);
            } else {
                doc.open(header);
                for (name, ty) in &node.attributes {
                    doc.line(format!("{} : {}", name, ty));
                }
                doc.close();
            }
        }

        if !schema.enumerations.is_empty() {
            doc.blank();
        }
        for enumeration in &schema.enumerations {
            doc.open(format!(
                "enum {} as {} {}",
                quoted(&enumeration.name),
                diagram_alias(&enumeration.name),
                config.palette.enumeration_background
            ));
            for value in &enumeration.values {
                doc.line(value);
            }
            doc.close();
        }

        if framed {
            doc.close();
        }
        doc.blank();

        for relationship in &schema.relationships {
            let key = relationship.key();
            let label = label_with_glyph(&relationship.type_name, &key, directions, config);
            doc.line(format!(
                "{} -- {} : {}",
                diagram_alias(&relationship.from_node),
                diagram_alias(&relationship.to_node),
                label
            ));
        }

        let text = doc.finish();
        debug!(output_len = text.len(), "Graph diagram emitted");
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "graph-plantuml"
    }

    fn format(&self) -> &'static str {
        "plantuml"
    }
}
