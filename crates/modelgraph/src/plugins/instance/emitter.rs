//! PlantUML object diagram for example instance graphs

use tracing::{debug, span, Level};

use crate::core::naming::diagram_alias;
use crate::core::{DirectionMap, Emitter, EmitterConfig, Result};
use crate::plugins::plantuml::{label_with_glyph, quoted, PlantUmlDocument};

use super::generator::InstanceGraph;

#[derive(Debug, Clone, Default)]
pub struct InstanceEmitter {
    config: EmitterConfig,
}

impl InstanceEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EmitterConfig) -> Self {
        Self { config }
    }
}

impl Emitter<InstanceGraph> for InstanceEmitter {
    fn emit(&self, graph: &InstanceGraph, directions: &DirectionMap) -> Result<String> {
        let emit_span = span!(
            Level::INFO,
            "emit_instances",
            instances = graph.nodes.len(),
            edges = graph.edges.len()
        );
        let _enter = emit_span.enter();

        let config = &self.config;
        let mut doc = PlantUmlDocument::new(&graph.name);
        doc.skin(config, "class", &config.palette.instance_background);
        doc.blank();

        let framed = config.package_frame;
        if framed {
            doc.open(format!("package {}", quoted(&format!("pkg {}", graph.name))));
        }

        for node in &graph.nodes {
            let header = format!(
                "class {} as {}",
                quoted(&format!(":{}", node.label)),
                diagram_alias(&node.id)
            );
            if node.properties.is_empty() {
                doc.line(header);
                continue;
            }
            doc.open(header);
            for (name, value) in &node.properties {
                doc.line(format!("{} = {}", name, value));
            }
            doc.close();
        }

        if framed {
            doc.close();
        }
        doc.blank();

        for edge in &graph.edges {
            let label = label_with_glyph(&edge.type_name, &edge.key(), directions, config);
            doc.line(format!(
                "{} -- {} : {}",
                diagram_alias(&edge.from),
                diagram_alias(&edge.to),
                label
            ));
        }

        let text = doc.finish();
        debug!(output_len = text.len(), "Instance diagram emitted");
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "instance-plantuml"
    }

    fn format(&self) -> &'static str {
        "plantuml"
    }
}
