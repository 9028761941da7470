//! Line-oriented PlantUML document builder shared by the emitters

use crate::core::naming::diagram_alias;
use crate::core::{DirectionMap, EmitterConfig, RelationshipKey};

/// Accumulates PlantUML lines with two-space indentation
#[derive(Debug, Clone)]
pub struct PlantUmlDocument {
    lines: Vec<String>,
    depth: usize,
}

impl PlantUmlDocument {
    /// Start a document; the title becomes the `@startuml` diagram name
    pub fn new(title: &str) -> Self {
        Self {
            lines: vec![format!("@startuml {}", diagram_alias(title))],
            depth: 0,
        }
    }

    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let indent = "  ".repeat(self.depth);
        self.lines.push(format!("{}{}", indent, text.as_ref()));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    /// Write `header {` and indent until the matching [`close`](Self::close)
    pub fn open(&mut self, header: impl AsRef<str>) -> &mut Self {
        self.line(format!("{} {{", header.as_ref()));
        self.depth += 1;
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line("}")
    }

    /// Global skin parameters derived from the configuration
    pub fn skin(&mut self, config: &EmitterConfig, element: &str, background: &str) -> &mut Self {
        self.line(format!("skinparam backgroundColor {}", config.palette.background));
        self.line(format!("skinparam defaultFontName {}", config.font_family));
        self.line(format!("skinparam defaultFontSize {}", config.font_size));
        self.line(format!("skinparam dpi {}", config.dpi));
        self.line(format!("skinparam nodesep {}", config.node_separation));
        self.line(format!("skinparam ranksep {}", config.rank_separation));
        self.line(format!("skinparam ArrowColor {}", config.palette.line));
        self.open(format!("skinparam {}", element));
        self.line(format!("BackgroundColor {}", background));
        self.line(format!("BorderColor {}", config.palette.border));
        self.line(format!("FontSize {}", config.font_size));
        self.close();
        self.open("skinparam package");
        self.line(format!("BackgroundColor {}", config.palette.background));
        self.line(format!("BorderColor {}", config.palette.border));
        self.line(format!("FontSize {}", config.title_font_size));
        self.line("FontStyle bold");
        self.close();
        self.line("hide circle");
        self.line("hide methods");
        self.line("hide empty members");
        self
    }

    pub fn finish(mut self) -> String {
        self.depth = 0;
        self.line("@enduml");
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// Quote a display name for PlantUML
pub fn quoted(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "'"))
}

/// Relationship label with its glyph appended when one is resolved
pub fn label_with_glyph(
    label: &str,
    key: &RelationshipKey,
    directions: &DirectionMap,
    config: &EmitterConfig,
) -> String {
    match directions.get(key) {
        Some(symbol) if config.show_directions => format!("{} {}", label, symbol.glyph()),
        _ => label.to_string(),
    }
}
