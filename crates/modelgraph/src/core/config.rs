//! Emitter configuration
//!
//! Layout constants (fonts, colours, spacing) are carried in an immutable
//! [`EmitterConfig`] that every emitter receives at construction time. The
//! structure deserializes from TOML or JSON with every field optional.
//!
//! ```
//! use modelgraph::EmitterConfig;
//!
//! let config = EmitterConfig::default();
//! assert_eq!(config.font_size, 12);
//! ```

use serde::Deserialize;

/// Colours used by the diagram emitters
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: String,
    pub class_background: String,
    pub abstract_background: String,
    pub node_background: String,
    pub instance_background: String,
    pub enumeration_background: String,
    pub border: String,
    pub line: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "#FFFFFF".to_string(),
            class_background: "#FFFFCC".to_string(),
            abstract_background: "#F5F5F5".to_string(),
            node_background: "#E3F2FD".to_string(),
            instance_background: "#E8F5E9".to_string(),
            enumeration_background: "#CCFFCC".to_string(),
            border: "#333333".to_string(),
            line: "#000000".to_string(),
        }
    }
}

/// Immutable configuration passed into every emitter
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    pub font_family: String,
    pub font_size: u32,
    pub title_font_size: u32,
    pub dpi: u32,
    /// Horizontal gap between nodes
    pub node_separation: u32,
    /// Vertical gap between ranks
    pub rank_separation: u32,
    /// Draw the diagram as a package frame named after the model
    pub package_frame: bool,
    /// Embed resolved direction glyphs into relationship labels
    pub show_directions: bool,
    pub palette: Palette,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 12,
            title_font_size: 14,
            dpi: 150,
            node_separation: 60,
            rank_separation: 50,
            package_frame: true,
            show_directions: true,
            palette: Palette::default(),
        }
    }
}

impl EmitterConfig {
    /// Configuration without the model package frame
    pub fn without_frame(mut self) -> Self {
        self.package_frame = false;
        self
    }

    /// Configuration that never prints direction glyphs, even when resolved
    pub fn without_directions(mut self) -> Self {
        self.show_directions = false;
        self
    }
}
