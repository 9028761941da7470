//! Geometry extraction from PlantUML SVG output
//!
//! PlantUML has named its entity elements differently across releases, so
//! the element name is taken from the first source that applies:
//!
//! 1. `data-qualified-name` on an enclosing `<g>` (last `.` segment)
//! 2. `data-entity` on an enclosing `<g>`
//! 3. an enclosing `<g id="elem_X">` or `<g id="entity_X">`
//! 4. a preceding `<!--class X-->` style comment
//! 5. the `id` of the `<rect>` itself
//!
//! The anchor is the centre of the first `<rect>` found for each name.
//! Package frames (`<g class="cluster">`) are skipped.

use quick_xml::events::attributes::Attributes;
use quick_xml::events::Event as XmlEvent;
use quick_xml::reader::Reader as XmlReader;
use tracing::{debug, span, trace, Level};

use crate::core::{GeometryExtractor, LayoutPoint, ModelError, PositionMap, Result};

const COMMENT_PREFIXES: &[&str] = &[
    "abstract class ",
    "class ",
    "entity ",
    "enum ",
    "interface ",
    "object ",
];

const GROUP_ID_PREFIXES: &[&str] = &["elem_", "entity_"];

type Attrs = Vec<(String, String)>;

fn collect_attributes(attributes: Attributes<'_>) -> Attrs {
    attributes
        .filter_map(|a| a.ok())
        .map(|a| {
            (
                String::from_utf8_lossy(a.key.as_ref()).to_string(),
                String::from_utf8_lossy(&a.value).to_string(),
            )
        })
        .collect()
}

fn attribute<'a>(attrs: &'a Attrs, key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn number(attrs: &Attrs, key: &str) -> Option<f64> {
    attribute(attrs, key)
        .map(|v| v.trim().trim_end_matches("px"))
        .and_then(|v| v.parse::<f64>().ok())
}

/// Name carried by a `<g>` element, if it is an entity group
fn group_name(attrs: &Attrs) -> Option<String> {
    if attribute(attrs, "class") == Some("cluster") {
        return None;
    }
    if let Some(qualified) = attribute(attrs, "data-qualified-name") {
        let name = qualified.rsplit('.').next().unwrap_or(qualified);
        return Some(name.to_string());
    }
    if let Some(entity) = attribute(attrs, "data-entity") {
        return Some(entity.to_string());
    }
    let id = attribute(attrs, "id")?;
    GROUP_ID_PREFIXES
        .iter()
        .find_map(|prefix| id.strip_prefix(prefix))
        .map(str::to_string)
}

/// Entity name announced by an SVG comment, e.g. `MD5=[..]\nclass Cart`
fn comment_name(text: &str) -> Option<String> {
    text.lines().map(str::trim).find_map(|line| {
        COMMENT_PREFIXES
            .iter()
            .find_map(|prefix| line.strip_prefix(prefix))
            .map(|rest| rest.trim().to_string())
            .filter(|name| !name.is_empty())
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlantUmlSvgExtractor;

impl PlantUmlSvgExtractor {
    pub fn new() -> Self {
        Self
    }

    fn record_rect(
        &self,
        attrs: &Attrs,
        groups: &[Option<String>],
        pending: &mut Option<String>,
        positions: &mut PositionMap,
    ) {
        let name = groups
            .iter()
            .rev()
            .find_map(|g| g.clone())
            .or_else(|| pending.take())
            .or_else(|| attribute(attrs, "id").map(str::to_string));
        *pending = None;

        let Some(name) = name else {
            return;
        };
        if positions.contains_key(&name) {
            return;
        }

        let (Some(width), Some(height)) = (number(attrs, "width"), number(attrs, "height")) else {
            return;
        };
        let x = number(attrs, "x").unwrap_or(0.0);
        let y = number(attrs, "y").unwrap_or(0.0);
        let center = LayoutPoint::center_of(x, y, width, height);
        trace!(element = %name, x = center.x, y = center.y, "Element anchor");
        positions.insert(name, center);
    }
}

impl GeometryExtractor for PlantUmlSvgExtractor {
    fn extract_positions(&self, artifact: &str) -> Result<PositionMap> {
        let extract_span = span!(
            Level::INFO,
            "extract_svg_geometry",
            artifact_len = artifact.len()
        );
        let _enter = extract_span.enter();

        let mut reader = XmlReader::from_str(artifact);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut positions = PositionMap::new();
        let mut groups: Vec<Option<String>> = Vec::new();
        let mut pending: Option<String> = None;
        let mut saw_svg = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(XmlEvent::Start(ref e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    let attrs = collect_attributes(e.attributes());
                    match name.as_str() {
                        "svg" => saw_svg = true,
                        "g" => {
                            let group = group_name(&attrs);
                            let group = if group.is_some() {
                                pending = None;
                                group
                            } else if attribute(&attrs, "class") == Some("cluster") {
                                None
                            } else {
                                pending.take()
                            };
                            groups.push(group);
                        }
                        "rect" => {
                            self.record_rect(&attrs, &groups, &mut pending, &mut positions)
                        }
                        _ => {}
                    }
                }
                Ok(XmlEvent::Empty(ref e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    match name.as_str() {
                        "rect" => {
                            let attrs = collect_attributes(e.attributes());
                            self.record_rect(&attrs, &groups, &mut pending, &mut positions);
                        }
                        "svg" => saw_svg = true,
                        _ => {}
                    }
                }
                Ok(XmlEvent::End(ref e)) => {
                    if e.name().as_ref() == b"g" {
                        groups.pop();
                    }
                }
                Ok(XmlEvent::Comment(ref e)) => {
                    let text = String::from_utf8_lossy(&**e).to_string();
                    if let Some(name) = comment_name(&text) {
                        pending = Some(name);
                    }
                }
                Ok(XmlEvent::Eof) => break,
                Err(e) => {
                    return Err(ModelError::layout_parse(format!(
                        "malformed SVG at byte {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {}
            }
            buf.clear();
        }

        if !saw_svg {
            return Err(ModelError::layout_parse("artifact is not an SVG document"));
        }

        debug!(elements = positions.len(), "SVG geometry extracted");
        Ok(positions)
    }

    fn name(&self) -> &'static str {
        "plantuml-svg"
    }

    fn format(&self) -> &'static str {
        "svg"
    }
}
