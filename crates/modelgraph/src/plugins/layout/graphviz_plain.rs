//! Geometry extraction from Graphviz `-Tplain` output
//!
//! ```text
//! graph 1 4.5 3.25
//! node Cart 1.25 2.75 1.2 0.5 "Cart" solid box black lightgrey
//! edge Cart Book 4 1.25 2.5 ...
//! stop
//! ```
//!
//! Coordinates are inches with the origin at the bottom-left corner. They are
//! converted to points and flipped so `y` grows downward like SVG.

use chumsky::prelude::*;
use tracing::{debug, span, trace, Level};

use crate::core::chumsky_utils::inline_whitespace;
use crate::core::{GeometryExtractor, LayoutPoint, ModelError, PositionMap, Result};

const POINTS_PER_INCH: f64 = 72.0;

fn token<'src>() -> impl Parser<'src, &'src str, String> + Clone {
    let quoted = just('"')
        .ignore_then(
            choice((just('\\').ignore_then(any()), none_of("\\\"")))
                .repeated()
                .collect::<String>(),
        )
        .then_ignore(just('"'));
    let bare = none_of(" \t\"").repeated().at_least(1).collect::<String>();
    choice((quoted, bare))
}

fn line_parser<'src>() -> impl Parser<'src, &'src str, Vec<String>> {
    inline_whitespace()
        .ignore_then(
            token()
                .separated_by(one_of(" \t").repeated().at_least(1))
                .collect::<Vec<String>>(),
        )
        .then_ignore(inline_whitespace())
        .then_ignore(end())
}

fn coordinate(field: &str, line: usize, text: Option<&String>) -> Result<f64> {
    text.and_then(|t| t.parse::<f64>().ok()).ok_or_else(|| {
        ModelError::layout_parse(format!("line {}: expected numeric {}", line, field))
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GraphvizPlainExtractor;

impl GraphvizPlainExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl GeometryExtractor for GraphvizPlainExtractor {
    fn extract_positions(&self, artifact: &str) -> Result<PositionMap> {
        let extract_span = span!(
            Level::INFO,
            "extract_plain_geometry",
            artifact_len = artifact.len()
        );
        let _enter = extract_span.enter();

        let parser = line_parser();
        let mut height: Option<f64> = None;
        let mut positions = PositionMap::new();

        for (index, raw) in artifact.lines().enumerate() {
            let number = index + 1;
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let fields = parser.parse(raw).into_result().map_err(|_| {
                ModelError::layout_parse(format!("line {}: unterminated quoted name", number))
            })?;

            match fields.first().map(String::as_str) {
                Some("graph") => {
                    height = Some(coordinate("graph height", number, fields.get(3))?);
                }
                Some("node") => {
                    let Some(height) = height else {
                        return Err(ModelError::layout_parse(
                            "node entry before the graph header",
                        ));
                    };
                    let Some(name) = fields.get(1) else {
                        return Err(ModelError::layout_parse(format!(
                            "line {}: node entry without a name",
                            number
                        )));
                    };
                    let x = coordinate("node x", number, fields.get(2))?;
                    let y = coordinate("node y", number, fields.get(3))?;
                    let point =
                        LayoutPoint::new(x * POINTS_PER_INCH, (height - y) * POINTS_PER_INCH);
                    trace!(element = %name, x = point.x, y = point.y, "Element anchor");
                    positions.entry(name.clone()).or_insert(point);
                }
                Some("stop") => break,
                _ => {}
            }
        }

        if height.is_none() {
            return Err(ModelError::layout_parse(
                "artifact has no Graphviz plain 'graph' header",
            ));
        }

        debug!(elements = positions.len(), "Plain geometry extracted");
        Ok(positions)
    }

    fn name(&self) -> &'static str {
        "graphviz-plain"
    }

    fn format(&self) -> &'static str {
        "plain"
    }
}
