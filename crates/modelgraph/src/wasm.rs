//! WebAssembly bindings for Modelgraph
//!
//! Browser-friendly wrappers that take a model document (YAML or JSON text)
//! and return text. Errors surface as JavaScript exceptions.

use wasm_bindgen::prelude::*;

use crate::core::{DirectionMap, Emitter};
use crate::model::DomainModel;
use crate::plugins::graph::{convert, GraphEmitter};
use crate::plugins::uml::UmlEmitter;

/// Initialize WASM module
///
/// Sets up panic hooks and logging for better error messages in the browser.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

fn load(input: &str) -> Result<DomainModel, JsValue> {
    DomainModel::from_yaml_str(input).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Convert a model document to a property-graph schema
///
/// # Returns
/// * JSON string with fields: schema, warnings
#[wasm_bindgen]
pub fn convert_model(input: &str) -> Result<String, JsValue> {
    let model = load(input)?;
    let conversion = convert(&model);
    let warnings: Vec<String> = conversion.warnings.iter().map(|w| w.to_string()).collect();

    serde_json::to_string(&serde_json::json!({
        "schema": conversion.schema,
        "warnings": warnings,
    }))
    .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Pass-one PlantUML text for the property-graph diagram of a model document
#[wasm_bindgen]
pub fn emit_graph_diagram(input: &str) -> Result<String, JsValue> {
    let model = load(input)?;
    let schema = convert(&model).schema;
    GraphEmitter::new()
        .emit(&schema, &DirectionMap::new())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Pass-one PlantUML class diagram of a model document
#[wasm_bindgen]
pub fn emit_uml_diagram(input: &str) -> Result<String, JsValue> {
    let model = load(input)?;
    UmlEmitter::new()
        .emit(&model, &DirectionMap::new())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
