//! Two-pass pipeline with stand-in renderers

use modelgraph::load_model;
use modelgraph::plugins::instance::{generate_instances, InstanceEmitter};
use modelgraph::plugins::orchestrator::PipelineState;
use modelgraph::prelude::*;

const SHOP: &str = r#"
name: Shop
classes:
  ShoppingCart:
  Product:
    abstract: true
  PhysicalProduct:
  DigitalProduct:
associations:
  - {from: ShoppingCart, to: Product, fromRole: cart, toRole: products, toMultiplicity: "*", type: aggregation}
  - {from: PhysicalProduct, to: PhysicalProduct, fromRole: part, toRole: bundle}
generalizations:
  - {parent: Product, child: PhysicalProduct}
  - {parent: Product, child: DigitalProduct}
"#;

/// Cart on top, physical product below it, digital product to its right
const SVG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="400" height="300">
  <g class="cluster" id="cluster_Shop"><rect x="0" y="0" width="400" height="300"/></g>
  <!--class ShoppingCart-->
  <g id="elem_ShoppingCart"><rect x="20" y="20" width="100" height="40"/><text>ShoppingCart</text></g>
  <g data-qualified-name="Shop.PhysicalProduct"><rect x="20" y="200" width="100" height="40"/></g>
  <!--class DigitalProduct-->
  <g><rect x="250" y="20" width="100" height="40"/></g>
</svg>"#;

fn schema() -> PropertyGraphSchema {
    convert(&load_model(SHOP).unwrap()).schema
}

fn fixed_svg(_: &str) -> Result<String> {
    Ok(SVG.to_string())
}

#[test]
fn test_graph_pipeline_resolves_every_relationship() {
    let pipeline = Pipeline::new(fixed_svg, PlantUmlSvgExtractor::new());
    let output = pipeline.run(&GraphEmitter::new(), &schema()).unwrap();

    assert_eq!(output.state, PipelineState::Resolved);
    assert!(output.is_complete());
    assert!(output.layout_text.contains("ShoppingCart -- PhysicalProduct : HAS_PRODUCT\n"));
    assert!(output.final_text.contains("ShoppingCart -- PhysicalProduct : HAS_PRODUCT ▼\n"));
    assert!(output.final_text.contains("ShoppingCart -- DigitalProduct : HAS_PRODUCT ►\n"));
    assert!(output.final_text.contains("PhysicalProduct -- PhysicalProduct : HAS_BUNDLE ↻\n"));
    assert_eq!(
        output.directions[&RelationshipKey::new("ShoppingCart", "PhysicalProduct", "HAS_PRODUCT")],
        DirectionSymbol::Down
    );
}

#[test]
fn test_final_renderer_receives_pass_two_text() {
    let final_render = |text: &str| -> Result<String> { Ok(format!("rendered {} bytes", text.len())) };
    let pipeline = Pipeline::new(fixed_svg, PlantUmlSvgExtractor::new()).with_final_renderer(final_render);
    let output = pipeline.run(&GraphEmitter::new(), &schema()).unwrap();
    assert_eq!(
        output.artifact,
        Some(format!("rendered {} bytes", output.final_text.len()))
    );
}

#[test]
fn test_render_final_disabled() {
    let options = PipelineOptions {
        render_final: false,
        ..PipelineOptions::default()
    };
    let pipeline = Pipeline::new(fixed_svg, PlantUmlSvgExtractor::new()).with_options(options);
    let output = pipeline.run(&GraphEmitter::new(), &schema()).unwrap();
    assert!(output.artifact.is_none());
    assert_eq!(output.state, PipelineState::Resolved);
}

#[test]
fn test_missing_node_aborts_before_pass_two() {
    let partial = |_: &str| -> Result<String> {
        Ok(r#"<svg><g id="elem_ShoppingCart"><rect x="0" y="0" width="10" height="10"/></g></svg>"#.to_string())
    };
    let pipeline = Pipeline::new(partial, PlantUmlSvgExtractor::new());
    let err = pipeline.run(&GraphEmitter::new(), &schema()).unwrap_err();
    match err {
        ModelError::LayoutParse { missing_nodes, .. } => {
            assert_eq!(missing_nodes, vec!["PhysicalProduct", "DigitalProduct"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_degraded_mode_omits_unresolved_glyphs() {
    let partial = |_: &str| -> Result<String> {
        Ok(r#"<svg><g id="elem_ShoppingCart"><rect x="0" y="0" width="10" height="10"/></g><g id="elem_DigitalProduct"><rect x="0" y="90" width="10" height="10"/></g></svg>"#.to_string())
    };
    let pipeline = Pipeline::new(partial, PlantUmlSvgExtractor::new())
        .with_options(PipelineOptions::default().degraded());
    let output = pipeline.run(&GraphEmitter::new(), &schema()).unwrap();

    assert_eq!(output.state, PipelineState::Resolved);
    assert_eq!(output.missing_nodes, vec!["PhysicalProduct"]);
    assert_eq!(
        output.unresolved,
        vec![RelationshipKey::new("ShoppingCart", "PhysicalProduct", "HAS_PRODUCT")]
    );
    assert!(output.final_text.contains("ShoppingCart -- DigitalProduct : HAS_PRODUCT ▼\n"));
    assert!(output.final_text.contains("ShoppingCart -- PhysicalProduct : HAS_PRODUCT\n"));
    assert!(output.final_text.contains("PhysicalProduct -- PhysicalProduct : HAS_BUNDLE ↻\n"));
    assert!(!output.is_complete());
}

#[test]
fn test_degraded_mode_survives_unreadable_artifact() {
    let broken = |_: &str| -> Result<String> { Ok("not a vector graphic".to_string()) };
    let pipeline = Pipeline::new(broken, PlantUmlSvgExtractor::new())
        .with_options(PipelineOptions::default().degraded());
    let output = pipeline.run(&GraphEmitter::new(), &schema()).unwrap();
    assert_eq!(
        output.directions.keys().collect::<Vec<_>>(),
        vec![&RelationshipKey::new("PhysicalProduct", "PhysicalProduct", "HAS_BUNDLE")]
    );
    assert_eq!(output.unresolved.len(), 2);
    assert!(output.final_text.contains("ShoppingCart -- DigitalProduct : HAS_PRODUCT\n"));
    assert!(output.final_text.contains("PhysicalProduct -- PhysicalProduct : HAS_BUNDLE ↻\n"));
}

#[test]
fn test_renderer_failure_is_fatal_even_when_degraded() {
    let failing = |_: &str| -> Result<String> { Err(ModelError::renderer("plantuml", "exited with 1")) };
    let pipeline = Pipeline::new(failing, PlantUmlSvgExtractor::new())
        .with_options(PipelineOptions::default().degraded());
    let err = pipeline.run(&GraphEmitter::new(), &schema()).unwrap_err();
    assert_eq!(err.stage(), "renderer");
}

#[test]
fn test_graphviz_engine_pair() {
    let plain = |_: &str| -> Result<String> {
        Ok("graph 1 5 4\n\
node ShoppingCart 1 3.5 1.5 0.5 ShoppingCart solid box black lightgrey\n\
node PhysicalProduct 1 0.5 1.5 0.5 PhysicalProduct solid box black lightgrey\n\
node DigitalProduct 4 3.5 1.5 0.5 DigitalProduct solid box black lightgrey\n\
stop\n"
            .to_string())
    };
    let pipeline = Pipeline::new(plain, GraphvizPlainExtractor::new())
        .with_final_renderer(|text: &str| -> Result<String> { Ok(text.to_string()) });
    let output = pipeline.run(&DotEmitter::new(), &schema()).unwrap();

    assert!(output.final_text.starts_with("digraph \"Shop\" {"));
    assert!(output.final_text.contains("\"ShoppingCart\" -> \"PhysicalProduct\" [label=\"HAS_PRODUCT ▼\"]"));
    assert!(output.final_text.contains("\"ShoppingCart\" -> \"DigitalProduct\" [label=\"HAS_PRODUCT ►\"]"));
}

#[test]
fn test_graphviz_keyword_class_names() {
    let model = load_model(
        "name: Graphs\nclasses:\n  Node:\n  Edge:\nassociations:\n  - {from: Node, to: Edge, fromRole: source, toRole: edges}\n",
    )
    .unwrap();
    let schema = convert(&model).schema;
    let plain = |text: &str| -> Result<String> {
        assert!(text.contains("\"Node\" -> \"Edge\""));
        Ok("graph 1 3 3\n\
node \"Node\" 1 2.5 1 0.5 Node solid box black lightgrey\n\
node \"Edge\" 1 0.5 1 0.5 Edge solid box black lightgrey\n\
stop\n"
            .to_string())
    };
    let output = Pipeline::new(plain, GraphvizPlainExtractor::new())
        .with_options(PipelineOptions {
            render_final: false,
            ..PipelineOptions::default()
        })
        .run(&DotEmitter::new(), &schema)
        .unwrap();
    assert!(output.is_complete());
    assert!(output.final_text.contains("\"Node\" -> \"Edge\" [label=\"HAS_EDGE ▼\"]"));
}

#[test]
fn test_uml_pipeline_uses_classes() {
    let model = load_model(SHOP).unwrap();
    let svg = |_: &str| -> Result<String> {
        Ok(r#"<svg>
<g id="elem_ShoppingCart"><rect x="0" y="0" width="10" height="10"/></g>
<g id="elem_Product"><rect x="200" y="0" width="10" height="10"/></g>
<g id="elem_PhysicalProduct"><rect x="200" y="200" width="10" height="10"/></g>
<g id="elem_DigitalProduct"><rect x="400" y="200" width="10" height="10"/></g>
</svg>"#
            .to_string())
    };
    let output = Pipeline::new(svg, PlantUmlSvgExtractor::new())
        .run(&UmlEmitter::new(), &model)
        .unwrap();
    assert_eq!(
        output.directions[&RelationshipKey::new("ShoppingCart", "Product", "products")],
        DirectionSymbol::Right
    );
    assert!(output.final_text.contains(": products ►"));
}

#[test]
fn test_instance_pipeline() {
    let instances = generate_instances(&schema());
    let svg = |_: &str| -> Result<String> {
        Ok(r#"<svg>
<!--object shopping_cart1-->
<g><rect x="0" y="0" width="10" height="10"/></g>
<!--object physical_product1-->
<g><rect x="0" y="-100" width="10" height="10"/></g>
<!--object digital_product1-->
<g><rect x="-100" y="0" width="10" height="10"/></g>
</svg>"#
            .to_string())
    };
    let output = Pipeline::new(svg, PlantUmlSvgExtractor::new())
        .run(&InstanceEmitter::new(), &instances)
        .unwrap();
    assert!(output.final_text.contains("shopping_cart1 -- physical_product1 : HAS_PRODUCT ▲\n"));
    assert!(output.final_text.contains("shopping_cart1 -- digital_product1 : HAS_PRODUCT ◄\n"));
    assert!(output.final_text.contains("physical_product1 -- physical_product1 : HAS_BUNDLE ↻\n"));
}
