//! Integration tests for the public API

use modelgraph::plugins::relational::{map_model, orm_tables, MappingStrategy};
use modelgraph::plugins::xmi::export_xmi;
use modelgraph::prelude::*;
use modelgraph::{convert_document, graph_diagram, load_model, sql_ddl, uml_diagram};

const CLINIC: &str = r#"
name: Clinic
enumerations:
  Severity: [LOW, HIGH]
classes:
  Person:
    abstract: true
    attributes: ["+ name"]
  Doctor:
  Patient:
    attributes:
      - name: severity
        type: Severity
  Ward:
associations:
  - {from: Doctor, to: Patient, fromRole: doctors, toRole: patients, fromMultiplicity: "*", toMultiplicity: "*"}
  - {from: Ward, to: Patient, fromRole: ward, toRole: patients, toMultiplicity: "0..*", type: composition}
generalizations:
  - {parent: Person, child: Doctor}
  - {parent: Person, child: Patient}
"#;

#[test]
fn test_load_model() {
    let model = load_model(CLINIC).unwrap();
    assert_eq!(model.name(), "Clinic");
    assert_eq!(model.class_count(), 4);
    assert!(model.is_abstract("Person"));
    assert_eq!(model.parent_of("Doctor"), Some("Person"));
}

#[test]
fn test_convert_document() {
    let conversion = convert_document(CLINIC).unwrap();
    let names: Vec<&str> = conversion.schema.nodes.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Doctor", "Patient", "Ward"]);
    assert_eq!(conversion.schema.relationships[1].type_name, "CONTAINS");
}

#[test]
fn test_graph_diagram_has_no_glyphs() {
    let text = graph_diagram(CLINIC).unwrap();
    assert!(text.starts_with("@startuml Clinic\n"));
    assert!(text.contains("Doctor -- Patient : HAS_PATIENT\n"));
    assert!(text.contains("Ward -- Patient : CONTAINS\n"));
    for symbol in DirectionSymbol::all() {
        assert!(!text.contains(symbol.glyph()));
    }
}

#[test]
fn test_uml_diagram() {
    let text = uml_diagram(CLINIC).unwrap();
    assert!(text.contains("abstract class \"Person\" as Person"));
    assert!(text.contains("Person <|-- Doctor"));
    assert!(text.contains("Ward \"1\" *-- \"*\" Patient : patients"));
    assert!(text.contains("+ name : String"));
}

#[test]
fn test_relational_outputs() {
    let model = load_model(CLINIC).unwrap();
    let schema = map_model(&model);
    assert!(schema.table("person").is_none());
    assert_eq!(schema.associations[0].strategy, MappingStrategy::JoinTable);
    assert_eq!(schema.associations[1].strategy, MappingStrategy::CascadingForeignKey);

    let sql = sql_ddl(CLINIC).unwrap();
    assert!(sql.contains("CREATE TABLE patient ("));
    assert!(sql.contains("CHECK (severity IN ('LOW', 'HIGH'))"));
    assert!(sql.contains("ON DELETE CASCADE"));

    let tables = orm_tables(&model);
    assert!(tables.starts_with("# O/R mapping: Clinic"));
    assert!(tables.contains("join table"));
}

#[test]
fn test_xmi_output() {
    let model = load_model(CLINIC).unwrap();
    let xmi = export_xmi(&model).unwrap();
    assert!(xmi.contains("xmi:id=\"cls_Person\""));
    assert!(xmi.contains("isAbstract=\"true\""));
    assert!(xmi.contains("xmi:type=\"uml:Enumeration\""));
}

#[test]
fn test_pipeline_options_from_toml_like_defaults() {
    let options = PipelineOptions::default();
    assert!(!options.degraded);
    assert_eq!(options.engine, LayoutEngine::PlantUml);
    assert_eq!(options.timeout_ms, 60_000);
    assert!(options.render_final);
}
