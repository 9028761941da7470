//! XMI 2.1 export of the domain model
//!
//! Identifiers derive from element paths (`cls_Order`, `attr_Order_total`,
//! `assoc_0_src`, ...) so two exports of the same model are byte-identical.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::writer::Writer;
use tracing::{debug, span, Level};

use crate::core::naming::diagram_alias;
use crate::core::{ModelError, Result};
use crate::model::{AssociationKind, AttributeType, DomainModel, Multiplicity};

const XMI_NS: &str = "http://schema.omg.org/spec/XMI/2.1";
const UML_NS: &str = "http://schema.omg.org/spec/UML/2.1";
const PRIMITIVE_HREF: &str = "http://schema.omg.org/spec/UML/2.1/uml.xml#";

pub fn class_id(class: &str) -> String {
    format!("cls_{}", diagram_alias(class))
}

pub fn enumeration_id(enumeration: &str) -> String {
    format!("enum_{}", diagram_alias(enumeration))
}

struct XmiWriter {
    writer: Writer<Vec<u8>>,
}

impl XmiWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| ModelError::emit(format!("XMI write failed: {}", e)))
    }

    fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.write(Event::Start(element))
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.write(Event::Empty(element))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn bound_values(&mut self, multiplicity: &Multiplicity) -> Result<()> {
        let lower = multiplicity.lower.to_string();
        self.empty(
            "lowerValue",
            &[("xmi:type", "uml:LiteralInteger"), ("value", lower.as_str())],
        )?;
        match multiplicity.upper {
            Some(upper) => {
                let upper = upper.to_string();
                self.empty(
                    "upperValue",
                    &[("xmi:type", "uml:LiteralInteger"), ("value", upper.as_str())],
                )
            }
            None => self.empty(
                "upperValue",
                &[("xmi:type", "uml:LiteralUnlimitedNatural"), ("value", "-1")],
            ),
        }
    }

    fn finish(self) -> Result<String> {
        let mut text = String::from_utf8(self.writer.into_inner())
            .map_err(|e| ModelError::emit(format!("XMI output is not UTF-8: {}", e)))?;
        text.push('\n');
        Ok(text)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct XmiExporter;

impl XmiExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn export(&self, model: &DomainModel) -> Result<String> {
        let export_span = span!(
            Level::INFO,
            "export_xmi",
            model = model.name(),
            classes = model.class_count()
        );
        let _enter = export_span.enter();

        let mut xmi = XmiWriter::new();
        xmi.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        xmi.start(
            "xmi:XMI",
            &[("xmi:version", "2.1"), ("xmlns:xmi", XMI_NS), ("xmlns:uml", UML_NS)],
        )?;
        let model_id = format!("model_{}", diagram_alias(model.name()));
        xmi.start("uml:Model", &[("xmi:id", model_id.as_str()), ("name", model.name())])?;

        for enumeration in model.enumerations() {
            let id = enumeration_id(&enumeration.name);
            xmi.start(
                "packagedElement",
                &[
                    ("xmi:type", "uml:Enumeration"),
                    ("xmi:id", id.as_str()),
                    ("name", enumeration.name.as_str()),
                ],
            )?;
            for literal in &enumeration.values {
                let literal_id = format!("lit_{}_{}", diagram_alias(&enumeration.name), diagram_alias(literal));
                xmi.empty(
                    "ownedLiteral",
                    &[
                        ("xmi:type", "uml:EnumerationLiteral"),
                        ("xmi:id", literal_id.as_str()),
                        ("name", literal.as_str()),
                    ],
                )?;
            }
            xmi.end("packagedElement")?;
        }

        for class in model.classes() {
            let id = class_id(&class.name);
            let mut attributes = vec![
                ("xmi:type", "uml:Class"),
                ("xmi:id", id.as_str()),
                ("name", class.name.as_str()),
            ];
            if class.is_abstract {
                attributes.push(("isAbstract", "true"));
            }
            if class.attributes.is_empty() {
                xmi.empty("packagedElement", &attributes)?;
                continue;
            }
            xmi.start("packagedElement", &attributes)?;

            for attribute in &class.attributes {
                let attribute_id = format!("attr_{}_{}", diagram_alias(&class.name), diagram_alias(&attribute.name));
                let visibility = attribute.visibility.to_string();
                let mut property = vec![
                    ("xmi:type", "uml:Property"),
                    ("xmi:id", attribute_id.as_str()),
                    ("name", attribute.name.as_str()),
                    ("visibility", visibility.as_str()),
                ];
                match &attribute.ty {
                    AttributeType::Enum(name) => {
                        let type_id = enumeration_id(name);
                        property.push(("type", type_id.as_str()));
                        xmi.empty("ownedAttribute", &property)?;
                    }
                    AttributeType::Primitive(primitive) => {
                        let href = format!("{}{}", PRIMITIVE_HREF, primitive.name());
                        xmi.start("ownedAttribute", &property)?;
                        xmi.empty("type", &[("xmi:type", "uml:PrimitiveType"), ("href", href.as_str())])?;
                        xmi.end("ownedAttribute")?;
                    }
                }
            }
            xmi.end("packagedElement")?;
        }

        for (index, association) in model.associations().iter().enumerate() {
            let id = format!("assoc_{}", index);
            let source_end = format!("{}_src", id);
            let target_end = format!("{}_dst", id);
            let source_type = class_id(&association.from_class);
            let target_type = class_id(&association.to_class);
            let name = association.name.clone().unwrap_or_default();

            xmi.start(
                "packagedElement",
                &[("xmi:type", "uml:Association"), ("xmi:id", id.as_str()), ("name", name.as_str())],
            )?;
            xmi.empty("memberEnd", &[("xmi:idref", source_end.as_str())])?;
            xmi.empty("memberEnd", &[("xmi:idref", target_end.as_str())])?;

            let mut source = vec![
                ("xmi:type", "uml:Property"),
                ("xmi:id", source_end.as_str()),
                ("type", source_type.as_str()),
                ("name", association.from_role.as_str()),
            ];
            match association.kind {
                AssociationKind::Composition => source.push(("aggregation", "composite")),
                AssociationKind::Aggregation => source.push(("aggregation", "shared")),
                AssociationKind::Association => {}
            }
            xmi.start("ownedEnd", &source)?;
            xmi.bound_values(&association.from_multiplicity)?;
            xmi.end("ownedEnd")?;

            xmi.start(
                "ownedEnd",
                &[
                    ("xmi:type", "uml:Property"),
                    ("xmi:id", target_end.as_str()),
                    ("type", target_type.as_str()),
                    ("name", association.to_role.as_str()),
                ],
            )?;
            xmi.bound_values(&association.to_multiplicity)?;
            xmi.end("ownedEnd")?;
            xmi.end("packagedElement")?;
        }

        for generalization in model.generalizations() {
            let id = format!(
                "gen_{}_{}",
                diagram_alias(&generalization.parent),
                diagram_alias(&generalization.child)
            );
            let general = class_id(&generalization.parent);
            let specific = class_id(&generalization.child);
            xmi.empty(
                "packagedElement",
                &[
                    ("xmi:type", "uml:Generalization"),
                    ("xmi:id", id.as_str()),
                    ("general", general.as_str()),
                    ("specific", specific.as_str()),
                ],
            )?;
        }

        xmi.end("uml:Model")?;
        xmi.end("xmi:XMI")?;
        let text = xmi.finish()?;
        debug!(output_len = text.len(), "XMI exported");
        Ok(text)
    }
}

/// Export with the default exporter
pub fn export_xmi(model: &DomainModel) -> Result<String> {
    XmiExporter::new().export(model)
}
