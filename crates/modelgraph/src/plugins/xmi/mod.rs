//! XMI interchange output

mod exporter;

pub use exporter::{class_id, enumeration_id, export_xmi, XmiExporter};
