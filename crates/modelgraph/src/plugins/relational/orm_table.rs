//! Markdown O/R mapping documentation
//!
//! Three tables: classes to tables, attributes to columns, associations to
//! their mapping strategy. Cells are padded by display width so tables
//! stay aligned with wide characters in names.

use unicode_width::UnicodeWidthStr;

use crate::model::DomainModel;

use super::mapping::{map_model, RelationalSchema};

/// Render an aligned markdown table
pub fn markdown_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(UnicodeWidthStr::width(cell.as_str()));
            }
        }
    }

    let pad = |text: &str, width: usize| {
        let fill = width.saturating_sub(UnicodeWidthStr::width(text));
        format!("{}{}", text, " ".repeat(fill))
    };

    let mut lines = Vec::new();
    let header: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| pad(*h, *w))
        .collect();
    lines.push(format!("| {} |", header.join(" | ")));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat((*w).max(3))).collect();
    lines.push(format!("|-{}-|", rule.join("-|-")));
    for row in rows {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| pad(row.get(i).map(String::as_str).unwrap_or(""), *w))
            .collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }
    lines.join("\n")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OrmTableWriter;

impl OrmTableWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(&self, model: &DomainModel, schema: &RelationalSchema) -> String {
        let mut sections = vec![format!("# O/R mapping: {}", model.name())];

        let class_rows: Vec<Vec<String>> = model
            .classes()
            .map(|class| {
                let table = match schema.table_for_class(&class.name) {
                    Some(table) => table.name.clone(),
                    None => {
                        let concrete: Vec<String> = model
                            .forest()
                            .descendants(&class.name)
                            .into_iter()
                            .filter_map(|d| schema.table_for_class(d))
                            .map(|t| t.name.clone())
                            .collect();
                        format!("(flattened into {})", concrete.join(", "))
                    }
                };
                vec![
                    class.name.clone(),
                    table,
                    model.parent_of(&class.name).unwrap_or("").to_string(),
                ]
            })
            .collect();
        sections.push(format!(
            "## Classes\n\n{}",
            markdown_table(&["Class", "Table", "Parent"], &class_rows)
        ));

        let attribute_rows: Vec<Vec<String>> = schema
            .tables
            .values()
            .filter_map(|table| table.class.as_ref().map(|class| (class, table)))
            .flat_map(|(class, table)| {
                table.columns.iter().filter_map(move |column| {
                    let attribute = column.attribute.as_ref()?;
                    Some(vec![
                        class.clone(),
                        attribute.clone(),
                        format!("{}.{}", table.name, column.name),
                        column.sql_type.to_string(),
                    ])
                })
            })
            .collect();
        sections.push(format!(
            "## Attributes\n\n{}",
            markdown_table(&["Class", "Attribute", "Column", "SQL type"], &attribute_rows)
        ));

        let association_rows: Vec<Vec<String>> = schema
            .associations
            .iter()
            .map(|a| {
                vec![
                    a.label.clone(),
                    format!(
                        "{} [{}] -> {} [{}]",
                        a.from_class, a.from_multiplicity, a.to_class, a.to_multiplicity
                    ),
                    a.strategy.to_string(),
                    a.targets.join(", "),
                ]
            })
            .collect();
        sections.push(format!(
            "## Associations\n\n{}",
            markdown_table(&["Association", "Ends", "Strategy", "Mapped to"], &association_rows)
        ));

        let mut text = sections.join("\n\n");
        text.push('\n');
        text
    }
}

/// Map a model and document the mapping
pub fn orm_tables(model: &DomainModel) -> String {
    OrmTableWriter::new().write(model, &map_model(model))
}
