//! Portable SQL DDL for a relational mapping
//!
//! All `CREATE TABLE` statements come first, foreign keys are added
//! afterwards with `ALTER TABLE` so table order never matters.

use tracing::{debug, span, Level};

use crate::model::DomainModel;

use super::mapping::{map_model, Column, RelationalSchema, Table};

fn quote_literal(literal: &str) -> String {
    format!("'{}'", literal.replace('\'', "''"))
}

fn column_definition(column: &Column, inline_primary_key: bool) -> String {
    let mut definition = format!("{} {}", column.name, column.sql_type);
    if inline_primary_key {
        definition.push_str(" PRIMARY KEY");
    } else if column.not_null {
        definition.push_str(" NOT NULL");
    }
    if !column.allowed.is_empty() {
        let literals: Vec<String> = column.allowed.iter().map(|l| quote_literal(l)).collect();
        definition.push_str(&format!(
            " CHECK ({} IN ({}))",
            column.name,
            literals.join(", ")
        ));
    }
    definition
}

fn create_table(table: &Table) -> String {
    let single_key = match table.primary_key.as_slice() {
        [key] => Some(key.as_str()),
        _ => None,
    };

    let mut definitions: Vec<String> = table
        .columns
        .iter()
        .map(|c| column_definition(c, single_key == Some(c.name.as_str())))
        .collect();
    if single_key.is_none() && !table.primary_key.is_empty() {
        definitions.push(format!("PRIMARY KEY ({})", table.primary_key.join(", ")));
    }

    let body: Vec<String> = definitions.iter().map(|d| format!("    {}", d)).collect();
    format!("CREATE TABLE {} (\n{}\n);", table.name, body.join(",\n"))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SqlDdlGenerator;

impl SqlDdlGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, schema: &RelationalSchema) -> String {
        let ddl_span = span!(
            Level::INFO,
            "generate_ddl",
            tables = schema.tables.len(),
            foreign_keys = schema.foreign_keys.len()
        );
        let _enter = ddl_span.enter();

        let mut statements = vec![format!("-- {}", schema.name)];
        statements.extend(schema.tables.values().map(create_table));

        for fk in &schema.foreign_keys {
            let mut statement = format!(
                "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} (id)",
                fk.table,
                fk.constraint_name(),
                fk.column,
                fk.references
            );
            if fk.cascade {
                statement.push_str(" ON DELETE CASCADE");
            }
            statement.push(';');
            statements.push(statement);
        }

        let mut text = statements.join("\n\n");
        text.push('\n');
        debug!(output_len = text.len(), "DDL generated");
        text
    }
}

/// Map a model and render its DDL
pub fn ddl(model: &DomainModel) -> String {
    SqlDdlGenerator::new().generate(&map_model(model))
}
