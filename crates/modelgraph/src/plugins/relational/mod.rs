//! Relational documentation output family
//!
//! Table-per-concrete-class mapping, portable SQL DDL and markdown O/R
//! mapping tables.

mod ddl;
mod mapping;
mod orm_table;

pub use ddl::{ddl, SqlDdlGenerator};
pub use mapping::{
    map_model, table_name, AssociationMapping, Column, ForeignKey, MappingStrategy,
    RelationalMapper, RelationalSchema, SqlType, Table,
};
pub use orm_table::{markdown_table, orm_tables, OrmTableWriter};
