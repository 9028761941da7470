//! Table-per-concrete-class relational mapping
//!
//! Tables follow the flattened graph schema: one table per concrete class
//! with every inherited attribute as a column. Associations map by
//! multiplicity:
//!
//! | association                        | mapping                                   |
//! |------------------------------------|-------------------------------------------|
//! | composition                        | FK on the part table, `ON DELETE CASCADE` |
//! | target end at most one             | FK on the source table                    |
//! | source end at most one, target many| FK on the target table                    |
//! | many to many                       | join table with a composite key           |
//!
//! Abstract endpoints fan out like graph relationships. When an end fans
//! out to several tables the FK column name also carries the table name.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, span, trace, Level};

use crate::core::naming::snake_case;
use crate::model::{AssociationDef, AssociationKind, AttributeType, DomainModel, Multiplicity, PrimitiveType};
use crate::plugins::graph::{concrete_members, convert};

/// Portable column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SqlType {
    Varchar(usize),
    Integer,
    DoublePrecision,
    Boolean,
    Date,
    Timestamp,
    Time,
}

impl SqlType {
    pub fn for_primitive(primitive: PrimitiveType) -> Self {
        match primitive {
            PrimitiveType::String => SqlType::Varchar(255),
            PrimitiveType::Integer => SqlType::Integer,
            PrimitiveType::Float => SqlType::DoublePrecision,
            PrimitiveType::Boolean => SqlType::Boolean,
            PrimitiveType::Date => SqlType::Date,
            PrimitiveType::DateTime => SqlType::Timestamp,
            PrimitiveType::Time => SqlType::Time,
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::Varchar(len) => write!(f, "VARCHAR({})", len),
            SqlType::Integer => write!(f, "INTEGER"),
            SqlType::DoublePrecision => write!(f, "DOUBLE PRECISION"),
            SqlType::Boolean => write!(f, "BOOLEAN"),
            SqlType::Date => write!(f, "DATE"),
            SqlType::Timestamp => write!(f, "TIMESTAMP"),
            SqlType::Time => write!(f, "TIME"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub sql_type: SqlType,
    pub not_null: bool,
    /// Allowed literals for enumeration columns
    pub allowed: Vec<String>,
    /// Model attribute this column stores, `None` for key columns
    pub attribute: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            not_null: false,
            allowed: Vec::new(),
            attribute: None,
        }
    }

    fn key(name: impl Into<String>, not_null: bool) -> Self {
        Self {
            not_null,
            ..Self::new(name, SqlType::Integer)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub name: String,
    /// Class stored in this table, `None` for join tables
    pub class: Option<String>,
    pub columns: Vec<Column>,
    pub primary_key: Vec<String>,
}

impl Table {
    fn new(name: impl Into<String>, class: Option<String>) -> Self {
        Self {
            name: name.into(),
            class,
            columns: Vec::new(),
            primary_key: Vec::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Add a column unless one with the same name exists; returns whether it was added
    fn push_column(&mut self, column: Column) -> bool {
        if self.column(&column.name).is_some() {
            return false;
        }
        self.columns.push(column);
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
    pub references: String,
    pub cascade: bool,
}

impl ForeignKey {
    pub fn constraint_name(&self) -> String {
        format!("fk_{}_{}", self.table, self.column)
    }
}

/// How an association was stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MappingStrategy {
    /// Composition: FK on the part table with cascading delete
    CascadingForeignKey,
    /// FK column on the source table
    ForeignKeyOnSource,
    /// FK column on the target table
    ForeignKeyOnTarget,
    JoinTable,
    /// No concrete class on one of the ends
    Unmapped,
}

impl fmt::Display for MappingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingStrategy::CascadingForeignKey => write!(f, "cascading foreign key"),
            MappingStrategy::ForeignKeyOnSource => write!(f, "foreign key on source"),
            MappingStrategy::ForeignKeyOnTarget => write!(f, "foreign key on target"),
            MappingStrategy::JoinTable => write!(f, "join table"),
            MappingStrategy::Unmapped => write!(f, "unmapped"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssociationMapping {
    pub from_class: String,
    pub to_class: String,
    pub label: String,
    pub from_multiplicity: String,
    pub to_multiplicity: String,
    pub strategy: MappingStrategy,
    /// `table.column` entries or join table names that realise the association
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelationalSchema {
    pub name: String,
    pub tables: IndexMap<String, Table>,
    pub foreign_keys: Vec<ForeignKey>,
    pub associations: Vec<AssociationMapping>,
}

impl RelationalSchema {
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Table storing a class, if the class is concrete
    pub fn table_for_class(&self, class: &str) -> Option<&Table> {
        self.tables
            .values()
            .find(|t| t.class.as_deref() == Some(class))
    }
}

pub fn table_name(class: &str) -> String {
    snake_case(class)
}

fn at_most_one(multiplicity: &Multiplicity) -> bool {
    multiplicity.upper.is_some_and(|upper| upper <= 1)
}

/// FK column for a role; the referenced table is appended when the end fans out
fn role_column(role: &str, referenced: &str, fans_out: bool) -> String {
    let role = snake_case(role);
    match (role.is_empty(), fans_out) {
        (true, _) => format!("{}_id", referenced),
        (false, false) => format!("{}_id", role),
        (false, true) => format!("{}_{}_id", role, referenced),
    }
}

fn column_type(ty: &AttributeType, model: &DomainModel) -> (SqlType, Vec<String>) {
    match ty {
        AttributeType::Primitive(primitive) => (SqlType::for_primitive(*primitive), Vec::new()),
        AttributeType::Enum(name) => {
            let literals = model
                .enumeration(name)
                .map(|e| e.values.clone())
                .unwrap_or_default();
            let width = literals
                .iter()
                .map(|l| l.chars().count())
                .max()
                .unwrap_or(0)
                .max(1);
            (SqlType::Varchar(width), literals)
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RelationalMapper;

impl RelationalMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn map(&self, model: &DomainModel) -> RelationalSchema {
        let map_span = span!(
            Level::INFO,
            "map_relational",
            model = model.name(),
            classes = model.class_count()
        );
        let _enter = map_span.enter();

        let mut schema = RelationalSchema {
            name: model.name().to_string(),
            ..RelationalSchema::default()
        };

        for node in convert(model).schema.nodes.values() {
            let name = table_name(&node.name);
            let mut table = Table::new(&name, Some(node.name.clone()));
            table.push_column(Column::key("id", true));
            table.primary_key.push("id".to_string());

            for (attribute, ty) in &node.attributes {
                let column_name = snake_case(attribute);
                if column_name.is_empty() {
                    continue;
                }
                let (sql_type, allowed) = column_type(ty, model);
                let column = Column {
                    allowed,
                    attribute: Some(attribute.clone()),
                    ..Column::new(column_name, sql_type)
                };
                if !table.push_column(column) {
                    trace!(table = %name, attribute = %attribute, "Column name already taken");
                }
            }
            schema.tables.insert(name, table);
        }

        for association in model.associations() {
            let mapping = self.map_association(model, association, &mut schema);
            trace!(
                from = %mapping.from_class,
                to = %mapping.to_class,
                strategy = %mapping.strategy,
                "Association mapped"
            );
            schema.associations.push(mapping);
        }

        debug!(
            tables = schema.tables.len(),
            foreign_keys = schema.foreign_keys.len(),
            "Relational mapping completed"
        );
        schema
    }

    fn map_association(
        &self,
        model: &DomainModel,
        association: &AssociationDef,
        schema: &mut RelationalSchema,
    ) -> AssociationMapping {
        let sources: Vec<String> = concrete_members(model, &association.from_class)
            .into_iter()
            .map(table_name)
            .collect();
        let targets: Vec<String> = concrete_members(model, &association.to_class)
            .into_iter()
            .map(table_name)
            .collect();

        let strategy = if sources.is_empty() || targets.is_empty() {
            MappingStrategy::Unmapped
        } else if association.kind == AssociationKind::Composition {
            MappingStrategy::CascadingForeignKey
        } else if at_most_one(&association.to_multiplicity) {
            MappingStrategy::ForeignKeyOnSource
        } else if at_most_one(&association.from_multiplicity) {
            MappingStrategy::ForeignKeyOnTarget
        } else {
            MappingStrategy::JoinTable
        };

        let mut realised = Vec::new();
        for from in &sources {
            for to in &targets {
                match strategy {
                    MappingStrategy::CascadingForeignKey | MappingStrategy::ForeignKeyOnTarget => {
                        let column = role_column(&association.from_role, from, sources.len() > 1);
                        let not_null = association.from_multiplicity.lower >= 1;
                        let cascade = strategy == MappingStrategy::CascadingForeignKey;
                        if let Some(entry) = add_foreign_key(schema, to, column, from, not_null, cascade) {
                            realised.push(entry);
                        }
                    }
                    MappingStrategy::ForeignKeyOnSource => {
                        let column = role_column(&association.to_role, to, targets.len() > 1);
                        let not_null = association.to_multiplicity.lower >= 1;
                        if let Some(entry) = add_foreign_key(schema, from, column, to, not_null, false) {
                            realised.push(entry);
                        }
                    }
                    MappingStrategy::JoinTable => {
                        if let Some(entry) = add_join_table(schema, association, from, to, targets.len() > 1) {
                            realised.push(entry);
                        }
                    }
                    MappingStrategy::Unmapped => {}
                }
            }
        }

        AssociationMapping {
            from_class: association.from_class.clone(),
            to_class: association.to_class.clone(),
            label: association.label().to_string(),
            from_multiplicity: association.from_multiplicity.to_string(),
            to_multiplicity: association.to_multiplicity.to_string(),
            strategy,
            targets: realised,
        }
    }
}

fn add_foreign_key(
    schema: &mut RelationalSchema,
    table: &str,
    column: String,
    references: &str,
    not_null: bool,
    cascade: bool,
) -> Option<String> {
    let owner = schema.tables.get_mut(table)?;
    if !owner.push_column(Column::key(&column, not_null)) {
        return None;
    }
    let entry = format!("{}.{}", table, column);
    schema.foreign_keys.push(ForeignKey {
        table: table.to_string(),
        column,
        references: references.to_string(),
        cascade,
    });
    Some(entry)
}

fn add_join_table(
    schema: &mut RelationalSchema,
    association: &AssociationDef,
    from: &str,
    to: &str,
    targets_fan_out: bool,
) -> Option<String> {
    let role = match snake_case(&association.to_role) {
        role if role.is_empty() => to.to_string(),
        role => role,
    };
    let name = if targets_fan_out {
        format!("{}_{}_{}", from, role, to)
    } else {
        format!("{}_{}", from, role)
    };
    if schema.tables.contains_key(&name) {
        return None;
    }

    let (from_column, to_column) = if from == to {
        (
            role_column(&association.from_role, from, false),
            role_column(&association.to_role, to, false),
        )
    } else {
        (format!("{}_id", from), format!("{}_id", to))
    };

    let mut table = Table::new(&name, None);
    for (column, references) in [(&from_column, from), (&to_column, to)] {
        if table.push_column(Column::key(column.as_str(), true)) {
            table.primary_key.push(column.clone());
            schema.foreign_keys.push(ForeignKey {
                table: name.clone(),
                column: column.clone(),
                references: references.to_string(),
                cascade: true,
            });
        }
    }
    schema.tables.insert(name.clone(), table);
    Some(name)
}

/// Map with the default mapper
pub fn map_model(model: &DomainModel) -> RelationalSchema {
    RelationalMapper::new().map(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttributeDef, ClassEntity, EnumerationDef};

    fn shop() -> DomainModel {
        DomainModel::builder("Shop")
            .enumeration(EnumerationDef::new("Status", ["OPEN", "CLOSED"]))
            .class(ClassEntity::new("Customer").with_attribute(AttributeDef::string("fullName")))
            .class(
                ClassEntity::new("ShoppingCart")
                    .with_attribute(AttributeDef::enumerated("status", "Status"))
                    .with_attribute(AttributeDef::new("id", PrimitiveType::Integer)),
            )
            .class(ClassEntity::new("CartItem"))
            .class(ClassEntity::new("Tag"))
            .association(
                AssociationDef::new("ShoppingCart", "cart", "Customer", "owner")
                    .with_multiplicities(Multiplicity::many(), Multiplicity::one()),
            )
            .association(
                AssociationDef::new("ShoppingCart", "cart", "CartItem", "items")
                    .with_multiplicities(Multiplicity::one(), Multiplicity::many())
                    .composition(),
            )
            .association(
                AssociationDef::new("ShoppingCart", "carts", "Tag", "tags")
                    .with_multiplicities(Multiplicity::many(), Multiplicity::many()),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_tables_and_columns() {
        let schema = map_model(&shop());
        let cart = schema.table("shopping_cart").unwrap();
        assert_eq!(cart.class.as_deref(), Some("ShoppingCart"));
        assert_eq!(cart.primary_key, vec!["id"]);
        let status = cart.column("status").unwrap();
        assert_eq!(status.sql_type, SqlType::Varchar(6));
        assert_eq!(status.allowed, vec!["OPEN", "CLOSED"]);
        assert_eq!(cart.columns.iter().filter(|c| c.name == "id").count(), 1);

        let customer = schema.table("customer").unwrap();
        assert_eq!(customer.column("full_name").unwrap().sql_type, SqlType::Varchar(255));
    }

    #[test]
    fn test_association_strategies() {
        let schema = map_model(&shop());
        let strategies: Vec<MappingStrategy> =
            schema.associations.iter().map(|a| a.strategy).collect();
        assert_eq!(
            strategies,
            vec![
                MappingStrategy::ForeignKeyOnSource,
                MappingStrategy::CascadingForeignKey,
                MappingStrategy::JoinTable
            ]
        );

        let owner = schema.table("shopping_cart").unwrap().column("owner_id").unwrap();
        assert!(owner.not_null);

        let item_fk = schema
            .foreign_keys
            .iter()
            .find(|fk| fk.table == "cart_item")
            .unwrap();
        assert_eq!(item_fk.column, "cart_id");
        assert_eq!(item_fk.references, "shopping_cart");
        assert!(item_fk.cascade);

        let join = schema.table("shopping_cart_tags").unwrap();
        assert_eq!(join.class, None);
        assert_eq!(join.primary_key, vec!["shopping_cart_id", "tag_id"]);
    }

    #[test]
    fn test_abstract_target_fans_out_with_table_suffix() {
        let model = DomainModel::builder("Pay")
            .class(ClassEntity::new("Order"))
            .class(ClassEntity::abstract_class("Payment"))
            .class(ClassEntity::new("Card"))
            .class(ClassEntity::new("Voucher"))
            .generalization("Payment", "Card")
            .generalization("Payment", "Voucher")
            .association(
                AssociationDef::new("Order", "order", "Payment", "payment")
                    .with_multiplicities(Multiplicity::many(), Multiplicity::optional()),
            )
            .build()
            .unwrap();
        let schema = map_model(&model);
        let order = schema.table("order").unwrap();
        assert!(order.column("payment_card_id").is_some());
        assert!(!order.column("payment_voucher_id").unwrap().not_null);
        assert!(schema.table("payment").is_none());
    }

    #[test]
    fn test_self_join_table_uses_roles() {
        let model = DomainModel::builder("Social")
            .class(ClassEntity::new("Person"))
            .association(
                AssociationDef::new("Person", "follower", "Person", "followees")
                    .with_multiplicities(Multiplicity::many(), Multiplicity::many()),
            )
            .build()
            .unwrap();
        let schema = map_model(&model);
        let join = schema.table("person_followees").unwrap();
        assert_eq!(join.primary_key, vec!["follower_id", "followees_id"]);
    }
}
