// src/schema/table.rs
use crate::schema::keys::{ForeignKey, Index, PrimaryKey, Unique};
use crate::sql::types::TypeCode;

/// A resolved table descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    /// Owning schema, if qualified.
    pub schema: Option<String>,
    pub columns: Vec<Column>,
    pub primary_key: Option<PrimaryKey>,
    pub foreign_keys: Vec<ForeignKey>,
    pub uniques: Vec<Unique>,
    pub indexes: Vec<Index>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            columns: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
            uniques: Vec::new(),
            indexes: Vec::new(),
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_primary_key(mut self, pk: PrimaryKey) -> Self {
        self.primary_key = Some(pk);
        self
    }

    pub fn with_foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    pub fn with_unique(mut self, unique: Unique) -> Self {
        self.uniques.push(unique);
        self
    }

    pub fn with_index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// Schema-qualified name as it appears in SQL.
    pub fn full_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Primary key column names, empty when the table has no key.
    pub fn primary_key_columns(&self) -> &[String] {
        self.primary_key
            .as_ref()
            .map(|pk| pk.columns.as_slice())
            .unwrap_or(&[])
    }

    pub fn auto_assigned_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.auto_assigned)
    }
}

/// A resolved column descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub type_code: TypeCode,
    /// Explicit type name, bypassing the dialect's type catalog.
    pub type_name: Option<String>,
    pub size: u32,
    pub decimals: u32,
    pub not_null: bool,
    /// Value generated by the database on insert.
    pub auto_assigned: bool,
    /// Default value, already rendered as SQL.
    pub default: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, type_code: TypeCode) -> Self {
        Self {
            name: name.into(),
            type_code,
            type_name: None,
            size: 0,
            decimals: 0,
            not_null: false,
            auto_assigned: false,
            default: None,
        }
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn auto_assigned(mut self) -> Self {
        self.auto_assigned = true;
        self
    }

    pub fn type_name(mut self, name: impl Into<String>) -> Self {
        self.type_name = Some(name.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }
}
