// src/schema/keys.rs
use crate::sql::expr::Literal;

fn names<I, S>(columns: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    columns.into_iter().map(Into::into).collect()
}

/// A primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryKey {
    pub name: Option<String>,
    pub columns: Vec<String>,
}

impl PrimaryKey {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            columns: names(columns),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Referential action on delete or update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferentialAction {
    /// Logical relation only; no database constraint is created.
    #[default]
    None,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

/// A foreign key from one table to another.
///
/// `columns[i]` references `primary_key_columns[i]` on `referenced_table`.
/// Constant columns join against a fixed value instead of a column.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub name: Option<String>,
    pub columns: Vec<String>,
    pub referenced_table: String,
    pub primary_key_columns: Vec<String>,
    /// Local columns compared to a constant.
    pub constant_columns: Vec<(String, Literal)>,
    /// Referenced columns compared to a constant.
    pub constant_primary_key_columns: Vec<(String, Literal)>,
    pub delete_action: ReferentialAction,
    pub update_action: ReferentialAction,
    pub deferred: bool,
}

impl ForeignKey {
    pub fn new<I, J, S, T>(columns: I, referenced_table: impl Into<String>, pk_columns: J) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            name: None,
            columns: names(columns),
            referenced_table: referenced_table.into(),
            primary_key_columns: names(pk_columns),
            constant_columns: Vec::new(),
            constant_primary_key_columns: Vec::new(),
            delete_action: ReferentialAction::Restrict,
            update_action: ReferentialAction::None,
            deferred: false,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.delete_action = action;
        self
    }

    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.update_action = action;
        self
    }

    pub fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }

    pub fn with_constant(mut self, column: impl Into<String>, value: Literal) -> Self {
        self.constant_columns.push((column.into(), value));
        self
    }

    pub fn with_primary_key_constant(mut self, column: impl Into<String>, value: Literal) -> Self {
        self.constant_primary_key_columns.push((column.into(), value));
        self
    }

    pub fn has_constants(&self) -> bool {
        !self.constant_columns.is_empty() || !self.constant_primary_key_columns.is_empty()
    }
}

/// A unique constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct Unique {
    pub name: Option<String>,
    pub columns: Vec<String>,
    pub deferred: bool,
}

impl Unique {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            columns: names(columns),
            deferred: false,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }
}

/// A table index.
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl Index {
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: names(columns),
            unique: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// A database sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub name: String,
    pub schema: Option<String>,
    pub initial_value: Option<i64>,
    pub increment: i64,
    /// Values reserved per round trip; multiplies the increment.
    pub allocate: i64,
}

impl Sequence {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            initial_value: None,
            increment: 1,
            allocate: 1,
        }
    }

    pub fn start_with(mut self, value: i64) -> Self {
        self.initial_value = Some(value);
        self
    }

    pub fn increment_by(mut self, increment: i64) -> Self {
        self.increment = increment;
        self
    }

    pub fn allocate(mut self, allocate: i64) -> Self {
        self.allocate = allocate;
        self
    }

    pub fn full_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }
}
