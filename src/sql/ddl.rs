//! Schema DDL.
//!
//! [`DdlCompiler`] turns resolved [`Table`] descriptors into the statements
//! that create, alter and drop them on one profile. Every operation returns
//! the statements in execution order; an empty list means there is nothing
//! to run (for example a logical foreign key with no delete action).
//!
//! ```ignore
//! use quarry::schema::{Column, PrimaryKey, Table};
//! use quarry::sql::ddl::DdlCompiler;
//! use quarry::sql::dialect::Vendor;
//! use quarry::sql::types::TypeCode;
//!
//! let orders = Table::new("ORDERS")
//!     .with_column(Column::new("id", TypeCode::BigInt).not_null())
//!     .with_primary_key(PrimaryKey::new(["id"]));
//!
//! let ddl = DdlCompiler::new(Vendor::Postgres.profile());
//! assert_eq!(
//!     ddl.create_table(&orders)?,
//!     vec!["CREATE TABLE ORDERS (id BIGINT NOT NULL, PRIMARY KEY (id))"]
//! );
//! ```

use tracing::{debug, warn};

use super::dialect::helpers::format_template;
use super::dialect::{Capability, ConstraintNameMode, DialectProfile, NameKind};
use super::identifier::{IdentifierValidator, NameSet};
use super::token::{Token, TokenStream};
use super::types::TypeCatalog;
use crate::error::CompileResult;
use crate::schema::{Column, ForeignKey, Index, ReferentialAction, Sequence, Table, Unique};

/// Builds DDL statements for one profile.
#[derive(Debug, Clone, Copy)]
pub struct DdlCompiler<'p> {
    profile: &'p DialectProfile,
    types: TypeCatalog<'p>,
    names: IdentifierValidator<'p>,
}

impl<'p> DdlCompiler<'p> {
    pub fn new(profile: &'p DialectProfile) -> Self {
        Self {
            profile,
            types: TypeCatalog::new(profile),
            names: IdentifierValidator::new(profile),
        }
    }

    pub fn profile(&self) -> &'p DialectProfile {
        self.profile
    }

    // =========================================================================
    // Tables
    // =========================================================================

    /// `CREATE TABLE t (columns[, primary key][, uniques])`.
    ///
    /// Foreign keys and indexes are created separately. When the profile
    /// emulates auto-assignment with triggers, a sequence and a trigger
    /// follow for each auto-assigned column.
    pub fn create_table(&self, table: &Table) -> CompileResult<Vec<String>> {
        self.names.check_name_length(&table.name, NameKind::Table)?;

        let mut constraints = Vec::new();
        if let Some(pk) = self.primary_key_constraint(table) {
            constraints.push(pk);
        }
        for unique in &table.uniques {
            if !self.supports_unique(unique) {
                debug!(table = %table.name, columns = ?unique.columns, "unique constraint skipped");
                continue;
            }
            constraints.push(self.unique_constraint(unique)?);
        }

        let mut ts = TokenStream::new();
        ts.push(Token::Create)
            .space()
            .push(Token::Table)
            .space()
            .append(&self.table_name(table))
            .space()
            .lparen();
        for (i, column) in table.columns.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.append(&self.declare_column(table, column, false)?);
        }
        for (i, constraint) in constraints.iter().enumerate() {
            if i > 0 || !table.columns.is_empty() {
                ts.comma().space();
            }
            ts.append(constraint);
        }
        ts.rparen();

        let mut statements = vec![ts.serialize(self.profile)];
        if self.profile.quirks.use_triggers_for_auto_assign {
            for column in table.auto_assigned_columns() {
                statements.extend(self.auto_assign_trigger(table, column)?);
            }
        }
        Ok(statements)
    }

    /// The profile's drop template applied to the table name.
    pub fn drop_table(&self, table: &Table) -> Vec<String> {
        let name = self.table_name(table).serialize(self.profile);
        vec![format_template(&self.profile.clauses.drop_table, &[&name])]
    }

    /// `name TYPE[ DEFAULT d][ NOT NULL][ auto-assign clause]`.
    ///
    /// In `alter` mode the default and the NOT NULL constraint are left
    /// out, since the table may already hold rows.
    pub fn declare_column(&self, table: &Table, column: &Column, alter: bool) -> CompileResult<TokenStream> {
        self.names.check_name_length(&column.name, NameKind::Column)?;

        let mut ts = TokenStream::new();
        ts.push(Token::Ident(column.name.clone()))
            .space()
            .raw(self.types.type_name(column));

        if !alter {
            if let Some(default) = column.default.as_ref().filter(|_| !column.auto_assigned) {
                ts.space().push(Token::Default).space().raw(default.clone());
            }
            if column.not_null || (!self.profile.supports(Capability::NullUniqueColumn) && in_unique(table, column)) {
                ts.space().push(Token::NotNull);
            }
        }

        if column.auto_assigned {
            if !self.profile.supports(Capability::AutoAssign) {
                warn!(
                    dialect = %self.profile.platform,
                    column = %column.name,
                    "auto-assigned column on a dialect without auto-assign support"
                );
            } else if let Some(clause) = &self.profile.clauses.auto_assign {
                ts.space().raw(clause.clone());
            }
        }
        Ok(ts)
    }

    /// `ALTER TABLE t ADD <column declaration>`.
    pub fn add_column(&self, table: &Table, column: &Column) -> CompileResult<Vec<String>> {
        self.profile.assert_support(Capability::AlterTableAddColumn)?;
        let mut ts = self.alter_table(table);
        ts.push(Token::Add).space().append(&self.declare_column(table, column, true)?);
        Ok(vec![ts.serialize(self.profile)])
    }

    /// `ALTER TABLE t DROP COLUMN c`.
    pub fn drop_column(&self, table: &Table, column: &str) -> CompileResult<Vec<String>> {
        self.profile.assert_support(Capability::AlterTableDropColumn)?;
        let mut ts = self.alter_table(table);
        ts.push(Token::Drop)
            .space()
            .push(Token::Column)
            .space()
            .push(Token::Ident(column.to_string()));
        Ok(vec![ts.serialize(self.profile)])
    }

    // =========================================================================
    // Constraints
    // =========================================================================

    /// `ALTER TABLE t ADD <primary key>`; empty when the table has no key or
    /// the profile does not create primary keys.
    pub fn add_primary_key(&self, table: &Table) -> CompileResult<Vec<String>> {
        Ok(self
            .primary_key_constraint(table)
            .map(|pk| self.add_constraint(table, &pk))
            .into_iter()
            .collect())
    }

    /// `ALTER TABLE t ADD <foreign key>`.
    ///
    /// A key whose delete action is [`ReferentialAction::None`] is logical
    /// only and yields no statement.
    pub fn add_foreign_key(&self, table: &Table, fk: &ForeignKey) -> CompileResult<Vec<String>> {
        Ok(self
            .foreign_key_constraint(table, fk)?
            .map(|constraint| self.add_constraint(table, &constraint))
            .into_iter()
            .collect())
    }

    /// `ALTER TABLE t ADD <unique constraint>`.
    pub fn add_unique(&self, table: &Table, unique: &Unique) -> CompileResult<Vec<String>> {
        self.profile.assert_support(Capability::UniqueConstraints)?;
        if unique.deferred {
            self.profile.assert_support(Capability::DeferredConstraints)?;
        }
        let constraint = self.unique_constraint(unique)?;
        Ok(vec![self.add_constraint(table, &constraint)])
    }

    /// `ALTER TABLE t DROP CONSTRAINT name`.
    pub fn drop_constraint(&self, table: &Table, name: &str) -> Vec<String> {
        let mut ts = self.alter_table(table);
        ts.push(Token::Drop)
            .space()
            .push(Token::Constraint)
            .space()
            .push(Token::Ident(name.to_string()));
        vec![ts.serialize(self.profile)]
    }

    fn primary_key_constraint(&self, table: &Table) -> Option<TokenStream> {
        if !self.profile.quirks.create_primary_keys {
            return None;
        }
        let pk = table.primary_key.as_ref()?;
        // A reserved word cannot name a constraint; let the database pick one.
        let name = pk
            .name
            .as_deref()
            .filter(|name| !self.profile.is_reserved(name));

        let mut ts = self.constraint_head(name, Token::PrimaryKey);
        ts.append(&column_list(&pk.columns));
        self.constraint_tail(&mut ts, name);
        Some(ts)
    }

    fn foreign_key_constraint(&self, table: &Table, fk: &ForeignKey) -> CompileResult<Option<TokenStream>> {
        self.profile.assert_support(Capability::ForeignKeys)?;
        if fk.delete_action == ReferentialAction::None {
            debug!(table = %table.name, references = %fk.referenced_table, "logical foreign key, no constraint");
            return Ok(None);
        }
        if fk.deferred {
            self.profile.assert_support(Capability::DeferredConstraints)?;
        }
        if let Some(capability) = delete_capability(fk.delete_action) {
            self.profile.assert_support(capability)?;
        }
        if let Some(capability) = update_capability(fk.update_action) {
            self.profile.assert_support(capability)?;
        }
        if let Some(name) = &fk.name {
            self.names.check_name_length(name, NameKind::Constraint)?;
        }

        // SET NULL cannot apply to a non-nullable column.
        let mut delete_action = fk.delete_action;
        if delete_action == ReferentialAction::SetNull
            && fk
                .columns
                .iter()
                .any(|c| table.column(c).is_some_and(|c| c.not_null))
        {
            delete_action = ReferentialAction::None;
        }

        let name = fk.name.as_deref();
        let mut ts = self.constraint_head(name, Token::ForeignKey);
        ts.append(&column_list(&fk.columns))
            .space()
            .push(Token::References)
            .space()
            .push(Token::Ident(fk.referenced_table.clone()))
            .space()
            .append(&column_list(&fk.primary_key_columns));
        if let Some(action) = action_name(delete_action) {
            ts.space().push(Token::On).space().push(Token::Delete).space().raw(action);
        }
        if let Some(action) = action_name(fk.update_action) {
            ts.space().push(Token::On).space().push(Token::Update).space().raw(action);
        }
        self.deferral(&mut ts, fk.deferred);
        self.constraint_tail(&mut ts, name);
        Ok(Some(ts))
    }

    fn supports_unique(&self, unique: &Unique) -> bool {
        self.profile.supports(Capability::UniqueConstraints)
            && (!unique.deferred || self.profile.supports(Capability::DeferredConstraints))
    }

    fn unique_constraint(&self, unique: &Unique) -> CompileResult<TokenStream> {
        if let Some(name) = &unique.name {
            self.names.check_name_length(name, NameKind::Constraint)?;
        }
        let name = unique.name.as_deref();
        let mut ts = self.constraint_head(name, Token::Unique);
        ts.append(&column_list(&unique.columns));
        self.deferral(&mut ts, unique.deferred);
        self.constraint_tail(&mut ts, name);
        Ok(ts)
    }

    /// `[CONSTRAINT n ]KEYWORD[ n] `, by the profile's name placement.
    fn constraint_head(&self, name: Option<&str>, keyword: Token) -> TokenStream {
        let mode = self.profile.naming.constraint_name_mode;
        let mut ts = TokenStream::new();
        if let (Some(name), ConstraintNameMode::Before) = (name, mode) {
            ts.push(Token::Constraint)
                .space()
                .push(Token::Ident(name.to_string()))
                .space();
        }
        ts.push(keyword).space();
        if let (Some(name), ConstraintNameMode::Mid) = (name, mode) {
            ts.push(Token::Ident(name.to_string())).space();
        }
        ts
    }

    fn constraint_tail(&self, ts: &mut TokenStream, name: Option<&str>) {
        if let (Some(name), ConstraintNameMode::After) = (name, self.profile.naming.constraint_name_mode) {
            ts.space()
                .push(Token::Constraint)
                .space()
                .push(Token::Ident(name.to_string()));
        }
    }

    fn deferral(&self, ts: &mut TokenStream, deferred: bool) {
        if deferred {
            ts.space().push(Token::InitiallyDeferred);
        }
        if self.profile.supports(Capability::DeferredConstraints) {
            ts.space().push(Token::Deferrable);
        }
    }

    fn add_constraint(&self, table: &Table, constraint: &TokenStream) -> String {
        let mut ts = self.alter_table(table);
        ts.push(Token::Add).space().append(constraint);
        ts.serialize(self.profile)
    }

    // =========================================================================
    // Indexes and sequences
    // =========================================================================

    /// `CREATE [UNIQUE ]INDEX name ON t (columns)`.
    pub fn create_index(&self, table: &Table, index: &Index) -> CompileResult<Vec<String>> {
        self.names.check_name_length(&index.name, NameKind::Index)?;

        let mut ts = TokenStream::new();
        ts.push(Token::Create).space();
        if index.unique {
            ts.push(Token::Unique).space();
        }
        ts.push(Token::Index)
            .space()
            .append(&qualified(table.schema.as_deref(), &index.name))
            .space()
            .push(Token::On)
            .space()
            .append(&self.table_name(table))
            .space()
            .append(&column_list(&index.columns));
        Ok(vec![ts.serialize(self.profile)])
    }

    pub fn drop_index(&self, table: &Table, index: &Index) -> Vec<String> {
        let mut ts = TokenStream::new();
        ts.push(Token::Drop)
            .space()
            .push(Token::Index)
            .space()
            .append(&qualified(table.schema.as_deref(), &index.name));
        vec![ts.serialize(self.profile)]
    }

    /// `CREATE SEQUENCE s[ START WITH n][ INCREMENT BY i]`.
    ///
    /// The increment is multiplied by the allocation size so one round trip
    /// reserves a whole block of values.
    pub fn create_sequence(&self, sequence: &Sequence) -> CompileResult<Vec<String>> {
        self.names.check_name_length(&sequence.name, NameKind::Sequence)?;

        let mut ts = TokenStream::new();
        ts.push(Token::Create)
            .space()
            .push(Token::Sequence)
            .space()
            .append(&qualified(sequence.schema.as_deref(), &sequence.name));
        if let Some(start) = sequence.initial_value.filter(|&n| n != 0) {
            ts.space().push(Token::StartWith).space().push(Token::LitInt(start));
        }
        if sequence.increment >= 1 || sequence.allocate >= 1 {
            ts.space()
                .push(Token::IncrementBy)
                .space()
                .push(Token::LitInt(sequence.increment * sequence.allocate));
        }
        Ok(vec![ts.serialize(self.profile)])
    }

    pub fn drop_sequence(&self, sequence: &Sequence) -> Vec<String> {
        let mut ts = TokenStream::new();
        ts.push(Token::Drop)
            .space()
            .push(Token::Sequence)
            .space()
            .append(&qualified(sequence.schema.as_deref(), &sequence.name));
        vec![ts.serialize(self.profile)]
    }

    /// Sequence plus BEFORE INSERT trigger filling `column` from it.
    fn auto_assign_trigger(&self, table: &Table, column: &Column) -> CompileResult<Vec<String>> {
        let (sequence, trigger) = self.auto_assign_names(table, column)?;
        let table_name = self.table_name(table).serialize(self.profile);
        let column_name = Token::Ident(column.name.clone()).serialize(self.profile);

        debug!(table = %table_name, %sequence, %trigger, "auto-assign emulated with a trigger");
        Ok(vec![
            format!("CREATE SEQUENCE {} START WITH 1", sequence),
            format!(
                "CREATE OR REPLACE TRIGGER {trigger} BEFORE INSERT ON {table_name} FOR EACH ROW \
                 BEGIN SELECT {sequence}.nextval INTO :new.{column_name} FROM DUAL; END {trigger};"
            ),
        ])
    }

    /// `TABLE_COLUMN_SEQ` fitted to the auto-assign name limit, and the
    /// trigger name with the trailing `SEQ` swapped for `TRG`.
    pub fn auto_assign_names(&self, table: &Table, column: &Column) -> CompileResult<(String, String)> {
        let raw = format!("{}_{}_SEQ", table.name, column.name);
        let sequence = self.names.validate(&raw, NameKind::AutoAssign, &NameSet::new(), false)?;
        let stem: String = sequence
            .chars()
            .take(sequence.chars().count().saturating_sub(3))
            .collect();
        Ok((sequence, format!("{}TRG", stem)))
    }

    // =========================================================================
    // Shared pieces
    // =========================================================================

    fn table_name(&self, table: &Table) -> TokenStream {
        qualified(table.schema.as_deref(), &table.name)
    }

    /// `ALTER TABLE t `
    fn alter_table(&self, table: &Table) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Alter)
            .space()
            .push(Token::Table)
            .space()
            .append(&self.table_name(table))
            .space();
        ts
    }
}

/// `schema.name`, each part an identifier.
fn qualified(schema: Option<&str>, name: &str) -> TokenStream {
    let mut ts = TokenStream::new();
    if let Some(schema) = schema {
        ts.push(Token::Ident(schema.to_string())).push(Token::Dot);
    }
    ts.push(Token::Ident(name.to_string()));
    ts
}

/// `(a, b, c)`
fn column_list(columns: &[String]) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.lparen();
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            ts.comma().space();
        }
        ts.push(Token::Ident(column.clone()));
    }
    ts.rparen();
    ts
}

fn in_unique(table: &Table, column: &Column) -> bool {
    table
        .uniques
        .iter()
        .any(|u| u.columns.iter().any(|c| c.eq_ignore_ascii_case(&column.name)))
}

/// Rendered action; RESTRICT and no-action are the database default and
/// are not spelled out.
fn action_name(action: ReferentialAction) -> Option<&'static str> {
    match action {
        ReferentialAction::Cascade => Some("CASCADE"),
        ReferentialAction::SetNull => Some("SET NULL"),
        ReferentialAction::SetDefault => Some("SET DEFAULT"),
        ReferentialAction::None | ReferentialAction::Restrict => None,
    }
}

fn delete_capability(action: ReferentialAction) -> Option<Capability> {
    match action {
        ReferentialAction::None => None,
        ReferentialAction::Restrict => Some(Capability::RestrictDeleteAction),
        ReferentialAction::Cascade => Some(Capability::CascadeDeleteAction),
        ReferentialAction::SetNull => Some(Capability::NullDeleteAction),
        ReferentialAction::SetDefault => Some(Capability::DefaultDeleteAction),
    }
}

fn update_capability(action: ReferentialAction) -> Option<Capability> {
    match action {
        ReferentialAction::None => None,
        ReferentialAction::Restrict => Some(Capability::RestrictUpdateAction),
        ReferentialAction::Cascade => Some(Capability::CascadeUpdateAction),
        ReferentialAction::SetNull => Some(Capability::NullUpdateAction),
        ReferentialAction::SetDefault => Some(Capability::DefaultUpdateAction),
    }
}
