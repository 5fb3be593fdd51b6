//! Statement assembly.
//!
//! [`StatementBuilder`] turns record metadata plus record values into the four
//! statement shapes:
//!
//! ```text
//! SELECT <cols> FROM <table> [WHERE <pk> IN (<ids>)]
//! DELETE FROM <table> WHERE <pk> = <id>
//! INSERT INTO <table> (<cols>) VALUES (<vals>)
//! UPDATE <table> SET <col> = <val>, ... WHERE <pk> = <val> and ...
//! ```
//!
//! Each shape comes in two renderings. `build_*` inlines literals (see
//! [`crate::literal`], which does not escape quotes). `prepare_*` emits the
//! same text with `$n` placeholders and returns the values separately.
//!
//! SELECT and DELETE use the single key from [`RecordSchema::columns`]; UPDATE
//! predicates use every key from [`RecordSchema::primary_keys`]. For types with
//! several `pk` tags the two therefore differ.

use crate::config::BuilderConfig;
use crate::error::{Result, RowsqlError};
use crate::ident::Ident;
use crate::literal::render_literal;
use crate::schema::{Record, RecordSchema, RecordValues};
use crate::statement::Statement;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Kind of write produced by `build_mutation` / `prepare_mutation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationMode {
    Insert,
    Update,
}

impl MutationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
        }
    }
}

impl FromStr for MutationMode {
    type Err = RowsqlError;

    /// Strict parse: anything but `insert` / `update` is an error.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "insert" => Ok(Self::Insert),
            "update" => Ok(Self::Update),
            other => Err(RowsqlError::unsupported_mode(other)),
        }
    }
}

impl fmt::Display for MutationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Columns of one mutation, split by role.
struct MutationPlan<'a> {
    /// INSERT columns, or UPDATE SET columns.
    assignments: Vec<(&'a str, &'a Value)>,
    /// UPDATE WHERE columns (primary keys).
    predicates: Vec<(&'a str, &'a Value)>,
}

/// Builds SQL for [`Record`] types.
///
/// Holds only its configuration; cheap to clone and safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct StatementBuilder {
    config: BuilderConfig,
}

impl StatementBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    // ── SELECT ──────────────────────────────────────────────────────────────

    /// `SELECT <cols> FROM <table>`, with ` WHERE <pk> IN (<ids>)` when `ids` is non-empty.
    ///
    /// Ids are rendered as given, negative values included.
    pub fn build_select<T: Record>(&self, table: &str, ids: &[i64]) -> Result<String> {
        self.build_select_from_schema(T::schema(), table, ids)
    }

    /// Every row of `T` from the schema's own table.
    pub fn select_all<T: Record>(&self) -> Result<String> {
        let schema = T::schema();
        self.build_select_from_schema(schema, schema.table, &[])
    }

    pub fn build_select_from_schema(
        &self,
        schema: &RecordSchema,
        table: &str,
        ids: &[i64],
    ) -> Result<String> {
        let sql = render_select(schema, table, ids, |id| id.to_string())?;
        log_statement("select", table, &sql);
        Ok(sql)
    }

    /// Parameterized [`build_select`](Self::build_select): each id becomes a placeholder.
    pub fn prepare_select<T: Record>(&self, table: &str, ids: &[i64]) -> Result<Statement> {
        let schema = T::schema();
        check_identifiers(table, schema)?;
        let mut stmt = Statement::default();
        let sql = render_select(schema, table, ids, |id| stmt.bind(*id))?;
        log_statement("select", table, &sql);
        stmt.set_sql(sql);
        Ok(stmt)
    }

    // ── DELETE ──────────────────────────────────────────────────────────────

    /// `DELETE FROM <table> WHERE <pk> = <id>`.
    pub fn build_delete<T: Record>(&self, table: &str, id: i64) -> Result<String> {
        self.build_delete_from_schema(T::schema(), table, id)
    }

    pub fn build_delete_from_schema(
        &self,
        schema: &RecordSchema,
        table: &str,
        id: i64,
    ) -> Result<String> {
        let sql = render_delete(schema, table, id.to_string())?;
        log_statement("delete", table, &sql);
        Ok(sql)
    }

    /// Parameterized [`build_delete`](Self::build_delete).
    pub fn prepare_delete<T: Record>(&self, table: &str, id: i64) -> Result<Statement> {
        let schema = T::schema();
        check_identifiers(table, schema)?;
        let mut stmt = Statement::default();
        let sql = render_delete(schema, table, stmt.bind(id))?;
        log_statement("delete", table, &sql);
        stmt.set_sql(sql);
        Ok(stmt)
    }

    // ── INSERT / UPDATE ─────────────────────────────────────────────────────

    /// INSERT or UPDATE for a JSON record representation.
    ///
    /// `record_json` is decoded once into `T`; a decode failure is
    /// [`RowsqlError::Decode`]. Column values then come from the typed record.
    ///
    /// - insert: primary-key and skipped columns are left out.
    /// - update: primary-key columns form the `and`-joined WHERE clause, skipped
    ///   columns are dropped, the rest are SET. A type without any `pk` tag
    ///   fails with [`RowsqlError::MissingPrimaryKey`].
    ///
    /// Values are inlined without escaping; see [`crate::literal`]. Use
    /// [`prepare_mutation`](Self::prepare_mutation) for untrusted input.
    pub fn build_mutation<T>(&self, table: &str, record_json: &str, mode: MutationMode) -> Result<String>
    where
        T: Record + DeserializeOwned,
    {
        let record = decode_record::<T>(record_json)?;
        self.build_mutation_record(table, &record, mode)
    }

    /// [`build_mutation`](Self::build_mutation) with a textual mode token.
    ///
    /// An unsupported token yields `Ok("")`; callers must treat an empty
    /// statement as a failure. Use [`MutationMode::from_str`] for a strict parse.
    pub fn build_mutation_token<T>(&self, table: &str, record_json: &str, mode: &str) -> Result<String>
    where
        T: Record + DeserializeOwned,
    {
        match mode.parse::<MutationMode>() {
            Ok(mode) => self.build_mutation::<T>(table, record_json, mode),
            Err(_) => {
                tracing::warn!(
                    target: "rowsql.sql",
                    table,
                    mode,
                    "unsupported mutation mode, returning empty statement"
                );
                Ok(String::new())
            }
        }
    }

    /// [`build_mutation`](Self::build_mutation) for an already typed record.
    pub fn build_mutation_record<T: Record>(
        &self,
        table: &str,
        record: &T,
        mode: MutationMode,
    ) -> Result<String> {
        let values = record.column_values()?;
        self.build_mutation_values(T::schema(), table, &values, mode)
    }

    /// Mutation from raw column values, classified against `schema`.
    pub fn build_mutation_values(
        &self,
        schema: &RecordSchema,
        table: &str,
        values: &RecordValues,
        mode: MutationMode,
    ) -> Result<String> {
        let plan = self.plan(schema, values, mode)?;
        let sql = render_mutation(&plan, table, mode, render_literal);
        log_statement(mode.as_str(), table, &sql);
        Ok(sql)
    }

    /// Parameterized [`build_mutation`](Self::build_mutation).
    pub fn prepare_mutation<T>(&self, table: &str, record_json: &str, mode: MutationMode) -> Result<Statement>
    where
        T: Record + DeserializeOwned,
    {
        let record = decode_record::<T>(record_json)?;
        self.prepare_mutation_record(table, &record, mode)
    }

    /// Parameterized [`build_mutation_record`](Self::build_mutation_record).
    pub fn prepare_mutation_record<T: Record>(
        &self,
        table: &str,
        record: &T,
        mode: MutationMode,
    ) -> Result<Statement> {
        let schema = T::schema();
        let values = record.column_values()?;
        check_identifiers(table, schema)?;
        for column in values.columns() {
            Ident::parse(column)?;
        }

        let plan = self.plan(schema, &values, mode)?;
        let mut stmt = Statement::default();
        let sql = render_mutation(&plan, table, mode, |v| stmt.bind(v));
        log_statement(mode.as_str(), table, &sql);
        stmt.set_sql(sql);
        Ok(stmt)
    }

    fn plan<'a>(
        &self,
        schema: &RecordSchema,
        values: &'a RecordValues,
        mode: MutationMode,
    ) -> Result<MutationPlan<'a>> {
        let skip = &self.config.skip_columns;
        let mut plan = MutationPlan {
            assignments: Vec::with_capacity(values.len()),
            predicates: Vec::new(),
        };

        for (column, value) in values.iter() {
            // A field's own pk tag decides; its predicate is named by that tag.
            let pk_column = match schema.field_for_column(column) {
                Some(field) => field.primary_key,
                None => schema.is_primary_key(column).then_some(column),
            };
            match (mode, pk_column) {
                (MutationMode::Insert, Some(_)) => {}
                (MutationMode::Update, Some(pk)) => plan.predicates.push((pk, value)),
                (_, None) => {
                    if !skip.is_skipped(column) {
                        plan.assignments.push((column, value));
                    }
                }
            }
        }

        if mode == MutationMode::Update && plan.predicates.is_empty() {
            return Err(RowsqlError::missing_primary_key(schema.type_name));
        }
        if plan.assignments.is_empty() {
            return Err(RowsqlError::validation(format!(
                "{} on {} has no columns to write",
                mode.as_str().to_uppercase(),
                schema.type_name
            )));
        }
        Ok(plan)
    }
}

/// Decode `record_json` into `T`, matching object keys to fields without regard
/// to ASCII case. Missing fields fail unless `T` supplies serde defaults.
fn decode_record<T: Record + DeserializeOwned>(record_json: &str) -> Result<T> {
    let value = match serde_json::from_str::<Value>(record_json).map_err(RowsqlError::decode)? {
        Value::Object(map) => Value::Object(T::schema().fold_keys(map)),
        other => other,
    };
    serde_json::from_value(value).map_err(RowsqlError::decode)
}

fn check_identifiers(table: &str, schema: &RecordSchema) -> Result<()> {
    Ident::parse(table)?;
    for descriptor in schema.descriptors() {
        Ident::parse(&descriptor.column_name)?;
    }
    for pk in schema.fields.iter().filter_map(|f| f.primary_key) {
        Ident::parse(pk)?;
    }
    Ok(())
}

fn render_select(
    schema: &RecordSchema,
    table: &str,
    ids: &[i64],
    mut id_sql: impl FnMut(&i64) -> String,
) -> Result<String> {
    let columns = schema.columns();
    if columns.data_columns.is_empty() {
        return Err(RowsqlError::schema(schema.type_name));
    }

    let mut sql = format!("SELECT {} FROM {}", columns.select_list(), table);
    if !ids.is_empty() {
        if !columns.has_primary_key() {
            return Err(RowsqlError::missing_primary_key(schema.type_name));
        }
        let ids: Vec<String> = ids.iter().map(&mut id_sql).collect();
        sql.push_str(&format!(
            " WHERE {} IN ({})",
            columns.primary_key,
            ids.join(",")
        ));
    }
    Ok(sql)
}

fn render_delete(schema: &RecordSchema, table: &str, id_sql: String) -> Result<String> {
    let columns = schema.columns();
    if !columns.has_primary_key() {
        return Err(RowsqlError::missing_primary_key(schema.type_name));
    }
    Ok(format!(
        "DELETE FROM {} WHERE {} = {}",
        table, columns.primary_key, id_sql
    ))
}

fn render_mutation(
    plan: &MutationPlan<'_>,
    table: &str,
    mode: MutationMode,
    mut value_sql: impl FnMut(&Value) -> String,
) -> String {
    match mode {
        MutationMode::Insert => {
            let mut columns = Vec::with_capacity(plan.assignments.len());
            let mut values = Vec::with_capacity(plan.assignments.len());
            for &(column, value) in &plan.assignments {
                columns.push(column);
                values.push(value_sql(value));
            }
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table,
                columns.join(", "),
                values.join(", ")
            )
        }
        MutationMode::Update => {
            let set: Vec<String> = plan
                .assignments
                .iter()
                .map(|&(column, value)| format!("{} = {}", column, value_sql(value)))
                .collect();
            let predicates: Vec<String> = plan
                .predicates
                .iter()
                .map(|&(column, value)| format!("{} = {}", column, value_sql(value)))
                .collect();
            format!(
                "UPDATE {} SET {} WHERE {}",
                table,
                set.join(", "),
                predicates.join(" and ")
            )
        }
    }
}

fn log_statement(kind: &str, table: &str, sql: &str) {
    tracing::debug!(target: "rowsql.sql", kind, table, sql, "built statement");
}
