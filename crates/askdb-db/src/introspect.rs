//! Schema introspection.
//!
//! Produces a [`SchemaDescription`] snapshot (table names, column metadata,
//! and verbatim creation statements) plus a rendered text form consumed by
//! the prompt builder. Snapshots are taken per request and never cached.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::errors::{DbError, Result};

/// Marker appended to a column line when its key role is primary.
pub const PRIMARY_KEY_MARKER: &str = "[主键]";

/// Marker appended to a column line when the column is not nullable.
pub const NOT_NULL_MARKER: &str = "[非空]";

/// Column metadata in MySQL-shaped form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Declared type.
    pub column_type: String,
    /// `"NO"` when the column is not nullable, `"YES"` otherwise.
    pub nullable: String,
    /// `"PRI"` when the column is part of the primary key, `""` otherwise.
    pub key: String,
    /// Declared default value, if any.
    pub default: Option<String>,
}

/// One table's metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    /// Table name.
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnInfo>,
    /// Verbatim creation statement.
    pub create_statement: String,
}

/// Ordered snapshot of table metadata.
pub type SchemaDescription = Vec<TableInfo>;

/// List user tables, name-ordered. Internal `sqlite_%` tables are skipped.
pub fn list_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(names)
}

/// Introspect a single table.
///
/// Returns [`DbError::TableNotFound`] when the table has no columns (which
/// is how `SQLite` reports an unknown name to `pragma_table_info`).
pub fn table_info(conn: &Connection, name: &str) -> Result<TableInfo> {
    let mut stmt = conn.prepare(
        "SELECT name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?1)",
    )?;
    let columns = stmt
        .query_map([name], |row| {
            let not_null: i64 = row.get(2)?;
            let pk: i64 = row.get(4)?;
            Ok(ColumnInfo {
                name: row.get(0)?,
                column_type: row.get(1)?,
                nullable: if not_null == 1 { "NO" } else { "YES" }.to_string(),
                key: if pk > 0 { "PRI" } else { "" }.to_string(),
                default: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if columns.is_empty() {
        return Err(DbError::TableNotFound(name.to_string()));
    }

    let create_statement: String = conn
        .query_row(
            "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get::<_, Option<String>>(0),
        )
        .unwrap_or(None)
        .unwrap_or_default();

    Ok(TableInfo {
        name: name.to_string(),
        columns,
        create_statement,
    })
}

/// Snapshot all user tables, or a caller-supplied subset.
pub fn snapshot(conn: &Connection, tables: Option<&[String]>) -> Result<SchemaDescription> {
    let names = match tables {
        Some(subset) => subset.to_vec(),
        None => list_tables(conn)?,
    };
    names.iter().map(|name| table_info(conn, name)).collect()
}

/// Render a schema snapshot as text for the prompt builder.
///
/// Per table: the table name, each column annotated with
/// [`PRIMARY_KEY_MARKER`] when its key role is `PRI` and
/// [`NOT_NULL_MARKER`] when its nullability is `NO`, then the creation
/// statement.
#[must_use]
pub fn render_schema_text(schema: &SchemaDescription) -> String {
    use std::fmt::Write as _;

    let mut text = String::from("Database schema:\n");
    for table in schema {
        let _ = write!(text, "\nTable: {}\nColumns:\n", table.name);
        for col in &table.columns {
            let _ = write!(text, "  - {} ({})", col.name, col.column_type);
            if col.key == "PRI" {
                let _ = write!(text, " {PRIMARY_KEY_MARKER}");
            }
            if col.nullable == "NO" {
                let _ = write!(text, " {NOT_NULL_MARKER}");
            }
            text.push('\n');
        }
        let _ = writeln!(text, "Create statement: {}", table.create_statement);
    }
    text
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
