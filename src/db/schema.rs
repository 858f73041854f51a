//! Jiffy table definitions and schema introspection.

use super::Database;
use anyhow::{Result, bail};
use serde::Serialize;

/// Project tree table.
pub const PROJECTS_TABLE: &str = "jiffy_time_tree";

/// Time entry table.
pub const TASKS_TABLE: &str = "jiffy_times";

/// Number of columns in both Jiffy tables.
pub const ROW_ARITY: usize = 16;

/// DDL for the two tables, in column order. A template exported from the
/// Jiffy app already contains them; `IF NOT EXISTS` leaves those untouched.
pub const SCHEMA_SQL: &str = "\
CREATE TABLE IF NOT EXISTS jiffy_time_tree (
    user_id INTEGER,
    name TEXT,
    color INTEGER,
    archived TEXT,
    worktime INTEGER,
    row_state INTEGER,
    uuid_m INTEGER,
    uuid_l INTEGER,
    parent_uuid_m INTEGER,
    parent_uuid_l INTEGER,
    local TEXT,
    expanded TEXT,
    server_timestamp TEXT,
    last_changed INTEGER,
    shared_from_uuid_m INTEGER,
    shared_from_uuid_l INTEGER
);
CREATE TABLE IF NOT EXISTS jiffy_times (
    user_id INTEGER,
    start_time INTEGER,
    stop_time INTEGER,
    row_state INTEGER,
    note TEXT,
    start_zone TEXT,
    stop_zone TEXT,
    uuid_m INTEGER,
    uuid_l INTEGER,
    owner_uuid_m INTEGER,
    owner_uuid_l INTEGER,
    local TEXT,
    server_timestamp INTEGER,
    last_changed INTEGER,
    worktime TEXT,
    locked TEXT
);
";

/// Information about a table column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
}

impl Database {
    /// Create the Jiffy tables if missing and check their arity.
    pub(super) fn ensure_schema(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute_batch(SCHEMA_SQL)?;
            Ok(())
        })?;

        for table in [PROJECTS_TABLE, TASKS_TABLE] {
            let columns = self.table_columns(table)?;
            if columns.len() != ROW_ARITY {
                bail!(
                    "Table {} has {} columns, expected {}. Is this a Jiffy database?",
                    table,
                    columns.len(),
                    ROW_ARITY
                );
            }
        }
        Ok(())
    }

    /// Column information for a table, in declaration order.
    pub fn table_columns(&self, table_name: &str) -> Result<Vec<ColumnInfo>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table_name))?;

            let columns: Vec<ColumnInfo> = stmt
                .query_map([], |row| {
                    Ok(ColumnInfo {
                        name: row.get(1)?,
                        data_type: row.get::<_, String>(2)?.to_uppercase(),
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(columns)
        })
    }

    /// Number of rows in a table.
    pub fn count_rows(&self, table_name: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", table_name),
                [],
                |row| row.get(0),
            )?;
            Ok(count as usize)
        })
    }
}
