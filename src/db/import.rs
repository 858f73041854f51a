//! Write projected rows into the Jiffy tables.
//!
//! All rows go in through one transaction, so a failed write leaves the
//! tables as they were. Tree rows are inserted before time rows.

use super::Database;
use super::rows::{ProjectRow, TaskRow};
use super::schema::{PROJECTS_TABLE, TASKS_TABLE};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Result of an import operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportResult {
    /// Number of rows imported per table.
    pub rows_imported: BTreeMap<String, usize>,
}

impl ImportResult {
    /// Total number of rows imported.
    pub fn total_rows(&self) -> usize {
        self.rows_imported.values().sum()
    }
}

impl Database {
    /// Insert tree rows and time rows in a single transaction.
    pub fn import_rows(&mut self, projects: &[ProjectRow], tasks: &[TaskRow]) -> Result<ImportResult> {
        let mut result = ImportResult::default();

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(&insert_sql(PROJECTS_TABLE))?;
                for row in projects {
                    stmt.execute(&row.params()[..])
                        .with_context(|| format!("Failed to insert project {:?}", row.name))?;
                }

                let mut stmt = tx.prepare(&insert_sql(TASKS_TABLE))?;
                for row in tasks {
                    stmt.execute(&row.params()[..])
                        .context("Failed to insert time entry")?;
                }
            }
            tx.commit()?;
            Ok(())
        })?;

        result
            .rows_imported
            .insert(PROJECTS_TABLE.to_string(), projects.len());
        result
            .rows_imported
            .insert(TASKS_TABLE.to_string(), tasks.len());

        debug!(
            projects = projects.len(),
            tasks = tasks.len(),
            "Imported rows into Jiffy database"
        );

        Ok(result)
    }
}

fn insert_sql(table: &str) -> String {
    let placeholders: Vec<String> = (1..=super::schema::ROW_ARITY)
        .map(|i| format!("?{}", i))
        .collect();
    format!("INSERT INTO {} VALUES ({})", table, placeholders.join(","))
}
