//! Destination database layer: the Jiffy SQLite file.

pub mod import;
pub mod rows;
pub mod schema;

use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Database handle wrapping a SQLite connection.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database at the given path and make sure the Jiffy
    /// tables exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;

        conn.execute_batch("PRAGMA busy_timeout=5000;")?;

        let db = Self { conn };
        db.ensure_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing and dry runs).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.ensure_schema()?;
        Ok(db)
    }

    /// Execute a function with access to the connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        f(&self.conn)
    }

    /// Execute a function with mutable access to the connection (for transactions).
    pub fn with_conn_mut<F, T>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        f(&mut self.conn)
    }
}

/// Get the output file ready for writing.
///
/// With a template, the template (an empty Jiffy database exported from the
/// app) is copied to `output`. Without one, a fresh file is created on open.
/// An existing output is only replaced when `force` is set, and is left in
/// place if the template copy fails.
pub fn prepare_output(output: &Path, template: Option<&Path>, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!(
            "Output database {} already exists. Use --force to replace it.",
            output.display()
        );
    }

    match template {
        Some(template) => {
            let staging = staging_path(output);
            if let Err(err) = std::fs::copy(template, &staging) {
                let _ = std::fs::remove_file(&staging);
                return Err(err).with_context(|| {
                    format!(
                        "Failed to copy template {} to {}",
                        template.display(),
                        output.display()
                    )
                });
            }
            std::fs::rename(&staging, output)
                .with_context(|| format!("Failed to move template into {}", output.display()))?;
        }
        None if output.exists() => {
            std::fs::remove_file(output)
                .with_context(|| format!("Failed to remove {}", output.display()))?;
        }
        None => {}
    }

    Ok(())
}

/// Sibling of `output` the template is copied to before it replaces `output`.
fn staging_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    output.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_output_refuses_existing() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("Jiffy.db");
        std::fs::write(&output, b"existing").unwrap();

        assert!(prepare_output(&output, None, false).is_err());
        assert!(output.exists());

        prepare_output(&output, None, true).unwrap();
        assert!(!output.exists());
    }

    #[test]
    fn test_prepare_output_copies_template() {
        let temp = TempDir::new().unwrap();
        let template = temp.path().join("Jiffy_empty.db");
        Database::open(&template).unwrap();
        let output = temp.path().join("Jiffy.db");

        prepare_output(&output, Some(&template), false).unwrap();

        let db = Database::open(&output).unwrap();
        assert_eq!(db.count_rows(schema::PROJECTS_TABLE).unwrap(), 0);
    }

    #[test]
    fn test_prepare_output_missing_template() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("Jiffy.db");

        let err = prepare_output(&output, Some(&temp.path().join("nope.db")), false).unwrap_err();
        assert!(err.to_string().contains("Failed to copy template"));
    }

    #[test]
    fn test_failed_template_copy_keeps_existing_output() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("Jiffy.db");
        std::fs::write(&output, b"previous").unwrap();

        let err = prepare_output(&output, Some(&temp.path().join("nope.db")), true).unwrap_err();

        assert!(err.to_string().contains("Failed to copy template"));
        assert_eq!(std::fs::read(&output).unwrap(), b"previous");
        assert!(!temp.path().join("Jiffy.db.partial").exists());
    }

    #[test]
    fn test_force_replaces_output_with_template() {
        let temp = TempDir::new().unwrap();
        let template = temp.path().join("Jiffy_empty.db");
        Database::open(&template).unwrap();
        let output = temp.path().join("Jiffy.db");
        std::fs::write(&output, b"previous").unwrap();

        prepare_output(&output, Some(&template), true).unwrap();

        let db = Database::open(&output).unwrap();
        assert_eq!(db.count_rows(schema::TASKS_TABLE).unwrap(), 0);
        assert!(!temp.path().join("Jiffy.db.partial").exists());
    }
}
