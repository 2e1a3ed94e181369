use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// The fixed set of statements the page store runs.
///
/// Built once during startup and moved into the repository; nothing mutates
/// it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SqlQueries {
    pub create_pages_table: String,
    pub all_pages: String,
    pub get_page: String,
    pub create_page: String,
    pub save_page: String,
    pub delete_page: String,
}

impl SqlQueries {
    /// Built-in statements for SQLite.
    pub fn sqlite() -> Self {
        Self {
            create_pages_table: "CREATE TABLE IF NOT EXISTS pages (\
                id INTEGER PRIMARY KEY AUTOINCREMENT, \
                name VARCHAR(255) UNIQUE NOT NULL, \
                content TEXT)"
                .to_string(),
            all_pages: "SELECT name FROM pages".to_string(),
            // column order is relied upon: 0 = id, 1 = content
            get_page: "SELECT id, content FROM pages WHERE name = ?".to_string(),
            create_page: "INSERT INTO pages (name, content) VALUES (?, ?)".to_string(),
            save_page: "UPDATE pages SET content = ? WHERE id = ?".to_string(),
            delete_page: "DELETE FROM pages WHERE id = ?".to_string(),
        }
    }

    /// Parses a TOML document with one key per statement, e.g.
    /// `get-page = "SELECT id, content FROM pages WHERE name = ?"`.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Failed to parse SQL query templates")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read SQL query templates from {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("Invalid SQL query templates in {}", path.display()))
    }

    /// Loads the templates named by the configuration, falling back to the
    /// built-in SQLite statements.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::sqlite()),
        }
    }
}

impl Default for SqlQueries {
    fn default() -> Self {
        Self::sqlite()
    }
}
