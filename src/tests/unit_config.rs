use crate::config::WikiConfig;
use crate::database::SqlQueries;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_config_defaults() {
    let config = WikiConfig::from_lookup(lookup_from(&[])).unwrap();

    assert_eq!(config.database_url, "sqlite://wiki.db");
    assert_eq!(config.max_connections, 30);
    assert_eq!(config.http_port, 8080);
    assert_eq!(config.queue_capacity, 256);
    assert_eq!(config.reply_timeout, Duration::from_millis(5000));
    assert!(config.sql_queries_file.is_none());
}

#[test]
fn test_config_overrides() {
    let config = WikiConfig::from_lookup(lookup_from(&[
        ("DATABASE_URL", "sqlite::memory:"),
        ("MAX_CONNECTIONS", "4"),
        ("HTTP_PORT", "3000"),
        ("DB_QUEUE_CAPACITY", "8"),
        ("DB_REPLY_TIMEOUT_MS", "250"),
        ("SQL_QUERIES_FILE", "/etc/wiki/queries.toml"),
    ]))
    .unwrap();

    assert_eq!(config.database_url, "sqlite::memory:");
    assert_eq!(config.max_connections, 4);
    assert_eq!(config.http_port, 3000);
    assert_eq!(config.queue_capacity, 8);
    assert_eq!(config.reply_timeout, Duration::from_millis(250));
    assert_eq!(
        config.sql_queries_file,
        Some(PathBuf::from("/etc/wiki/queries.toml"))
    );
}

// a typo in a number should stop the boot, not be silently replaced by the default
#[test]
fn test_config_rejects_bad_numbers() {
    let err = WikiConfig::from_lookup(lookup_from(&[("HTTP_PORT", "eighty")])).unwrap_err();
    assert!(err.to_string().contains("HTTP_PORT"));
}

// a zero wait would time out every request
#[test]
fn test_config_rejects_zero_reply_timeout() {
    let err = WikiConfig::from_lookup(lookup_from(&[("DB_REPLY_TIMEOUT_MS", "0")])).unwrap_err();
    assert!(err.to_string().contains("DB_REPLY_TIMEOUT_MS"));
}

#[test]
fn test_queries_default_when_no_file() {
    assert_eq!(SqlQueries::load(None).unwrap(), SqlQueries::sqlite());
}

#[test]
fn test_queries_loaded_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
create-pages-table = "CREATE TABLE IF NOT EXISTS p (id INTEGER PRIMARY KEY, name TEXT UNIQUE, content TEXT)"
all-pages = "SELECT name FROM p"
get-page = "SELECT id, content FROM p WHERE name = ?"
create-page = "INSERT INTO p (name, content) VALUES (?, ?)"
save-page = "UPDATE p SET content = ? WHERE id = ?"
delete-page = "DELETE FROM p WHERE id = ?"
"#
    )
    .unwrap();

    let queries = SqlQueries::load(Some(file.path())).unwrap();
    assert_eq!(queries.all_pages, "SELECT name FROM p");
    assert_eq!(queries.delete_page, "DELETE FROM p WHERE id = ?");
}

// every statement is required; a partial file is a startup error
#[test]
fn test_queries_file_missing_key_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "all-pages = \"SELECT name FROM pages\"\n").unwrap();

    assert!(SqlQueries::load(Some(file.path())).is_err());
}

#[test]
fn test_queries_file_not_found_fails() {
    let err = SqlQueries::load(Some(std::path::Path::new("/definitely/not/here.toml"))).unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.toml"));
}
