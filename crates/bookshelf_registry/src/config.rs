use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use bookshelf_base::error::ErrorKind;
use bookshelf_base::{BookshelfError, BookshelfResult, ResultExt};

/// Default location of the configuration file, relative to the working
/// directory.
pub const DEFAULT_CONFIG_PATH: &str = "bookshelf.toml";

/// Environment variable that overrides the configured port.
pub const PORT_ENV_VAR: &str = "PORT";

/// Configuration for a bookshelf service.
///
/// Every field has a default, so a configuration file only needs to name the
/// fields it wants to change.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Title shown in the generated API documentation.
    pub title: String,
    /// Description shown in the generated API documentation.
    pub description: String,
    /// Version shown in the generated API documentation.
    pub version: String,
    /// Host address the server binds to.
    pub host: String,
    /// Port the server listens on.
    pub port: u16,
    /// Directory static assets are served from.
    pub public_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Books API".to_string(),
            description: "A simple API for managing books".to_string(),
            version: "1.0.0".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            public_dir: "public".into(),
        }
    }
}

/// Load configuration from a TOML file.
///
/// # Returns
/// The parsed configuration, or an error if the file cannot be read or does
/// not parse.
pub fn load_config(path: &Path) -> BookshelfResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        Box::new(BookshelfError::new(ErrorKind::FileError {
            path: path.to_path_buf(),
            source,
        }))
    })?;
    parse_config(&content).with_context(|| format!("Failed to load {}", path.display()))
}

/// Load the configuration file at the given path if one exists.
///
/// A missing file yields the default configuration. A file that exists but
/// cannot be loaded is still an error: a present configuration is never
/// silently skipped.
pub fn load_config_or_default(path: &Path) -> BookshelfResult<Config> {
    if path.exists() {
        load_config(path)
    } else {
        debug!(path = %path.display(), "no configuration file, using defaults");
        Ok(Config::default())
    }
}

/// Parse configuration from a TOML string.
pub fn parse_config(content: &str) -> BookshelfResult<Config> {
    toml::from_str(content).map_err(|e| Box::new(BookshelfError::message(e.to_string())))
}

/// Read the port override from the `PORT` environment variable.
pub fn port_from_env() -> Option<u16> {
    parse_port(&std::env::var(PORT_ENV_VAR).ok()?)
}

/// Parse a port override value.
///
/// A value that does not fit a port is reported and ignored rather than
/// aborting startup.
fn parse_port(raw: &str) -> Option<u16> {
    match raw.parse::<u16>() {
        Ok(port) => Some(port),
        Err(_) => {
            warn!(value = raw, "ignoring unusable port override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.title, "Books API");
        assert_eq!(config.description, "A simple API for managing books");
        assert_eq!(config.version, "1.0.0");
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.public_dir, PathBuf::from("public"));
    }

    #[test]
    fn test_parse_config_full() {
        let config = parse_config(
            r#"
            title = "Library API"
            description = "The branch library"
            version = "2.1.0"
            host = "0.0.0.0"
            port = 8080
            public_dir = "www"
            "#,
        )
        .unwrap();
        assert_eq!(config.title, "Library API");
        assert_eq!(config.description, "The branch library");
        assert_eq!(config.version, "2.1.0");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.public_dir, PathBuf::from("www"));
    }

    #[test]
    fn test_parse_config_partial_keeps_defaults() {
        let config = parse_config("port = 8080").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.title, "Books API");
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_parse_config_empty_is_all_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_parse_config_rejects_bad_toml() {
        assert!(parse_config("port = ").is_err());
        assert!(parse_config("port = \"many\"").is_err());
        assert!(parse_config("port = 123456").is_err());
    }

    #[test]
    fn test_load_config_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bookshelf.toml");
        fs::write(&path, "title = \"Library API\"\nport = 4000\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.title, "Library API");
        assert_eq!(config.port, 4000);
    }

    #[test]
    fn test_load_config_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.toml");

        let error = load_config(&path).unwrap_err();
        assert!(error.to_string().contains("nope.toml"));
    }

    #[test]
    fn test_load_config_invalid_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bookshelf.toml");
        fs::write(&path, "this is not toml ===").unwrap();

        let error = load_config(&path).unwrap_err();
        assert!(error.to_string().contains("bookshelf.toml"));
    }

    #[test]
    fn test_load_config_or_default_missing_file() {
        let dir = TempDir::new().unwrap();
        let config = load_config_or_default(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_load_config_or_default_reads_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bookshelf.toml");
        fs::write(&path, "port = 9999\n").unwrap();

        let config = load_config_or_default(&path).unwrap();
        assert_eq!(config.port, 9999);
    }

    #[test]
    fn test_load_config_or_default_broken_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bookshelf.toml");
        fs::write(&path, "port = \"broken\"").unwrap();

        assert!(load_config_or_default(&path).is_err());
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("3000"), Some(3000));
        assert_eq!(parse_port("65535"), Some(65535));
        assert_eq!(parse_port(""), None);
        assert_eq!(parse_port("abc"), None);
        assert_eq!(parse_port("-1"), None);
        assert_eq!(parse_port("70000"), None);
        assert_eq!(parse_port("80 "), None);
    }
}
