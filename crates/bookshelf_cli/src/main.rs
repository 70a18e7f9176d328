use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::Parser;
use tracing::debug;

use bookshelf_base::BookshelfResult;
use bookshelf_base::http::HttpServerConfig;
use bookshelf_base::tracing::init_tracing;
use bookshelf_registry::config::{self, Config, DEFAULT_CONFIG_PATH};
use bookshelf_registry::{ApiInfo, ApiService, InMemoryStore, StaticAssets, StoreHandle};
use bookshelf_server::start_http_server;

/// An in-memory book registry with a JSON API.
///
/// Configuration is resolved in order: flags beat the PORT environment
/// variable, which beats the configuration file, which beats built-in
/// defaults.
#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about)]
struct Args {
    /// Path to the configuration file (default: bookshelf.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Host address to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory to serve static assets from
    #[arg(long)]
    public_dir: Option<PathBuf>,
}

/// Apply the override chain: flags > PORT env > file > defaults.
///
/// A `--config` path that does not load is an error; the default path is
/// only loaded when a file is actually there.
fn resolve_config(args: &Args, env_port: Option<u16>) -> BookshelfResult<Config> {
    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::load_config_or_default(Path::new(DEFAULT_CONFIG_PATH))?,
    };
    if let Some(port) = env_port {
        config.port = port;
    }
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(public_dir) = &args.public_dir {
        config.public_dir = public_dir.clone();
    }
    Ok(config)
}

fn main() {
    if let Err(e) = init_tracing() {
        eprintln!("Error: Failed to initialize tracing: {}", e);
        process::exit(1);
    }

    let args = Args::parse();
    let config = match resolve_config(&args, config::port_from_env()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load configuration: {}", e);
            process::exit(1);
        }
    };
    debug!(?config, "resolved configuration");

    let store = StoreHandle::new(InMemoryStore::new());
    let info = ApiInfo::new(config.title.clone())
        .with_description(config.description.clone())
        .with_version(config.version.clone());
    let server_url = format!("http://localhost:{}", config.port);
    let service =
        ApiService::new(store, info, server_url).with_assets(StaticAssets::new(&config.public_dir));

    let server_config = HttpServerConfig::new(config.host.clone()).with_port(config.port);
    let handle = match start_http_server(Box::new(service), server_config) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Error: Failed to start server: {}", e);
            process::exit(1);
        }
    };

    println!("Server running at http://localhost:{}", handle.port());
    println!(
        "Documentation available at http://localhost:{}/api-docs",
        handle.port()
    );

    // The server runs on background threads; keep the process alive until it
    // is killed. Dropping the handle would shut the server down.
    loop {
        std::thread::sleep(Duration::from_secs(3600));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn empty_args() -> Args {
        Args {
            config: None,
            host: None,
            port: None,
            public_dir: None,
        }
    }

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("bookshelf.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "bookshelf",
            "--config",
            "other.toml",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--public-dir",
            "www",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("other.toml")));
        assert_eq!(args.host, Some("0.0.0.0".to_string()));
        assert_eq!(args.port, Some(8080));
        assert_eq!(args.public_dir, Some(PathBuf::from("www")));

        let args = Args::try_parse_from(["bookshelf"]).unwrap();
        assert_eq!(args.port, None);
    }

    #[test]
    fn test_resolve_config_defaults() {
        let config = resolve_config(&empty_args(), None).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.title, "Books API");
    }

    #[test]
    fn test_resolve_config_reads_the_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "title = \"Library API\"\nport = 1111\n");
        let args = Args {
            config: Some(path),
            ..empty_args()
        };

        let config = resolve_config(&args, None).unwrap();
        assert_eq!(config.title, "Library API");
        assert_eq!(config.port, 1111);
        // Fields the file does not set keep their defaults
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_env_port_beats_the_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "port = 1111\n");
        let args = Args {
            config: Some(path),
            ..empty_args()
        };

        let config = resolve_config(&args, Some(3333)).unwrap();
        assert_eq!(config.port, 3333);
    }

    #[test]
    fn test_flags_beat_env_and_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "port = 1111\nhost = \"0.0.0.0\"\n");
        let args = Args {
            config: Some(path),
            host: Some("192.168.0.1".to_string()),
            port: Some(2222),
            public_dir: Some(PathBuf::from("web")),
        };

        let config = resolve_config(&args, Some(3333)).unwrap();
        assert_eq!(config.port, 2222);
        assert_eq!(config.host, "192.168.0.1");
        assert_eq!(config.public_dir, PathBuf::from("web"));
    }

    #[test]
    fn test_explicit_config_that_does_not_load_is_an_error() {
        let args = Args {
            config: Some(PathBuf::from("/no/such/bookshelf.toml")),
            ..empty_args()
        };
        assert!(resolve_config(&args, None).is_err());
    }
}
