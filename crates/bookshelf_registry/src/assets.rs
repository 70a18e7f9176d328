//! Static file serving for the frontend.
//!
//! Files live in a public directory on disk and are read per request, which
//! is plenty for a small registry frontend and means edits show up without a
//! restart.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use bookshelf_base::http::HttpResponse;

/// Serves files from a public directory for requests no API route claims.
#[derive(Debug, Clone)]
pub struct StaticAssets {
    root: PathBuf,
}

impl StaticAssets {
    /// Create an asset server rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory files are served from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serve the file a request path points at.
    ///
    /// # Returns
    /// * `Some(response)` - A 200 response with the file content and a
    ///   content type guessed from the extension
    /// * `None` - The path is unsafe, or no such file exists under the root
    pub fn serve(&self, path: &str) -> Option<HttpResponse> {
        let relative = match Self::sanitize(path) {
            Some(relative) => relative,
            None => {
                warn!(path, "refusing unsafe asset path");
                return None;
            }
        };

        let file_path = self.root.join(&relative);
        let content = match std::fs::read(&file_path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %file_path.display(), error = %e, "asset not readable");
                return None;
            }
        };

        let content_type = Self::guess_content_type(&relative);
        debug!(
            path = %file_path.display(),
            content_type,
            size = content.len(),
            "serving asset"
        );
        Some(
            HttpResponse::ok()
                .with_content_type(content_type)
                .with_body(content),
        )
    }

    /// Map a request path to a relative path inside the root.
    ///
    /// Percent-escapes are decoded first, so traversal attempts cannot hide
    /// behind encoding. Any path containing a `..` segment or a backslash is
    /// refused, as is a path that is still absolute after the leading slash
    /// is stripped (`Path::join` would let it replace the root). The root
    /// path maps to `index.html`.
    fn sanitize(path: &str) -> Option<String> {
        let decoded = urlencoding::decode(path).ok()?;
        let relative = decoded.strip_prefix('/').unwrap_or(&decoded);
        if relative.starts_with('/') || relative.contains('\\') {
            return None;
        }
        if relative.split('/').any(|segment| segment == "..") {
            return None;
        }
        if relative.is_empty() {
            return Some("index.html".to_string());
        }
        Some(relative.to_string())
    }

    /// Guess the MIME type based on file extension.
    fn guess_content_type(path: &str) -> &'static str {
        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".html") || path_lower.ends_with(".htm") {
            "text/html"
        } else if path_lower.ends_with(".css") {
            "text/css"
        } else if path_lower.ends_with(".js") || path_lower.ends_with(".mjs") {
            "application/javascript"
        } else if path_lower.ends_with(".json") {
            "application/json"
        } else if path_lower.ends_with(".png") {
            "image/png"
        } else if path_lower.ends_with(".jpg") || path_lower.ends_with(".jpeg") {
            "image/jpeg"
        } else if path_lower.ends_with(".gif") {
            "image/gif"
        } else if path_lower.ends_with(".svg") {
            "image/svg+xml"
        } else if path_lower.ends_with(".ico") {
            "image/x-icon"
        } else if path_lower.ends_with(".txt") {
            "text/plain"
        } else {
            "application/octet-stream"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_base::http::HttpStatusCode;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_assets() -> (TempDir, StaticAssets) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<h1>Books</h1>").unwrap();
        fs::write(dir.path().join("style.css"), "body {}").unwrap();
        fs::create_dir(dir.path().join("img")).unwrap();
        fs::write(dir.path().join("img").join("cover.png"), [137u8, 80, 78]).unwrap();
        let assets = StaticAssets::new(dir.path());
        (dir, assets)
    }

    #[test]
    fn test_serves_files_from_the_root() {
        let (_dir, assets) = create_test_assets();

        let response = assets.serve("/style.css").unwrap();
        assert_eq!(response.status(), HttpStatusCode::Ok);
        assert_eq!(
            response.headers().get("Content-Type"),
            Some("text/css")
        );
        assert_eq!(response.text(), Some("body {}"));
    }

    #[test]
    fn test_root_path_maps_to_index_html() {
        let (_dir, assets) = create_test_assets();

        let response = assets.serve("/").unwrap();
        assert_eq!(
            response.headers().get("Content-Type"),
            Some("text/html")
        );
        assert_eq!(response.text(), Some("<h1>Books</h1>"));
    }

    #[test]
    fn test_serves_nested_directories() {
        let (_dir, assets) = create_test_assets();

        let response = assets.serve("/img/cover.png").unwrap();
        assert_eq!(
            response.headers().get("Content-Type"),
            Some("image/png")
        );
        assert_eq!(response.body(), &[137u8, 80, 78]);
    }

    #[test]
    fn test_missing_file_is_none() {
        let (_dir, assets) = create_test_assets();
        assert!(assets.serve("/missing.html").is_none());
        // A directory is not a servable file
        assert!(assets.serve("/img").is_none());
    }

    #[test]
    fn test_parent_traversal_is_refused() {
        let dir = TempDir::new().unwrap();
        let public = dir.path().join("public");
        fs::create_dir(&public).unwrap();
        fs::write(dir.path().join("secret.txt"), "secret").unwrap();
        let assets = StaticAssets::new(&public);

        assert!(assets.serve("/../secret.txt").is_none());
        assert!(assets.serve("/img/../../secret.txt").is_none());
        // Encoded traversal decodes to ".." and is refused too
        assert!(assets.serve("/%2e%2e/secret.txt").is_none());
        assert!(assets.serve("/..%2fsecret.txt").is_none());
        assert!(assets.serve("/..\\secret.txt").is_none());
    }

    #[test]
    fn test_absolute_escapes_are_refused() {
        let (_dir, assets) = create_test_assets();
        // A doubled slash would survive the single prefix strip and make
        // Path::join discard the root
        assert!(assets.serve("//etc/hostname").is_none());
        assert!(assets.serve("/%2fetc/hostname").is_none());
    }

    #[test]
    fn test_percent_escapes_are_decoded() {
        let (dir, assets) = create_test_assets();
        fs::write(dir.path().join("my book.txt"), "pages").unwrap();

        let response = assets.serve("/my%20book.txt").unwrap();
        assert_eq!(response.text(), Some("pages"));
    }

    #[test]
    fn test_content_type_guessing() {
        assert_eq!(StaticAssets::guess_content_type("index.html"), "text/html");
        assert_eq!(StaticAssets::guess_content_type("INDEX.HTM"), "text/html");
        assert_eq!(StaticAssets::guess_content_type("app.js"), "application/javascript");
        assert_eq!(StaticAssets::guess_content_type("data.json"), "application/json");
        assert_eq!(StaticAssets::guess_content_type("logo.svg"), "image/svg+xml");
        assert_eq!(StaticAssets::guess_content_type("favicon.ico"), "image/x-icon");
        assert_eq!(
            StaticAssets::guess_content_type("archive.bin"),
            "application/octet-stream"
        );
    }
}
