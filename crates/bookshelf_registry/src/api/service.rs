use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use bookshelf_base::http::{HttpMethod, HttpRequest, HttpResponse, HttpService, HttpStatusCode};
use bookshelf_base::{BookshelfResult, err};

use crate::api::routes::{api_tags, book_routes};
use crate::assets::StaticAssets;
use crate::book::{BookDraft, BookId, BookPatch};
use crate::openapi::openapi_document;
use crate::store::StoreHandle;

/// Body of the create rejection, pinned by the API contract.
const VALIDATION_MESSAGE: &str = "all fields are required";
/// Body of the miss responses for get/update/delete, pinned by the API contract.
const NOT_FOUND_MESSAGE: &str = "book not found";
/// Body answered when a request body is present but not decodable.
const INVALID_BODY_MESSAGE: &str = "invalid JSON body";

/// Metadata shown in the generated API documentation.
#[derive(Debug, Clone)]
pub struct ApiInfo {
    /// The API title (e.g. "Books API")
    pub title: String,
    /// Optional API description
    pub description: Option<String>,
    /// Optional API version
    pub version: Option<String>,
}

impl ApiInfo {
    /// Create API info with just a title.
    ///
    /// # Examples
    /// ```
    /// use bookshelf_registry::ApiInfo;
    ///
    /// let info = ApiInfo::new("Books API");
    /// assert_eq!(info.title, "Books API");
    /// ```
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            version: None,
        }
    }

    /// Set the API description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the API version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// HTTP service answering all routes of the book registry.
///
/// The service owns routing internally:
/// - `POST /books` - Register a book
/// - `GET /books` - List all books in insertion order
/// - `GET /books/{id}` - Fetch a single book
/// - `PUT /books/{id}` - Update the supplied fields of a book
/// - `DELETE /books/{id}` - Remove a book
/// - `GET /api-docs` - The generated OpenAPI document
/// - `OPTIONS` on any path - CORS preflight
/// - Any other `GET` - Static assets from the public directory, if configured
///
/// Every response carries `Access-Control-Allow-Origin: *`. The two contract
/// errors answer with a JSON `{"message": ...}` body; anything else that
/// matches no route is a plain-text 404.
#[derive(Clone)]
pub struct ApiService {
    store: StoreHandle,
    info: ApiInfo,
    api_docs: Value,
    assets: Option<StaticAssets>,
}

impl ApiService {
    /// Create a new ApiService with the given store and documentation info.
    ///
    /// `server_url` is advertised in the generated documentation. The
    /// OpenAPI document is built once here, from the route table.
    ///
    /// # Examples
    /// ```
    /// use bookshelf_registry::{ApiInfo, ApiService, InMemoryStore, StoreHandle};
    ///
    /// let store = StoreHandle::new(InMemoryStore::new());
    /// let info = ApiInfo::new("Books API");
    /// let service = ApiService::new(store, info, "http://localhost:3000");
    /// ```
    pub fn new(store: StoreHandle, info: ApiInfo, server_url: impl Into<String>) -> Self {
        let api_docs = openapi_document(&info, &server_url.into(), &book_routes(), &api_tags());
        Self {
            store,
            info,
            api_docs,
            assets: None,
        }
    }

    /// Serve static assets for GET requests that match no API route.
    pub fn with_assets(mut self, assets: StaticAssets) -> Self {
        self.assets = Some(assets);
        self
    }

    /// Serialize data to JSON and wrap it in an HTTP response.
    ///
    /// Centralizes JSON serialization for all endpoints; a serialization
    /// failure propagates as an error for the server loop to turn into a 500.
    fn json_response<T: Serialize>(
        status: HttpStatusCode,
        data: &T,
    ) -> BookshelfResult<HttpResponse> {
        serde_json::to_string(data)
            .map(|json| {
                HttpResponse::new(status)
                    .with_content_type("application/json")
                    .with_body(json)
            })
            .map_err(|e| err!("JSON serialization error: {}", e))
    }

    /// Build one of the contract's `{"message": ...}` bodies.
    fn message_response(status: HttpStatusCode, message: &str) -> HttpResponse {
        HttpResponse::new(status)
            .with_content_type("application/json")
            .with_body(serde_json::json!({ "message": message }).to_string())
    }

    /// Decode a JSON request body.
    ///
    /// An absent body decodes as the type's default (all fields absent), so
    /// the presence checks in the handlers see the same thing for "no body"
    /// and "empty object". A body that is present but undecodable yields a
    /// ready-made 400 response.
    fn decode_body<T>(request: &HttpRequest) -> Result<T, HttpResponse>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if request.body().is_empty() {
            return Ok(T::default());
        }
        let Some(text) = request.text() else {
            debug!("request body is not valid UTF-8");
            return Err(Self::message_response(
                HttpStatusCode::BadRequest,
                INVALID_BODY_MESSAGE,
            ));
        };
        serde_json::from_str(text).map_err(|e| {
            debug!(error = %e, "request body is not valid JSON");
            Self::message_response(HttpStatusCode::BadRequest, INVALID_BODY_MESSAGE)
        })
    }

    /// Answer a CORS preflight request.
    fn preflight() -> HttpResponse {
        HttpResponse::no_content()
            .with_header(
                "Access-Control-Allow-Methods",
                "GET, POST, PUT, DELETE, OPTIONS",
            )
            .with_header("Access-Control-Allow-Headers", "Content-Type")
    }

    /// Handle `POST /books`.
    fn handle_create(&self, request: &HttpRequest) -> BookshelfResult<HttpResponse> {
        let draft: BookDraft = match Self::decode_body(request) {
            Ok(draft) => draft,
            Err(response) => return Ok(response),
        };

        let Some(new_book) = draft.validate() else {
            debug!("create rejected: missing required fields");
            return Ok(Self::message_response(
                HttpStatusCode::BadRequest,
                VALIDATION_MESSAGE,
            ));
        };

        let book = self.store.create(new_book)?;
        info!(id = %book.id(), name = book.name(), "book registered");
        Self::json_response(HttpStatusCode::Created, &book)
    }

    /// Handle `GET /books`.
    fn handle_list(&self) -> BookshelfResult<HttpResponse> {
        let books = self.store.list()?;
        Self::json_response(HttpStatusCode::Ok, &books)
    }

    /// Handle `GET /books/{id}`.
    fn handle_get(&self, raw_id: &str) -> BookshelfResult<HttpResponse> {
        let book = match BookId::parse(raw_id) {
            Some(id) => self.store.get(id)?,
            None => None,
        };
        match book {
            Some(book) => Self::json_response(HttpStatusCode::Ok, &book),
            None => {
                debug!(raw_id, "book not found");
                Ok(Self::message_response(
                    HttpStatusCode::NotFound,
                    NOT_FOUND_MESSAGE,
                ))
            }
        }
    }

    /// Handle `PUT /books/{id}`.
    fn handle_update(&self, raw_id: &str, request: &HttpRequest) -> BookshelfResult<HttpResponse> {
        let patch: BookPatch = match Self::decode_body(request) {
            Ok(patch) => patch,
            Err(response) => return Ok(response),
        };

        let updated = match BookId::parse(raw_id) {
            Some(id) => self.store.update(id, patch)?,
            None => None,
        };
        match updated {
            Some(book) => {
                info!(id = %book.id(), "book updated");
                Self::json_response(HttpStatusCode::Ok, &book)
            }
            None => {
                debug!(raw_id, "update target not found");
                Ok(Self::message_response(
                    HttpStatusCode::NotFound,
                    NOT_FOUND_MESSAGE,
                ))
            }
        }
    }

    /// Handle `DELETE /books/{id}`.
    fn handle_delete(&self, raw_id: &str) -> BookshelfResult<HttpResponse> {
        let removed = match BookId::parse(raw_id) {
            Some(id) => self.store.remove(id)?,
            None => None,
        };
        match removed {
            Some(book) => {
                info!(id = %book.id(), name = book.name(), "book removed");
                Ok(HttpResponse::no_content())
            }
            None => {
                debug!(raw_id, "delete target not found");
                Ok(Self::message_response(
                    HttpStatusCode::NotFound,
                    NOT_FOUND_MESSAGE,
                ))
            }
        }
    }

    /// Handle `GET /api-docs`.
    fn handle_docs(&self) -> BookshelfResult<HttpResponse> {
        Self::json_response(HttpStatusCode::Ok, &self.api_docs)
    }

    /// Answer anything that matched no API route.
    ///
    /// GET requests fall through to the static assets; everything else (and
    /// any asset miss) is a plain-text 404. The JSON `{"message": ...}` shape
    /// stays reserved for the contract errors.
    fn handle_fallback(&self, request: &HttpRequest, path: &str) -> BookshelfResult<HttpResponse> {
        if request.method() == HttpMethod::Get {
            if let Some(assets) = &self.assets {
                if let Some(response) = assets.serve(path) {
                    return Ok(response);
                }
            }
        }
        debug!(method = %request.method(), path, "no route matched");
        Ok(HttpResponse::not_found()
            .with_content_type("text/plain")
            .with_body("not found"))
    }

    /// Dispatch a request to its handler.
    fn route(&self, request: &HttpRequest, path: &str) -> BookshelfResult<HttpResponse> {
        // Preflight is answered before routing so OPTIONS works on any path.
        if request.method() == HttpMethod::Options {
            return Ok(Self::preflight());
        }

        if path == "/books" {
            match request.method() {
                HttpMethod::Post => return self.handle_create(request),
                HttpMethod::Get => return self.handle_list(),
                _ => {}
            }
        } else if let Some(raw_id) = path.strip_prefix("/books/") {
            match request.method() {
                HttpMethod::Get => return self.handle_get(raw_id),
                HttpMethod::Put => return self.handle_update(raw_id, request),
                HttpMethod::Delete => return self.handle_delete(raw_id),
                _ => {}
            }
        } else if path == "/api-docs" && request.method() == HttpMethod::Get {
            return self.handle_docs();
        }

        self.handle_fallback(request, path)
    }
}

impl std::fmt::Debug for ApiService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiService")
            .field("info", &self.info)
            .finish()
    }
}

impl HttpService for ApiService {
    fn handle_request(&self, request: HttpRequest) -> BookshelfResult<HttpResponse> {
        debug!(method = %request.method(), path = request.path(), "handling request");

        // The API takes no query parameters; drop them before routing so
        // asset paths and route matches see the bare path.
        let path = request
            .path()
            .split_once('?')
            .map_or(request.path(), |(path, _)| path);

        let response = self.route(&request, path)?;
        // CORS is enabled for all origins on every response.
        Ok(response.with_header("Access-Control-Allow-Origin", "*"))
    }
}
