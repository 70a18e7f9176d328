//! The HTTP server loop.
//!
//! Bridges wire-level requests into the `HttpService` trait from
//! `bookshelf_base` and writes the service's responses back. The accept loop
//! runs on a background thread, so [`start_http_server`] returns immediately
//! with a handle; dropping the handle shuts the server down.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use bookshelf_base::http::{
    HttpMethod, HttpRequest, HttpResponse, HttpServerConfig, HttpServerHandle, HttpService,
};
use bookshelf_base::{BookshelfResult, err};

/// How long the accept loop waits for a request before re-checking the
/// shutdown flag.
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Start an HTTP server for the given service.
///
/// Binds to the address in `config` (an unset port means the OS assigns one)
/// and handles each accepted request on its own thread. Returns once the
/// socket is bound; the actual port is available on the returned handle.
///
/// The server runs until the handle (and all its clones) signal shutdown. The
/// accept loop notices the signal on its next poll and exits, closing the
/// listening socket; requests already in flight complete on their own
/// threads.
pub fn start_http_server(
    service: Box<dyn HttpService>,
    config: HttpServerConfig,
) -> BookshelfResult<HttpServerHandle> {
    let address = config.address();
    let server = tiny_http::Server::http(&address)
        .map_err(|e| err!("Failed to bind HTTP server to {}: {}", address, e))?;
    let port = server
        .server_addr()
        .to_ip()
        .map(|addr| addr.port())
        .ok_or_else(|| err!("HTTP server on {} has no IP address", address))?;

    info!(host = config.host.as_str(), port, "HTTP server listening");

    let handle = HttpServerHandle::new(port);
    let shutdown = Arc::clone(handle.shutdown_flag());
    let service: Arc<dyn HttpService> = Arc::from(service);
    let server_name = Arc::new(config.server_name.clone());

    std::thread::Builder::new()
        .name(format!("{}-accept", config.server_name))
        .spawn(move || {
            while !shutdown.load(Ordering::SeqCst) {
                match server.recv_timeout(ACCEPT_POLL_INTERVAL) {
                    Ok(Some(request)) => {
                        debug!(
                            method = %request.method(),
                            url = request.url(),
                            "accepted request"
                        );
                        let service = Arc::clone(&service);
                        let server_name = Arc::clone(&server_name);
                        std::thread::spawn(move || {
                            handle_connection(&*service, &server_name, request);
                        });
                    }
                    // Timed out with no request, poll again
                    Ok(None) => {}
                    Err(e) => {
                        error!(error = %e, "failed to accept request");
                    }
                }
            }
            debug!("accept loop stopped");
        })
        .map_err(|e| err!("Failed to spawn accept thread: {}", e))?;

    Ok(handle)
}

/// Decode a wire request, hand it to the service and send the answer.
fn handle_connection(
    service: &dyn HttpService,
    server_name: &str,
    mut request: tiny_http::Request,
) {
    let response = match decode_request(&mut request) {
        Ok(http_request) => match service.handle_request(http_request) {
            Ok(response) => response,
            Err(e) => {
                error!(error = ?e, "request handler failed");
                internal_error_response()
            }
        },
        Err(e) => {
            warn!(error = %e, "could not decode request");
            bad_request_response()
        }
    };
    send_response(request, response.with_header("Server", server_name));
}

/// Translate a wire request into the service-facing request type.
fn decode_request(request: &mut tiny_http::Request) -> BookshelfResult<HttpRequest> {
    let Some(method) = HttpMethod::from_token(request.method().as_str()) else {
        return Err(err!("Unsupported HTTP method: {}", request.method()));
    };

    let mut http_request = HttpRequest::new(method, request.url());
    for header in request.headers() {
        http_request
            .headers_mut()
            .set(header.field.as_str().as_str(), header.value.as_str());
    }

    let mut body = Vec::new();
    request
        .as_reader()
        .read_to_end(&mut body)
        .map_err(|e| err!("Failed to read request body: {}", e))?;
    Ok(http_request.with_body(body))
}

/// Write a response back to the client.
///
/// Send failures only mean the client went away, so they are logged and
/// swallowed rather than propagated.
fn send_response(request: tiny_http::Request, response: HttpResponse) {
    let status = response.status().as_u16();
    let mut headers = Vec::new();
    for (name, value) in response.headers().iter() {
        match tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            Ok(header) => headers.push(header),
            Err(()) => warn!(name, "dropping malformed response header"),
        }
    }

    let mut wire =
        tiny_http::Response::from_data(response.into_body()).with_status_code(status);
    for header in headers {
        wire.add_header(header);
    }

    if let Err(e) = request.respond(wire) {
        debug!(error = %e, "failed to send response");
    }
}

/// The answer for a service error. The body shape matches the API's other
/// JSON error messages.
fn internal_error_response() -> HttpResponse {
    HttpResponse::internal_error()
        .with_content_type("application/json")
        .with_body(r#"{"message":"internal server error"}"#)
        .with_header("Access-Control-Allow-Origin", "*")
}

/// The answer for a request the wire layer could not decode.
fn bad_request_response() -> HttpResponse {
    HttpResponse::bad_request()
        .with_content_type("text/plain")
        .with_body("bad request")
        .with_header("Access-Control-Allow-Origin", "*")
}
