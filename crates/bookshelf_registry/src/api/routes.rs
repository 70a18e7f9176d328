use bookshelf_base::http::HttpMethod;

/// Reference to a named schema in the generated API document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaRef {
    /// A single book record
    Book,
    /// An array of book records
    BookList,
    /// The create request payload
    BookInput,
    /// The update request payload
    BookUpdate,
    /// The `{"message": ...}` error payload
    ErrorMessage,
}

/// A documented response for a route.
#[derive(Debug, Clone)]
pub struct ResponseSpec {
    pub status: u16,
    pub description: &'static str,
    pub schema: Option<SchemaRef>,
}

/// Description of a single API route.
///
/// The route table below is the single source of truth for the documented
/// API surface; the OpenAPI document served at `/api-docs` is generated
/// from it.
#[derive(Debug, Clone)]
pub struct RouteSpec {
    pub method: HttpMethod,
    pub path: &'static str,
    pub summary: &'static str,
    pub tag: &'static str,
    pub request_body: Option<SchemaRef>,
    pub responses: Vec<ResponseSpec>,
}

/// A tag grouping operations in the generated documentation.
#[derive(Debug, Clone)]
pub struct TagSpec {
    pub name: &'static str,
    pub description: &'static str,
}

const BOOKS_TAG: &str = "Books";

/// The tags referenced by the route table.
pub fn api_tags() -> Vec<TagSpec> {
    vec![TagSpec {
        name: BOOKS_TAG,
        description: "API for managing books",
    }]
}

/// The route table for the book registry API.
pub fn book_routes() -> Vec<RouteSpec> {
    vec![
        RouteSpec {
            method: HttpMethod::Post,
            path: "/books",
            summary: "Register a new book",
            tag: BOOKS_TAG,
            request_body: Some(SchemaRef::BookInput),
            responses: vec![
                ResponseSpec {
                    status: 201,
                    description: "Book created",
                    schema: Some(SchemaRef::Book),
                },
                ResponseSpec {
                    status: 400,
                    description: "A required field is missing",
                    schema: Some(SchemaRef::ErrorMessage),
                },
            ],
        },
        RouteSpec {
            method: HttpMethod::Get,
            path: "/books",
            summary: "List all books",
            tag: BOOKS_TAG,
            request_body: None,
            responses: vec![ResponseSpec {
                status: 200,
                description: "All registered books",
                schema: Some(SchemaRef::BookList),
            }],
        },
        RouteSpec {
            method: HttpMethod::Get,
            path: "/books/{id}",
            summary: "Fetch a book by its identifier",
            tag: BOOKS_TAG,
            request_body: None,
            responses: vec![
                ResponseSpec {
                    status: 200,
                    description: "The requested book",
                    schema: Some(SchemaRef::Book),
                },
                ResponseSpec {
                    status: 404,
                    description: "No book with that identifier",
                    schema: Some(SchemaRef::ErrorMessage),
                },
            ],
        },
        RouteSpec {
            method: HttpMethod::Put,
            path: "/books/{id}",
            summary: "Update a book",
            tag: BOOKS_TAG,
            request_body: Some(SchemaRef::BookUpdate),
            responses: vec![
                ResponseSpec {
                    status: 200,
                    description: "The updated book",
                    schema: Some(SchemaRef::Book),
                },
                ResponseSpec {
                    status: 404,
                    description: "No book with that identifier",
                    schema: Some(SchemaRef::ErrorMessage),
                },
            ],
        },
        RouteSpec {
            method: HttpMethod::Delete,
            path: "/books/{id}",
            summary: "Delete a book",
            tag: BOOKS_TAG,
            request_body: None,
            responses: vec![
                ResponseSpec {
                    status: 204,
                    description: "Book deleted",
                    schema: None,
                },
                ResponseSpec {
                    status: 404,
                    description: "No book with that identifier",
                    schema: Some(SchemaRef::ErrorMessage),
                },
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_table_covers_the_crud_surface() {
        let routes = book_routes();
        assert_eq!(routes.len(), 5);

        let signatures: Vec<(HttpMethod, &str)> = routes
            .iter()
            .map(|route| (route.method, route.path))
            .collect();
        assert_eq!(
            signatures,
            vec![
                (HttpMethod::Post, "/books"),
                (HttpMethod::Get, "/books"),
                (HttpMethod::Get, "/books/{id}"),
                (HttpMethod::Put, "/books/{id}"),
                (HttpMethod::Delete, "/books/{id}"),
            ]
        );
    }

    #[test]
    fn test_write_routes_declare_request_bodies() {
        for route in book_routes() {
            match route.method {
                HttpMethod::Post | HttpMethod::Put => {
                    assert!(
                        route.request_body.is_some(),
                        "{} {} should document a request body",
                        route.method,
                        route.path
                    );
                }
                _ => assert!(
                    route.request_body.is_none(),
                    "{} {} should not document a request body",
                    route.method,
                    route.path
                ),
            }
        }
    }

    #[test]
    fn test_every_route_documents_at_least_one_response() {
        for route in book_routes() {
            assert!(
                !route.responses.is_empty(),
                "{} {} has no documented responses",
                route.method,
                route.path
            );
        }
    }

    #[test]
    fn test_every_route_tag_is_declared() {
        let tags = api_tags();
        for route in book_routes() {
            assert!(
                tags.iter().any(|tag| tag.name == route.tag),
                "{} {} uses the undeclared tag {}",
                route.method,
                route.path,
                route.tag
            );
        }
    }
}
