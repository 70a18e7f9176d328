pub mod api;
pub mod assets;
pub mod book;
pub mod config;
pub mod openapi;
pub mod store;

// Re-export commonly used types for convenience
pub use api::{ApiInfo, ApiService};
pub use assets::StaticAssets;
pub use book::{Book, BookDraft, BookId, BookPatch, NewBook};
pub use config::{Config, load_config, load_config_or_default};
pub use store::{BookStore, InMemoryStore, StoreHandle};
