use std::sync::Arc;

use parking_lot::RwLock;

use bookshelf_base::BookshelfResult;

use crate::book::{Book, BookId, BookPatch, NewBook};

/// Trait for book storage implementations.
///
/// Provides the CRUD operations the API is built on. All operations return
/// `BookshelfResult` for consistent error handling, so an implementation
/// backed by real I/O can report failures without changing the interface.
pub trait BookStore: Send + Sync + 'static {
    /// Assign the next identifier and append a new book.
    ///
    /// Identifiers are handed out in increasing order starting at 1 and are
    /// never reused, even after removals.
    ///
    /// # Returns
    /// The stored book, including its assigned identifier.
    fn create(&mut self, new_book: NewBook) -> BookshelfResult<Book>;

    /// Retrieve a book by its identifier.
    ///
    /// # Returns
    /// * `Ok(Some(book))` - If the book exists
    /// * `Ok(None)` - If no book with that identifier exists
    fn get(&self, id: BookId) -> BookshelfResult<Option<Book>>;

    /// List all books in insertion order.
    fn list(&self) -> BookshelfResult<Vec<Book>>;

    /// Apply a patch to the book with the given identifier.
    ///
    /// # Returns
    /// * `Ok(Some(book))` - The updated book if it existed
    /// * `Ok(None)` - If no book with that identifier exists
    fn update(&mut self, id: BookId, patch: BookPatch) -> BookshelfResult<Option<Book>>;

    /// Remove a book by its identifier.
    ///
    /// The identifier is retired: later creations keep counting upward.
    ///
    /// # Returns
    /// * `Ok(Some(book))` - The removed book if it existed
    /// * `Ok(None)` - If no book with that identifier existed
    fn remove(&mut self, id: BookId) -> BookshelfResult<Option<Book>>;

    /// Get the number of books in the store.
    fn len(&self) -> BookshelfResult<usize>;

    /// Returns true if the store contains no books.
    fn is_empty(&self) -> BookshelfResult<bool>;
}

/// A thread-safe handle to a book store.
///
/// StoreHandle provides cheap cloning (via Arc) and interior mutability (via
/// RwLock), allowing one store to be shared between the API service and the
/// request threads of the server loop.
#[derive(Clone)]
pub struct StoreHandle(Arc<RwLock<dyn BookStore>>);

impl StoreHandle {
    /// Create a new StoreHandle wrapping the given store implementation.
    pub fn new<S: BookStore>(store: S) -> Self {
        Self(Arc::new(RwLock::new(store)))
    }

    /// Create a book.
    ///
    /// See [`BookStore::create`] for details.
    pub fn create(&self, new_book: NewBook) -> BookshelfResult<Book> {
        self.0.write().create(new_book)
    }

    /// Retrieve a book by identifier.
    ///
    /// See [`BookStore::get`] for details.
    pub fn get(&self, id: BookId) -> BookshelfResult<Option<Book>> {
        self.0.read().get(id)
    }

    /// List all books.
    ///
    /// See [`BookStore::list`] for details.
    pub fn list(&self) -> BookshelfResult<Vec<Book>> {
        self.0.read().list()
    }

    /// Update a book.
    ///
    /// See [`BookStore::update`] for details.
    pub fn update(&self, id: BookId, patch: BookPatch) -> BookshelfResult<Option<Book>> {
        self.0.write().update(id, patch)
    }

    /// Remove a book by identifier.
    ///
    /// See [`BookStore::remove`] for details.
    pub fn remove(&self, id: BookId) -> BookshelfResult<Option<Book>> {
        self.0.write().remove(id)
    }

    /// Get the number of books.
    ///
    /// See [`BookStore::len`] for details.
    pub fn len(&self) -> BookshelfResult<usize> {
        self.0.read().len()
    }

    /// Check if the store is empty.
    ///
    /// See [`BookStore::is_empty`] for details.
    pub fn is_empty(&self) -> BookshelfResult<bool> {
        self.0.read().is_empty()
    }
}
