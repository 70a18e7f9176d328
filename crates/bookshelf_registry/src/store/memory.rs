use bookshelf_base::BookshelfResult;

use crate::book::{Book, BookId, BookPatch, NewBook};
use crate::store::traits::BookStore;

/// An in-memory book store backed by a Vec.
///
/// Books are kept in insertion order, which is also the order `list`
/// returns them in. Lookups scan the vector; for the collection sizes this
/// registry holds that is cheaper than maintaining an index.
///
/// Identifiers come from a monotonically increasing counter that starts at 1
/// and never goes back, so removing a book retires its identifier for the
/// lifetime of the store.
///
/// # Example
///
/// ```
/// use bookshelf_registry::store::InMemoryStore;
/// use bookshelf_registry::{BookStore, NewBook};
///
/// let mut store = InMemoryStore::new();
/// let book = store
///     .create(NewBook {
///         name: "O Alquimista".to_string(),
///         author: "Paulo Coelho".to_string(),
///         pages: 208,
///     })
///     .unwrap();
///
/// assert_eq!(book.id().as_u64(), 1);
/// assert_eq!(store.len().unwrap(), 1);
/// ```
#[derive(Debug)]
pub struct InMemoryStore {
    books: Vec<Book>,
    next_id: u64,
}

impl InMemoryStore {
    /// Create an empty store. The first book registered gets identifier 1.
    pub fn new() -> Self {
        Self {
            books: Vec::new(),
            next_id: 1,
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookStore for InMemoryStore {
    fn create(&mut self, new_book: NewBook) -> BookshelfResult<Book> {
        let id = BookId::new(self.next_id);
        self.next_id += 1;
        let book = Book::new(id, new_book.name, new_book.author, new_book.pages);
        self.books.push(book.clone());
        Ok(book)
    }

    fn get(&self, id: BookId) -> BookshelfResult<Option<Book>> {
        Ok(self.books.iter().find(|book| book.id() == id).cloned())
    }

    fn list(&self) -> BookshelfResult<Vec<Book>> {
        Ok(self.books.clone())
    }

    fn update(&mut self, id: BookId, patch: BookPatch) -> BookshelfResult<Option<Book>> {
        match self.books.iter_mut().find(|book| book.id() == id) {
            Some(book) => {
                patch.apply_to(book);
                Ok(Some(book.clone()))
            }
            None => Ok(None),
        }
    }

    fn remove(&mut self, id: BookId) -> BookshelfResult<Option<Book>> {
        match self.books.iter().position(|book| book.id() == id) {
            Some(index) => Ok(Some(self.books.remove(index))),
            None => Ok(None),
        }
    }

    fn len(&self) -> BookshelfResult<usize> {
        Ok(self.books.len())
    }

    fn is_empty(&self) -> BookshelfResult<bool> {
        Ok(self.books.is_empty())
    }
}
