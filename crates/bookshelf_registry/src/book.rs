use serde::{Deserialize, Serialize};

/// Unique identifier for a book.
///
/// Identifiers are assigned by the store from a counter that starts at 1 and
/// only ever grows, so an identifier is never reused within a process, even
/// after the book it belonged to has been deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookId(u64);

impl BookId {
    /// Create a BookId from a raw numeric value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Parse an identifier supplied in a request path.
    ///
    /// The whole string must be a base-10 unsigned number. Anything else
    /// yields `None`, which callers treat the same as an identifier that
    /// matches no book.
    ///
    /// # Examples
    /// ```
    /// use bookshelf_registry::BookId;
    ///
    /// assert_eq!(BookId::parse("7"), Some(BookId::new(7)));
    /// assert_eq!(BookId::parse("abc"), None);
    /// assert_eq!(BookId::parse("12abc"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse::<u64>().ok().map(Self)
    }

    /// Returns the identifier as a raw number.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single registered book.
///
/// Fields are private so records can only be created through the store
/// (which assigns the identifier) or modified through [`BookPatch`].
/// Serializes as `{"id": ..., "name": ..., "author": ..., "pages": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    id: BookId,
    name: String,
    author: String,
    pages: i64,
}

impl Book {
    /// Create a book record with the given identifier and fields.
    pub fn new(id: BookId, name: impl Into<String>, author: impl Into<String>, pages: i64) -> Self {
        Self {
            id,
            name: name.into(),
            author: author.into(),
            pages,
        }
    }

    /// The identifier assigned by the store.
    pub fn id(&self) -> BookId {
        self.id
    }

    /// The book title.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The book author.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// The page count.
    pub fn pages(&self) -> i64 {
        self.pages
    }
}

/// Create request payload.
///
/// Every field is optional at the decoding layer so that presence can be
/// checked explicitly by [`BookDraft::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookDraft {
    pub name: Option<String>,
    pub author: Option<String>,
    pub pages: Option<i64>,
}

impl BookDraft {
    /// Check the creation contract and return the validated fields.
    ///
    /// A field counts as missing when it is absent, an empty string, or a
    /// zero page count. Negative page counts are accepted.
    ///
    /// # Examples
    /// ```
    /// use bookshelf_registry::BookDraft;
    ///
    /// let draft = BookDraft {
    ///     name: Some("O Alquimista".to_string()),
    ///     author: Some("Paulo Coelho".to_string()),
    ///     pages: Some(208),
    /// };
    /// assert!(draft.validate().is_some());
    /// assert!(BookDraft::default().validate().is_none());
    /// ```
    pub fn validate(self) -> Option<NewBook> {
        let name = self.name.filter(|name| !name.is_empty())?;
        let author = self.author.filter(|author| !author.is_empty())?;
        let pages = self.pages.filter(|pages| *pages != 0)?;
        Some(NewBook {
            name,
            author,
            pages,
        })
    }
}

/// A validated create request: all fields present and usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub name: String,
    pub author: String,
    pub pages: i64,
}

/// Update request payload.
///
/// Fields that are absent, empty strings, or zero page counts leave the
/// stored record unchanged, so a partial update only has to name the fields
/// it wants to replace.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookPatch {
    pub name: Option<String>,
    pub author: Option<String>,
    pub pages: Option<i64>,
}

impl BookPatch {
    /// Apply the supplied fields to a stored book.
    pub fn apply_to(self, book: &mut Book) {
        if let Some(name) = self.name.filter(|name| !name.is_empty()) {
            book.name = name;
        }
        if let Some(author) = self.author.filter(|author| !author.is_empty()) {
            book.author = author;
        }
        if let Some(pages) = self.pages.filter(|pages| *pages != 0) {
            book.pages = pages;
        }
    }
}
