use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Domain-rule violation raised by entity constructors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("author name must not be empty")]
    EmptyAuthorName,
    #[error("book title must not be empty")]
    EmptyBookTitle,
}

/// A writer known to the catalog. Identity is immutable once created.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Author {
    #[serde(rename = "ID")]
    pub id: Uuid,
    #[serde(rename = "Name")]
    pub name: String,
}

impl Author {
    pub fn new(name: impl Into<String>, id: Uuid) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyAuthorName);
        }
        Ok(Self { id, name })
    }

    /// Id-only reference, used on the write path and in store rows before
    /// the full record is loaded.
    pub fn stub(id: Uuid) -> Self {
        Self {
            id,
            name: String::new(),
        }
    }
}

/// A book referencing its author. The embedded author is a stub until
/// retrieval replaces it with the full record.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Book {
    #[serde(rename = "ID")]
    pub id: Uuid,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Author")]
    pub author: Author,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        id: Uuid,
        author: Author,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.is_empty() {
            return Err(ValidationError::EmptyBookTitle);
        }
        Ok(Self { id, title, author })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_constructor_keeps_fields() {
        let id = Uuid::new_v4();
        let author = Author::new("Frank Herbert", id).unwrap();
        assert_eq!(author.id, id);
        assert_eq!(author.name, "Frank Herbert");
    }

    #[test]
    fn author_constructor_rejects_empty_name() {
        let result = Author::new("", Uuid::new_v4());
        assert_eq!(result.unwrap_err(), ValidationError::EmptyAuthorName);
    }

    #[test]
    fn book_constructor_keeps_fields() {
        let author = Author::new("Frank Herbert", Uuid::new_v4()).unwrap();
        let id = Uuid::new_v4();
        let book = Book::new("Dune", id, author.clone()).unwrap();
        assert_eq!(book.id, id);
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, author);
    }

    #[test]
    fn book_constructor_rejects_empty_title() {
        let author = Author::new("Frank Herbert", Uuid::new_v4()).unwrap();
        let result = Book::new("", Uuid::new_v4(), author);
        assert_eq!(result.unwrap_err(), ValidationError::EmptyBookTitle);
    }

    #[test]
    fn book_serializes_with_go_style_field_names() {
        let author_id = Uuid::new_v4();
        let book_id = Uuid::new_v4();
        let author = Author::new("Frank Herbert", author_id).unwrap();
        let book = Book::new("Dune", book_id, author).unwrap();

        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["ID"], serde_json::json!(book_id));
        assert_eq!(value["Title"], "Dune");
        assert_eq!(value["Author"]["ID"], serde_json::json!(author_id));
        assert_eq!(value["Author"]["Name"], "Frank Herbert");
    }
}
