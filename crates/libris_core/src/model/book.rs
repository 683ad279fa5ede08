//! Book domain model.
//!
//! # Responsibility
//! - Define the library record held by the controller's store.
//! - Enforce the available / checked-out state machine.
//!
//! # Invariants
//! - `id` is assigned at construction and never changes.
//! - A transition into the state a book already has is rejected and leaves
//!   the book unchanged.
//! - Persisted layout is `id|title|author|year|checked_out`.

use crate::codec::{
    decode_flag, encode_flag, escape_field, join_fields, parse_number, require_fields,
    split_fields, DecodeError,
};
use crate::model::entity::Entity;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifier of a book, unique within one store.
pub type BookId = u64;

const BOOK_FIELD_COUNT: usize = 5;

/// Rejected availability transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookStateError {
    AlreadyCheckedOut(BookId),
    NotCheckedOut(BookId),
}

impl Display for BookStateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyCheckedOut(id) => write!(f, "book {id} is already checked out"),
            Self::NotCheckedOut(id) => write!(f, "book {id} is not checked out"),
        }
    }
}

impl Error for BookStateError {}

/// One library book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    id: BookId,
    title: String,
    author: String,
    year: i32,
    checked_out: bool,
}

impl Book {
    /// Creates an available book.
    pub fn new(id: BookId, title: impl Into<String>, author: impl Into<String>, year: i32) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            year,
            checked_out: false,
        }
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn is_checked_out(&self) -> bool {
        self.checked_out
    }

    pub fn is_available(&self) -> bool {
        !self.checked_out
    }

    /// Marks this book as checked out.
    ///
    /// # Errors
    /// - `AlreadyCheckedOut` when the book is not available.
    pub fn check_out(&mut self) -> Result<(), BookStateError> {
        if self.checked_out {
            return Err(BookStateError::AlreadyCheckedOut(self.id));
        }
        self.checked_out = true;
        Ok(())
    }

    /// Marks this book as available again.
    ///
    /// # Errors
    /// - `NotCheckedOut` when the book is already available.
    pub fn return_back(&mut self) -> Result<(), BookStateError> {
        if !self.checked_out {
            return Err(BookStateError::NotCheckedOut(self.id));
        }
        self.checked_out = false;
        Ok(())
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] \"{}\" by {} ({}) [{}]",
            self.id,
            self.title,
            self.author,
            self.year,
            if self.checked_out {
                "checked out"
            } else {
                "available"
            }
        )
    }
}

impl Entity for Book {
    type Id = BookId;

    fn id(&self) -> BookId {
        self.id
    }

    fn encode(&self) -> String {
        let id = self.id.to_string();
        let title = escape_field(&self.title);
        let author = escape_field(&self.author);
        let year = self.year.to_string();
        join_fields(&[
            id.as_str(),
            title.as_str(),
            author.as_str(),
            year.as_str(),
            encode_flag(self.checked_out),
        ])
    }

    fn decode(line: &str) -> Result<Self, DecodeError> {
        let fields = split_fields(line);
        require_fields(&fields, BOOK_FIELD_COUNT)?;

        let mut book = Book::new(
            parse_number("id", fields[0])?,
            fields[1],
            fields[2],
            parse_number("year", fields[3])?,
        );
        book.checked_out = decode_flag(fields[4]);
        Ok(book)
    }
}
