//! Author and book entities, their DTOs and request payloads

mod author;
mod book;

pub use author::{Author, AuthorDto, AuthorForCreation};
pub use book::{Book, BookDto, BookForCreation, BookForUpdate, BookPatch};
