//! Page domain module
//!
//! A page is a title plus an opaque byte body. Pages are built per request,
//! either from form input or from the store, and dropped after rendering.

pub mod store;
pub mod title;

pub use store::{PageStore, StoreError};
pub use title::{extract_title, Title, TitleError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: Title,
    pub body: Vec<u8>,
}

impl Page {
    pub const fn new(title: Title, body: Vec<u8>) -> Self {
        Self { title, body }
    }

    /// A page with no content, used when editing a page that does not exist yet
    pub const fn empty(title: Title) -> Self {
        Self::new(title, Vec::new())
    }
}
