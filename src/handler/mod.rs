//! Request handler module
//!
//! Responsible for request routing dispatch and the page operations.

pub mod decorator;
pub mod pages;
pub mod router;

// Re-export main entry point
pub use router::{handle_request, Router};
