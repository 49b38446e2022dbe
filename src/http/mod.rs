//! HTTP protocol layer module
//!
//! Provides response builders and form decoding, decoupled from page logic.

pub mod form;
pub mod response;

// Re-export commonly used items
pub use form::{form_value, is_form_urlencoded};
pub use response::{
    build_400_response, build_404_response, build_405_response, build_413_response,
    build_500_response, build_health_response, build_html_response, build_redirect_response,
};
