//! Request-level error type
//!
//! Every failure is terminal for its request; `into_response` decides the status.

use crate::http;
use crate::page::{StoreError, TitleError};
use crate::template::TemplateError;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};

#[derive(Debug, thiserror::Error)]
pub enum WikiError {
    #[error(transparent)]
    InvalidTitle(#[from] TitleError),
    #[error("method {method} not allowed")]
    MethodNotAllowed {
        method: Method,
        allowed: &'static [Method],
    },
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: u64 },
    #[error("failed to read request body: {0}")]
    BodyRead(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl WikiError {
    pub const fn status(&self) -> u16 {
        match self {
            Self::InvalidTitle(_) | Self::Store(StoreError::NotFound { .. }) => 404,
            Self::MethodNotAllowed { .. } => 405,
            Self::BodyTooLarge { .. } => 413,
            Self::BodyRead(_) => 400,
            Self::Store(_) | Self::Template(_) => 500,
        }
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        match self {
            Self::InvalidTitle(_) | Self::Store(StoreError::NotFound { .. }) => {
                http::build_404_response()
            }
            Self::MethodNotAllowed { allowed, .. } => http::build_405_response(allowed),
            Self::BodyTooLarge { .. } => http::build_413_response(),
            Self::BodyRead(message) => http::build_400_response(&message),
            e @ (Self::Store(_) | Self::Template(_)) => http::build_500_response(&e.to_string()),
        }
    }
}
