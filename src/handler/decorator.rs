//! Title-validating request decorator
//!
//! `make_handler` wraps a page operation into a complete handler: it strips the
//! operation prefix, validates the title, checks the method, runs the
//! operation and turns its error into a response. Invalid titles are answered
//! with 404 before the operation runs, so they never touch the page store.

use crate::config::AppState;
use crate::error::WikiError;
use crate::logger;
use crate::page::{extract_title, Title};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};
use std::future::{ready, Future};
use std::pin::Pin;
use std::sync::Arc;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Request body as handed to page operations
pub type RequestBody = UnsyncBoxBody<Bytes, BoxError>;

pub type HandlerFuture = Pin<Box<dyn Future<Output = Response<Full<Bytes>>> + Send>>;

/// A fully-formed page handler
pub type PageHandler = Box<dyn Fn(PageRequest, Arc<AppState>) -> HandlerFuture + Send + Sync>;

const READ_METHODS: &[Method] = &[Method::GET, Method::HEAD];
const WRITE_METHODS: &[Method] = &[Method::POST];

/// What a page operation sees of the HTTP request
pub struct PageRequest {
    pub method: Method,
    /// Raw path, still percent-encoded
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub is_head: bool,
    pub body: RequestBody,
}

/// The three page operations, selected by URL prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    View,
    Edit,
    Save,
}

impl Operation {
    pub const ALL: [Self; 3] = [Self::View, Self::Edit, Self::Save];

    pub const fn prefix(self) -> &'static str {
        match self {
            Self::View => "/view/",
            Self::Edit => "/edit/",
            Self::Save => "/save/",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Save => "save",
        }
    }

    pub const fn allowed_methods(self) -> &'static [Method] {
        match self {
            Self::View | Self::Edit => READ_METHODS,
            Self::Save => WRITE_METHODS,
        }
    }

    /// URL of this operation for a page
    pub fn url(self, title: &Title) -> String {
        format!("{}{title}", self.prefix())
    }
}

/// Wrap `op` so it only ever runs with a validated title and an allowed method
pub fn make_handler<F, Fut>(operation: Operation, op: F) -> PageHandler
where
    F: Fn(Title, PageRequest, Arc<AppState>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response<Full<Bytes>>, WikiError>> + Send + 'static,
{
    Box::new(move |req: PageRequest, state: Arc<AppState>| -> HandlerFuture {
        let title = match extract_title(&req.path, operation.prefix()) {
            Ok(title) => title,
            Err(e) => {
                logger::log_debug(&format!("Rejected {} request: {e}", operation.name()));
                return Box::pin(ready(WikiError::from(e).into_response()));
            }
        };

        let allowed = operation.allowed_methods();
        if !allowed.contains(&req.method) {
            logger::log_warning(&format!(
                "Method not allowed: {} {}",
                req.method, req.path
            ));
            let err = WikiError::MethodNotAllowed {
                method: req.method,
                allowed,
            };
            return Box::pin(ready(err.into_response()));
        }

        let fut = op(title, req, state);
        Box::pin(async move {
            fut.await.unwrap_or_else(|e| {
                if e.status() >= 500 {
                    logger::log_error(&format!("{} failed: {e}", operation.name()));
                }
                e.into_response()
            })
        })
    })
}
