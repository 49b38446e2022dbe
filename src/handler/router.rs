//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: health checks, the front page
//! redirect, and dispatch of page operations by URL prefix.

use super::decorator::{make_handler, BoxError, Operation, PageHandler, PageRequest};
use super::pages;
use crate::config::AppState;
use crate::http;
use crate::page::Title;
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, CONTENT_TYPE, SERVER};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Page routes, built once at startup
pub struct Router {
    routes: Vec<(Operation, PageHandler)>,
}

impl Router {
    pub fn new() -> Self {
        let routes = Operation::ALL
            .into_iter()
            .map(|operation| {
                let handler = match operation {
                    Operation::View => make_handler(operation, pages::view),
                    Operation::Edit => make_handler(operation, pages::edit),
                    Operation::Save => make_handler(operation, pages::save),
                };
                (operation, handler)
            })
            .collect();
        Self { routes }
    }

    /// Find the handler whose operation prefix starts `path`
    pub fn find(&self, path: &str) -> Option<&PageHandler> {
        self.routes
            .iter()
            .find(|(operation, _)| path.starts_with(operation.prefix()))
            .map(|(_, handler)| handler)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let mut response = route_request(req, &state).await;

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }
    Ok(response)
}

/// Route request based on path
async fn route_request<B>(req: Request<B>, state: &Arc<AppState>) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let path = req.uri().path().to_string();
    let method = req.method().clone();
    let is_head = method == Method::HEAD;
    let is_read = method == Method::GET || is_head;
    let routes = &state.config.routes;

    // 1. Health check endpoints
    if routes.health.enabled
        && is_read
        && (path == routes.health.liveness_path || path == routes.health.readiness_path)
    {
        return http::build_health_response("ok", is_head);
    }

    // 2. Front page
    if path == "/" && is_read {
        return match Title::parse(&routes.front_page) {
            Ok(title) => http::build_redirect_response(&Operation::View.url(&title)),
            Err(e) => {
                crate::logger::log_error(&format!("Configured front page is invalid: {e}"));
                http::build_404_response()
            }
        };
    }

    // 3. Page operations
    if let Some(handler) = state.router.find(&path) {
        let query = req.uri().query().map(str::to_string);
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let page_req = PageRequest {
            method,
            path,
            query,
            content_type,
            is_head,
            body: req.into_body().map_err(Into::into).boxed_unsync(),
        };
        return handler(page_req, Arc::clone(state)).await;
    }

    http::build_404_response()
}
