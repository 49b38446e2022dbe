//! Page operations: view, edit, save
//!
//! Each operation receives an already-validated title; see `decorator`.

use super::decorator::{BoxError, Operation, PageRequest, RequestBody};
use crate::config::AppState;
use crate::error::WikiError;
use crate::http;
use crate::logger;
use crate::page::{Page, StoreError, Title};
use crate::template::Template;
use http_body_util::{BodyExt, Collected, Full, LengthLimitError, Limited};
use hyper::body::Bytes;
use hyper::Response;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Form field holding the page content
const BODY_FIELD: &str = "body";

/// Render the page, or send the client to the edit form if it does not exist
pub async fn view(
    title: Title,
    req: PageRequest,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, WikiError> {
    match state.store.load(&title).await {
        Ok(page) => render(&state.templates.view, &page, req.is_head),
        Err(StoreError::NotFound { .. }) => {
            logger::log_debug(&format!("Page '{title}' not found, redirecting to edit"));
            Ok(http::build_redirect_response(&Operation::Edit.url(&title)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Render the edit form; a missing page edits as empty
pub async fn edit(
    title: Title,
    req: PageRequest,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, WikiError> {
    let page = match state.store.load(&title).await {
        Ok(page) => page,
        Err(StoreError::NotFound { .. }) => Page::empty(title),
        Err(e) => return Err(e.into()),
    };
    render(&state.templates.edit, &page, req.is_head)
}

/// Store the submitted `body` field and redirect to the page view
pub async fn save(
    title: Title,
    req: PageRequest,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, WikiError> {
    // Body fields win over the query string; other content types are not read
    let form = if http::is_form_urlencoded(req.content_type.as_deref()) {
        read_form(req.body, state.config.http.max_body_size).await?
    } else {
        Bytes::new()
    };
    let body = http::form_value(&form, BODY_FIELD)
        .or_else(|| {
            req.query
                .as_deref()
                .and_then(|query| http::form_value(query.as_bytes(), BODY_FIELD))
        })
        .unwrap_or_default();

    let page = Page::new(title, body);
    state.store.save(&page).await?;
    logger::log_info(&format!(
        "Saved page '{}' ({} bytes)",
        page.title,
        page.body.len()
    ));

    Ok(http::build_redirect_response(&Operation::View.url(&page.title)))
}

fn render(
    template: &Template,
    page: &Page,
    is_head: bool,
) -> Result<Response<Full<Bytes>>, WikiError> {
    let body = String::from_utf8_lossy(&page.body);
    let values = HashMap::from([("title", page.title.as_str()), ("body", body.as_ref())]);
    let html = template.render(&values)?;
    Ok(http::build_html_response(html, is_head))
}

type CollectFuture = Pin<Box<dyn Future<Output = Result<Collected<Bytes>, BoxError>> + Send>>;

/// Collect the request body, refusing anything over `limit` bytes
async fn read_form(body: RequestBody, limit: u64) -> Result<Bytes, WikiError> {
    let max = usize::try_from(limit).unwrap_or(usize::MAX);
    // Boxed with a named error type so the handler future stays `Send`
    let collect: CollectFuture = Box::pin(Limited::new(body, max).collect());
    match collect.await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!("Request body too large (max: {limit} bytes)"));
            Err(WikiError::BodyTooLarge { limit })
        }
        Err(e) => Err(WikiError::BodyRead(e.to_string())),
    }
}
