//! HTTP front end for a directory session.
//!
//! `GET /` renders the directory (HTML, or the `ViewSnapshot` as JSON when the
//! client accepts `application/json`), optionally switching category first via
//! `?category=`.  Hover transitions are `POST`/`DELETE` on `/hover/:id` and
//! activation is `GET /open/:id`, answered with a redirect to the resource.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query},
    http::{header, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use axum_macros::debug_handler;
use liquid::Template;
use serde_json::Value;
use tracing::{info, Instrument};

use crate::{
    error::Result,
    logging::LoggedSpan,
    session::SessionHandle,
    templating::{
        builder::build_and_parse_directory_page,
        page::{render_page, PageInfo},
    },
    view::{InteractionSummary, ViewSnapshot},
};

pub struct PageTemplates {
    pub directory: Template,
    pub page: PageInfo,
}

impl PageTemplates {
    pub fn new(page: PageInfo) -> Result<PageTemplates> {
        Ok(PageTemplates {
            directory: build_and_parse_directory_page()?,
            page,
        })
    }
}

async fn select_and_snapshot(
    session: &SessionHandle,
    category: Option<&String>,
) -> Result<ViewSnapshot> {
    if let Some(category) = category {
        session.select_category(category).await?;
    }
    session.snapshot().await
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|accept| accept.to_str().ok())
        .map_or(false, |accept| accept.contains("application/json"))
}

#[debug_handler]
async fn handle_directory(
    Extension(session): Extension<SessionHandle>,
    Extension(templates): Extension<Arc<PageTemplates>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response> {
    let logged_span = params
        .contains_key("debug")
        .then(|| LoggedSpan::new_logged_span("directory"));

    let work = select_and_snapshot(&session, params.get("category"));
    let snapshot = match &logged_span {
        Some(lspan) => work.instrument(lspan.span()).await?,
        None => work.await?,
    };

    let logs = match logged_span {
        Some(lspan) => lspan.retrieve_serde_json().await,
        None => Value::Null,
    };

    let mut header_map = HeaderMap::new();
    header_map.insert(header::VARY, HeaderValue::from_static("Accept"));

    if wants_json(&headers) {
        Ok((header_map, Json(snapshot)).into_response())
    } else {
        let output = render_page(&templates.directory, &templates.page, &snapshot, logs)?;
        Ok((header_map, Html(output)).into_response())
    }
}

#[debug_handler]
async fn handle_hover_enter(
    Extension(session): Extension<SessionHandle>,
    Path(id): Path<u32>,
) -> Result<Json<InteractionSummary>> {
    Ok(Json(session.hover_enter(id).await?))
}

#[debug_handler]
async fn handle_hover_leave(
    Extension(session): Extension<SessionHandle>,
    Path(id): Path<u32>,
) -> Result<Json<InteractionSummary>> {
    Ok(Json(session.hover_leave(id).await?))
}

#[debug_handler]
async fn handle_open(
    Extension(session): Extension<SessionHandle>,
    Path(id): Path<u32>,
) -> Result<Redirect> {
    let activation = session.activate(id).await?;
    info!(id, url = %activation.url, "redirecting");
    Ok(Redirect::to(&activation.url))
}

pub fn make_router(session: SessionHandle, templates: Arc<PageTemplates>) -> Router {
    Router::new()
        .route("/", get(handle_directory))
        .route("/hover/:id", post(handle_hover_enter).delete(handle_hover_leave))
        .route("/open/:id", get(handle_open))
        .layer(Extension(session))
        .layer(Extension(templates))
}
