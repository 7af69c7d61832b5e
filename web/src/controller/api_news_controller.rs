use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Form, Json};
use serde::Serialize;
use serde_json::json;

use crate::controller::{ApiResponse, NewsBody};
use crate::params::news::ReadStateParams;
use crate::{AppState, Error};
use domain::news::ReadAction;
use domain::news_records::{Model, NewsUpdate};
use domain::{news as NewsApi, Id};
use log::*;

#[derive(Debug, Serialize)]
struct CountBody {
    count: usize,
}

#[derive(Debug, Serialize)]
struct DeletedBody {
    id: Id,
}

/// GET all news articles, newest first
#[utoipa::path(
    get,
    path = "/api/news",
    responses(
        (status = 200, description = "Successfully retrieved all news articles as `{success: true, news: [...]}`", body = [Model]),
    )
)]
pub async fn index(State(app_state): State<AppState>) -> impl IntoResponse {
    debug!("GET all News articles (API)");

    let news = NewsApi::find_all(app_state.news_store_ref());

    Json(ApiResponse::new(NewsBody { news }))
}

/// Any other method on `/api/news`. Articles are created through the form at `/news/new`.
#[utoipa::path(
    post,
    path = "/api/news",
    responses(
        (status = 405, description = "Method not allowed: `{error: \"Method not allowed\"}`"),
    )
)]
pub async fn method_not_allowed() -> impl IntoResponse {
    debug!("Rejecting unsupported method on /api/news");

    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}

/// OPTIONS preflight for the API routes. The CORS layer supplies the headers.
pub async fn preflight() -> impl IntoResponse {
    StatusCode::OK
}

/// POST mark a news article as read, or toggle its read state
#[utoipa::path(
    post,
    path = "/api/news/read",
    request_body(content = ReadStateParams, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Successfully updated the read state: `{success: true, news: {...}}`", body = Model),
        (status = 400, description = "News ID is required, or the action is not `mark-read` / `toggle-read`"),
        (status = 404, description = "News article not found"),
        (status = 500, description = "Failed to update news"),
    )
)]
pub async fn update_read_state(
    State(app_state): State<AppState>,
    Form(params): Form<ReadStateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST update read state: {params:?}");

    let id = NewsApi::require_news_id(params.news_id.as_deref())?;
    let action: ReadAction = params.action.as_deref().unwrap_or_default().parse()?;

    let news = NewsApi::update_read_state(app_state.news_store_ref(), id, action)?;
    debug!("Applied {action} to News article {id}, isRead is now {}", news.is_read);

    Ok(Json(ApiResponse::new(NewsBody { news })))
}

/// GET the number of unread news articles
#[utoipa::path(
    get,
    path = "/api/unreadNewsCount",
    responses(
        (status = 200, description = "Successfully counted unread articles: `{success: true, count: n}`", body = usize),
    )
)]
pub async fn unread_count(State(app_state): State<AppState>) -> impl IntoResponse {
    debug!("GET unread News count");

    let count = NewsApi::unread_count(app_state.news_store_ref());

    Json(ApiResponse::new(CountBody { count }))
}

/// PUT update a news article. Only the supplied fields change.
#[utoipa::path(
    put,
    path = "/api/news/{id}",
    params(
        ("id" = String, Path, description = "News article id to update"),
    ),
    request_body = NewsUpdate,
    responses(
        (status = 200, description = "Successfully updated the article: `{success: true, news: {...}}`", body = Model),
        (status = 404, description = "News article not found"),
    )
)]
pub async fn update(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(news_update): Json<NewsUpdate>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT News article {id} with: {news_update:?}");

    let news = NewsApi::update(app_state.news_store_ref(), &id, news_update)?;

    Ok(Json(ApiResponse::new(NewsBody { news })))
}

/// DELETE a news article by its id
#[utoipa::path(
    delete,
    path = "/api/news/{id}",
    params(
        ("id" = String, Path, description = "News article id to delete"),
    ),
    responses(
        (status = 200, description = "Successfully deleted the article: `{success: true, id}`"),
        (status = 404, description = "News article not found"),
    )
)]
pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE News article by id: {id}");

    NewsApi::delete_by_id(app_state.news_store_ref(), &id)?;
    info!("Deleted News article {id}");

    Ok(Json(ApiResponse::new(DeletedBody { id })))
}
