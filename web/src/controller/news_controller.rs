use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};

use crate::controller::NewsBody;
use crate::params::news::{CreateParams, IntentParams};
use crate::{AppState, PageError};
use domain::{news as NewsApi, news_records::Model, Id};
use log::*;

/// Where the browser is sent after a successful form post.
const NEWS_LIST_PATH: &str = "/news";

/// GET all news articles, newest first
#[utoipa::path(
    get,
    path = "/news",
    responses(
        (status = 200, description = "Successfully retrieved all news articles as `{news: [...]}`", body = [Model]),
    )
)]
pub async fn index(State(app_state): State<AppState>) -> impl IntoResponse {
    debug!("GET all News articles");

    let news = NewsApi::find_all(app_state.news_store_ref());

    debug!("Found {} News articles", news.len());

    Json(NewsBody { news })
}

/// GET a particular news article by its id. Viewing an article marks it as read.
#[utoipa::path(
    get,
    path = "/news/{id}",
    params(
        ("id" = String, Path, description = "News article id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the article as `{news: {...}}`", body = Model),
        (status = 404, description = "News article not found", body = String),
    )
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, PageError> {
    debug!("GET News article by id: {id}");

    let news = NewsApi::read(app_state.news_store_ref(), &id)?;

    Ok(Json(NewsBody { news }))
}

/// POST a form intent against a news article. `toggle-read` flips its read state.
#[utoipa::path(
    post,
    path = "/news/{id}",
    params(
        ("id" = String, Path, description = "News article id to act on")
    ),
    request_body(content = IntentParams, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Read state toggled, redirecting to the news list"),
        (status = 200, description = "Unknown intent, nothing changed: `{news: null}`"),
        (status = 404, description = "News article not found", body = String),
    )
)]
pub async fn update_intent(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Form(params): Form<IntentParams>,
) -> Result<Response, PageError> {
    debug!("POST intent {:?} for News article {id}", params.intent);

    if !params.is_toggle_read() {
        return Ok(Json(NewsBody::<Option<Model>> { news: None }).into_response());
    }

    let news = NewsApi::toggle_read(app_state.news_store_ref(), &id)?;
    info!("Toggled read state of News article {id} to {}", news.is_read);

    Ok(Redirect::to(NEWS_LIST_PATH).into_response())
}

/// POST create a new news article from the submission form
#[utoipa::path(
    post,
    path = "/news/new",
    request_body(content = CreateParams, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Article created, redirecting to the news list"),
        (status = 400, description = "One or more required fields are missing: `{errors: {field: message}}`"),
        (status = 500, description = "The article could not be created: `{errors: {general: ...}}`"),
    )
)]
pub async fn create(
    State(app_state): State<AppState>,
    Form(params): Form<CreateParams>,
) -> Result<impl IntoResponse, PageError> {
    debug!("POST Create a New News article from: {params:?}");

    let news = NewsApi::create(
        app_state.news_store_ref(),
        &app_state.event_publisher,
        params.into(),
    )
    .await?;

    info!("Created News article {} ({})", news.id, news.title);

    Ok(Redirect::to(NEWS_LIST_PATH))
}
