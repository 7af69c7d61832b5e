use crate::controller::{api_news_controller, health_check_controller, news_controller};
use crate::sse::handler::sse_handler;
use crate::{params, AppState};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use log::*;
use service::config::Config;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// How long browsers may cache a preflight response.
const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(86_400);

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "News Platform API"
        ),
        paths(
            news_controller::index,
            news_controller::read,
            news_controller::update_intent,
            news_controller::create,
            api_news_controller::index,
            api_news_controller::method_not_allowed,
            api_news_controller::update_read_state,
            api_news_controller::unread_count,
            api_news_controller::update,
            api_news_controller::delete,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                domain::news_records::Model,
                domain::news_records::NewsUpdate,
                params::news::CreateParams,
                params::news::IntentParams,
                params::news::ReadStateParams,
            )
        ),
        tags(
            (name = "news_platform", description = "News publishing API with live updates")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(news_routes(app_state.clone()))
        .merge(api_news_routes(app_state.clone()))
        .merge(sse_routes(app_state))
        .merge(health_routes())
        .merge(RapiDoc::with_openapi("/api-docs/openapi2.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn news_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/news", get(news_controller::index))
        .route("/news/new", post(news_controller::create))
        .route(
            "/news/{id}",
            get(news_controller::read).post(news_controller::update_intent),
        )
        .with_state(app_state)
}

fn api_news_routes(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state.config);

    Router::new()
        .route(
            "/api/news",
            get(api_news_controller::index)
                .post(api_news_controller::method_not_allowed)
                .options(api_news_controller::preflight),
        )
        .route(
            "/api/news/read",
            post(api_news_controller::update_read_state).options(api_news_controller::preflight),
        )
        .route(
            "/api/unreadNewsCount",
            get(api_news_controller::unread_count).options(api_news_controller::preflight),
        )
        .route(
            "/api/news/{id}",
            put(api_news_controller::update)
                .delete(api_news_controller::delete)
                .options(api_news_controller::preflight),
        )
        .layer(cors)
        .with_state(app_state)
}

fn sse_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/sse", get(sse_handler))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

/// CORS policy for the `/api` routes. `*` in the configured origins allows
/// any origin; otherwise only the listed origins are echoed back.
fn cors_layer(config: &Config) -> CorsLayer {
    let allow_origin = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.trim().parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Ignoring invalid CORS origin {origin:?}: {e}");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
        .max_age(PREFLIGHT_MAX_AGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use domain::news_records::NewNews;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const FORM: &str = "application/x-www-form-urlencoded";

    async fn send(app_state: &AppState, request: Request<Body>) -> Response {
        define_routes(app_state.clone())
            .oneshot(request)
            .await
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn form_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, FORM)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn create(app_state: &AppState, title: &str) -> domain::news_records::Model {
        app_state.news_store_ref().create(NewNews {
            title: title.to_string(),
            content: "content".to_string(),
            author: "author".to_string(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn news_index_lists_newest_first() {
        let app_state = test_support::app_state(&[]);
        create(&app_state, "Older");
        create(&app_state, "Newer");

        let response = send(&app_state, get_request("/news")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["news"][0]["title"], "Newer");
        assert_eq!(body["news"][1]["title"], "Older");
    }

    #[tokio::test]
    async fn reading_an_article_marks_it_read() {
        let app_state = test_support::app_state(&[]);
        let news = create(&app_state, "A");

        let response = send(&app_state, get_request(&format!("/news/{}", news.id))).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["news"]["isRead"], true);
        assert!(app_state.news_store_ref().get(&news.id).unwrap().is_read);
    }

    #[tokio::test]
    async fn reading_an_unknown_article_is_a_plain_404() {
        let app_state = test_support::app_state(&[]);

        let response = send(&app_state, get_request("/news/42")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "News article not found");
    }

    #[tokio::test]
    async fn toggle_read_intent_redirects_to_the_list() {
        let app_state = test_support::app_state(&[]);
        let news = create(&app_state, "A");

        let response = send(
            &app_state,
            form_request(&format!("/news/{}", news.id), "intent=toggle-read"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/news");
        assert!(app_state.news_store_ref().get(&news.id).unwrap().is_read);
    }

    #[tokio::test]
    async fn toggle_read_intent_on_unknown_article_is_404() {
        let app_state = test_support::app_state(&[]);

        let response = send(&app_state, form_request("/news/9", "intent=toggle-read")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_intent_changes_nothing() {
        let app_state = test_support::app_state(&[]);
        let news = create(&app_state, "A");

        let response = send(
            &app_state,
            form_request(&format!("/news/{}", news.id), "intent=archive"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"news": null}));
        assert!(!app_state.news_store_ref().get(&news.id).unwrap().is_read);
    }

    #[tokio::test]
    async fn create_form_stores_the_article_and_redirects() {
        let app_state = test_support::app_state(&[]);

        let response = send(
            &app_state,
            form_request(
                "/news/new",
                "title=Hello&content=World&author=Ann&category=&featured=on",
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/news");

        let news = app_state.news_store_ref().list();
        assert_eq!(news.len(), 1);
        assert_eq!(news[0].id, "1");
        assert_eq!(news[0].title, "Hello");
        assert_eq!(news[0].category, None);
        assert!(news[0].featured);
        assert!(!news[0].is_read);
    }

    #[tokio::test]
    async fn create_form_reports_every_missing_field() {
        let app_state = test_support::app_state(&[]);

        let response = send(&app_state, form_request("/news/new", "title=%20%20&content=x")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"errors": {"title": "Title is required", "author": "Author is required"}})
        );
        assert!(app_state.news_store_ref().list().is_empty());
    }

    #[tokio::test]
    async fn api_index_wraps_the_list() {
        let app_state = test_support::app_state(&[]);
        create(&app_state, "A");

        let response = send(&app_state, get_request("/api/news")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["news"][0]["title"], "A");
    }

    #[tokio::test]
    async fn api_news_rejects_post() {
        let app_state = test_support::app_state(&[]);

        let response = send(&app_state, form_request("/api/news", "title=A")).await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Method not allowed"})
        );
    }

    #[tokio::test]
    async fn api_preflight_is_empty_with_cors_headers() {
        let app_state = test_support::app_state(&[]);
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/news/read")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = send(&app_state, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers().clone();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "86400");
        let allow_methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .to_string();
        for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
            assert!(allow_methods.contains(method), "{method} missing");
        }
        let allow_headers = headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .to_lowercase();
        assert!(allow_headers.contains("x-requested-with"));
        assert!(body_text(response).await.is_empty());
    }

    #[tokio::test]
    async fn configured_origins_are_echoed_back() {
        let app_state = test_support::app_state(&["--allowed-origins", "http://localhost:3000"]);
        let request = Request::builder()
            .uri("/api/unreadNewsCount")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();

        let response = send(&app_state, request).await;

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn read_state_marks_and_toggles() {
        let app_state = test_support::app_state(&[]);
        let news = create(&app_state, "A");

        let marked = send(
            &app_state,
            form_request(
                "/api/news/read",
                &format!("newsId={}&action=mark-read", news.id),
            ),
        )
        .await;
        assert_eq!(marked.status(), StatusCode::OK);
        let body = body_json(marked).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["news"]["isRead"], true);

        let toggled = send(
            &app_state,
            form_request(
                "/api/news/read",
                &format!("newsId={}&action=toggle-read", news.id),
            ),
        )
        .await;
        assert_eq!(body_json(toggled).await["news"]["isRead"], false);
    }

    #[tokio::test]
    async fn read_state_validates_its_input() {
        let app_state = test_support::app_state(&[]);
        create(&app_state, "A");

        let cases = [
            ("action=mark-read", StatusCode::BAD_REQUEST, "News ID is required"),
            ("newsId=&action=mark-read", StatusCode::BAD_REQUEST, "News ID is required"),
            ("newsId=1&action=archive", StatusCode::BAD_REQUEST, "Invalid action"),
            ("newsId=1", StatusCode::BAD_REQUEST, "Invalid action"),
            ("newsId=99&action=mark-read", StatusCode::NOT_FOUND, "News article not found"),
        ];

        for (form, status, message) in cases {
            let response = send(&app_state, form_request("/api/news/read", form)).await;

            assert_eq!(response.status(), status, "{form}");
            assert_eq!(
                body_json(response).await,
                json!({"success": false, "error": message}),
                "{form}"
            );
        }
    }

    #[tokio::test]
    async fn unread_count_follows_read_state() {
        let app_state = test_support::app_state(&[]);
        let first = create(&app_state, "A");
        create(&app_state, "B");
        app_state.news_store_ref().mark_read(&first.id);

        let response = send(&app_state, get_request("/api/unreadNewsCount")).await;

        assert_eq!(
            body_json(response).await,
            json!({"success": true, "count": 1})
        );
    }

    #[tokio::test]
    async fn put_updates_only_the_supplied_fields() {
        let app_state = test_support::app_state(&[]);
        let news = create(&app_state, "A");
        let request = Request::builder()
            .method(Method::PUT)
            .uri(format!("/api/news/{}", news.id))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"title": "B", "featured": true}).to_string(),
            ))
            .unwrap();

        let response = send(&app_state, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["news"]["title"], "B");
        assert_eq!(body["news"]["content"], "content");
        assert_eq!(body["news"]["featured"], true);
        assert_eq!(
            app_state.news_store_ref().get(&news.id).unwrap().published_at,
            news.published_at
        );
    }

    #[tokio::test]
    async fn delete_removes_the_article_and_ids_are_not_reused() {
        let app_state = test_support::app_state(&[]);
        create(&app_state, "A");
        let second = create(&app_state, "B");
        let request = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/api/news/{}", second.id))
            .body(Body::empty())
            .unwrap();

        let response = send(&app_state, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"success": true, "id": "2"})
        );
        assert_eq!(create(&app_state, "C").id, "3");

        let missing = Request::builder()
            .method(Method::DELETE)
            .uri("/api/news/2")
            .body(Body::empty())
            .unwrap();
        let response = send(&app_state, missing).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_check_responds() {
        let app_state = test_support::app_state(&[]);

        let response = send(&app_state, get_request("/health")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "healthy");
    }

    #[test]
    fn openapi_document_lists_the_news_paths() {
        let openapi = ApiDoc::openapi();

        for path in [
            "/news",
            "/news/{id}",
            "/news/new",
            "/api/news",
            "/api/news/read",
            "/api/unreadNewsCount",
            "/api/news/{id}",
        ] {
            assert!(openapi.paths.paths.contains_key(path), "{path} missing");
        }
    }
}
