use serde::Serialize;
pub(crate) mod api_news_controller;
pub(crate) mod health_check_controller;
pub(crate) mod news_controller;

/// Envelope of every successful `/api` response: `{"success": true, ...}`
/// with the payload's fields inlined next to `success`.
#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    success: bool,
    #[serde(flatten)]
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{"news": ...}` payload shared by the page and API handlers.
#[derive(Debug, Serialize)]
struct NewsBody<T: Serialize> {
    news: T,
}
