use domain::news_records::NewNews;
use serde::Deserialize;
use utoipa::ToSchema;

/// Value a checked HTML checkbox submits.
const CHECKBOX_ON: &str = "on";

/// Form body of `POST /news/new`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub(crate) struct CreateParams {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) author: Option<String>,
    /// Left out of the article when empty.
    pub(crate) category: Option<String>,
    /// `on` when the checkbox was ticked; anything else means not featured.
    pub(crate) featured: Option<String>,
}

impl From<CreateParams> for NewNews {
    fn from(params: CreateParams) -> Self {
        NewNews {
            title: params.title.unwrap_or_default(),
            content: params.content.unwrap_or_default(),
            author: params.author.unwrap_or_default(),
            category: params.category.filter(|category| !category.is_empty()),
            featured: params.featured.as_deref() == Some(CHECKBOX_ON),
        }
    }
}

/// Form body of `POST /news/{id}`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub(crate) struct IntentParams {
    /// Only `toggle-read` changes anything.
    pub(crate) intent: Option<String>,
}

impl IntentParams {
    pub(crate) fn is_toggle_read(&self) -> bool {
        self.intent.as_deref() == Some("toggle-read")
    }
}

/// Form body of `POST /api/news/read`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub(crate) struct ReadStateParams {
    #[serde(rename = "newsId")]
    pub(crate) news_id: Option<String>,
    /// `mark-read` or `toggle-read`.
    pub(crate) action: Option<String>,
}
