use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;

use crate::api::AppState;

const INDEX_HTML: &str = include_str!("../templates/index.html");
const THEME_PLACEHOLDER: &str = "{{THEME}}";

/// Visual skin of the single-page UI. Behavior is identical across themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Classic,
    Neon,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Theme> {
        match value.to_ascii_lowercase().as_str() {
            "classic" | "light" => Some(Theme::Classic),
            "neon" | "dark" => Some(Theme::Neon),
            _ => None,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Theme::Classic => "theme-classic",
            Theme::Neon => "theme-neon",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    theme: Option<String>,
}

pub fn render_index(theme: Theme) -> String {
    INDEX_HTML.replace(THEME_PLACEHOLDER, theme.css_class())
}

pub async fn index_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    let theme = query
        .theme
        .as_deref()
        .and_then(Theme::parse)
        .unwrap_or(state.theme);
    Html(render_index(theme))
}
