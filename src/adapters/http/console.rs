use axum::response::Html;

const CONSOLE_PAGE: &str = include_str!("console.html");

/// Built-in console, served when no front-end build is deployed.
pub async fn console() -> Html<&'static str> {
    Html(CONSOLE_PAGE)
}
