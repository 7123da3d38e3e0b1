use axum::response::Html;

static CHAT_HTML: &str = include_str!("../web/chat.html");

pub async fn chat_page() -> Html<&'static str> {
    Html(CHAT_HTML)
}
