use axum::{
    extract::{Host, State},
    http::{header, Uri},
    response::{Html, IntoResponse},
};
use std::time::Instant;
use tracing::debug;

use super::renderer::Page;
use super::routes::PagesState;
use super::types::PageError;

pub async fn home(State(state): State<PagesState>, Host(host): Host) -> Html<String> {
    render_page(&state, Page::Home, &host)
}

pub async fn about(State(state): State<PagesState>, Host(host): Host) -> Html<String> {
    render_page(&state, Page::About, &host)
}

pub async fn contact(State(state): State<PagesState>, Host(host): Host) -> Html<String> {
    render_page(&state, Page::Contact, &host)
}

fn render_page(state: &PagesState, page: Page, host: &str) -> Html<String> {
    let started = Instant::now();
    let body = state.renderer.render(page, host);
    state.metrics.record_page_rendered();
    state.metrics.record_render_time(started.elapsed());
    Html(body)
}

pub async fn stylesheet() -> impl IntoResponse {
    let css = include_str!("templates/style.css");
    ([(header::CONTENT_TYPE, "text/css")], css)
}

pub async fn not_found(State(state): State<PagesState>, uri: Uri) -> PageError {
    debug!("no route for {}", uri.path());
    state.metrics.record_not_found();
    PageError::NotFound
}
