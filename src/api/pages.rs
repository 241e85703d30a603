//! Server-rendered reading pages
//!
//! - GET / - Front page: latest story as the lead, the rest below it
//! - GET /article/{slug} - One published story
//! - GET /category/{slug} - A section and its published stories
//!
//! A failed list fetch is logged and rendered as an empty list; unknown or
//! unpublished items get the 404 page.

use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::Html,
    routing::get,
    Router,
};
use tera::Context as TeraContext;

use crate::api::middleware::AppState;
use crate::api::site::load_public_site;
use crate::models::Article;
use crate::services::MarkdownRenderer;
use crate::theme::{NavCategory, StandardTemplateVars};

/// Teaser length for stories without a hand-written excerpt
const EXCERPT_CHARS: usize = 200;

type Page = (StatusCode, Html<String>);

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/article/{slug}", get(article_page))
        .route("/category/{slug}", get(category_page))
}

/// GET /
async fn home(State(state): State<AppState>) -> Page {
    let vars = page_vars(&state, "/").await;

    let mut articles = match state.article_service.list_published().await {
        Ok(articles) => articles,
        Err(e) => {
            tracing::error!("Failed to load front page articles: {}", e);
            Vec::new()
        }
    };
    articles.iter_mut().for_each(|a| fill_excerpt(a, &state.markdown));

    let mut articles = articles.into_iter();
    let lead = articles.next();
    let recent: Vec<Article> = articles.collect();

    let mut context = TeraContext::new();
    context.insert("lead", &lead);
    context.insert("recent", &recent);
    render(&state, StatusCode::OK, "index.html", &context, &vars)
}

/// GET /article/{slug}
async fn article_page(State(state): State<AppState>, Path(slug): Path<String>) -> Page {
    let vars = page_vars(&state, &format!("/article/{}", slug)).await;

    let article = match state.article_service.get_published_by_slug(&slug).await {
        Ok(Some(article)) => article,
        Ok(None) => return not_found(&state, &vars, "We couldn't find that story."),
        Err(e) => {
            tracing::error!("Failed to load article {}: {}", slug, e);
            return not_found(&state, &vars, "We couldn't find that story.");
        }
    };

    let mut context = TeraContext::new();
    context.insert("content_html", &state.markdown.render(&article.content));
    context.insert("article", &article);
    render(&state, StatusCode::OK, "article.html", &context, &vars)
}

/// GET /category/{slug}
async fn category_page(State(state): State<AppState>, Path(slug): Path<String>) -> Page {
    let vars = page_vars(&state, &format!("/category/{}", slug)).await;

    let category = match state.category_service.get_by_slug(&slug).await {
        Ok(Some(category)) => category,
        Ok(None) => return not_found(&state, &vars, "That section doesn't exist."),
        Err(e) => {
            tracing::error!("Failed to load category {}: {}", slug, e);
            return not_found(&state, &vars, "That section doesn't exist.");
        }
    };

    let mut articles = match state.article_service.list_published_by_category(category.id).await {
        Ok(articles) => articles,
        Err(e) => {
            tracing::error!("Failed to load articles for category {}: {}", slug, e);
            Vec::new()
        }
    };
    articles.iter_mut().for_each(|a| fill_excerpt(a, &state.markdown));

    let mut context = TeraContext::new();
    context.insert("category", &category);
    context.insert("articles", &articles);
    render(&state, StatusCode::OK, "category.html", &context, &vars)
}

/// Fallback for any path no route claims
pub async fn not_found_page(State(state): State<AppState>, uri: Uri) -> Page {
    let vars = page_vars(&state, uri.path()).await;
    not_found(&state, &vars, "The page you were looking for doesn't exist.")
}

async fn page_vars(state: &AppState, path: &str) -> StandardTemplateVars {
    let site = load_public_site(state).await;
    let categories = match state.category_service.list().await {
        Ok(categories) => categories
            .into_iter()
            .map(|c| NavCategory { name: c.name, slug: c.slug })
            .collect(),
        Err(e) => {
            tracing::warn!("Failed to load navigation categories: {}", e);
            Vec::new()
        }
    };
    StandardTemplateVars::new(site, path).with_categories(categories)
}

fn fill_excerpt(article: &mut Article, markdown: &MarkdownRenderer) {
    if article.excerpt.is_none() {
        let teaser = markdown.plain_excerpt(&article.content, EXCERPT_CHARS);
        if !teaser.is_empty() {
            article.excerpt = Some(teaser);
        }
    }
}

fn not_found(state: &AppState, vars: &StandardTemplateVars, message: &str) -> Page {
    let mut context = TeraContext::new();
    context.insert("message", message);
    render(state, StatusCode::NOT_FOUND, "not_found.html", &context, vars)
}

fn render(
    state: &AppState,
    status: StatusCode,
    template: &str,
    context: &TeraContext,
    vars: &StandardTemplateVars,
) -> Page {
    (status, Html(state.theme_engine.render_with_fallback(template, context, vars)))
}
