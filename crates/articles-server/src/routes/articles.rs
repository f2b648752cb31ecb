//! Article routes: create, list, get, update, remove.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};
use articles_core::{
    Article, ArticleFilter, ArticleId, ArticlePatch, DEFAULT_LIMIT, DEFAULT_PAGE, NewArticle,
    UserId,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::extract::AuthenticatedUser;
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for GET /articles.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListArticlesQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub author: Option<i64>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    #[serde(alias = "publishedAfter")]
    pub published_at: Option<String>,
}

impl ListArticlesQuery {
    pub fn into_filter(self) -> ApiResult<ArticleFilter> {
        let mut filter = ArticleFilter::page(
            self.page.unwrap_or(DEFAULT_PAGE),
            self.limit.unwrap_or(DEFAULT_LIMIT),
        );
        if let Some(author) = self.author {
            filter = filter.with_author(UserId(author));
        }
        if let Some(raw) = self.published_at.as_deref() {
            filter = filter.with_published_after(parse_published(raw)?);
        }
        filter.validate()?;
        Ok(filter)
    }
}

fn parse_published(raw: &str) -> ApiResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| {
            ApiError::BadRequest(format!(
                "publishedAt must be an RFC 3339 timestamp or YYYY-MM-DD date, got {:?}",
                raw
            ))
        })
}

fn require_text(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{} should not be empty", field)));
    }
    Ok(())
}

fn validate_new(input: &NewArticle) -> ApiResult<()> {
    require_text("title", &input.title)?;
    require_text("description", &input.description)
}

fn validate_patch(patch: &ArticlePatch) -> ApiResult<()> {
    if let Some(title) = &patch.title {
        require_text("title", title)?;
    }
    if let Some(description) = &patch.description {
        require_text("description", description)?;
    }
    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /articles
async fn create_article(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: Result<Json<NewArticle>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Article>)> {
    let Json(input) = body?;
    validate_new(&input)?;

    let article = state.articles().create(input, &user.identity()).await?;
    Ok((StatusCode::CREATED, Json(article)))
}

/// GET /articles
async fn list_articles(
    State(state): State<AppState>,
    query: Result<Query<ListArticlesQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Article>>> {
    let Query(query) = query?;
    let filter = query.into_filter()?;

    Ok(Json(state.articles().list(&filter).await?))
}

/// GET /articles/{id}
async fn get_article(
    State(state): State<AppState>,
    id: Result<Path<ArticleId>, PathRejection>,
) -> ApiResult<Json<Article>> {
    let Path(id) = id?;
    Ok(Json(state.articles().get(id).await?))
}

/// PATCH /articles/{id}
async fn update_article(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    id: Result<Path<ArticleId>, PathRejection>,
    body: Result<Json<ArticlePatch>, JsonRejection>,
) -> ApiResult<Json<Article>> {
    let Path(id) = id?;
    let Json(patch) = body?;
    validate_patch(&patch)?;

    let article = state
        .articles()
        .update(id, patch, &user.identity())
        .await?;
    Ok(Json(article))
}

/// DELETE /articles/{id}
async fn delete_article(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    id: Result<Path<ArticleId>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    state.articles().remove(id, &user.identity()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Build article routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/articles", get(list_articles).post(create_article))
        .route(
            "/articles/{id}",
            get(get_article)
                .patch(update_article)
                .delete(delete_article),
        )
}
