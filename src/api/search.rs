//! GET /search - name lookup endpoint / 姓名查询接口
//!
//! Composes the request-scoped pipeline: raw text → script conversion →
//! expression build → ranked retrieval. Every internal failure is mapped
//! to a generic response here; store details only ever reach the log.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::HeroHit;
use crate::search::{SearchError, SearchExpression};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// The raw query as received / 原始查询词
    pub query: String,
    /// The expression text actually sent to the store / 实际检索的表达式
    pub search_query_used: String,
    pub count: usize,
    pub results: Vec<HeroHit>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let raw = params.q.unwrap_or_default();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Missing search query \"q\"");
    }

    // 1. Normalize to simplified script / 统一转为简体
    let normalized = state.conversion.convert(trimmed);

    // 2. Build the AND expression / 构造与查询
    let expr = match SearchExpression::build(&normalized) {
        Ok(expr) => expr,
        Err(_) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Search query \"q\" has no searchable terms",
            );
        }
    };

    tracing::debug!(query = %trimmed, expression = %expr.to_match_string(), "searching registry");

    // 3. Ranked retrieval / 排序检索
    match state.store.search(&expr).await {
        Ok(results) => {
            let body = SearchResponse {
                query: raw.clone(),
                search_query_used: expr.to_match_string(),
                count: results.len(),
                results,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e @ SearchError::QueryRejected(_)) => {
            // Should be unreachable while expression escaping is correct
            tracing::error!(query = %trimmed, error = %e, "store rejected built expression");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Database query failed")
        }
        Err(e) => {
            tracing::error!(query = %trimmed, error = %e, "registry store unavailable");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Database query failed")
        }
    }
}
