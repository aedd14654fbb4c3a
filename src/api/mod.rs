//! HTTP adapter exposing `GET /fetch_papers/`.
//!
//! The handler translates one request into one
//! [`PaperFetcher::fetch_and_filter`] call and encodes the result:
//!
//! | Condition | Response |
//! |---|---|
//! | `query` missing or blank | 400 `{"detail": "Query parameter is required."}` |
//! | search endpoint failed | 502 `{"detail": "<error>"}` |
//! | no papers kept | 404 `{"detail": "No papers found."}` |
//! | `is_export=true` | 200 `text/csv` attachment `papers.csv` |
//! | otherwise | 200 `{"papers": [...]}` |

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::output;
use crate::pipeline::PaperFetcher;

/// Query string of `GET /fetch_papers/`
#[derive(Debug, Default, Deserialize)]
pub struct FetchPapersParams {
    pub query: Option<String>,
    pub is_export: Option<String>,
}

impl FetchPapersParams {
    fn wants_csv(&self) -> bool {
        self.is_export
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }
}

/// Build the router serving the endpoint.
pub fn create_router(fetcher: PaperFetcher) -> Router {
    Router::new()
        .route("/fetch_papers/", get(fetch_papers))
        .route("/fetch_papers", get(fetch_papers))
        .with_state(Arc::new(fetcher))
}

/// Serve the endpoint on `addr` until Ctrl-C.
pub async fn serve(fetcher: PaperFetcher, addr: SocketAddr) -> anyhow::Result<()> {
    let router = create_router(fetcher);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Received shutdown signal");
}

fn detail(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "detail": message.into() }))).into_response()
}

async fn fetch_papers(
    State(fetcher): State<Arc<PaperFetcher>>,
    Query(params): Query<FetchPapersParams>,
) -> Response {
    let Some(query) = params.query.as_deref().filter(|q| !q.trim().is_empty()) else {
        return detail(StatusCode::BAD_REQUEST, "Query parameter is required.");
    };

    tracing::info!("Fetching papers for query: {}", query);
    let papers = match fetcher.fetch_and_filter(query).await {
        Ok(papers) => papers,
        Err(e) => {
            tracing::error!("Fetch for {:?} failed: {}", query, e);
            return detail(StatusCode::BAD_GATEWAY, e.to_string());
        }
    };

    if papers.is_empty() {
        return detail(StatusCode::NOT_FOUND, "No papers found.");
    }

    if params.wants_csv() {
        return match output::csv::to_csv_string(&papers) {
            Ok(body) => (
                [
                    (header::CONTENT_TYPE, "text/csv"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"papers.csv\"",
                    ),
                ],
                body,
            )
                .into_response(),
            Err(e) => detail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };
    }

    match output::json::to_json_value(&papers) {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => detail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
