use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::state::AppState;
use crate::{auth, recipes};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(auth::router())
        .merge(recipes::router())
        .route("/health", get(|| async { "ok" }))
        .fallback(not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, ?latency, "response");
                        } else {
                            tracing::info!(%status, ?latency, "response");
                        }
                    },
                ),
        )
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub async fn serve(app: Router, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_support::TestClient;

    #[tokio::test]
    async fn health_is_public() {
        let mut client = TestClient::new();
        let res = client.get("/health").await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body, json!("ok"));
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let mut client = TestClient::new();
        let res = client.get("/nope").await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(res.body, json!({ "error": "Not Found" }));
    }
}
