//! HTTP request/response tracing middleware.

use axum::extract::{ConnectInfo, MatchedPath};
use axum::http::Request;
use std::net::SocketAddr;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span, field};

use crate::utils::client_key::client_key_from_parts;

/// Builds the per-request span.
///
/// Records the method, the path without its query string, the matched route
/// template (absent for fallbacks) and the rate-limit client key, so the
/// shorten and redirect logs of one client can be correlated.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        let span = tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
            route = field::Empty,
            client = %client_key_from_parts(request.headers(), peer),
        );

        if let Some(route) = request.extensions().get::<MatchedPath>() {
            span.record("route", route.as_str());
        }

        span
    }
}

/// Creates a tracing middleware for HTTP requests.
///
/// ```text
/// INFO request{method=GET path=/21 route=/{code} client=203.0.113.7}: finished processing request latency=3 ms status=302
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan> {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}
