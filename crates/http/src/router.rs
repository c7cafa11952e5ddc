//! Router builder for the bookshelf HTTP server.

use axum::{
    extract::Request,
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use std::time::Duration;
use tower_http::{
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

/// Methods the service answers; advertised on OPTIONS and 405 responses.
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

const METHOD_NOT_ALLOWED_BODY: &str = "Method not allowed.";

/// Builder for constructing the main HTTP router.
pub struct RouterBuilder {
    router: Router,
}

impl RouterBuilder {
    /// Create a new router builder with a plain 404 fallback. A path
    /// registered for one method does not exist for the others, so the
    /// method-not-allowed fallback answers 404 as well; 405 is reserved
    /// for the method gate.
    pub fn new() -> Self {
        Self {
            router: Router::new().fallback(not_found),
        }
    }

    /// Add a route to the router. The method-not-allowed fallback is
    /// re-applied after each registration because axum only installs it
    /// on routes that already exist when it is called.
    pub fn route(mut self, path: &str, route: axum::routing::MethodRouter) -> Self {
        self.router = self
            .router
            .route(path, route)
            .method_not_allowed_fallback(not_found);
        self
    }

    /// Merge a pre-assembled route table into the router.
    pub fn mount(mut self, routes: Router) -> Self {
        self.router = self
            .router
            .merge(routes)
            .method_not_allowed_fallback(not_found);
        self
    }

    /// Gate requests on method before route resolution: OPTIONS answers
    /// 204 with an `Allow` header, methods other than GET/POST answer
    /// 405. Matched routes never see such requests.
    pub fn with_method_gate(mut self) -> Self {
        self.router = self.router.layer(middleware::from_fn(method_gate));
        self
    }

    /// Add tracing middleware.
    pub fn with_tracing(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        );
        self
    }

    /// Add request ID middleware.
    pub fn with_request_id(mut self) -> Self {
        self.router = self
            .router
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));
        self
    }

    /// Add timeout middleware.
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.router = self
            .router
            .layer(TimeoutLayer::new(Duration::from_millis(timeout_ms)));
        self
    }

    /// Build the final router. axum stamps an `Allow` header on
    /// method-not-allowed fallback responses after route-level
    /// middleware has run, so the assembled router is wrapped in an
    /// outer router whose middleware strips the header from 404s to
    /// keep them plain; `Allow` stays exclusive to the method gate's
    /// OPTIONS and 405 answers.
    pub fn build(self) -> Router {
        Router::new()
            .fallback_service(self.router)
            .layer(middleware::map_response(strip_allow_from_not_found))
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn strip_allow_from_not_found(mut response: Response) -> Response {
    if response.status() == StatusCode::NOT_FOUND {
        response.headers_mut().remove(header::ALLOW);
    }
    response
}

async fn method_gate(request: Request, next: Next) -> Response {
    let method = request.method();
    if method == Method::GET || method == Method::POST {
        next.run(request).await
    } else if method == Method::OPTIONS {
        (
            StatusCode::NO_CONTENT,
            [(header::ALLOW, ALLOWED_METHODS)],
        )
            .into_response()
    } else {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, ALLOWED_METHODS)],
            METHOD_NOT_ALLOWED_BODY,
        )
            .into_response()
    }
}
