//! Execution wrapper: the composition root every route handler runs inside.
//!
//! Times the call, emits structured start/finish/failure logs, routes any
//! raised error through the classifier and envelope builder, and stamps
//! the correlation id on every outgoing response. The wrapper never
//! re-raises; it always yields a well-formed response.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{HeaderValue, Request};
use axum::response::Response;

use crate::classify::ErrorClassifier;
use crate::config::PipelineConfig;
use crate::context::RequestContext;
use crate::response::error_response;

/// Response header carrying the correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const COMPONENT: &str = "API";

/// Wraps route handlers with tracing, error classification, and the
/// response envelope contract.
#[derive(Debug, Clone)]
pub struct RequestPipeline {
    classifier: ErrorClassifier,
}

impl RequestPipeline {
    pub fn new(classifier: ErrorClassifier) -> Self {
        Self { classifier }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(ErrorClassifier::new(config.environment))
    }

    /// Run one handler invocation inside the pipeline.
    ///
    /// Emits exactly one "Incoming request" log and exactly one of
    /// "Request completed" / "Request failed"; the `X-Request-ID` header
    /// is set on both paths, always to the id generated here.
    pub async fn run<F, Fut>(&self, request: Request<Body>, handler: F) -> Response
    where
        F: FnOnce(Request<Body>, RequestContext) -> Fut,
        Fut: Future<Output = Result<Response, anyhow::Error>>,
    {
        let context = RequestContext::from_request(&request, None);
        let request_id = context.request_id.clone();
        let method = context.method.clone();
        let path = context.path.clone();
        let start = Instant::now();

        tracing::info!(
            component = COMPONENT,
            method = %method,
            path = %path,
            request_id = %request_id,
            "Incoming request"
        );

        match handler(request, context).await {
            Ok(mut response) => {
                tracing::info!(
                    component = COMPONENT,
                    method = %method,
                    path = %path,
                    request_id = %request_id,
                    status = response.status().as_u16(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Request completed"
                );

                set_request_id(&mut response, &request_id);
                response
            }
            Err(error) => {
                tracing::error!(
                    component = COMPONENT,
                    method = %method,
                    path = %path,
                    request_id = %request_id,
                    error = ?error,
                    "Request failed"
                );

                let classified = self.classifier.classify(&error);
                let mut response =
                    error_response(classified.to_string(), classified.status_code());

                set_request_id(&mut response, &request_id);
                response
            }
        }
    }

    /// Adapt a handler into an infallible closure mountable directly on an
    /// axum router, e.g. `routing::any(pipeline.clone().wrap(handler))`.
    pub fn wrap<F, Fut>(
        self: Arc<Self>,
        handler: F,
    ) -> impl Fn(Request<Body>) -> Pin<Box<dyn Future<Output = Response> + Send>> + Clone
    where
        F: Fn(Request<Body>, RequestContext) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, anyhow::Error>> + Send + 'static,
    {
        move |request| {
            let pipeline = Arc::clone(&self);
            let handler = handler.clone();
            Box::pin(async move { pipeline.run(request, handler).await })
        }
    }
}

fn set_request_id(response: &mut Response, request_id: &str) {
    if let Ok(value) = HeaderValue::from_str(request_id) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER, value);
    }
}
