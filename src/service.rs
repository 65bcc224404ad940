//! HTTP allocation service
//!
//! Routes:
//! - `POST /allocate` - run one allocation (`?detail=true` adds stats and the block diagram)
//! - `GET /strategies` - strategy names and descriptions
//! - `GET /health` - liveness probe
//! - `OPTIONS *` - CORS preflight
//!
//! Routing is a plain function of method, path, query and body bytes
//! ([`AllocationService::route`]) so it can be exercised without a socket.
//! Every request runs its own allocation; the service holds only read-only
//! configuration.

use crate::config::BlockfitConfig;
use crate::core::engine::AllocationEngine;
use crate::core::report::RawAllocationRequest;
use crate::core::strategy::Strategy;
use crate::core::validation::AllocationRequest;
use crate::error::{BlockfitError, Result};
use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Body;
use hyper::header::{self, HeaderValue};
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shared, cheaply clonable request handler
#[derive(Debug, Clone)]
pub struct AllocationService {
    config: Arc<BlockfitConfig>,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug, Serialize)]
struct StrategyInfo {
    name: &'static str,
    description: &'static str,
}

impl AllocationService {
    pub fn new(config: BlockfitConfig) -> Self {
        AllocationService {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &BlockfitConfig {
        &self.config
    }

    /// hyper entry point: read the body (bounded) and route
    pub async fn handle<B>(&self, req: Request<B>) -> std::result::Result<Response<Full<Bytes>>, Infallible>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (parts, body) = req.into_parts();
        let limit = self.config.limits.max_body_bytes;

        let declared = parts
            .headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());
        if declared.is_some_and(|len| len > limit) {
            return Ok(self.body_too_large(limit));
        }

        let bytes = match Limited::new(body, limit).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
                return Ok(self.body_too_large(limit));
            }
            Err(e) => {
                warn!("Failed to read request body: {}", e);
                return Ok(self.error_response(
                    StatusCode::BAD_REQUEST,
                    "bad_body",
                    format!("failed to read request body: {}", e),
                ));
            }
        };

        Ok(self.route(&parts.method, parts.uri.path(), parts.uri.query(), &bytes))
    }

    /// Dispatch one request
    pub fn route(
        &self,
        method: &Method,
        path: &str,
        query: Option<&str>,
        body: &[u8],
    ) -> Response<Full<Bytes>> {
        debug!("{} {}", method, path);

        if *method == Method::OPTIONS {
            return self.preflight();
        }

        match (path, method) {
            ("/allocate", &Method::POST) => self.allocate(query, body),
            ("/strategies", &Method::GET) => self.strategies(),
            ("/health", &Method::GET) => {
                self.json_response(StatusCode::OK, &json!({ "status": "ok" }))
            }
            ("/allocate", _) | ("/strategies", _) | ("/health", _) => self.error_response(
                StatusCode::METHOD_NOT_ALLOWED,
                "method_not_allowed",
                format!("{} not allowed on {}", method, path),
            ),
            _ => self.error_response(
                StatusCode::NOT_FOUND,
                "not_found",
                format!("no route for {}", path),
            ),
        }
    }

    fn allocate(&self, query: Option<&str>, body: &[u8]) -> Response<Full<Bytes>> {
        match self.run_allocation(query, body) {
            Ok(response) => response,
            Err(e) if e.is_invalid_input() => {
                warn!("Rejected allocation request: {}", e);
                self.error_response(StatusCode::BAD_REQUEST, e.kind(), e.to_string())
            }
            Err(e @ BlockfitError::Serialization(_)) => {
                warn!("Malformed allocation request: {}", e);
                self.error_response(StatusCode::BAD_REQUEST, e.kind(), e.to_string())
            }
            Err(e) => {
                warn!("Allocation failed: {}", e);
                self.error_response(StatusCode::INTERNAL_SERVER_ERROR, e.kind(), e.to_string())
            }
        }
    }

    fn run_allocation(&self, query: Option<&str>, body: &[u8]) -> Result<Response<Full<Bytes>>> {
        let raw: RawAllocationRequest = serde_json::from_slice(body)?;
        self.config
            .limits
            .check(raw.block_sizes.len(), raw.process_sizes.len())?;

        let request = AllocationRequest::try_from(raw)?;
        let result = AllocationEngine::new(request.strategy).run(&request.blocks, &request.processes)?;

        info!(
            "Allocated with {}: {} blocks, {} processes, {} rejected",
            request.strategy,
            request.blocks.len(),
            request.processes.len(),
            result.rejected()
        );

        let response = if wants_detail(query) {
            self.json_response(StatusCode::OK, &result.to_detailed_response())
        } else {
            self.json_response(StatusCode::OK, &result.to_response())
        };
        Ok(response)
    }

    fn strategies(&self) -> Response<Full<Bytes>> {
        let list: Vec<StrategyInfo> = Strategy::ALL
            .iter()
            .map(|s| StrategyInfo {
                name: s.as_str(),
                description: s.description(),
            })
            .collect();
        self.json_response(StatusCode::OK, &list)
    }

    fn preflight(&self) -> Response<Full<Bytes>> {
        let mut response = self.response(StatusCode::NO_CONTENT, Bytes::new());
        let headers = response.headers_mut();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        );
        response
    }

    fn body_too_large(&self, limit: usize) -> Response<Full<Bytes>> {
        warn!("Request body exceeds {} bytes", limit);
        self.error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            "body_too_large",
            format!("request body exceeds {} bytes", limit),
        )
    }

    fn error_response(&self, status: StatusCode, kind: &str, message: String) -> Response<Full<Bytes>> {
        self.json_response(
            status,
            &ErrorBody {
                error: kind,
                message,
            },
        )
    }

    fn json_response<T: Serialize>(&self, status: StatusCode, value: &T) -> Response<Full<Bytes>> {
        match serde_json::to_vec(value) {
            Ok(body) => {
                let mut response = self.response(status, Bytes::from(body));
                response.headers_mut().insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
                response
            }
            Err(e) => {
                warn!("Failed to encode response: {}", e);
                self.response(StatusCode::INTERNAL_SERVER_ERROR, Bytes::new())
            }
        }
    }

    /// Bare response with the CORS origin header
    fn response(&self, status: StatusCode, body: Bytes) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(body));
        *response.status_mut() = status;

        match HeaderValue::from_str(&self.config.server.allow_origin) {
            Ok(origin) => {
                response
                    .headers_mut()
                    .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
            }
            Err(_) => debug!("allow_origin is not a valid header value, skipping"),
        }
        response
    }
}

/// `detail`, `detail=true` or `detail=1` in the query string
fn wants_detail(query: Option<&str>) -> bool {
    query.is_some_and(|q| {
        q.split('&')
            .any(|pair| matches!(pair, "detail" | "detail=true" | "detail=1"))
    })
}
