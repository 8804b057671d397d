//! HTTP helpers for the events Lambda.

use lambda_http::{Body, Response};
use serde::Serialize;

use crate::error::{Error, ErrorBody};

/// CORS headers attached to every response.
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

fn builder(status: u16) -> lambda_http::http::response::Builder {
    CORS_HEADERS
        .iter()
        .fold(Response::builder().status(status), |b, (name, value)| b.header(*name, *value))
}

/// Create a JSON response with the given status code and data.
pub fn json_response<T: Serialize>(status: u16, data: &T) -> Result<Response<Body>, lambda_http::Error> {
    Ok(builder(status)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(data)?))?)
}

/// Create a cacheable JSON response.
pub fn cached_json_response<T: Serialize>(
    data: &T,
    max_age: u64,
) -> Result<Response<Body>, lambda_http::Error> {
    Ok(builder(200)
        .header("Content-Type", "application/json")
        .header(
            "Cache-Control",
            format!("public, max-age={}, s-maxage={}", max_age, max_age),
        )
        .body(Body::from(serde_json::to_string(data)?))?)
}

/// Convert a pipeline error into its JSON envelope response.
pub fn error_response(err: &Error) -> Result<Response<Body>, lambda_http::Error> {
    json_response(err.status_code(), &err.to_body())
}

/// Create an error envelope response with a plain message.
pub fn message_response(status: u16, message: impl Into<String>) -> Result<Response<Body>, lambda_http::Error> {
    json_response(status, &ErrorBody::message(message))
}

/// Empty CORS preflight response.
pub fn preflight_response() -> Result<Response<Body>, lambda_http::Error> {
    Ok(builder(204).body(Body::Empty)?)
}
