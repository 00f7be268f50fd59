//! RFC 7807 problem responses returned by API handlers

use std::collections::BTreeMap;

use axum::http::{header::CONTENT_TYPE, StatusCode};
use axum::{response::IntoResponse, Json};
use serde_json::Value;

/// A problem to return to the client, rendered as `application/problem+json`
#[derive(Debug, Clone)]
pub struct Problem {
    pub status_code: StatusCode,
    pub body: BTreeMap<String, Value>,
}

impl Problem {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            body: BTreeMap::new(),
        }
    }

    pub fn with_title(self, value: impl Into<String>) -> Self {
        self.with_value("title", value.into())
    }

    pub fn with_detail(self, value: impl Into<String>) -> Self {
        self.with_value("detail", value.into())
    }

    pub fn with_type(self, value: impl Into<String>) -> Self {
        self.with_value("type", value.into())
    }

    pub fn with_value<V: Into<Value>>(mut self, key: &str, value: V) -> Self {
        self.body.insert(key.to_owned(), value.into());
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> axum::response::Response {
        let problem = self.with_value("timestamp", chrono::Utc::now().to_rfc3339());
        let mut response = (problem.status_code, Json(problem.body)).into_response();
        response
            .headers_mut()
            .insert(CONTENT_TYPE, "application/problem+json".parse().unwrap());
        response
    }
}

// Common problem constructors

pub fn internal_server_error(detail: impl Into<String>) -> Problem {
    Problem::new(StatusCode::INTERNAL_SERVER_ERROR)
        .with_type("https://adpulse.dev/probs/internal-server-error")
        .with_title("Internal Server Error")
        .with_detail(detail)
}

pub fn bad_request(detail: impl Into<String>) -> Problem {
    Problem::new(StatusCode::BAD_REQUEST)
        .with_type("https://adpulse.dev/probs/bad-request")
        .with_title("Bad Request")
        .with_detail(detail)
}

pub fn not_found(detail: impl Into<String>) -> Problem {
    Problem::new(StatusCode::NOT_FOUND)
        .with_type("https://adpulse.dev/probs/not-found")
        .with_title("Resource Not Found")
        .with_detail(detail)
}

pub fn unauthorized(detail: impl Into<String>) -> Problem {
    Problem::new(StatusCode::UNAUTHORIZED)
        .with_type("https://adpulse.dev/probs/unauthorized")
        .with_title("Unauthorized")
        .with_detail(detail)
}
