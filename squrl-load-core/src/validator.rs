//! Structural checks on create and redirect responses
//!
//! Validators only observe: every problem becomes a counter, nothing is
//! returned as an error and the response is never touched.

use crate::metrics::{names, MetricsSink};
use crate::session::SessionContext;
use crate::types::ResponseDescriptor;
use serde_json::Value;

/// Fields a successful create response must carry
pub const REQUIRED_CREATE_FIELDS: [&str; 3] = ["short_code", "short_url", "expires_at"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateValidation {
    /// Status was not 200, nothing checked
    Skipped,
    ParseError,
    MissingFields(Vec<&'static str>),
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectValidation {
    /// Status was not 301/302, nothing checked
    Skipped,
    MissingLocation,
    InvalidLocation,
    Valid,
}

pub fn has_http_scheme(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Null, empty strings and absent keys all count as missing
fn field_present(body: &Value, field: &str) -> bool {
    match body.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Check a create response. A complete response also records its
/// `short_code` as the session's `lastCreatedCode`.
pub fn validate_create_response(
    response: &ResponseDescriptor,
    session: &mut SessionContext,
    sink: &dyn MetricsSink,
) -> CreateValidation {
    if response.status != 200 {
        return CreateValidation::Skipped;
    }

    let body: Value = match serde_json::from_str(&response.body) {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(error = %e, "Create response body is not valid JSON");
            sink.increment(names::VALIDATION_JSON_PARSE_ERROR);
            return CreateValidation::ParseError;
        }
    };

    let missing: Vec<&'static str> = REQUIRED_CREATE_FIELDS
        .into_iter()
        .filter(|field| !field_present(&body, field))
        .collect();

    if field_present(&body, "short_url") {
        let well_formed = body
            .get("short_url")
            .and_then(Value::as_str)
            .is_some_and(has_http_scheme);
        if !well_formed {
            sink.increment(names::VALIDATION_INVALID_URL_FORMAT);
        }
    }

    if !missing.is_empty() {
        tracing::warn!(missing = ?missing, "Create response is missing required fields");
        sink.increment(names::VALIDATION_MISSING_FIELDS);
        return CreateValidation::MissingFields(missing);
    }

    sink.increment(names::VALIDATION_COMPLETE_RESPONSE);
    match body.get("short_code") {
        Some(Value::String(code)) => session.set_last_created_code(code.as_str()),
        Some(other) => session.set_last_created_code(other.to_string()),
        None => {}
    }

    CreateValidation::Complete
}

/// Check that a 301/302 carries an absolute http(s) `Location`
pub fn validate_redirect_response(
    response: &ResponseDescriptor,
    sink: &dyn MetricsSink,
) -> RedirectValidation {
    if !response.is_redirect() {
        return RedirectValidation::Skipped;
    }

    let outcome = match response.headers.get(http::header::LOCATION) {
        None => RedirectValidation::MissingLocation,
        Some(location) => match location.to_str() {
            Ok(target) if has_http_scheme(target) => RedirectValidation::Valid,
            _ => RedirectValidation::InvalidLocation,
        },
    };

    let metric = match outcome {
        RedirectValidation::MissingLocation => names::VALIDATION_MISSING_LOCATION_HEADER,
        RedirectValidation::InvalidLocation => names::VALIDATION_INVALID_REDIRECT_URL,
        _ => names::VALIDATION_VALID_REDIRECT,
    };
    sink.increment(metric);

    outcome
}
