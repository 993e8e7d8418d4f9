//! Error types for the contract-testing harness.
//!
//! Errors are organized by the stage that raises them: fixture generation,
//! request construction, assertion, scenario context, and transport. The
//! distinction that matters at run level is infrastructure versus assertion
//! failure: a [`TransportError`] means the resource could not be reached and
//! the scenario is reported as `Aborted`, while every other family means the
//! resource answered but the contract did not hold, reported as `Failed`.
//! [`TransportError::Decode`] sits on the `Failed` side of that line: a
//! response arrived, it just was not JSON.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use serde_json::Value;
use thiserror::Error;

/// Result alias for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;

/// The primary error type for all harness operations.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Fixture generation errors
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Request spec construction errors
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// Assertion failures
    #[error(transparent)]
    Assertion(#[from] AssertionError),

    /// Scenario context errors
    #[error(transparent)]
    Context(#[from] ContextError),

    /// Transport failures
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl HarnessError {
    /// Returns true if this error is an infrastructure failure rather than a
    /// contract violation. Infrastructure failures abort a scenario instead
    /// of failing it.
    ///
    /// A decode failure is not infrastructure: the resource answered, with a
    /// body that is not JSON, so operators should read it as "the API is
    /// broken" rather than "the API is unreachable".
    pub fn is_infrastructure(&self) -> bool {
        match self {
            HarnessError::Transport(TransportError::Decode { .. }) => false,
            HarnessError::Transport(_) => true,
            _ => false,
        }
    }
}

/// Errors raised by the fixture generator.
///
/// These are programmer errors in the calling test suite and always fatal to
/// the scenario that triggered them.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The supplied price range has min > max.
    #[error("invalid price range: min {min} > max {max}")]
    InvalidPriceRange { min: f64, max: f64 },

    /// The supplied stock range has min > max.
    #[error("invalid stock range: min {min} > max {max}")]
    InvalidStockRange { min: u32, max: u32 },
}

/// Errors raised while constructing a request spec.
#[derive(Error, Debug)]
pub enum SpecError {
    /// The request path is empty.
    #[error("request path must not be empty")]
    EmptyPath,

    /// A POST/PUT step was declared without a body.
    #[error("{method} {path} requires a body")]
    MissingBody { method: String, path: String },

    /// The request body is not a JSON object.
    #[error("request body must be a JSON object, got {got}")]
    BodyNotAnObject { got: String },

    /// The request body lacks a required item field.
    #[error("request body is missing required field '{field}'")]
    MissingField { field: &'static str },

    /// A required item field has the wrong JSON type.
    #[error("request body field '{field}' must be a {expected}")]
    FieldType {
        field: &'static str,
        expected: &'static str,
    },
}

/// Assertion failures: the resource answered, but not as expected.
#[derive(Error, Debug)]
pub enum AssertionError {
    /// The HTTP status differed from the expectation.
    #[error("status mismatch: expected {expected}, got {actual}")]
    StatusMismatch { expected: u16, actual: u16 },

    /// The payload diverged from the expected structure. `path` is the first
    /// divergent key-path, depth-first in the expectation's key order.
    #[error("structural mismatch at '{path}': expected {expected}, got {}", fmt_actual(.actual))]
    StructuralMismatch {
        path: String,
        expected: Value,
        actual: Option<Value>,
    },

    /// Exact-mode match found an actual key the expectation does not declare.
    #[error("unexpected key '{path}' in actual payload")]
    UnexpectedKey { path: String },

    /// Two captured values expected to be distinct were equal.
    #[error("captured values '{left}' and '{right}' are both {value}")]
    NotDistinct {
        left: String,
        right: String,
        value: Value,
    },
}

fn fmt_actual(actual: &Option<Value>) -> String {
    match actual {
        Some(value) => value.to_string(),
        None => "nothing (key absent)".to_string(),
    }
}

/// Errors in scenario-local state threading.
#[derive(Error, Debug)]
pub enum ContextError {
    /// A capture key was written twice within one scenario.
    #[error("capture '{key}' already written in this scenario")]
    DuplicateCapture { key: String },

    /// A path template or distinctness check referenced a capture that no
    /// earlier step produced.
    #[error("no capture named '{key}' available")]
    MissingCapture { key: String },

    /// A capture rule pointed at a path absent from the response body.
    #[error("capture path '{path}' not found in response body")]
    CapturePath { path: String },

    /// A path template had unbalanced placeholder braces.
    #[error("malformed placeholder in path template '{template}'")]
    MalformedTemplate { template: String },
}

/// Transport failures. Apart from [`TransportError::Decode`], these mean
/// the resource could not be reached at all.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request exceeded the configured per-request timeout.
    #[error("request timed out after {millis}ms: {method} {url}")]
    Timeout {
        method: String,
        url: String,
        millis: u64,
    },

    /// The endpoint was unreachable.
    #[error("connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    /// The request failed for another transport-level reason.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("response body from {url} is not valid JSON: {message}")]
    Decode { url: String, message: String },

    /// The configured base URL does not parse.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}
