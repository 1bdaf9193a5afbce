//! Normalization for nested response envelopes.
//!
//! The external automation service wraps its payload in a varying number of
//! `{"output": ...}` objects, sometimes inside a one-element array. The
//! unwrap depth is bounded by explicit constants rather than probed
//! open-endedly.

use serde_json::Value;
use thiserror::Error;

/// Field name the service nests its payload under.
pub const OUTPUT_KEY: &str = "output";

/// Maximum number of `output` levels that will be unwrapped.
pub const MAX_OUTPUT_DEPTH: usize = 2;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EnvelopeError {
    #[error("response envelope is an empty array")]
    EmptyArray,
}

/// Strips up to one array wrapper and up to [`MAX_OUTPUT_DEPTH`] `output`
/// wrappers from a service response.
///
/// An array directly under `output` is accepted at the first level only,
/// matching the shapes the service has been observed to produce.
///
/// # Errors
///
/// Returns `EnvelopeError::EmptyArray` when a wrapping array has no elements.
pub fn unwrap_envelope(value: Value) -> Result<Value, EnvelopeError> {
    let mut data = value;
    if let Value::Array(items) = data {
        data = items.into_iter().next().ok_or(EnvelopeError::EmptyArray)?;
    }

    for depth in 0..MAX_OUTPUT_DEPTH {
        let Some(inner) = data.as_object_mut().and_then(|obj| obj.remove(OUTPUT_KEY)) else {
            break;
        };
        data = match inner {
            Value::Array(items) if depth == 0 => {
                items.into_iter().next().ok_or(EnvelopeError::EmptyArray)?
            }
            other => other,
        };
    }

    Ok(data)
}
