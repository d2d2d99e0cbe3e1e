//! Unified validation framework for request payloads.
//!
//! This module provides reusable validation rules and utilities
//! to ensure consistent input validation across all API endpoints.

pub mod rules;

/// Flattens `validator` errors into `field: code` messages, sorted for stable output.
pub fn flatten_errors(errors: &validator::ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let code = e.code.as_ref();
                format!("{}: {}", field, code)
            })
        })
        .collect();
    messages.sort();
    messages
}
