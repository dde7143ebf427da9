// crates/stubcheck-core/src/core/payload.rs
// ============================================================================
// Module: Stubcheck Response Payloads
// Description: Typed bodies returned by the users endpoint.
// Purpose: Decode loosely-typed JSON into a success list or an error variant.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The users endpoint answers with either a JSON array of users (2xx) or an
//! error object (anything else). [`ApiPayload::decode`] picks the variant from
//! the status class so callers never handle an untyped document.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Entities
// ============================================================================

/// User entity returned by `GET /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Numeric identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Gender label.
    pub gender: String,
}

/// Error body returned for non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message, when the server supplied one.
    #[serde(default)]
    pub message: Option<String>,
    /// Machine-readable error code, when the server supplied one.
    #[serde(default)]
    pub code: Option<String>,
}

// ============================================================================
// SECTION: Payload
// ============================================================================

/// Decoded body of a users endpoint response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum ApiPayload {
    /// Successful list of users.
    Users(Vec<User>),
    /// Error object.
    Error(ApiError),
}

/// Errors raised while decoding a response body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// The body did not match the shape expected for its status class.
    #[error("malformed {expected} body for status {status}: {detail}")]
    Malformed {
        /// Response status code.
        status: u16,
        /// Shape that was expected.
        expected: &'static str,
        /// Decoder message.
        detail: String,
    },
}

impl ApiPayload {
    /// Decodes `body` as a user list for 2xx statuses and as an error otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::Malformed`] when the body does not decode into
    /// the shape implied by `status`.
    pub fn decode(status: u16, body: &[u8]) -> Result<Self, PayloadError> {
        if (200 .. 300).contains(&status) {
            serde_json::from_slice::<Vec<User>>(body).map(Self::Users).map_err(|err| {
                PayloadError::Malformed {
                    status,
                    expected: "user list",
                    detail: err.to_string(),
                }
            })
        } else {
            serde_json::from_slice::<ApiError>(body).map(Self::Error).map_err(|err| {
                PayloadError::Malformed {
                    status,
                    expected: "error",
                    detail: err.to_string(),
                }
            })
        }
    }
}

/// Status and decoded payload of one probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResponse {
    /// HTTP status code.
    pub status: u16,
    /// Decoded body.
    pub payload: ApiPayload,
}

impl ProbeResponse {
    /// Decodes a raw status and body.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] when the body cannot be decoded.
    pub fn decode(status: u16, body: &[u8]) -> Result<Self, PayloadError> {
        Ok(Self {
            status,
            payload: ApiPayload::decode(status, body)?,
        })
    }
}
