//! Opaque continuation cursors.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while decoding or encoding a [`Cursor`].
#[derive(Debug, Error)]
pub enum CursorError {
    /// The token is not URL-safe base64.
    #[error("cursor is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    /// The decoded bytes do not hold the expected JSON payload.
    #[error("cursor payload is malformed: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Opaque resume point returned by a scan.
///
/// The token is the URL-safe, unpadded base64 encoding of a JSON payload
/// chosen by the adapter that issued it. It carries no ordering semantics
/// beyond "resume here".
///
/// # Examples
/// ```
/// use pagination::Cursor;
///
/// let cursor = Cursor::encode(&"post-42").expect("encodable");
/// let key: String = cursor.decode().expect("decodable");
/// assert_eq!(key, "post-42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Encode `value` into an opaque cursor.
    ///
    /// # Errors
    /// Returns [`CursorError::Payload`] when `value` cannot be serialised.
    pub fn encode<T: Serialize>(value: &T) -> Result<Self, CursorError> {
        let json = serde_json::to_vec(value)?;
        Ok(Self(URL_SAFE_NO_PAD.encode(json)))
    }

    /// Decode the payload carried by the cursor.
    ///
    /// # Errors
    /// Returns [`CursorError::Encoding`] for tokens that are not base64 and
    /// [`CursorError::Payload`] when the payload does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, CursorError> {
        let bytes = URL_SAFE_NO_PAD.decode(self.0.as_bytes())?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Wrap a raw token without inspecting it.
    #[must_use]
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrow the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
