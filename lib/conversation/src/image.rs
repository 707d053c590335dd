//! Image attachments as data URIs.
//!
//! The platform picker crops, resizes and compresses the image; this module
//! only wraps the resulting bytes as `data:image/jpeg;base64,...` and checks
//! URIs received from elsewhere.

use crate::error::MessageError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::fmt;

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// A base64 image data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment(String);

impl ImageAttachment {
    /// Wraps JPEG bytes as a data URI.
    ///
    /// # Errors
    ///
    /// Returns `InvalidImage` for empty input and `ImageTooLarge` when the
    /// input exceeds `max_bytes`.
    pub fn from_jpeg(bytes: &[u8], max_bytes: usize) -> Result<Self, MessageError> {
        if bytes.is_empty() {
            return Err(MessageError::InvalidImage {
                reason: "no image data".to_string(),
            });
        }
        if bytes.len() > max_bytes {
            return Err(MessageError::ImageTooLarge {
                size: bytes.len(),
                max: max_bytes,
            });
        }
        Ok(Self(format!(
            "{DATA_PREFIX}image/jpeg{BASE64_MARKER}{}",
            STANDARD.encode(bytes)
        )))
    }

    /// Checks a data URI of the form `data:image/<type>;base64,<data>`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidImage` if the URI is not an image data URI or the
    /// payload is empty or not valid base64.
    pub fn parse(uri: &str) -> Result<Self, MessageError> {
        let invalid = |reason: &str| MessageError::InvalidImage {
            reason: reason.to_string(),
        };
        let rest = uri
            .strip_prefix(DATA_PREFIX)
            .ok_or_else(|| invalid("not a data URI"))?;
        let (media_type, payload) = rest
            .split_once(BASE64_MARKER)
            .ok_or_else(|| invalid("data URI is not base64-encoded"))?;
        if !media_type.starts_with("image/") || media_type.len() == "image/".len() {
            return Err(invalid("media type is not an image"));
        }
        if payload.is_empty() {
            return Err(invalid("no image data"));
        }
        STANDARD
            .decode(payload)
            .map_err(|e| invalid(&e.to_string()))?;
        Ok(Self(uri.to_string()))
    }

    /// Returns the media type, e.g. `image/jpeg`.
    #[must_use]
    pub fn media_type(&self) -> &str {
        self.0
            .strip_prefix(DATA_PREFIX)
            .and_then(|rest| rest.split_once(BASE64_MARKER))
            .map_or("", |(media_type, _)| media_type)
    }

    /// Returns the full data URI.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the attachment, returning the data URI.
    #[must_use]
    pub fn into_uri(self) -> String {
        self.0
    }
}

impl fmt::Display for ImageAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} image, {} chars]", self.media_type(), self.0.len())
    }
}
