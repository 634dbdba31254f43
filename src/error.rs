//! Error types for the PIX `BRCode` library.

/// All errors that can occur when encoding, decoding or fetching PIX data.
#[derive(Debug, thiserror::Error)]
pub enum PixError {
    /// The amount is negative, non-numeric or not representable with two
    /// fraction digits.
    #[error("invalid amount {input:?}: {reason}")]
    InvalidAmount {
        /// The rejected input as given by the caller.
        input: String,
        /// Why the input was rejected.
        reason: &'static str,
    },

    /// A field value does not fit its length budget.
    #[error("field {tag} is {length} characters long (maximum {max})")]
    FieldTooLong {
        /// Two-digit tag of the offending field.
        tag: String,
        /// Actual length in characters.
        length: usize,
        /// Maximum allowed length in characters.
        max: usize,
    },

    /// A field value contains non-ASCII characters, whose byte and character
    /// counts disagree.
    #[error("field {tag} must be ASCII: {value:?}")]
    NonAscii {
        /// Two-digit tag of the offending field.
        tag: String,
        /// The rejected value.
        value: String,
    },

    /// The PIX key is empty.
    #[error("PIX key is empty")]
    MissingKey,

    /// A mandatory field is empty or absent.
    #[error("required field is missing: {0}")]
    MissingField(&'static str),

    /// A TLV tag is not exactly two ASCII digits.
    #[error("invalid TLV tag {0:?}: expected two ASCII digits")]
    InvalidTag(String),

    /// The payload cannot be parsed as a `BRCode`.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// The trailing CRC does not match the payload contents.
    #[error("checksum mismatch: payload carries {actual}, computed {expected}")]
    ChecksumMismatch {
        /// Checksum computed over the payload.
        expected: String,
        /// Checksum found at the end of the payload.
        actual: String,
    },

    /// A URL could not be parsed.
    #[cfg(feature = "qr")]
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP transport error.
    #[cfg(any(feature = "async", feature = "blocking"))]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend returned a non-success status code.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or error description.
        message: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration value is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, PixError>;
