//! PIX `BRCode` payload encoder for Brazilian instant payments.
//!
//! Builds the EMV merchant-presented QR text that payment apps scan: fields
//! are tag-length-value encoded in a fixed order and the payload ends with
//! a CRC-16/CCITT-FALSE checksum. The crate also decodes payloads, builds
//! links to a QR-image service and talks to the paywall backend that
//! serves plan prices.
//!
//! ```
//! use pix_brcode::PixEncoder;
//! use pix_brcode::models::EncodeRequest;
//!
//! let request = EncodeRequest::new()
//!     .payee_key("9aacbabc-39ad-4602-b73e-955703ec502e")
//!     .amount("49.90");
//! let encoded = PixEncoder::default().encode_request(&request)?;
//! assert!(encoded.as_str().contains("540549.90"));
//! assert_eq!(encoded.checksum(), "B0A4");
//! # Ok::<(), pix_brcode::error::PixError>(())
//! ```

#[cfg(any(feature = "async", feature = "blocking"))]
pub mod client;
pub mod config;
pub mod crc;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod models;
#[cfg(feature = "qr")]
pub mod qr;
pub mod tlv;

pub use decoder::{DecodedPayload, decode};
pub use encoder::{PixEncoder, encode};
