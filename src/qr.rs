//! Links to an external QR-image rendering service.
//!
//! The crate does not rasterize QR codes itself; it builds the URL of a
//! service that returns a PNG for the payload passed in the query string.

use url::Url;

use crate::error::Result;
use crate::models::EncodedPayload;

/// Default rendering service.
pub const DEFAULT_QR_SERVICE: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Default image side in pixels.
pub const DEFAULT_QR_SIZE: u32 = 220;

/// Options for [`qr_image_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrImageOptions {
    /// Base URL of the rendering service.
    service: String,
    /// Image side in pixels.
    size: u32,
}

impl Default for QrImageOptions {
    #[inline]
    fn default() -> Self {
        Self {
            service: DEFAULT_QR_SERVICE.to_owned(),
            size: DEFAULT_QR_SIZE,
        }
    }
}

impl QrImageOptions {
    /// Overrides the rendering service base URL.
    #[inline]
    #[must_use]
    pub fn service<T: Into<String>>(mut self, url: T) -> Self {
        self.service = url.into();
        self
    }

    /// Overrides the image side in pixels.
    #[inline]
    #[must_use]
    pub const fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }
}

/// Builds the image URL for `payload`; the payload is URL-encoded.
///
/// # Errors
///
/// Returns [`crate::error::PixError::InvalidUrl`] if the service URL does
/// not parse.
///
/// # Examples
///
/// ```
/// use pix_brcode::models::EncodeRequest;
/// use pix_brcode::qr::{QrImageOptions, qr_image_url};
///
/// let encoded = pix_brcode::PixEncoder::default()
///     .encode_request(&EncodeRequest::new().payee_key("lojista@example.com"))?;
/// let url = qr_image_url(&encoded, &QrImageOptions::default())?;
/// assert!(url.as_str().starts_with("https://api.qrserver.com/"));
/// # Ok::<(), pix_brcode::error::PixError>(())
/// ```
#[inline]
pub fn qr_image_url(payload: &EncodedPayload, options: &QrImageOptions) -> Result<Url> {
    let mut url = Url::parse(&options.service)?;
    _ = url
        .query_pairs_mut()
        .append_pair("size", &format!("{0}x{0}", options.size))
        .append_pair("data", payload.as_str());
    tracing::trace!(url = %url, "built QR image URL");
    Ok(url)
}
