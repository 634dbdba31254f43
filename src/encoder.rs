//! `BRCode` payload encoder.
//!
//! Serializes a [`MerchantPayment`] into the EMV merchant-presented QR
//! layout used by PIX and appends the CRC16 checksum. Every field, nested
//! or not, goes through [`tlv::field`]; the field order is fixed.

use crate::config::EncoderConfig;
use crate::crc;
use crate::error::{PixError, Result};
use crate::models::{EncodeRequest, EncodedPayload, MerchantPayment, PixKey};
use crate::tlv::{self, tag};

/// Payload format indicator value.
const PAYLOAD_FORMAT_VERSION: &str = "01";

/// Globally unique identifier of the PIX scheme inside tag `26`.
pub const PIX_GUI: &str = "BR.GOV.BCB.PIX";

/// Length of the CRC value.
const CRC_LEN: usize = 4;

/// Encodes a payment into a `BRCode` payload.
///
/// # Errors
///
/// Returns [`PixError::FieldTooLong`] if any field, including the nested
/// merchant account template, exceeds 99 characters.
///
/// # Examples
///
/// ```
/// use pix_brcode::models::{Amount, MerchantPayment, PixKey};
///
/// let payment = MerchantPayment::builder(PixKey::new("lojista@example.com")?)
///     .amount("10.00".parse::<Amount>()?)
///     .build()?;
/// let encoded = pix_brcode::encode(&payment)?;
/// assert!(encoded.as_str().starts_with("000201010212"));
/// assert!(encoded.as_str().contains("540510.00"));
/// # Ok::<(), pix_brcode::error::PixError>(())
/// ```
#[tracing::instrument(skip_all)]
pub fn encode(payment: &MerchantPayment) -> Result<EncodedPayload> {
    let account = [
        tlv::field(tag::ACCOUNT_GUI, PIX_GUI)?,
        tlv::field(tag::ACCOUNT_KEY, payment.key().as_str())?,
    ]
    .concat();
    let additional = tlv::field(tag::REFERENCE_LABEL, payment.reference())?;

    let mut fields = vec![
        tlv::field(tag::PAYLOAD_FORMAT, PAYLOAD_FORMAT_VERSION)?,
        tlv::field(tag::POINT_OF_INITIATION, payment.initiation_method().code())?,
        tlv::field(tag::MERCHANT_ACCOUNT, &account)?,
        tlv::field(tag::MERCHANT_CATEGORY, MerchantPayment::MERCHANT_CATEGORY_CODE)?,
        tlv::field(tag::CURRENCY, MerchantPayment::CURRENCY_CODE)?,
    ];
    if let Some(amount) = payment.amount() {
        fields.push(tlv::field(tag::AMOUNT, &amount.to_string())?);
    }
    fields.extend([
        tlv::field(tag::COUNTRY, MerchantPayment::COUNTRY_CODE)?,
        tlv::field(tag::MERCHANT_NAME, payment.merchant_name())?,
        tlv::field(tag::MERCHANT_CITY, payment.merchant_city())?,
        tlv::field(tag::ADDITIONAL_DATA, &additional)?,
        tlv::header(tag::CRC, CRC_LEN)?,
    ]);

    let body = fields.concat();
    let checksum = crc::checksum_hex(&body);
    tracing::debug!(
        checksum = %checksum,
        length = body.len(),
        method = payment.initiation_method().code(),
        "encoded PIX payload"
    );
    Ok(EncodedPayload::new(&body, checksum))
}

/// Encoder holding injected configuration: payee key, merchant defaults
/// and length policy.
///
/// The encoder is immutable and can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct PixEncoder {
    /// Defaults applied to incoming requests.
    config: EncoderConfig,
}

impl PixEncoder {
    /// Creates an encoder with the given configuration.
    #[inline]
    #[must_use]
    pub const fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Resolves a request against the configuration into a validated
    /// payment.
    ///
    /// # Errors
    ///
    /// Returns [`PixError::MissingKey`] if neither the request nor the
    /// configuration carries a key, [`PixError::InvalidAmount`] for a bad
    /// amount, and the errors of [`crate::models::MerchantPaymentBuilder::build`].
    pub fn payment(&self, request: &EncodeRequest) -> Result<MerchantPayment> {
        let key = match request.payee_key.as_deref() {
            Some(raw) => PixKey::new(raw)?,
            None => self
                .config
                .payee_key()
                .cloned()
                .ok_or(PixError::MissingKey)?,
        };
        let mut builder = MerchantPayment::builder(key)
            .merchant_name(
                non_blank(request.merchant_name.as_deref())
                    .unwrap_or_else(|| self.config.merchant_name()),
            )
            .merchant_city(
                non_blank(request.merchant_city.as_deref())
                    .unwrap_or_else(|| self.config.merchant_city()),
            )
            .length_policy(self.config.length_policy());
        if let Some(input) = request.amount.clone() {
            builder = builder.amount(input.parse()?);
        }
        if let Some(reference) = request.reference.as_deref() {
            builder = builder.reference(reference);
        }
        builder.build()
    }

    /// Encodes a request: resolves it with [`PixEncoder::payment`], then
    /// runs [`encode`]. Nothing is emitted unless every check passes.
    ///
    /// # Errors
    ///
    /// Any error of [`PixEncoder::payment`] or [`encode`].
    #[inline]
    #[tracing::instrument(skip_all)]
    pub fn encode_request(&self, request: &EncodeRequest) -> Result<EncodedPayload> {
        let payment = self.payment(request)?;
        encode(&payment)
    }

    /// Encodes an already validated payment.
    ///
    /// # Errors
    ///
    /// Same as [`encode`].
    #[inline]
    pub fn encode(&self, payment: &MerchantPayment) -> Result<EncodedPayload> {
        encode(payment)
    }
}

/// Treats an empty or whitespace-only override as absent.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LengthPolicy;
    use crate::models::Amount;

    const KEY: &str = "9aacbabc-39ad-4602-b73e-955703ec502e";

    fn encoder() -> PixEncoder {
        PixEncoder::default()
    }

    fn request() -> EncodeRequest {
        EncodeRequest::new()
            .payee_key(KEY)
            .amount("49.90")
            .merchant_name("LANZACA IA")
            .merchant_city("SAO PAULO")
    }

    #[test]
    fn encodes_reference_payload() {
        let encoded = encoder().encode_request(&request()).unwrap();
        assert_eq!(
            encoded.as_str(),
            "00020101021226580014BR.GOV.BCB.PIX01369aacbabc-39ad-4602-b73e-955703ec502e\
             520400005303986540549.905802BR5910LANZACA IA6009SAO PAULO62070503***6304B0A4"
        );
        assert_eq!(encoded.checksum(), "B0A4");
    }

    #[test]
    fn payload_shape() {
        let encoded = encoder().encode_request(&request()).unwrap();
        let payload = encoded.as_str();
        assert!(payload.starts_with("000201"));
        assert!(payload.contains("540549.90"));
        assert!(!payload.contains("54044990"));
        assert!(encoded.body().ends_with("6304"));
        assert_eq!(encoded.checksum().len(), 4);
        assert!(
            encoded
                .checksum()
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
        assert_eq!(crc::checksum_hex(encoded.body()), encoded.checksum());
    }

    #[test]
    fn deterministic() {
        let first = encoder().encode_request(&request()).unwrap();
        let second = encoder().encode_request(&request()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn reference_changes_tail_only() {
        let plain = encoder().encode_request(&request()).unwrap();
        let tagged = encoder()
            .encode_request(&request().reference("ABC123"))
            .unwrap();
        assert_ne!(plain, tagged);
        assert_eq!(
            tagged.as_str(),
            "00020101021226580014BR.GOV.BCB.PIX01369aacbabc-39ad-4602-b73e-955703ec502e\
             520400005303986540549.905802BR5910LANZACA IA6009SAO PAULO62100506ABC123630473E9"
        );
        let plain_tail = plain.as_str().find("62070503***").unwrap();
        let tagged_tail = tagged.as_str().find("62100506ABC123").unwrap();
        assert_eq!(plain_tail, tagged_tail);
        assert_eq!(
            plain.as_str().get(..plain_tail),
            tagged.as_str().get(..tagged_tail)
        );
        assert_ne!(plain.checksum(), tagged.checksum());
    }

    #[test]
    fn static_code_omits_amount() {
        let encoded = encoder()
            .encode_request(&EncodeRequest::new().payee_key(KEY))
            .unwrap();
        assert_eq!(
            encoded.as_str(),
            "00020101021126580014BR.GOV.BCB.PIX01369aacbabc-39ad-4602-b73e-955703ec502e\
             5204000053039865802BR5910LANZACA IA6009SAO PAULO62070503***6304AEAB"
        );
    }

    #[test]
    fn account_length_follows_key_length() {
        let encoded = encoder()
            .encode_request(&EncodeRequest::new().payee_key("lojista@example.com").amount(10.0))
            .unwrap();
        assert_eq!(
            encoded.as_str(),
            "00020101021226410014BR.GOV.BCB.PIX0119lojista@example.com\
             520400005303986540510.005802BR5910LANZACA IA6009SAO PAULO62070503***63041C76"
        );
    }

    #[test]
    fn negative_amount_is_rejected() {
        let err = encoder()
            .encode_request(&request().amount("-1"))
            .unwrap_err();
        assert!(matches!(err, PixError::InvalidAmount { .. }));
        let err = encoder()
            .encode_request(&request().amount(-1.0))
            .unwrap_err();
        assert!(matches!(err, PixError::InvalidAmount { .. }));
    }

    #[test]
    fn missing_key_is_rejected() {
        let err = encoder()
            .encode_request(&EncodeRequest::new().amount("1.00"))
            .unwrap_err();
        assert!(matches!(err, PixError::MissingKey));
        let err = encoder()
            .encode_request(&request().payee_key(""))
            .unwrap_err();
        assert!(matches!(err, PixError::MissingKey));
    }

    #[test]
    fn configured_key_is_used_when_request_has_none() {
        let config = EncoderConfig::builder().payee_key(KEY).build().unwrap();
        let configured = PixEncoder::new(config)
            .encode_request(&EncodeRequest::new().amount("49.90"))
            .unwrap();
        let explicit = encoder().encode_request(&request()).unwrap();
        assert_eq!(configured, explicit);
    }

    #[test]
    fn request_key_overrides_configured_key() {
        let config = EncoderConfig::builder()
            .payee_key("outra@example.com")
            .build()
            .unwrap();
        let encoded = PixEncoder::new(config).encode_request(&request()).unwrap();
        assert!(encoded.as_str().contains(KEY));
        assert!(!encoded.as_str().contains("outra@example.com"));
    }

    #[test]
    fn name_boundary() {
        let exact = encoder()
            .encode_request(&request().merchant_name("N".repeat(25)))
            .unwrap();
        assert!(exact.as_str().contains(&format!("5925{}", "N".repeat(25))));

        let err = encoder()
            .encode_request(&request().merchant_name("N".repeat(26)))
            .unwrap_err();
        assert!(matches!(err, PixError::FieldTooLong { max: 25, .. }));
    }

    #[test]
    fn truncating_encoder_accepts_long_names() {
        let config = EncoderConfig::builder()
            .length_policy(LengthPolicy::Truncate)
            .build()
            .unwrap();
        let encoded = PixEncoder::new(config)
            .encode_request(&request().merchant_city("SAO JOSE DOS CAMPOS"))
            .unwrap();
        assert!(encoded.as_str().contains("6015SAO JOSE DOS CA"));
    }

    #[test]
    fn overlong_key_fails_instead_of_wrapping() {
        let err = encoder()
            .encode_request(&request().payee_key("k".repeat(78)))
            .unwrap_err();
        assert!(matches!(
            err,
            PixError::FieldTooLong { tag, length: 100, max: 99 } if tag == "26"
        ));
        assert!(encoder().encode_request(&request().payee_key("k".repeat(77))).is_ok());
    }

    #[test]
    fn blank_name_and_city_fall_back_to_configuration() {
        let blank = encoder()
            .encode_request(&request().merchant_name("").merchant_city("  "))
            .unwrap();
        let explicit = encoder().encode_request(&request()).unwrap();
        assert_eq!(blank, explicit);
    }

    #[test]
    fn accented_city_is_rejected() {
        let err = encoder()
            .encode_request(&request().merchant_city("S\u{e3}o Paulo"))
            .unwrap_err();
        assert!(matches!(err, PixError::NonAscii { tag, .. } if tag == "60"));
    }

    #[test]
    fn zero_amount_is_encoded() {
        let payment = MerchantPayment::builder(PixKey::new(KEY).unwrap())
            .amount(Amount::from_cents(0))
            .build()
            .unwrap();
        let encoded = encoder().encode(&payment).unwrap();
        assert!(encoded.as_str().contains("54040.00"));
    }

    #[test]
    fn encoder_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PixEncoder>();
    }
}
