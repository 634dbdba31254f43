//! `BRCode` payload decoder.
//!
//! Splits a payload back into its TLV fields, verifies the trailing CRC and
//! rebuilds the [`MerchantPayment`] it describes.

use crate::config::LengthPolicy;
use crate::crc;
use crate::encoder::PIX_GUI;
use crate::error::{PixError, Result};
use crate::models::{Amount, InitiationMethod, MerchantPayment, PixKey};
use crate::tlv::{self, Field, tag};

/// A decoded and checksum-verified `BRCode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    /// Top-level fields in payload order, CRC included.
    fields: Vec<Field>,
    /// Point of initiation method, when present.
    initiation: Option<InitiationMethod>,
    /// The payment described by the payload.
    payment: MerchantPayment,
    /// Checksum as carried by the payload.
    checksum: String,
}

impl DecodedPayload {
    /// Returns the top-level fields in payload order.
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the value of a top-level field.
    #[inline]
    #[must_use]
    pub fn field(&self, tag: &str) -> Option<&str> {
        tlv::find(&self.fields, tag)
    }

    /// Returns the point of initiation method, if the payload carries one.
    #[inline]
    #[must_use]
    pub const fn initiation(&self) -> Option<InitiationMethod> {
        self.initiation
    }

    /// Returns the payment described by the payload.
    #[inline]
    #[must_use]
    pub const fn payment(&self) -> &MerchantPayment {
        &self.payment
    }

    /// Returns the checksum carried by the payload.
    #[inline]
    #[must_use]
    pub fn checksum(&self) -> &str {
        &self.checksum
    }
}

/// Decodes a `BRCode` payload.
///
/// # Errors
///
/// Returns [`PixError::Malformed`] if the payload does not split into TLV
/// fields, lacks a mandatory field, carries a category, currency or
/// country other than `0000`, `986` and `BR`, pairs the initiation method
/// with the wrong amount presence or does not end with the CRC field;
/// [`PixError::ChecksumMismatch`] if the CRC is wrong; and the validation
/// errors of the payment builder for out-of-range values.
#[tracing::instrument(skip_all)]
pub fn decode(payload: &str) -> Result<DecodedPayload> {
    let fields = tlv::parse_fields(payload.trim())?;
    let checksum = verify_checksum(payload.trim(), &fields)?;

    match fields.first() {
        Some(first) if first.tag == tag::PAYLOAD_FORMAT && first.value == "01" => {}
        _ => {
            return Err(PixError::Malformed(
                "payload must start with format indicator 01".to_owned(),
            ));
        }
    }

    let initiation = tlv::find(&fields, tag::POINT_OF_INITIATION)
        .map(|code| {
            InitiationMethod::from_code(code).ok_or_else(|| {
                PixError::Malformed(format!("unknown point of initiation method {code:?}"))
            })
        })
        .transpose()?;

    expect_fixed(
        &fields,
        tag::MERCHANT_CATEGORY,
        MerchantPayment::MERCHANT_CATEGORY_CODE,
    )?;
    expect_fixed(&fields, tag::CURRENCY, MerchantPayment::CURRENCY_CODE)?;
    expect_fixed(&fields, tag::COUNTRY, MerchantPayment::COUNTRY_CODE)?;

    let account = tlv::parse_fields(required(&fields, tag::MERCHANT_ACCOUNT)?)?;
    match tlv::find(&account, tag::ACCOUNT_GUI) {
        Some(gui) if gui.eq_ignore_ascii_case(PIX_GUI) => {}
        other => {
            return Err(PixError::Malformed(format!(
                "merchant account is not a PIX template (GUI {other:?})"
            )));
        }
    }
    let key = PixKey::new(tlv::find(&account, tag::ACCOUNT_KEY).unwrap_or_default())?;

    let amount = tlv::find(&fields, tag::AMOUNT)
        .map(str::parse::<Amount>)
        .transpose()?;
    match (initiation, amount) {
        (Some(InitiationMethod::Dynamic), None) => {
            return Err(PixError::Malformed(
                "initiation method 12 requires an amount".to_owned(),
            ));
        }
        (Some(InitiationMethod::Static), Some(_)) => {
            return Err(PixError::Malformed(
                "initiation method 11 cannot carry an amount".to_owned(),
            ));
        }
        _ => {}
    }

    let mut builder = MerchantPayment::builder(key)
        .merchant_name(required(&fields, tag::MERCHANT_NAME)?)
        .merchant_city(required(&fields, tag::MERCHANT_CITY)?)
        .length_policy(LengthPolicy::Reject);
    if let Some(value) = amount {
        builder = builder.amount(value);
    }
    if let Some(additional) = tlv::find(&fields, tag::ADDITIONAL_DATA) {
        let nested = tlv::parse_fields(additional)?;
        if let Some(reference) = tlv::find(&nested, tag::REFERENCE_LABEL) {
            builder = builder.reference(reference);
        }
    }
    let payment = builder.build()?;

    tracing::debug!(checksum = %checksum, fields = fields.len(), "decoded PIX payload");
    Ok(DecodedPayload {
        fields,
        initiation,
        payment,
        checksum,
    })
}

/// Checks that the payload ends with a valid CRC field and returns it.
fn verify_checksum(payload: &str, fields: &[Field]) -> Result<String> {
    let carried = match fields.last() {
        Some(last) if last.tag == tag::CRC && last.value.chars().count() == 4 => {
            last.value.clone()
        }
        _ => {
            return Err(PixError::Malformed(
                "payload must end with a 4-character CRC field 63".to_owned(),
            ));
        }
    };
    let body = payload.strip_suffix(carried.as_str()).unwrap_or(payload);
    let expected = crc::checksum_hex(body);
    if expected.eq_ignore_ascii_case(&carried) {
        Ok(carried)
    } else {
        tracing::debug!(expected = %expected, actual = %carried, "checksum mismatch");
        Err(PixError::ChecksumMismatch {
            expected,
            actual: carried,
        })
    }
}

/// Checks that a mandatory field carries its only allowed value.
fn expect_fixed(fields: &[Field], tag: &str, expected: &str) -> Result<()> {
    let found = required(fields, tag)?;
    if found == expected {
        Ok(())
    } else {
        Err(PixError::Malformed(format!(
            "field {tag} must be {expected:?}, found {found:?}"
        )))
    }
}

/// Returns a mandatory top-level field.
fn required<'fields>(fields: &'fields [Field], tag: &str) -> Result<&'fields str> {
    tlv::find(fields, tag)
        .ok_or_else(|| PixError::Malformed(format!("missing mandatory field {tag}")))
}
