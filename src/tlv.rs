//! Tag-length-value primitive shared by every `BRCode` field.
//!
//! A field is a two-digit tag, a two-digit zero-padded length and the value
//! itself. Values are ASCII, so the length counts both bytes and
//! characters; it is always computed from the value. Nested templates (tags
//! `26` and `62`) go through the same helper.

use crate::error::{PixError, Result};

/// Largest value a two-digit length prefix can describe.
pub const MAX_VALUE_LEN: usize = 99;

/// `BRCode` tags used by the encoder and decoder.
pub mod tag {
    /// Payload format indicator.
    pub const PAYLOAD_FORMAT: &str = "00";
    /// Point of initiation method.
    pub const POINT_OF_INITIATION: &str = "01";
    /// Merchant account information (PIX template).
    pub const MERCHANT_ACCOUNT: &str = "26";
    /// Merchant category code.
    pub const MERCHANT_CATEGORY: &str = "52";
    /// Transaction currency.
    pub const CURRENCY: &str = "53";
    /// Transaction amount.
    pub const AMOUNT: &str = "54";
    /// Country code.
    pub const COUNTRY: &str = "58";
    /// Merchant name.
    pub const MERCHANT_NAME: &str = "59";
    /// Merchant city.
    pub const MERCHANT_CITY: &str = "60";
    /// Additional data field template.
    pub const ADDITIONAL_DATA: &str = "62";
    /// CRC16 checksum.
    pub const CRC: &str = "63";

    /// Globally unique identifier inside tag `26`.
    pub const ACCOUNT_GUI: &str = "00";
    /// PIX key inside tag `26`.
    pub const ACCOUNT_KEY: &str = "01";
    /// Reference label inside tag `62`.
    pub const REFERENCE_LABEL: &str = "05";
}

/// One decoded TLV field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Two-digit tag.
    pub tag: String,
    /// Field value.
    pub value: String,
}

impl Field {
    /// Re-encodes the field in TLV form.
    ///
    /// # Errors
    ///
    /// Same as [`field`].
    #[inline]
    pub fn encode(&self) -> Result<String> {
        field(&self.tag, &self.value)
    }
}

/// Encodes one field as `tag + length + value`.
///
/// # Errors
///
/// Returns [`PixError::InvalidTag`] if `tag` is not two ASCII digits,
/// [`PixError::NonAscii`] if the value is not ASCII and
/// [`PixError::FieldTooLong`] if the value exceeds [`MAX_VALUE_LEN`]
/// bytes.
///
/// # Examples
///
/// ```
/// assert_eq!(pix_brcode::tlv::field("58", "BR").unwrap(), "5802BR");
/// ```
#[inline]
pub fn field(tag: &str, value: &str) -> Result<String> {
    ensure_ascii(tag, value)?;
    let prefix = header(tag, value.len())?;
    Ok([prefix.as_str(), value].concat())
}

/// Encodes only the `tag + length` prefix of a field.
///
/// Used for the CRC field, whose value is computed over the payload
/// including this prefix.
///
/// # Errors
///
/// Same as [`field`].
#[inline]
pub fn header(tag: &str, length: usize) -> Result<String> {
    if !is_two_digits(tag) {
        return Err(PixError::InvalidTag(tag.to_owned()));
    }
    if length > MAX_VALUE_LEN {
        return Err(PixError::FieldTooLong {
            tag: tag.to_owned(),
            length,
            max: MAX_VALUE_LEN,
        });
    }
    Ok(format!("{tag}{length:02}"))
}

/// Splits a TLV string into its fields, in order.
///
/// # Errors
///
/// Returns [`PixError::Malformed`] if the input is not ASCII, a header is
/// truncated or not numeric, or a value is shorter than its declared
/// length.
pub fn parse_fields(input: &str) -> Result<Vec<Field>> {
    if !input.is_ascii() {
        return Err(PixError::Malformed(
            "payload contains non-ASCII characters".to_owned(),
        ));
    }
    let mut chars = input.chars();
    let mut fields = Vec::new();
    loop {
        let tag: String = chars.by_ref().take(2).collect();
        if tag.is_empty() {
            break;
        }
        if !is_two_digits(&tag) {
            return Err(PixError::Malformed(format!(
                "expected a two-digit tag, found {tag:?}"
            )));
        }
        let raw_length: String = chars.by_ref().take(2).collect();
        let length = parse_length(&raw_length).ok_or_else(|| {
            PixError::Malformed(format!("field {tag} has invalid length {raw_length:?}"))
        })?;
        let value: String = chars.by_ref().take(length).collect();
        let found = value.chars().count();
        if found != length {
            return Err(PixError::Malformed(format!(
                "field {tag} declares {length} characters but only {found} remain"
            )));
        }
        fields.push(Field { tag, value });
    }
    tracing::trace!(count = fields.len(), "parsed TLV fields");
    Ok(fields)
}

/// Returns the value of the first field with the given tag.
#[inline]
#[must_use]
pub fn find<'fields>(fields: &'fields [Field], tag: &str) -> Option<&'fields str> {
    fields
        .iter()
        .find(|candidate| candidate.tag == tag)
        .map(|found| found.value.as_str())
}

/// Rejects values whose byte length differs from their character count.
///
/// # Errors
///
/// Returns [`PixError::NonAscii`] if `value` is not ASCII.
#[inline]
pub fn ensure_ascii(tag: &str, value: &str) -> Result<()> {
    if value.is_ascii() {
        Ok(())
    } else {
        Err(PixError::NonAscii {
            tag: tag.to_owned(),
            value: value.to_owned(),
        })
    }
}

/// Parses a two-digit length prefix.
fn parse_length(raw: &str) -> Option<usize> {
    is_two_digits(raw).then(|| raw.parse().ok()).flatten()
}

/// Returns `true` if `raw` is exactly two ASCII digits.
fn is_two_digits(raw: &str) -> bool {
    raw.len() == 2 && raw.bytes().all(|byte| byte.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_zero_pads_length() {
        assert_eq!(field("00", "01").unwrap(), "000201");
        assert_eq!(field("59", "LANZACA IA").unwrap(), "5910LANZACA IA");
    }

    #[test]
    fn field_empty_value() {
        assert_eq!(field("05", "").unwrap(), "0500");
    }

    #[test]
    fn field_rejects_non_ascii_value() {
        let err = field("60", "S\u{e3}o Paulo").unwrap_err();
        assert!(matches!(err, PixError::NonAscii { tag, .. } if tag == "60"));
    }

    #[test]
    fn parse_rejects_non_ascii_input() {
        let err = parse_fields("6009S\u{e3}o Paulo").unwrap_err();
        assert!(matches!(err, PixError::Malformed(_)));
    }

    #[test]
    fn field_accepts_ninety_nine_characters() {
        let value = "x".repeat(99);
        let encoded = field("26", &value).unwrap();
        assert!(encoded.starts_with("2699"));
    }

    #[test]
    fn field_rejects_hundred_characters() {
        let value = "x".repeat(100);
        let err = field("26", &value).unwrap_err();
        assert!(matches!(
            err,
            PixError::FieldTooLong { tag, length: 100, max: 99 } if tag == "26"
        ));
    }

    #[test]
    fn field_rejects_bad_tags() {
        for bad in ["", "5", "540", "5A", "+1"] {
            let err = field(bad, "x").unwrap_err();
            assert!(matches!(err, PixError::InvalidTag(_)), "tag {bad:?}");
        }
    }

    #[test]
    fn header_only() {
        assert_eq!(header("63", 4).unwrap(), "6304");
    }

    #[test]
    fn nested_length_covers_nested_fields() {
        let nested = [
            field("00", "BR.GOV.BCB.PIX").unwrap(),
            field("01", "lojista@example.com").unwrap(),
        ]
        .concat();
        let outer = field("26", &nested).unwrap();
        assert!(outer.starts_with("2641"));
    }

    #[test]
    fn parse_splits_fields_in_order() {
        let fields = parse_fields("0002015802BR62070503***").unwrap();
        let tags: Vec<&str> = fields.iter().map(|f| f.tag.as_str()).collect();
        assert_eq!(tags, ["00", "58", "62"]);
        assert_eq!(find(&fields, "62"), Some("0503***"));
        assert_eq!(find(&fields, "54"), None);
    }

    #[test]
    fn parse_then_encode_recovers_input() {
        let input = "0002015802BR5910LANZACA IA";
        let fields = parse_fields(input).unwrap();
        let encoded: Vec<String> = fields.iter().map(|f| f.encode().unwrap()).collect();
        assert_eq!(encoded.concat(), input);
    }

    #[test]
    fn parse_empty_input() {
        assert!(parse_fields("").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_truncated_value() {
        let err = parse_fields("5910LANZACA").unwrap_err();
        assert!(matches!(err, PixError::Malformed(_)));
    }

    #[test]
    fn parse_rejects_truncated_header() {
        assert!(matches!(
            parse_fields("0002015").unwrap_err(),
            PixError::Malformed(_)
        ));
        assert!(matches!(
            parse_fields("00020158").unwrap_err(),
            PixError::Malformed(_)
        ));
    }

    #[test]
    fn parse_rejects_non_numeric_length() {
        let err = parse_fields("00AB01").unwrap_err();
        assert!(matches!(err, PixError::Malformed(_)));
    }
}
