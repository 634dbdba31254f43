//! Encode request and encoded payload.

use serde::{Deserialize, Serialize};

use super::AmountInput;

/// A request to encode a PIX payment, as sent by UI code.
///
/// Every field is optional: missing values fall back to the encoder's
/// configuration, and a missing amount produces a static code.
///
/// ```json
/// {"payeeKey": "lojista@example.com", "amount": "49.90", "reference": "ABC123"}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EncodeRequest {
    /// Payee PIX key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payee_key: Option<String>,
    /// Amount as a decimal string or number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountInput>,
    /// Merchant name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
    /// Merchant city.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_city: Option<String>,
    /// Reference label for the additional-data field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl EncodeRequest {
    /// Creates an empty request.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the payee key.
    #[inline]
    #[must_use]
    pub fn payee_key<T: Into<String>>(mut self, key: T) -> Self {
        self.payee_key = Some(key.into());
        self
    }

    /// Sets the amount.
    #[inline]
    #[must_use]
    pub fn amount<T: Into<AmountInput>>(mut self, amount: T) -> Self {
        self.amount = Some(amount.into());
        self
    }

    /// Sets the merchant name.
    #[inline]
    #[must_use]
    pub fn merchant_name<T: Into<String>>(mut self, name: T) -> Self {
        self.merchant_name = Some(name.into());
        self
    }

    /// Sets the merchant city.
    #[inline]
    #[must_use]
    pub fn merchant_city<T: Into<String>>(mut self, city: T) -> Self {
        self.merchant_city = Some(city.into());
        self
    }

    /// Sets the reference label.
    #[inline]
    #[must_use]
    pub fn reference<T: Into<String>>(mut self, reference: T) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// A complete `BRCode` payload and its checksum.
///
/// Only produced by the encoder, so holding one means the payload is
/// well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EncodedPayload {
    /// Full payload, checksum included.
    payload: String,
    /// Four uppercase hex digits.
    checksum: String,
}

impl EncodedPayload {
    /// Assembles the payload from the checksummed body and its checksum.
    pub(crate) fn new(body: &str, checksum: String) -> Self {
        Self {
            payload: [body, checksum.as_str()].concat(),
            checksum,
        }
    }

    /// Returns the full payload.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.payload
    }

    /// Returns the checksum (4 uppercase hex digits).
    #[inline]
    #[must_use]
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    /// Returns the payload up to and including `"6304"`: the checksum
    /// input.
    #[inline]
    #[must_use]
    pub fn body(&self) -> &str {
        self.payload
            .strip_suffix(self.checksum.as_str())
            .unwrap_or(&self.payload)
    }

    /// Consumes the wrapper and returns the payload.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.payload
    }
}

impl core::fmt::Display for EncodedPayload {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_request() {
        let json = r#"{
            "payeeKey": "9aacbabc-39ad-4602-b73e-955703ec502e",
            "amount": "49.90",
            "merchantName": "LANZACA IA",
            "merchantCity": "SAO PAULO",
            "reference": "ABC123"
        }"#;
        let request: EncodeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            request.payee_key.as_deref(),
            Some("9aacbabc-39ad-4602-b73e-955703ec502e")
        );
        assert_eq!(request.amount, Some(AmountInput::Text("49.90".to_owned())));
        assert_eq!(request.reference.as_deref(), Some("ABC123"));
    }

    #[test]
    fn deserialize_numeric_amount_and_missing_fields() {
        let request: EncodeRequest =
            serde_json::from_str(r#"{"payeeKey": "k@example.com", "amount": 19.9}"#).unwrap();
        assert_eq!(request.amount, Some(AmountInput::Number(19.9)));
        assert!(request.merchant_name.is_none());
        assert!(request.merchant_city.is_none());
        assert!(request.reference.is_none());
    }

    #[test]
    fn builder_matches_json() {
        let built = EncodeRequest::new()
            .payee_key("k@example.com")
            .amount("10.00")
            .merchant_city("RECIFE");
        let parsed: EncodeRequest = serde_json::from_str(
            r#"{"payeeKey": "k@example.com", "amount": "10.00", "merchantCity": "RECIFE"}"#,
        )
        .unwrap();
        assert_eq!(built, parsed);
    }

    #[test]
    fn serialize_skips_unset_fields() {
        let json = serde_json::to_string(&EncodeRequest::new().reference("X1")).unwrap();
        assert_eq!(json, r#"{"reference":"X1"}"#);
    }

    #[test]
    fn payload_parts() {
        let payload = EncodedPayload::new("000201TEST6304", "ABCD".to_owned());
        assert_eq!(payload.as_str(), "000201TEST6304ABCD");
        assert_eq!(payload.body(), "000201TEST6304");
        assert_eq!(payload.checksum(), "ABCD");
        assert_eq!(payload.to_string(), "000201TEST6304ABCD");
        assert_eq!(payload.into_inner(), "000201TEST6304ABCD");
    }

    #[test]
    fn payload_serializes_both_parts() {
        let payload = EncodedPayload::new("6304", "FFFF".to_owned());
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["payload"], "6304FFFF");
        assert_eq!(json["checksum"], "FFFF");
    }
}
