//! PIX key newtype.

use serde::{Deserialize, Serialize};

use crate::error::{PixError, Result};

/// The kind of a PIX key, inferred from its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PixKeyKind {
    /// E-mail address.
    Email,
    /// Phone number in `+<country><number>` form.
    Phone,
    /// Individual taxpayer number (11 digits).
    Cpf,
    /// Company taxpayer number (14 digits).
    Cnpj,
    /// Random key (UUID).
    Random,
    /// Anything else; still carried verbatim.
    Unknown,
}

/// A PIX key: UUID, e-mail, phone, CPF/CNPJ or any other registered key.
///
/// The key is opaque to the encoder and carried verbatim; the only
/// constraint is that it is not empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PixKey(String);

impl PixKey {
    /// Creates a key.
    ///
    /// # Errors
    ///
    /// Returns [`PixError::MissingKey`] if the key is empty or whitespace.
    #[inline]
    pub fn new<T: Into<String>>(value: T) -> Result<Self> {
        let key = value.into();
        if key.trim().is_empty() {
            return Err(PixError::MissingKey);
        }
        Ok(Self(key))
    }

    /// Returns the key as given.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner string.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Infers the key kind from its shape.
    #[must_use]
    pub fn kind(&self) -> PixKeyKind {
        let key = self.0.as_str();
        if key.contains('@') {
            return PixKeyKind::Email;
        }
        if let Some(number) = key.strip_prefix('+') {
            return if is_digits(number) {
                PixKeyKind::Phone
            } else {
                PixKeyKind::Unknown
            };
        }
        if is_uuid(key) {
            return PixKeyKind::Random;
        }
        match (is_digits(key), key.len()) {
            (true, 11) => PixKeyKind::Cpf,
            (true, 14) => PixKeyKind::Cnpj,
            _ => PixKeyKind::Unknown,
        }
    }
}

impl core::fmt::Display for PixKeyKind {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match *self {
            Self::Email => "e-mail",
            Self::Phone => "phone",
            Self::Cpf => "CPF",
            Self::Cnpj => "CNPJ",
            Self::Random => "random",
            Self::Unknown => "unknown",
        })
    }
}

impl core::fmt::Display for PixKey {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl<'de> Deserialize<'de> for PixKey {
    #[inline]
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> core::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Returns `true` if `raw` is a non-empty run of ASCII digits.
fn is_digits(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|byte| byte.is_ascii_digit())
}

/// Returns `true` for the canonical 8-4-4-4-12 hex UUID layout.
fn is_uuid(raw: &str) -> bool {
    raw.len() == 36
        && raw.bytes().enumerate().all(|(index, byte)| match index {
            8 | 13 | 18 | 23 => byte == b'-',
            _ => byte.is_ascii_hexdigit(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_key() {
        assert!(matches!(PixKey::new(""), Err(PixError::MissingKey)));
        assert!(matches!(PixKey::new("   "), Err(PixError::MissingKey)));
    }

    #[test]
    fn carries_key_verbatim() {
        let key = PixKey::new("Lojista@Example.com").unwrap();
        assert_eq!(key.as_str(), "Lojista@Example.com");
        assert_eq!(key.to_string(), "Lojista@Example.com");
        assert_eq!(key.into_inner(), "Lojista@Example.com");
    }

    #[test]
    fn kind_detection() {
        let cases = [
            ("9aacbabc-39ad-4602-b73e-955703ec502e", PixKeyKind::Random),
            ("lojista@example.com", PixKeyKind::Email),
            ("+5511987654321", PixKeyKind::Phone),
            ("12345678901", PixKeyKind::Cpf),
            ("12345678000199", PixKeyKind::Cnpj),
            ("+55 11 98765", PixKeyKind::Unknown),
            ("chave-qualquer", PixKeyKind::Unknown),
        ];
        for (raw, expected) in cases {
            assert_eq!(PixKey::new(raw).unwrap().kind(), expected, "key {raw:?}");
        }
    }

    #[test]
    fn random_uuid_keys_are_detected() {
        let key = PixKey::new(uuid::Uuid::new_v4().to_string()).unwrap();
        assert_eq!(key.kind(), PixKeyKind::Random);
    }

    #[test]
    fn serde_roundtrip() {
        let key = PixKey::new("lojista@example.com").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, r#""lojista@example.com""#);
        let back: PixKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn deserialize_rejects_empty() {
        assert!(serde_json::from_str::<PixKey>(r#""""#).is_err());
    }

    #[test]
    fn kind_display() {
        assert_eq!(PixKeyKind::Cpf.to_string(), "CPF");
        assert_eq!(PixKeyKind::Random.to_string(), "random");
    }
}
