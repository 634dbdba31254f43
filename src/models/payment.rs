//! Merchant payment: the validated input of a single encode call.

use serde::Serialize;

use super::{Amount, PixKey};
use crate::config::{DEFAULT_MERCHANT_CITY, DEFAULT_MERCHANT_NAME, LengthPolicy};
use crate::error::{PixError, Result};
use crate::tlv::{self, tag};

/// Maximum merchant name length (tag `59`).
pub const MAX_MERCHANT_NAME_LEN: usize = 25;

/// Maximum merchant city length (tag `60`).
pub const MAX_MERCHANT_CITY_LEN: usize = 15;

/// Maximum reference label length (tag `62`, sub-tag `05`).
pub const MAX_REFERENCE_LEN: usize = 25;

/// Reference label meaning "no specific reference".
pub const DEFAULT_REFERENCE: &str = "***";

/// Point of initiation method (tag `01`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InitiationMethod {
    /// Reusable code without an amount (`11`).
    Static,
    /// Amount-bound code (`12`).
    Dynamic,
}

impl InitiationMethod {
    /// Returns the two-digit wire value.
    #[inline]
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Static => "11",
            Self::Dynamic => "12",
        }
    }

    /// Parses the two-digit wire value.
    #[inline]
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "11" => Some(Self::Static),
            "12" => Some(Self::Dynamic),
            _ => None,
        }
    }
}

/// A payment request to be encoded as a `BRCode`.
///
/// Constructed through [`MerchantPayment::builder`], which enforces the
/// standard's field limits; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantPayment {
    /// Payee PIX key.
    key: PixKey,
    /// Amount; `None` for a static code.
    amount: Option<Amount>,
    /// Merchant name, at most 25 characters.
    merchant_name: String,
    /// Merchant city, at most 15 characters.
    merchant_city: String,
    /// Reference label, at most 25 characters.
    reference: String,
}

impl MerchantPayment {
    /// Country code (tag `58`).
    pub const COUNTRY_CODE: &'static str = "BR";

    /// ISO 4217 numeric code for BRL (tag `53`).
    pub const CURRENCY_CODE: &'static str = "986";

    /// Merchant category code (tag `52`), unclassified.
    pub const MERCHANT_CATEGORY_CODE: &'static str = "0000";

    /// Starts building a payment to `key` with the default merchant name,
    /// city and reference.
    #[inline]
    #[must_use]
    pub fn builder(key: PixKey) -> MerchantPaymentBuilder {
        MerchantPaymentBuilder {
            key,
            amount: None,
            merchant_name: DEFAULT_MERCHANT_NAME.to_owned(),
            merchant_city: DEFAULT_MERCHANT_CITY.to_owned(),
            reference: None,
            length_policy: LengthPolicy::default(),
        }
    }

    /// Returns the payee key.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> &PixKey {
        &self.key
    }

    /// Returns the amount, if the code is amount-bound.
    #[inline]
    #[must_use]
    pub const fn amount(&self) -> Option<Amount> {
        self.amount
    }

    /// Returns the merchant name.
    #[inline]
    #[must_use]
    pub fn merchant_name(&self) -> &str {
        &self.merchant_name
    }

    /// Returns the merchant city.
    #[inline]
    #[must_use]
    pub fn merchant_city(&self) -> &str {
        &self.merchant_city
    }

    /// Returns the reference label.
    #[inline]
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Returns [`InitiationMethod::Dynamic`] when an amount is embedded.
    #[inline]
    #[must_use]
    pub const fn initiation_method(&self) -> InitiationMethod {
        if self.amount.is_some() {
            InitiationMethod::Dynamic
        } else {
            InitiationMethod::Static
        }
    }
}

/// Builder for a [`MerchantPayment`].
#[derive(Debug, Clone)]
pub struct MerchantPaymentBuilder {
    /// Payee key.
    key: PixKey,
    /// Optional amount.
    amount: Option<Amount>,
    /// Merchant name.
    merchant_name: String,
    /// Merchant city.
    merchant_city: String,
    /// Reference label; `None` keeps the default.
    reference: Option<String>,
    /// Over-long name/city handling.
    length_policy: LengthPolicy,
}

impl MerchantPaymentBuilder {
    /// Sets the amount, making the code amount-bound.
    #[inline]
    #[must_use]
    pub const fn amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Sets the merchant name.
    #[inline]
    #[must_use]
    pub fn merchant_name<T: Into<String>>(mut self, name: T) -> Self {
        self.merchant_name = name.into();
        self
    }

    /// Sets the merchant city.
    #[inline]
    #[must_use]
    pub fn merchant_city<T: Into<String>>(mut self, city: T) -> Self {
        self.merchant_city = city.into();
        self
    }

    /// Sets the reference label. An empty label means [`DEFAULT_REFERENCE`].
    #[inline]
    #[must_use]
    pub fn reference<T: Into<String>>(mut self, reference: T) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Sets how an over-long merchant name or city is handled.
    #[inline]
    #[must_use]
    pub const fn length_policy(mut self, policy: LengthPolicy) -> Self {
        self.length_policy = policy;
        self
    }

    /// Validates the fields and builds the payment.
    ///
    /// # Errors
    ///
    /// Returns [`PixError::MissingField`] for an empty merchant name or
    /// city, [`PixError::NonAscii`] when the key, name, city or reference
    /// is not ASCII, and [`PixError::FieldTooLong`] when the name exceeds 25
    /// characters or the city 15 (under [`LengthPolicy::Reject`]) or the
    /// reference exceeds 25 characters.
    #[inline]
    pub fn build(self) -> Result<MerchantPayment> {
        if self.merchant_name.trim().is_empty() {
            return Err(PixError::MissingField("merchant name"));
        }
        if self.merchant_city.trim().is_empty() {
            return Err(PixError::MissingField("merchant city"));
        }
        let label = match self.reference {
            Some(given) if !given.is_empty() => given,
            _ => DEFAULT_REFERENCE.to_owned(),
        };
        tlv::ensure_ascii(tag::ACCOUNT_KEY, self.key.as_str())?;
        tlv::ensure_ascii(tag::MERCHANT_NAME, &self.merchant_name)?;
        tlv::ensure_ascii(tag::MERCHANT_CITY, &self.merchant_city)?;
        tlv::ensure_ascii(tag::REFERENCE_LABEL, &label)?;

        let merchant_name = self.length_policy.apply(
            tag::MERCHANT_NAME,
            &self.merchant_name,
            MAX_MERCHANT_NAME_LEN,
        )?;
        let merchant_city = self.length_policy.apply(
            tag::MERCHANT_CITY,
            &self.merchant_city,
            MAX_MERCHANT_CITY_LEN,
        )?;
        let reference =
            LengthPolicy::Reject.apply(tag::REFERENCE_LABEL, &label, MAX_REFERENCE_LEN)?;

        Ok(MerchantPayment {
            key: self.key,
            amount: self.amount,
            merchant_name,
            merchant_city,
            reference,
        })
    }
}
