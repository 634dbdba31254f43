//! Encoder configuration: payee key, merchant defaults and length policy.
//!
//! The payee key is injected here rather than hard-coded so one encoder can
//! serve any payee. [`EncoderConfig::from_env`] reads the `PIX_*` variables
//! the CLI uses.

use core::str::FromStr;

use crate::error::{PixError, Result};
use crate::models::PixKey;

/// Default merchant name.
pub const DEFAULT_MERCHANT_NAME: &str = "LANZACA IA";

/// Default merchant city.
pub const DEFAULT_MERCHANT_CITY: &str = "SAO PAULO";

/// Environment variable holding the payee PIX key.
pub const KEY_ENV: &str = "PIX_KEY";

/// Environment variable holding the merchant name.
pub const MERCHANT_NAME_ENV: &str = "PIX_MERCHANT_NAME";

/// Environment variable holding the merchant city.
pub const MERCHANT_CITY_ENV: &str = "PIX_MERCHANT_CITY";

/// Environment variable selecting the [`LengthPolicy`].
pub const LENGTH_POLICY_ENV: &str = "PIX_LENGTH_POLICY";

/// What to do with a merchant name or city longer than the standard allows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LengthPolicy {
    /// Fail with [`PixError::FieldTooLong`].
    #[default]
    Reject,
    /// Silently keep only the leading characters.
    Truncate,
}

impl LengthPolicy {
    /// Applies the policy to `value`, limited to `max` characters.
    ///
    /// # Errors
    ///
    /// Returns [`PixError::FieldTooLong`] under [`LengthPolicy::Reject`]
    /// when `value` is longer than `max`.
    #[inline]
    pub fn apply(self, tag: &str, value: &str, max: usize) -> Result<String> {
        let length = value.chars().count();
        if length <= max {
            return Ok(value.to_owned());
        }
        match self {
            Self::Reject => Err(PixError::FieldTooLong {
                tag: tag.to_owned(),
                length,
                max,
            }),
            Self::Truncate => {
                tracing::debug!(tag, length, max, "truncating field");
                Ok(value.chars().take(max).collect())
            }
        }
    }
}

impl FromStr for LengthPolicy {
    type Err = PixError;

    #[inline]
    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "truncate" => Ok(Self::Truncate),
            other => Err(PixError::Config(format!(
                "unknown length policy {other:?} (expected \"reject\" or \"truncate\")"
            ))),
        }
    }
}

/// Configuration for a [`crate::PixEncoder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Key used when a request does not carry one.
    payee_key: Option<PixKey>,
    /// Merchant name used when a request does not carry one.
    merchant_name: String,
    /// Merchant city used when a request does not carry one.
    merchant_city: String,
    /// Over-long name/city handling.
    length_policy: LengthPolicy,
}

impl Default for EncoderConfig {
    #[inline]
    fn default() -> Self {
        Self {
            payee_key: None,
            merchant_name: DEFAULT_MERCHANT_NAME.to_owned(),
            merchant_city: DEFAULT_MERCHANT_CITY.to_owned(),
            length_policy: LengthPolicy::default(),
        }
    }
}

impl EncoderConfig {
    /// Creates a new builder with the default merchant name and city.
    #[inline]
    #[must_use]
    pub fn builder() -> EncoderConfigBuilder {
        EncoderConfigBuilder::default()
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`EncoderConfig::from_vars`].
    #[inline]
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable
    /// name to its value. Unset or empty variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PixError::Config`] if the length policy is not
    /// recognised.
    #[inline]
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut builder = Self::builder();
        if let Some(key) = read(KEY_ENV) {
            builder = builder.payee_key(key);
        }
        if let Some(name) = read(MERCHANT_NAME_ENV) {
            builder = builder.merchant_name(name);
        }
        if let Some(city) = read(MERCHANT_CITY_ENV) {
            builder = builder.merchant_city(city);
        }
        if let Some(policy) = read(LENGTH_POLICY_ENV) {
            builder = builder.length_policy(policy.parse()?);
        }
        builder.build()
    }

    /// Returns the configured payee key, if any.
    #[inline]
    #[must_use]
    pub const fn payee_key(&self) -> Option<&PixKey> {
        self.payee_key.as_ref()
    }

    /// Returns the default merchant name.
    #[inline]
    #[must_use]
    pub fn merchant_name(&self) -> &str {
        &self.merchant_name
    }

    /// Returns the default merchant city.
    #[inline]
    #[must_use]
    pub fn merchant_city(&self) -> &str {
        &self.merchant_city
    }

    /// Returns the length policy.
    #[inline]
    #[must_use]
    pub const fn length_policy(&self) -> LengthPolicy {
        self.length_policy
    }

    /// Returns the same configuration with a different length policy.
    #[inline]
    #[must_use]
    pub const fn with_length_policy(mut self, policy: LengthPolicy) -> Self {
        self.length_policy = policy;
        self
    }
}

/// Builder for constructing an [`EncoderConfig`].
#[derive(Debug, Default)]
pub struct EncoderConfigBuilder {
    /// Raw payee key.
    payee_key: Option<String>,
    /// Merchant name override.
    merchant_name: Option<String>,
    /// Merchant city override.
    merchant_city: Option<String>,
    /// Length policy.
    length_policy: LengthPolicy,
}

impl EncoderConfigBuilder {
    /// Sets the payee PIX key.
    #[inline]
    #[must_use]
    pub fn payee_key<T: Into<String>>(mut self, key: T) -> Self {
        self.payee_key = Some(key.into());
        self
    }

    /// Sets the default merchant name.
    #[inline]
    #[must_use]
    pub fn merchant_name<T: Into<String>>(mut self, name: T) -> Self {
        self.merchant_name = Some(name.into());
        self
    }

    /// Sets the default merchant city.
    #[inline]
    #[must_use]
    pub fn merchant_city<T: Into<String>>(mut self, city: T) -> Self {
        self.merchant_city = Some(city.into());
        self
    }

    /// Sets the length policy.
    #[inline]
    #[must_use]
    pub const fn length_policy(mut self, policy: LengthPolicy) -> Self {
        self.length_policy = policy;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PixError::MissingKey`] if a payee key was set but is empty.
    #[inline]
    pub fn build(self) -> Result<EncoderConfig> {
        let payee_key = self.payee_key.map(PixKey::new).transpose()?;
        Ok(EncoderConfig {
            payee_key,
            merchant_name: self
                .merchant_name
                .unwrap_or_else(|| DEFAULT_MERCHANT_NAME.to_owned()),
            merchant_city: self
                .merchant_city
                .unwrap_or_else(|| DEFAULT_MERCHANT_CITY.to_owned()),
            length_policy: self.length_policy,
        })
    }
}
