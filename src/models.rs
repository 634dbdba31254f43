//! Data models for PIX payments and the paywall backend.
//!
//! The payment side ([`Amount`], [`PixKey`], [`MerchantPayment`],
//! [`EncodeRequest`], [`EncodedPayload`]) feeds the encoder; the paywall
//! side ([`Plan`], [`SessionStatus`], [`AuthMode`]) mirrors what the
//! backend serves.

mod amount;
mod auth;
mod key;
mod payment;
mod plan;
mod request;
mod session;

pub use amount::{Amount, AmountInput};
pub use auth::AuthMode;
pub use key::{PixKey, PixKeyKind};
pub use payment::{
    DEFAULT_REFERENCE, InitiationMethod, MAX_MERCHANT_CITY_LEN, MAX_MERCHANT_NAME_LEN,
    MAX_REFERENCE_LEN, MerchantPayment, MerchantPaymentBuilder,
};
pub use plan::{Plan, PlanList};
pub use request::{EncodeRequest, EncodedPayload};
pub use session::{PlanBadge, PlanTier, SessionStatus};
