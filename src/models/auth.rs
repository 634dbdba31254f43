//! Login/registration form mode.

use serde::{Deserialize, Serialize};

/// Which authentication form is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthMode {
    /// Existing user signs in.
    #[default]
    Login,
    /// New user creates an account.
    Register,
}

impl AuthMode {
    /// Returns the other mode.
    #[inline]
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }

    /// Backend endpoint the form submits to.
    #[inline]
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Login => "/api/login",
            Self::Register => "/api/register",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_back_and_forth() {
        let mode = AuthMode::default();
        assert_eq!(mode, AuthMode::Login);
        assert_eq!(mode.toggled(), AuthMode::Register);
        assert_eq!(mode.toggled().toggled(), AuthMode::Login);
    }

    #[test]
    fn endpoints() {
        assert_eq!(AuthMode::Login.endpoint(), "/api/login");
        assert_eq!(AuthMode::Register.endpoint(), "/api/register");
    }
}
