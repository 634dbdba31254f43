//! Session status and the plan badge derived from it.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Subscription tier reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlanTier {
    /// Free trial.
    Trial,
    /// Paid subscription.
    Paid,
    /// No plan at all.
    #[serde(rename = "none")]
    Inactive,
}

/// Logged-in user state as returned by the session endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    /// Account e-mail.
    pub email: String,
    /// Whether an admin approved the account.
    #[serde(default)]
    pub approved: bool,
    /// Whether the account has admin rights.
    #[serde(default)]
    pub admin: bool,
    /// Current tier.
    pub plan: PlanTier,
    /// End of the trial period, for trial accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_expires_at: Option<DateTime<Utc>>,
}

/// Badge shown next to the user's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanBadge {
    /// Account still waiting for admin approval.
    PendingApproval,
    /// Trial running; partial days round up.
    Trial {
        /// Whole days left, at least 1.
        days_left: i64,
    },
    /// Trial is over (or has no end date).
    Expired,
    /// Paid subscription.
    Paid,
    /// No plan.
    Inactive,
}

impl SessionStatus {
    /// Computes the badge at instant `now`.
    #[must_use]
    pub fn badge(&self, now: DateTime<Utc>) -> PlanBadge {
        if !self.approved {
            return PlanBadge::PendingApproval;
        }
        match self.plan {
            PlanTier::Paid => PlanBadge::Paid,
            PlanTier::Inactive => PlanBadge::Inactive,
            PlanTier::Trial => self
                .trial_expires_at
                .map_or(PlanBadge::Expired, |expires| trial_badge(expires - now)),
        }
    }

    /// Returns `true` if the paywall must be shown at instant `now`.
    ///
    /// Admins never see the paywall.
    #[inline]
    #[must_use]
    pub fn needs_paywall(&self, now: DateTime<Utc>) -> bool {
        !self.admin && !matches!(self.badge(now), PlanBadge::Paid | PlanBadge::Trial { .. })
    }
}

/// Badge for a trial with `remaining` time left.
fn trial_badge(remaining: TimeDelta) -> PlanBadge {
    if remaining <= TimeDelta::zero() {
        return PlanBadge::Expired;
    }
    let whole = remaining.num_days();
    let partial = TimeDelta::try_days(whole).is_some_and(|days| remaining > days);
    PlanBadge::Trial {
        days_left: if partial { whole.saturating_add(1) } else { whole },
    }
}

impl core::fmt::Display for PlanBadge {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            Self::PendingApproval => f.write_str("Pending approval"),
            Self::Trial { days_left: 1 } => f.write_str("Trial (1 day left)"),
            Self::Trial { days_left } => write!(f, "Trial ({days_left} days left)"),
            Self::Expired => f.write_str("Trial expired"),
            Self::Paid => f.write_str("Paid"),
            Self::Inactive => f.write_str("No plan"),
        }
    }
}
