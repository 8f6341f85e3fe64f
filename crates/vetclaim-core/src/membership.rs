//! Subscription tier and the features it unlocks.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::error::ProfileError;
use crate::knowledge::TemplateId;
use crate::models::{ClaimType, UserProfile};
use crate::models::lenient::deserialize_optional_string;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum MembershipStatus {
    #[default]
    Free,
    Pro,
}

impl MembershipStatus {
    /// Billing subscriptions that are `active` or `trialing` grant Pro.
    pub fn from_subscription_status(status: &str) -> Self {
        match status.trim() {
            "active" | "trialing" => MembershipStatus::Pro,
            _ => MembershipStatus::Free,
        }
    }

    pub fn is_pro(&self) -> bool {
        *self == MembershipStatus::Pro
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MembershipStatus::Free => write!(f, "Free"),
            MembershipStatus::Pro => write!(f, "Pro"),
        }
    }
}

impl<'de> Deserialize<'de> for MembershipStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = deserialize_optional_string(deserializer)?;
        Ok(match raw.as_deref() {
            Some(s) if s.eq_ignore_ascii_case("pro") => MembershipStatus::Pro,
            _ => MembershipStatus::Free,
        })
    }
}

/// Subscription lifecycle notifications from the billing provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionEvent {
    Created {
        subscription_id: String,
        status: String,
    },
    Updated {
        previous_status: String,
        status: String,
    },
}

impl SubscriptionEvent {
    /// Apply the event to a profile. Returns true if the profile changed.
    pub fn apply(&self, profile: &mut UserProfile) -> bool {
        match self {
            SubscriptionEvent::Created {
                subscription_id,
                status,
            } => {
                profile.membership_status = MembershipStatus::from_subscription_status(status);
                profile.stripe_subscription_id = Some(subscription_id.clone());
                info!(
                    user = %profile.id,
                    membership = %profile.membership_status,
                    "Subscription created"
                );
                true
            }
            SubscriptionEvent::Updated {
                previous_status,
                status,
            } => {
                if previous_status == status {
                    return false;
                }
                let next = MembershipStatus::from_subscription_status(status);
                let changed = profile.membership_status != next;
                profile.membership_status = next;
                info!(user = %profile.id, membership = %next, status = %status, "Subscription updated");
                changed
            }
        }
    }
}

/// Grant Pro without a billing event. Returns true if the profile changed.
pub fn manual_upgrade(profile: &mut UserProfile) -> bool {
    let changed = !profile.membership_status.is_pro();
    profile.membership_status = MembershipStatus::Pro;
    changed
}

/// Templates offered for a claim, in catalog order.
pub fn available_templates(claim_type: ClaimType) -> Vec<TemplateId> {
    crate::knowledge::DOCUMENT_TEMPLATES
        .iter()
        .map(|t| t.id)
        .filter(|id| *id != TemplateId::Secondary || claim_type == ClaimType::Secondary)
        .collect()
}

/// Whether this member may generate this template for this kind of claim.
pub fn check_template_access(
    membership: MembershipStatus,
    template: TemplateId,
    claim_type: ClaimType,
) -> Result<(), ProfileError> {
    if template == TemplateId::Secondary && claim_type != ClaimType::Secondary {
        return Err(ProfileError::TemplateNotApplicable {
            template: template.title().to_string(),
        });
    }
    if !template.is_free() && !membership.is_pro() {
        return Err(ProfileError::ProRequired(template.title().to_string()));
    }
    Ok(())
}

/// Pro-only features outside document drafting.
pub fn require_pro(membership: MembershipStatus, feature: &str) -> Result<(), ProfileError> {
    if membership.is_pro() {
        Ok(())
    } else {
        Err(ProfileError::ProRequired(feature.to_string()))
    }
}
