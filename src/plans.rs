//! Subscription plan categories, pricing, and the eligibility predicate
//! shared by the application-form endpoint and the apply gate.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlanCategory {
    None,
    Basic,
    Premium,
}

impl PlanCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanCategory::None => "NONE",
            PlanCategory::Basic => "BASIC",
            PlanCategory::Premium => "PREMIUM",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "NONE" => Some(PlanCategory::None),
            "BASIC" => Some(PlanCategory::Basic),
            "PREMIUM" => Some(PlanCategory::Premium),
            _ => None,
        }
    }

    /// Price of a purchasable plan in paise (INR minor units).
    pub fn price_paise(&self) -> Option<i64> {
        match self {
            PlanCategory::None => None,
            PlanCategory::Basic => Some(19_900),
            PlanCategory::Premium => Some(49_900),
        }
    }
}

/// Whether the intern's paid plan currently covers job applications.
/// An expired plan gives no coverage; the intern falls back to credits.
pub fn has_plan_coverage(
    plan: PlanCategory,
    plan_expiry: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> bool {
    plan != PlanCategory::None && plan_expiry.map_or(false, |expiry| expiry > now)
}

/// Credit charging policy: only interns without plan coverage consume a
/// job credit per application. Plan-covered interns apply without charge.
pub fn charges_credit(plan_covered: bool) -> bool {
    !plan_covered
}

/// Server-authoritative eligibility predicate. Mirrors what the UI may
/// compute client-side, but the client is never trusted.
pub fn can_apply(already_applied: bool, plan_covered: bool, job_credits: i32) -> bool {
    if already_applied {
        return false;
    }
    plan_covered || job_credits > 0
}
