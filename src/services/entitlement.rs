//! Entitlement ledger: plan gating and free-usage accounting.
//!
//! `check` is a pure decision on the request's [`AuthContext`] snapshot.
//! `consume` advances the stored counter with a read-modify-write against the
//! identity provider and must only be called once the operation succeeded.
//! There is no locking: two concurrent requests from one free user can both
//! pass `check` before either consumes, so the limit is soft.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::EntitlementConfig;
use crate::identity::{IdentityError, IdentityProvider};
use crate::middleware::AuthContext;
use crate::types::Operation;

pub const QUOTA_EXHAUSTED_MESSAGE: &str = "Limit reached. Upgrade to continue.";
pub const PREMIUM_REQUIRED_MESSAGE: &str = "This feature is only available for premium subscriptions";

/// Why an operation was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    QuotaExhausted,
    PremiumRequired,
}

impl Denial {
    pub fn message(&self) -> &'static str {
        match self {
            Denial::QuotaExhausted => QUOTA_EXHAUSTED_MESSAGE,
            Denial::PremiumRequired => PREMIUM_REQUIRED_MESSAGE,
        }
    }
}

/// Proof that an operation passed the check. Consumed after success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    user_id: String,
    operation: Operation,
    metered: bool,
}

impl Grant {
    /// Whether consuming this grant advances the free-usage counter
    pub fn is_metered(&self) -> bool {
        self.metered
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entitlement {
    Allowed(Grant),
    Denied(Denial),
}

pub struct EntitlementLedger {
    identity: Arc<dyn IdentityProvider>,
    free_usage_limit: u32,
    premium_only: HashSet<Operation>,
}

impl EntitlementLedger {
    pub fn new(identity: Arc<dyn IdentityProvider>, config: &EntitlementConfig) -> Self {
        Self {
            identity,
            free_usage_limit: config.free_usage_limit,
            premium_only: config.premium_only.iter().copied().collect(),
        }
    }

    /// Decide whether `auth` may run `operation`. Never mutates anything.
    pub fn check(&self, auth: &AuthContext, operation: Operation) -> Entitlement {
        if auth.plan.is_premium() {
            return Entitlement::Allowed(Grant {
                user_id: auth.user_id.clone(),
                operation,
                metered: false,
            });
        }

        if self.premium_only.contains(&operation) {
            debug!(user_id = %auth.user_id, %operation, "premium-only operation refused");
            return Entitlement::Denied(Denial::PremiumRequired);
        }

        if auth.free_usage >= self.free_usage_limit {
            debug!(
                user_id = %auth.user_id,
                %operation,
                free_usage = auth.free_usage,
                limit = self.free_usage_limit,
                "free usage exhausted"
            );
            return Entitlement::Denied(Denial::QuotaExhausted);
        }

        Entitlement::Allowed(Grant {
            user_id: auth.user_id.clone(),
            operation,
            metered: true,
        })
    }

    /// Advance the free-usage counter for a metered grant by exactly one.
    /// Returns the new counter, or `None` for unmetered (premium) grants.
    pub async fn consume(&self, grant: Grant) -> Result<Option<u32>, IdentityError> {
        if !grant.metered {
            return Ok(None);
        }

        let current = self.identity.free_usage(&grant.user_id).await?;
        let next = current.saturating_add(1);
        self.identity.set_free_usage(&grant.user_id, next).await?;

        info!(
            user_id = %grant.user_id,
            operation = %grant.operation,
            free_usage = next,
            "incremented free usage"
        );
        Ok(Some(next))
    }
}
