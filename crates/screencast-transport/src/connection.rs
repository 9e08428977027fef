//! Presenter identity lifecycle on the rendezvous.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{BASE_RECONNECT_DELAY_MS, MAX_RECONNECT_ATTEMPTS};

/// Whether the presenter identity is held.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum ConnectionState {
    #[default]
    Unclaimed,

    /// Claim sent, no answer yet.
    Claiming,

    Held,

    /// Rendezvous dropped; `attempt` is the reconnect in progress or due.
    Reconnecting { attempt: u32 },

    /// Given up until the session restarts.
    Failed { reason: String },
}

impl ConnectionState {
    pub fn holds_identity(&self) -> bool {
        matches!(self, Self::Held)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Current reconnect attempt, if reconnecting.
    pub fn reconnect_attempt(&self) -> Option<u32> {
        match self {
            Self::Reconnecting { attempt } => Some(*attempt),
            _ => None,
        }
    }

    /// Short label for logs and the UI.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unclaimed => "unclaimed",
            Self::Claiming => "claiming",
            Self::Held => "held",
            Self::Reconnecting { .. } => "reconnecting",
            Self::Failed { .. } => "failed",
        }
    }
}

/// One scheduled reconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledAttempt {
    /// 1-based attempt number.
    pub attempt: u32,
    pub delay: Duration,
}

/// Exponential backoff for identity reconnects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,

    /// Delay before the first attempt; doubled for each later one.
    pub base_delay: Duration,

    /// Cap on any single delay.
    pub max_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::from_millis(MAX_RECONNECT_ATTEMPTS, BASE_RECONNECT_DELAY_MS, 10_000)
    }
}

impl ReconnectPolicy {
    pub fn from_millis(max_attempts: u32, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::from_millis(base_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
        }
    }

    /// Delay before `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// The attempt to schedule after `attempts_made` attempts, or `None`
    /// once the budget is spent.
    pub fn next_attempt(&self, attempts_made: u32) -> Option<ScheduledAttempt> {
        if attempts_made >= self.max_attempts {
            return None;
        }

        let attempt = attempts_made + 1;
        Some(ScheduledAttempt {
            attempt,
            delay: self.backoff(attempt),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_up_to_cap() {
        let policy = ReconnectPolicy::default();

        assert_eq!(policy.backoff(1), Duration::from_secs(1));
        assert_eq!(policy.backoff(3), Duration::from_secs(4));
        assert_eq!(policy.backoff(50), Duration::from_secs(10));
    }

    #[test]
    fn test_budget_is_spent_after_max_attempts() {
        let policy = ReconnectPolicy::from_millis(2, 200, 1000);

        assert_eq!(
            policy.next_attempt(0),
            Some(ScheduledAttempt {
                attempt: 1,
                delay: Duration::from_millis(200)
            })
        );
        assert_eq!(policy.next_attempt(1).map(|s| s.attempt), Some(2));
        assert_eq!(policy.next_attempt(2), None);
    }

    #[test]
    fn test_state_queries() {
        assert!(ConnectionState::Held.holds_identity());
        assert!(!ConnectionState::Claiming.holds_identity());
        assert_eq!(ConnectionState::Reconnecting { attempt: 2 }.reconnect_attempt(), Some(2));
        assert_eq!(ConnectionState::default().label(), "unclaimed");
        assert!(ConnectionState::Failed {
            reason: "taken".into()
        }
        .is_failed());
    }
}
